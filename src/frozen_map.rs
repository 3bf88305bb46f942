//! FrozenMap: the sealed, read-only map and its copy-on-write `compute`.

use crate::builder::Builder;
use crate::structural_hash;
use crate::table::{Iter, OpenTable};
use crate::views::{Entries, Keys, Values};
use crate::DefaultHashBuilder;
use core::borrow::Borrow;
use core::fmt;
use core::hash::{BuildHasher, Hash, Hasher};
use core::ops;
use std::borrow::Cow;

/// Immutable open-addressing hash map.
///
/// Obtained from [`Builder::build`], [`FrozenMap::compute`] or
/// `FromIterator`. Nothing can change a `FrozenMap` once it exists, so
/// any number of threads may read it concurrently without locking.
///
/// Equality and [`Hash`] depend only on the set of entries, never on
/// slot layout, capacity or hasher state.
#[derive(Clone)]
pub struct FrozenMap<K, V, S = DefaultHashBuilder> {
    table: OpenTable<K, V, S>,
}

impl<K, V> FrozenMap<K, V> {
    /// The empty map. Allocates nothing.
    pub fn new() -> Self {
        Self {
            table: OpenTable::new(),
        }
    }

    /// Same as [`FrozenMap::new`].
    pub fn empty() -> Self {
        Self::new()
    }

    /// Starts a new builder with the default hasher.
    pub fn builder() -> Builder<K, V> {
        Builder::new()
    }

    /// Starts a builder pre-sized for `capacity` entries.
    pub fn builder_with_capacity(capacity: usize) -> Builder<K, V> {
        Builder::with_capacity(capacity)
    }
}

impl<K, V> Default for FrozenMap<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V, S> FrozenMap<K, V, S> {
    pub(crate) fn from_table(table: OpenTable<K, V, S>) -> Self {
        Self { table }
    }

    pub(crate) fn table(&self) -> &OpenTable<K, V, S> {
        &self.table
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// Number of slots in the backing table.
    pub fn capacity(&self) -> usize {
        self.table.capacity()
    }

    pub fn hasher(&self) -> &S {
        self.table.hasher()
    }

    /// Iterates over `(&K, &V)` in slot order. The order is unspecified
    /// and may differ between equal maps.
    pub fn iter(&self) -> Iter<'_, K, V> {
        self.table.iter()
    }

    pub fn keys(&self) -> Keys<'_, K, V, S> {
        Keys::new(self)
    }

    pub fn values(&self) -> Values<'_, K, V, S> {
        Values::new(self)
    }

    pub fn entries(&self) -> Entries<'_, K, V, S> {
        Entries::new(self)
    }
}

impl<K, V, S> FrozenMap<K, V, S>
where
    K: Eq + Hash,
    S: BuildHasher,
{
    pub fn get<Q>(&self, q: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.table.get(q)
    }

    pub fn get_key_value<Q>(&self, q: &Q) -> Option<(&K, &V)>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.table.get_key_value(q)
    }

    /// Returns the value for `q`, or `default` when the key is absent.
    pub fn get_or<'a, Q>(&'a self, q: &Q, default: &'a V) -> &'a V
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.table.get(q).unwrap_or(default)
    }

    pub fn contains_key<Q>(&self, q: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.table.contains_key(q)
    }
}

impl<K, V, S> FrozenMap<K, V, S>
where
    K: Eq + Hash + Clone,
    V: Clone,
    S: BuildHasher + Clone,
{
    /// Starts a builder holding a copy of this map's entries. The map
    /// itself is untouched.
    pub fn to_builder(&self) -> Builder<K, V, S> {
        Builder::from_map(self)
    }

    /// Derives a map in which `key` maps to `remap(&key, current)`.
    ///
    /// - The remapped value equals the current one: returns
    ///   `Cow::Borrowed(self)`, with no allocation.
    /// - The remapped value is `None` and the key was present: a copy
    ///   without the key.
    /// - Otherwise: a copy with the key set to the remapped value.
    ///
    /// `None` for an absent key also yields `Cow::Borrowed(self)`. This
    /// departs from the rule that an absent key is always inserted, even
    /// when the result equals the absent current value: there is no null
    /// value to store, so the map is left as is.
    /// Every `Cow::Owned` result is built on a full clone of the slot array.
    ///
    /// ```
    /// use frozen_openmap::FrozenMap;
    /// use std::borrow::Cow;
    ///
    /// let m1: FrozenMap<&str, i32> = [("a", 1), ("b", 2)].into_iter().collect();
    /// let m2 = m1.compute("c", |_, cur| cur.map_or(Some(3), |v| Some(v + 1))).into_owned();
    /// assert_eq!(m2.len(), 3);
    /// assert!(!m1.contains_key("c"));
    ///
    /// let m3 = m2.compute("a", |_, cur| cur.copied());
    /// assert!(matches!(m3, Cow::Borrowed(m) if std::ptr::eq(m, &m2)));
    /// ```
    pub fn compute<F>(&self, key: K, remap: F) -> Cow<'_, Self>
    where
        V: PartialEq,
        F: FnOnce(&K, Option<&V>) -> Option<V>,
    {
        let current = self.table.get(&key);
        match (current, remap(&key, current)) {
            (Some(old), Some(new)) if *old == new => {
                tracing::trace!("compute left value unchanged; reusing map");
                Cow::Borrowed(self)
            }
            (None, None) => {
                tracing::trace!("compute left key absent; reusing map");
                Cow::Borrowed(self)
            }
            (Some(_), None) => Cow::Owned(self.copy_and_modify(|t| {
                t.remove(&key);
            })),
            (_, Some(new)) => Cow::Owned(self.copy_and_modify(|t| {
                t.insert(key, new);
            })),
        }
    }

    fn copy_and_modify<F>(&self, modify: F) -> Self
    where
        F: FnOnce(&mut OpenTable<K, V, S>),
    {
        let mut table = self.table.clone();
        modify(&mut table);
        tracing::trace!(
            capacity = table.capacity(),
            len = table.len(),
            "compute cloned table"
        );
        Self { table }
    }
}

impl<K, V, S> FrozenMap<K, V, S>
where
    K: Hash,
    V: Hash,
{
    /// Order-independent hash of the entries, the value `Hash` feeds to
    /// its hasher along with `len`. Equal maps always agree on it.
    pub fn structural_hash(&self) -> u64 {
        structural_hash::combine(self.iter())
    }
}

impl<K, V, S> PartialEq for FrozenMap<K, V, S>
where
    K: Eq + Hash,
    V: PartialEq,
    S: BuildHasher,
{
    fn eq(&self, other: &Self) -> bool {
        if core::ptr::eq(self, other) {
            return true;
        }
        self.len() == other.len() && self.iter().all(|(k, v)| other.get(k) == Some(v))
    }
}

impl<K, V, S> Eq for FrozenMap<K, V, S>
where
    K: Eq + Hash,
    V: Eq,
    S: BuildHasher,
{
}

impl<K, V, S> Hash for FrozenMap<K, V, S>
where
    K: Hash,
    V: Hash,
{
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_usize(self.len());
        state.write_u64(self.structural_hash());
    }
}

impl<K: fmt::Debug, V: fmt::Debug, S> fmt::Debug for FrozenMap<K, V, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<K, V, S> FromIterator<(K, V)> for FrozenMap<K, V, S>
where
    K: Eq + Hash,
    S: BuildHasher + Default,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let iter = iter.into_iter();
        let mut table = OpenTable::with_capacity_and_hasher(iter.size_hint().0, S::default());
        for (k, v) in iter {
            table.insert(k, v);
        }
        Self { table }
    }
}

impl<K, Q, V, S> ops::Index<&Q> for FrozenMap<K, V, S>
where
    K: Eq + Hash + Borrow<Q>,
    Q: ?Sized + Eq + Hash,
    S: BuildHasher,
{
    type Output = V;

    fn index(&self, key: &Q) -> &V {
        self.get(key).expect("key not found in FrozenMap")
    }
}

impl<'a, K, V, S> IntoIterator for &'a FrozenMap<K, V, S> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Iter<'a, K, V> {
        self.iter()
    }
}
