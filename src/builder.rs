//! Builder: single-use staging area that seals into a FrozenMap.

use crate::error::BuilderError;
use crate::frozen_map::FrozenMap;
use crate::table::OpenTable;
use crate::DefaultHashBuilder;
use core::borrow::Borrow;
use core::cell::Cell;
use core::fmt;
use core::hash::{BuildHasher, Hash};
use core::marker::PhantomData;
use core::mem;

enum State<K, V, S> {
    Building(OpenTable<K, V, S>),
    Sealed,
}

impl<K, V, S> State<K, V, S> {
    fn table(&self) -> Result<&OpenTable<K, V, S>, BuilderError> {
        match self {
            State::Building(t) => Ok(t),
            State::Sealed => Err(BuilderError::AlreadySealed),
        }
    }

    fn table_mut(&mut self) -> Result<&mut OpenTable<K, V, S>, BuilderError> {
        match self {
            State::Building(t) => Ok(t),
            State::Sealed => Err(BuilderError::AlreadySealed),
        }
    }
}

/// Mutable staging area for a [`FrozenMap`].
///
/// A builder is `Building` until [`build`](Self::build) moves its table
/// into the new map; from then on it is `Sealed` and every method returns
/// [`BuilderError::AlreadySealed`].
///
/// Builders are not synchronized. They may be moved to another thread but
/// not shared (`!Sync`):
///
/// ```compile_fail
/// fn assert_sync<T: Sync>() {}
/// assert_sync::<frozen_openmap::Builder<u32, u32>>();
/// ```
///
/// ```
/// use frozen_openmap::{BuilderError, FrozenMap};
///
/// let mut b = FrozenMap::builder();
/// b.put("a", 1)?.put("b", 2)?;
/// let m = b.build()?;
/// assert_eq!(m.len(), 2);
/// assert_eq!(b.put("c", 3).err(), Some(BuilderError::AlreadySealed));
/// # Ok::<(), BuilderError>(())
/// ```
pub struct Builder<K, V, S = DefaultHashBuilder> {
    state: State<K, V, S>,
    // Send but !Sync: a builder may move between threads, never be shared.
    _not_sync: PhantomData<Cell<()>>,
}

impl<K, V> Builder<K, V> {
    pub fn new() -> Self {
        Self::with_hasher(Default::default())
    }

    /// Creates a builder that holds `capacity` entries without rehashing.
    pub fn with_capacity(capacity: usize) -> Self {
        Self::with_capacity_and_hasher(capacity, Default::default())
    }
}

impl<K, V> Default for Builder<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V, S> Builder<K, V, S> {
    pub fn with_hasher(hasher: S) -> Self {
        Self::from_table(OpenTable::with_hasher(hasher))
    }

    pub fn with_capacity_and_hasher(capacity: usize, hasher: S) -> Self {
        Self::from_table(OpenTable::with_capacity_and_hasher(capacity, hasher))
    }

    fn from_table(table: OpenTable<K, V, S>) -> Self {
        Self {
            state: State::Building(table),
            _not_sync: PhantomData,
        }
    }

    /// Returns true once [`build`](Self::build) has been called.
    pub fn is_sealed(&self) -> bool {
        matches!(self.state, State::Sealed)
    }

    pub fn len(&self) -> Result<usize, BuilderError> {
        self.state.table().map(OpenTable::len)
    }

    pub fn is_empty(&self) -> Result<bool, BuilderError> {
        self.state.table().map(OpenTable::is_empty)
    }

    /// Drops every staged entry.
    pub fn clear(&mut self) -> Result<&mut Self, BuilderError> {
        self.state.table_mut()?.clear();
        Ok(self)
    }

    /// Keeps only the staged entries for which `keep` returns true and
    /// returns how many were removed.
    pub fn retain<F>(&mut self, keep: F) -> Result<usize, BuilderError>
    where
        F: FnMut(&K, &mut V) -> bool,
    {
        Ok(self.state.table_mut()?.retain(keep))
    }

    /// Seals the builder and returns the map holding everything staged so far.
    pub fn build(&mut self) -> Result<FrozenMap<K, V, S>, BuilderError> {
        match mem::replace(&mut self.state, State::Sealed) {
            State::Building(table) => {
                tracing::trace!(
                    len = table.len(),
                    capacity = table.capacity(),
                    "builder sealed"
                );
                Ok(FrozenMap::from_table(table))
            }
            State::Sealed => Err(BuilderError::AlreadySealed),
        }
    }
}

impl<K, V, S> Builder<K, V, S>
where
    K: Eq + Hash,
    S: BuildHasher,
{
    /// Stages `key -> value`, returning the value it replaced.
    pub fn insert(&mut self, key: K, value: V) -> Result<Option<V>, BuilderError> {
        Ok(self.state.table_mut()?.insert(key, value))
    }

    /// Fluent form of [`insert`](Self::insert).
    pub fn put(&mut self, key: K, value: V) -> Result<&mut Self, BuilderError> {
        self.insert(key, value)?;
        Ok(self)
    }

    /// Stages every pair of `entries`; later pairs win over earlier ones.
    pub fn put_all<I>(&mut self, entries: I) -> Result<&mut Self, BuilderError>
    where
        I: IntoIterator<Item = (K, V)>,
    {
        let table = self.state.table_mut()?;
        for (k, v) in entries {
            table.insert(k, v);
        }
        Ok(self)
    }

    /// Unstages `q`, returning its value if it was present.
    pub fn remove<Q>(&mut self, q: &Q) -> Result<Option<V>, BuilderError>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        Ok(self.state.table_mut()?.remove(q))
    }

    /// Fluent form of [`remove`](Self::remove).
    pub fn without<Q>(&mut self, q: &Q) -> Result<&mut Self, BuilderError>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.remove(q)?;
        Ok(self)
    }

    pub fn get<Q>(&self, q: &Q) -> Result<Option<&V>, BuilderError>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        Ok(self.state.table()?.get(q))
    }

    pub fn contains_key<Q>(&self, q: &Q) -> Result<bool, BuilderError>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        Ok(self.state.table()?.contains_key(q))
    }
}

impl<K, V, S> Builder<K, V, S>
where
    K: Clone,
    V: Clone,
    S: Clone,
{
    /// Creates a builder pre-populated with a copy of `map`'s table.
    pub fn from_map(map: &FrozenMap<K, V, S>) -> Self {
        Self::from_table(map.table().clone())
    }
}

impl<K, V, S> fmt::Debug for Builder<K, V, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.state {
            State::Building(t) => f
                .debug_struct("Builder")
                .field("state", &"Building")
                .field("len", &t.len())
                .finish_non_exhaustive(),
            State::Sealed => f
                .debug_struct("Builder")
                .field("state", &"Sealed")
                .finish(),
        }
    }
}
