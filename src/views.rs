//! Borrowing, read-only projections of a FrozenMap.
//!
//! A view is a shared reference to its map plus a choice of projection.
//! None of them has a mutating method; there is nothing to reject at
//! runtime because there is nothing to call:
//!
//! ```compile_fail
//! use frozen_openmap::FrozenMap;
//!
//! let map: FrozenMap<&str, i32> = [("a", 1)].into_iter().collect();
//! map.keys().insert("b");
//! ```
//!
//! ```compile_fail
//! use frozen_openmap::FrozenMap;
//!
//! let map: FrozenMap<&str, i32> = [("a", 1)].into_iter().collect();
//! map.values().clear();
//! ```
//!
//! The parent map can never change, so a view always agrees with it.

use crate::frozen_map::FrozenMap;
use crate::table::Iter;
use crate::DefaultHashBuilder;
use core::borrow::Borrow;
use core::hash::{BuildHasher, Hash};
use core::iter::FusedIterator;

/// Read-only container contract shared by [`Keys`], [`Values`] and
/// [`Entries`].
pub trait ReadOnlyView<'a> {
    /// What iteration yields.
    type Item;
    /// What `contains` looks for.
    type Probe: ?Sized;
    /// Iterator over the view's items.
    type Iter: Iterator<Item = Self::Item>;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn contains(&self, probe: &Self::Probe) -> bool;

    fn iter(&self) -> Self::Iter;
}

macro_rules! view_common {
    ($view:ident) => {
        impl<'a, K, V, S> $view<'a, K, V, S> {
            pub(crate) fn new(map: &'a FrozenMap<K, V, S>) -> Self {
                Self { map }
            }

            pub fn len(&self) -> usize {
                self.map.len()
            }

            pub fn is_empty(&self) -> bool {
                self.map.is_empty()
            }
        }

        impl<K, V, S> Clone for $view<'_, K, V, S> {
            fn clone(&self) -> Self {
                *self
            }
        }

        impl<K, V, S> Copy for $view<'_, K, V, S> {}

        impl<K: core::fmt::Debug, V: core::fmt::Debug, S> core::fmt::Debug for $view<'_, K, V, S> {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                f.debug_list().entries(self.iter()).finish()
            }
        }
    };
}

/// The keys of a [`FrozenMap`].
pub struct Keys<'a, K, V, S = DefaultHashBuilder> {
    map: &'a FrozenMap<K, V, S>,
}

/// The values of a [`FrozenMap`].
pub struct Values<'a, K, V, S = DefaultHashBuilder> {
    map: &'a FrozenMap<K, V, S>,
}

/// The `(key, value)` pairs of a [`FrozenMap`].
pub struct Entries<'a, K, V, S = DefaultHashBuilder> {
    map: &'a FrozenMap<K, V, S>,
}

view_common!(Keys);
view_common!(Values);
view_common!(Entries);

impl<'a, K, V, S> Keys<'a, K, V, S> {
    pub fn iter(&self) -> KeysIter<'a, K, V> {
        KeysIter {
            inner: self.map.iter(),
        }
    }
}

impl<'a, K, V, S> Keys<'a, K, V, S>
where
    K: Eq + Hash,
    S: BuildHasher,
{
    /// O(1) average: a lookup in the parent map.
    pub fn contains<Q>(&self, q: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.map.contains_key(q)
    }
}

impl<'a, K, V, S> Values<'a, K, V, S> {
    pub fn iter(&self) -> ValuesIter<'a, K, V> {
        ValuesIter {
            inner: self.map.iter(),
        }
    }
}

impl<'a, K, V: PartialEq, S> Values<'a, K, V, S> {
    /// Linear scan over the parent's values.
    pub fn contains(&self, value: &V) -> bool {
        self.iter().any(|v| v == value)
    }
}

impl<'a, K, V, S> Entries<'a, K, V, S> {
    pub fn iter(&self) -> Iter<'a, K, V> {
        self.map.iter()
    }
}

impl<'a, K, V, S> Entries<'a, K, V, S>
where
    K: Eq + Hash,
    V: PartialEq,
    S: BuildHasher,
{
    /// True if the parent maps `key` to exactly `value`.
    pub fn contains<Q>(&self, key: &Q, value: &V) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.map.get(key) == Some(value)
    }
}

impl<'a, K, V, S> ReadOnlyView<'a> for Keys<'a, K, V, S>
where
    K: Eq + Hash,
    S: BuildHasher,
{
    type Item = &'a K;
    type Probe = K;
    type Iter = KeysIter<'a, K, V>;

    fn len(&self) -> usize {
        Keys::len(self)
    }

    fn contains(&self, probe: &K) -> bool {
        Keys::contains(self, probe)
    }

    fn iter(&self) -> KeysIter<'a, K, V> {
        Keys::iter(self)
    }
}

impl<'a, K, V, S> ReadOnlyView<'a> for Values<'a, K, V, S>
where
    V: PartialEq,
{
    type Item = &'a V;
    type Probe = V;
    type Iter = ValuesIter<'a, K, V>;

    fn len(&self) -> usize {
        Values::len(self)
    }

    fn contains(&self, probe: &V) -> bool {
        Values::contains(self, probe)
    }

    fn iter(&self) -> ValuesIter<'a, K, V> {
        Values::iter(self)
    }
}

impl<'a, K, V, S> ReadOnlyView<'a> for Entries<'a, K, V, S>
where
    K: Eq + Hash,
    V: PartialEq,
    S: BuildHasher,
{
    type Item = (&'a K, &'a V);
    type Probe = (K, V);
    type Iter = Iter<'a, K, V>;

    fn len(&self) -> usize {
        Entries::len(self)
    }

    fn contains(&self, probe: &(K, V)) -> bool {
        Entries::contains(self, &probe.0, &probe.1)
    }

    fn iter(&self) -> Iter<'a, K, V> {
        Entries::iter(self)
    }
}

impl<'a, K, V, S> IntoIterator for Keys<'a, K, V, S> {
    type Item = &'a K;
    type IntoIter = KeysIter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a, K, V, S> IntoIterator for Values<'a, K, V, S> {
    type Item = &'a V;
    type IntoIter = ValuesIter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a, K, V, S> IntoIterator for Entries<'a, K, V, S> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Iterator over the keys of a [`FrozenMap`].
pub struct KeysIter<'a, K, V> {
    inner: Iter<'a, K, V>,
}

impl<'a, K, V> Iterator for KeysIter<'a, K, V> {
    type Item = &'a K;

    #[inline]
    fn next(&mut self) -> Option<&'a K> {
        self.inner.next().map(|(k, _)| k)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> ExactSizeIterator for KeysIter<'_, K, V> {}
impl<K, V> FusedIterator for KeysIter<'_, K, V> {}

/// Iterator over the values of a [`FrozenMap`].
pub struct ValuesIter<'a, K, V> {
    inner: Iter<'a, K, V>,
}

impl<'a, K, V> Iterator for ValuesIter<'a, K, V> {
    type Item = &'a V;

    #[inline]
    fn next(&mut self) -> Option<&'a V> {
        self.inner.next().map(|(_, v)| v)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> ExactSizeIterator for ValuesIter<'_, K, V> {}
impl<K, V> FusedIterator for ValuesIter<'_, K, V> {}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    fn sample() -> FrozenMap<String, i32> {
        (0..10).map(|i| (format!("k{}", i), i)).collect()
    }

    fn check_view<'a, T: ReadOnlyView<'a>>(view: T, expected_len: usize, present: &T::Probe) {
        assert_eq!(view.len(), expected_len);
        assert_eq!(view.is_empty(), expected_len == 0);
        assert_eq!(view.iter().count(), expected_len);
        assert!(view.contains(present));
    }

    /// Invariant: every view agrees with its parent on size and contents.
    #[test]
    fn views_match_parent() {
        let m = sample();
        check_view(m.keys(), 10, &"k3".to_string());
        check_view(m.values(), 10, &7);
        check_view(m.entries(), 10, &("k2".to_string(), 2));

        let keys: BTreeSet<&String> = m.keys().into_iter().collect();
        let from_map: BTreeSet<&String> = m.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, from_map);
        let value_sum: i32 = m.values().iter().sum();
        assert_eq!(value_sum, 45);
        for (k, v) in m.entries() {
            assert_eq!(m.get(k), Some(v));
        }
    }

    /// Invariant: `contains` is false for anything the parent does not hold.
    #[test]
    fn contains_rejects_absent() {
        let m = sample();
        assert!(m.keys().contains("k9"));
        assert!(!m.keys().contains("nope"));
        assert!(!m.values().contains(&100));
        assert!(m.entries().contains("k1", &1));
        assert!(!m.entries().contains("k1", &2));
        assert!(!m.entries().contains("zz", &1));
    }

    #[test]
    fn views_of_empty_map() {
        let m: FrozenMap<String, i32> = FrozenMap::new();
        assert!(m.keys().is_empty());
        assert_eq!(m.values().iter().len(), 0);
        assert_eq!(m.entries().into_iter().next(), None);
    }

    #[test]
    fn views_are_copy_and_debug() {
        let m: FrozenMap<&str, i32> = [("a", 1)].into_iter().collect();
        let k = m.keys();
        let k2 = k;
        assert_eq!(k.len(), k2.len());
        assert_eq!(format!("{:?}", m.keys()), r#"["a"]"#);
        assert_eq!(format!("{:?}", m.values()), "[1]");
    }
}
