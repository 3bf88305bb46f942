//! OpenTable: flat open-addressing storage with linear probing and tombstones.

use crate::DefaultHashBuilder;
use core::borrow::Borrow;
use core::hash::{BuildHasher, Hash};
use core::mem;

/// Smallest slot count allocated once the table holds anything.
pub const MIN_CAPACITY: usize = 8;

// Maximum fill, counting tombstones: 3/4.
const LOAD_NUM: usize = 3;
const LOAD_DEN: usize = 4;

#[derive(Clone, Debug)]
struct Bucket<K, V> {
    hash: u64,
    key: K,
    value: V,
}

#[derive(Clone, Debug)]
enum Slot<K, V> {
    Empty,
    Occupied(Bucket<K, V>),
    Tombstone,
}

/// Open-addressing hash table.
///
/// `Clone` copies the slot array verbatim (tombstones included), which is
/// O(capacity) rather than O(len).
#[derive(Clone)]
pub struct OpenTable<K, V, S = DefaultHashBuilder> {
    hasher: S,
    slots: Vec<Slot<K, V>>,
    occupied: usize,
    tombstones: usize,
}

/// Smallest power-of-two slot count that keeps `len` entries under the
/// load limit.
fn capacity_for(len: usize) -> usize {
    if len == 0 {
        return 0;
    }
    len.checked_mul(LOAD_DEN)
        .map(|n| n.div_ceil(LOAD_NUM))
        .and_then(usize::checked_next_power_of_two)
        .unwrap_or_else(|| capacity_overflow())
        .max(MIN_CAPACITY)
}

#[cold]
#[inline(never)]
fn capacity_overflow() -> ! {
    panic!("open table capacity overflow");
}

fn empty_slots<K, V>(capacity: usize) -> Vec<Slot<K, V>> {
    let mut slots = Vec::with_capacity(capacity);
    slots.resize_with(capacity, || Slot::Empty);
    slots
}

impl<K, V> OpenTable<K, V> {
    pub fn new() -> Self {
        Self::with_hasher(Default::default())
    }
}

impl<K, V> Default for OpenTable<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V, S> OpenTable<K, V, S> {
    pub fn with_hasher(hasher: S) -> Self {
        Self {
            hasher,
            slots: Vec::new(),
            occupied: 0,
            tombstones: 0,
        }
    }

    /// Creates a table that holds `capacity` entries without rehashing.
    pub fn with_capacity_and_hasher(capacity: usize, hasher: S) -> Self {
        Self {
            hasher,
            slots: empty_slots(capacity_for(capacity)),
            occupied: 0,
            tombstones: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.occupied
    }

    pub fn is_empty(&self) -> bool {
        self.occupied == 0
    }

    /// Number of slots, occupied or not.
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    pub fn tombstones(&self) -> usize {
        self.tombstones
    }

    pub fn hasher(&self) -> &S {
        &self.hasher
    }

    /// Empties every slot but keeps the allocation.
    pub fn clear(&mut self) {
        self.slots.iter_mut().for_each(|s| *s = Slot::Empty);
        self.occupied = 0;
        self.tombstones = 0;
    }

    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            slots: self.slots.iter(),
            remaining: self.occupied,
        }
    }

    /// Keeps only the entries for which `keep` returns true. Returns the
    /// number of entries removed.
    pub fn retain<F>(&mut self, mut keep: F) -> usize
    where
        F: FnMut(&K, &mut V) -> bool,
    {
        let mut removed = 0;
        for slot in self.slots.iter_mut() {
            let drop_it = match slot {
                Slot::Occupied(b) => !keep(&b.key, &mut b.value),
                _ => false,
            };
            if drop_it {
                *slot = Slot::Tombstone;
                removed += 1;
            }
        }
        self.occupied -= removed;
        self.tombstones += removed;
        removed
    }

    #[inline]
    fn mask(&self) -> usize {
        self.slots.len() - 1
    }

    /// First `Empty` or `Tombstone` slot on the probe path of `hash`.
    fn find_vacant(&self, hash: u64) -> usize {
        let mask = self.mask();
        let mut idx = hash as usize & mask;
        for _ in 0..self.slots.len() {
            if !matches!(self.slots[idx], Slot::Occupied(_)) {
                return idx;
            }
            idx = (idx + 1) & mask;
        }
        panic!(
            "open table invariant broken: no vacant slot among {} (occupied {})",
            self.slots.len(),
            self.occupied
        );
    }

    /// Makes room for one more entry, rehashing when the slots in use
    /// (occupied plus tombstones) would exceed the load limit.
    fn reserve_one(&mut self) {
        let capacity = self.slots.len();
        if (self.occupied + self.tombstones + 1) * LOAD_DEN <= capacity * LOAD_NUM {
            return;
        }
        let new_capacity = if capacity != 0 && (self.occupied + 1) * 2 <= capacity {
            // Mostly tombstones: purge them without growing.
            capacity
        } else {
            let doubled = capacity.checked_mul(2).unwrap_or_else(|| capacity_overflow());
            capacity_for(self.occupied + 1).max(doubled)
        };
        self.rehash(new_capacity);
    }

    /// Moves every occupied slot into a fresh array of `new_capacity` slots.
    fn rehash(&mut self, new_capacity: usize) {
        tracing::debug!(
            old_capacity = self.slots.len(),
            new_capacity,
            occupied = self.occupied,
            tombstones = self.tombstones,
            "rehashing open table"
        );
        let old = mem::replace(&mut self.slots, empty_slots(new_capacity));
        self.tombstones = 0;
        for slot in old {
            if let Slot::Occupied(bucket) = slot {
                let idx = self.find_vacant(bucket.hash);
                self.slots[idx] = Slot::Occupied(bucket);
            }
        }
    }
}

impl<K, V, S> OpenTable<K, V, S>
where
    K: Eq + Hash,
    S: BuildHasher,
{
    fn make_hash<Q>(&self, q: &Q) -> u64
    where
        Q: ?Sized + Hash,
    {
        self.hasher.hash_one(q)
    }

    /// Index of the occupied slot holding `q`, if any.
    fn find_index<Q>(&self, hash: u64, q: &Q) -> Option<usize>
    where
        K: Borrow<Q>,
        Q: ?Sized + Eq,
    {
        if self.slots.is_empty() {
            return None;
        }
        let mask = self.mask();
        let mut idx = hash as usize & mask;
        for _ in 0..self.slots.len() {
            match &self.slots[idx] {
                Slot::Empty => return None,
                Slot::Occupied(b) if b.hash == hash && b.key.borrow() == q => return Some(idx),
                _ => {}
            }
            idx = (idx + 1) & mask;
        }
        None
    }

    pub fn get<Q>(&self, q: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.get_key_value(q).map(|(_, v)| v)
    }

    pub fn get_key_value<Q>(&self, q: &Q) -> Option<(&K, &V)>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let idx = self.find_index(self.make_hash(q), q)?;
        match &self.slots[idx] {
            Slot::Occupied(b) => Some((&b.key, &b.value)),
            _ => None,
        }
    }

    pub fn contains_key<Q>(&self, q: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.find_index(self.make_hash(q), q).is_some()
    }

    /// Inserts `key -> value`. Returns the previous value when the key was
    /// already present; the key itself is kept in that case.
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        let hash = self.make_hash(&key);
        if let Some(idx) = self.find_index(hash, &key) {
            if let Slot::Occupied(b) = &mut self.slots[idx] {
                return Some(mem::replace(&mut b.value, value));
            }
        }

        self.reserve_one();
        let idx = self.find_vacant(hash);
        if matches!(self.slots[idx], Slot::Tombstone) {
            self.tombstones -= 1;
        }
        self.slots[idx] = Slot::Occupied(Bucket { hash, key, value });
        self.occupied += 1;
        None
    }

    pub fn remove<Q>(&mut self, q: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.remove_entry(q).map(|(_, v)| v)
    }

    pub fn remove_entry<Q>(&mut self, q: &Q) -> Option<(K, V)>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let idx = self.find_index(self.make_hash(q), q)?;
        // A probe chain never continues past an Empty slot, so the removed
        // slot can become Empty too when its successor is.
        let next = (idx + 1) & self.mask();
        let replacement = if matches!(self.slots[next], Slot::Empty) {
            Slot::Empty
        } else {
            Slot::Tombstone
        };
        let is_tombstone = matches!(replacement, Slot::Tombstone);
        match mem::replace(&mut self.slots[idx], replacement) {
            Slot::Occupied(b) => {
                self.occupied -= 1;
                if is_tombstone {
                    self.tombstones += 1;
                }
                Some((b.key, b.value))
            }
            _ => unreachable!("find_index only yields occupied slots"),
        }
    }
}

/// Iterator over the occupied slots of an `OpenTable`, in slot order.
pub struct Iter<'a, K, V> {
    slots: core::slice::Iter<'a, Slot<K, V>>,
    remaining: usize,
}

impl<'a, K, V> Clone for Iter<'a, K, V> {
    fn clone(&self) -> Self {
        Self {
            slots: self.slots.clone(),
            remaining: self.remaining,
        }
    }
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        for slot in self.slots.by_ref() {
            if let Slot::Occupied(b) = slot {
                self.remaining -= 1;
                return Some((&b.key, &b.value));
            }
        }
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {}

impl<K, V> core::iter::FusedIterator for Iter<'_, K, V> {}
