//! frozen-openmap: an immutable, open-addressing hash map that is
//! populated through a single-use builder and updated by deriving new
//! copies.
//!
//! Internal Design:
//!
//! Summary
//! - Goal: a map that can be handed to any number of readers without
//!   locking, yet is cheap to construct in stages and to "update" for
//!   coarse-grained state transitions.
//! - Layers:
//!   - OpenTable<K, V, S>: the storage engine. A flat, power-of-two slot
//!     array probed linearly; deletions leave tombstones that the next
//!     rehash reclaims.
//!   - Builder<K, V, S>: owns an OpenTable while `Building`, hands it
//!     over on `build()` and is `Sealed` from then on. Every method
//!     checks the state first and fails with `BuilderError::AlreadySealed`.
//!   - FrozenMap<K, V, S>: read-only facade over a sealed table. The
//!     only way to "change" it is `compute`, which clones the whole slot
//!     array, or returns the very same map when nothing changed.
//!   - Keys / Values / Entries: borrowing views with no mutating methods.
//!
//! Constraints
//! - A table reachable from a FrozenMap is never mutated again; there is
//!   no interior mutability anywhere in the read path, so a FrozenMap is
//!   `Send + Sync` whenever its keys, values and hasher are.
//! - Builders are single-threaded: a `Cell` marker makes them `!Sync`.
//!   Every mutating method takes `&mut self`, so nested mutation from
//!   user code cannot compile; nested reads are fine.
//! - No structural sharing between maps. `compute` and
//!   `Builder::from_map` copy the slot array verbatim, O(capacity).
//!
//! Probing and removal
//! - `hash & (capacity - 1)` picks the home slot, then slots are visited
//!   one by one. A lookup stops on an `Empty` slot or after `capacity`
//!   probes.
//! - Removing an entry writes a `Tombstone`, or `Empty` when the next slot
//!   is already `Empty`. Tombstones count towards the 3/4 load limit, so
//!   an absent key's probe always reaches an `Empty` slot.
//!
//! Hasher and rehashing invariants
//! - Each occupied slot stores the precomputed `u64` hash of its key;
//!   rehashing uses the stored hash and never calls `K: Hash`.
//! - `Hash for FrozenMap` does not use `S`: it sums per-entry
//!   fingerprints from a fixed-key hasher, so equal maps hash equal
//!   whatever their hasher, capacity or insertion history.
//!
//! Notes and non-goals
//! - No serialization format; callers serialize keys and values.
//! - No atomic swap cell. Publishing a derived map to concurrent readers
//!   is the caller's business.

mod builder;
mod error;
mod frozen_map;
mod structural_hash;
mod views;

#[cfg(feature = "bench_internal")]
pub mod table;
#[cfg(not(feature = "bench_internal"))]
mod table;

#[cfg(test)]
mod table_proptest;

/// Hasher used when no `S` is given.
pub type DefaultHashBuilder = hashbrown::hash_map::DefaultHashBuilder;

// Public surface
pub use builder::Builder;
pub use error::BuilderError;
pub use frozen_map::FrozenMap;
pub use table::Iter;
pub use views::{Entries, Keys, KeysIter, ReadOnlyView, Values, ValuesIter};
