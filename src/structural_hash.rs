//! Layout-independent hashing of map contents.
//!
//! A map's structural hash is `Σ mix(h(k), h(v))` over its entries with
//! wrapping addition, where `h` is SipHash with fixed zero keys. Addition
//! commutes, so slot order, capacity and the table's own hasher do not
//! affect the result.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

// Odd multipliers keep the key and value halves from cancelling out.
const KEY_MIX: u64 = 0x9E37_79B9_7F4A_7C15;
const VALUE_MIX: u64 = 0xC2B2_AE3D_27D4_EB4F;

/// Hash of `value` under the fixed-key hasher.
pub(crate) fn fingerprint<T: ?Sized + Hash>(value: &T) -> u64 {
    let mut hasher = DefaultHasher::new();
    value.hash(&mut hasher);
    hasher.finish()
}

/// Contribution of one `(key, value)` pair to the structural hash.
pub(crate) fn entry_fingerprint<K: ?Sized + Hash, V: ?Sized + Hash>(key: &K, value: &V) -> u64 {
    let k = fingerprint(key).wrapping_mul(KEY_MIX);
    let v = fingerprint(value).wrapping_mul(VALUE_MIX);
    k ^ v.rotate_left(29)
}

/// Order-independent combination of all entry fingerprints.
pub(crate) fn combine<'a, K, V, I>(entries: I) -> u64
where
    K: ?Sized + Hash + 'a,
    V: ?Sized + Hash + 'a,
    I: IntoIterator<Item = (&'a K, &'a V)>,
{
    entries
        .into_iter()
        .fold(0u64, |acc, (k, v)| acc.wrapping_add(entry_fingerprint(k, v)))
}
