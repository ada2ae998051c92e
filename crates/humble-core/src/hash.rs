//! Hashing of view states into node keys.
//!
//! Keys are compared across cycles, so the hasher must not be randomly
//! seeded per instance. `ahash` with its default keys is used unless the
//! `std-hash` feature asks for std's `DefaultHasher`.

use std::hash::{Hash, Hasher};

#[cfg(not(feature = "std-hash"))]
type KeyHasher = ahash::AHasher;

#[cfg(feature = "std-hash")]
type KeyHasher = std::collections::hash_map::DefaultHasher;

/// Hashes `value` with the crate's fixed-key hasher.
#[inline]
pub fn hash_one<T: Hash + ?Sized>(value: &T) -> u64 {
    let mut hasher = KeyHasher::default();
    value.hash(&mut hasher);
    hasher.finish()
}
