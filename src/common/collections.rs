//! Hash collections used throughout the crate.
//!
//! Keys are small `Copy` identifiers, so the non-cryptographic FxHash is used.

pub type HashMap<K, V> = std::collections::HashMap<K, V, rustc_hash::FxBuildHasher>;
pub type HashSet<T> = std::collections::HashSet<T, rustc_hash::FxBuildHasher>;
