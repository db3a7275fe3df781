//! Deterministic pseudo-random draws keyed by strings.

use rand_chacha::ChaCha8Rng;
use rand_chacha::rand_core::{Rng, SeedableRng};
use xxhash_rust::xxh3::xxh3_64;

/// Returns a value in `[0, 1)` that depends only on `key`.
///
/// The key is hashed with xxh3 and the hash seeds a ChaCha8 stream; the first
/// draw's top 53 bits become the fraction. Identical keys give identical
/// results in every process.
pub fn luck(key: &str) -> f64 {
    let mut rng = ChaCha8Rng::seed_from_u64(xxh3_64(key.as_bytes()));
    (rng.next_u64() >> 11) as f64 / (1_u64 << 53) as f64
}
