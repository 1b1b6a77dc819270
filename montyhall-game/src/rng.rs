//! Deterministic random streams derived from a single user seed.
//!
//! Every batch worker owns its own generator so that parallel runs never
//! share a sequence, while the same `(seed, worker)` pair always replays the
//! same draws.

use hmac::{Hmac, Mac};
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;
use sha2::Sha256;

use crate::constants::STREAM_WORKER_PREFIX;

/// Derive an independent 64-bit stream seed for `domain_tag`.
#[must_use]
pub fn derive_stream_seed(user_seed: u64, domain_tag: &[u8]) -> u64 {
    let mut mac =
        Hmac::<Sha256>::new_from_slice(&user_seed.to_le_bytes()).expect("64-bit seed is valid key");
    mac.update(domain_tag);
    let digest = mac.finalize().into_bytes();
    let mut seed_bytes = [0u8; 8];
    seed_bytes.copy_from_slice(&digest[..8]);
    u64::from_le_bytes(seed_bytes)
}

/// Generator owned by batch worker `worker`.
#[must_use]
pub fn worker_rng(user_seed: u64, worker: usize) -> ChaCha20Rng {
    let tag = format!("{STREAM_WORKER_PREFIX}{worker}");
    ChaCha20Rng::seed_from_u64(derive_stream_seed(user_seed, tag.as_bytes()))
}

/// Fresh seed drawn from the thread-local generator.
#[must_use]
pub fn entropy_seed() -> u64 {
    rand::random()
}
