//! Per-missile random generators.
//!
//! Every missile owns its own ChaCha8 stream so instances can be stepped
//! on separate threads without sharing state. Streams derived from one
//! master seed are independent of each other and of stepping order.

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use vernier_core::enums::SeedPolicy;

/// Generator for instance `index` under `master_seed`.
pub fn instance_rng(master_seed: u64, index: u64) -> ChaCha8Rng {
    let mut rng = ChaCha8Rng::seed_from_u64(master_seed);
    rng.set_stream(index);
    rng
}

/// Generator for instance `index` under a seeding policy.
pub fn rng_for(policy: SeedPolicy, index: u64) -> ChaCha8Rng {
    match policy {
        SeedPolicy::Fixed { seed } => instance_rng(seed, index),
        SeedPolicy::Entropy => ChaCha8Rng::from_entropy(),
    }
}
