use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

pub type SeededRng = ChaCha8Rng;

/// Component whose randomness is fully determined by a single seed.
///
/// Implementors derive a fresh generator from the seed on every run, so
/// calling `set_seed` resets every sequence drawn afterwards.
pub trait SeedHolder {
    fn seed(&self) -> u64;

    fn set_seed(&mut self, seed: u64);

    fn rng(&self) -> SeededRng {
        seeded_rng(self.seed())
    }
}

pub fn seeded_rng(seed: u64) -> SeededRng {
    ChaCha8Rng::seed_from_u64(seed)
}

/// Removes and returns a uniformly chosen element, one draw per call
pub fn take_random<T, R: Rng>(rng: &mut R, pool: &mut Vec<T>) -> Option<T> {
    if pool.is_empty() {
        return None;
    }
    let index = rng.gen_range(0..pool.len());
    Some(pool.remove(index))
}
