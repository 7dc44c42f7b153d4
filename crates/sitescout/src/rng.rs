use rand::SeedableRng;
use rand_xoshiro::Xoshiro256PlusPlus;

/// A generator for one engine invocation. `None` draws a fresh seed.
pub fn new(seed: Option<u64>) -> Xoshiro256PlusPlus {
    Xoshiro256PlusPlus::seed_from_u64(seed.unwrap_or_else(rand::random::<u64>))
}

#[cfg(test)]
pub(crate) fn seeded() -> Xoshiro256PlusPlus {
    // pi * 100_000
    new(Some(314159))
}
