use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use rand::{RngCore, SeedableRng};

/// Explicit random-number-generator handle threaded through the selection
/// call chain. Keeping the RNG behind a trait makes tie-breaking decisions
/// reproducible under a fixed seed and mockable in tests.
pub trait RandomGenerator {
    fn rng(&mut self) -> &mut dyn RngCore;

    /// Chooses one element of `vector` uniformly at random.
    fn choose_usize<'a>(&mut self, vector: &'a [usize]) -> Option<&'a usize> {
        vector.choose(self.rng())
    }
}

/// Default `RandomGenerator` backed by `StdRng`. A seeded instance makes a
/// whole selection run bit-reproducible.
pub struct NicheRandomGenerator {
    rng: StdRng,
}

impl NicheRandomGenerator {
    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        Self { rng }
    }
}

impl RandomGenerator for NicheRandomGenerator {
    fn rng(&mut self) -> &mut dyn RngCore {
        &mut self.rng
    }
}

/// A stub `RngCore` for tests whose fake generators override every decision
/// point; it panics if the raw rng is actually drawn from.
pub struct TestDummyRng;

impl RngCore for TestDummyRng {
    fn next_u32(&mut self) -> u32 {
        unimplemented!("TestDummyRng should not be used directly")
    }

    fn next_u64(&mut self) -> u64 {
        unimplemented!("TestDummyRng should not be used directly")
    }

    fn fill_bytes(&mut self, _dest: &mut [u8]) {
        unimplemented!("TestDummyRng should not be used directly")
    }
}
