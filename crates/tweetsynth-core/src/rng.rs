use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// A single random stream shared by several callers.
///
/// Every draw goes through one lock, so for a fixed seed the output depends
/// only on the order in which callers acquire it. Callers that need
/// reproducibility across threads should take independent streams from
/// [`SharedRng::fork`] instead.
pub struct SharedRng<R = StdRng> {
    inner: Mutex<R>,
}

impl SharedRng<StdRng> {
    pub fn seeded(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed))
    }

    /// An independent generator for worker `stream` under a run seed.
    ///
    /// Distinct `(seed, stream)` pairs always give distinct key material.
    pub fn fork(seed: u64, stream: u64) -> StdRng {
        let mut key = [0u8; 32];
        key[..8].copy_from_slice(&seed.to_le_bytes());
        key[8..16].copy_from_slice(&stream.to_le_bytes());
        StdRng::from_seed(key)
    }
}

impl<R: Rng> SharedRng<R> {
    pub fn new(rng: R) -> Self {
        Self {
            inner: Mutex::new(rng),
        }
    }

    /// Run `f` with exclusive access to the generator.
    pub fn with<T>(&self, f: impl FnOnce(&mut R) -> T) -> T {
        let mut rng = self.inner.lock();
        f(&mut *rng)
    }

    pub fn into_inner(self) -> R {
        self.inner.into_inner()
    }
}

/// The run seed: the configured one, or a fresh one from OS entropy so the
/// run can be reproduced later.
pub fn resolve_seed(configured: Option<u64>) -> u64 {
    configured.unwrap_or_else(|| StdRng::from_entropy().gen())
}
