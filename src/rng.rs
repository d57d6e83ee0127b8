use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use std::sync::{Mutex, OnceLock};

/// Process-wide RNG used by the convenience sampling entry points.
///
/// Callers that need full control pass their own `RngCore` to the `*_with`
/// variants instead; this instance only backs the argument-free methods.
static GLOBAL_RNG: OnceLock<Mutex<StdRng>> = OnceLock::new();

fn global() -> &'static Mutex<StdRng> {
    GLOBAL_RNG.get_or_init(|| Mutex::new(StdRng::from_entropy()))
}

/// Reseed the process-wide RNG for reproducible sampling.
pub fn reseed(seed: u64) {
    *global().lock().unwrap() = StdRng::seed_from_u64(seed);
}

pub(crate) fn with_global<T>(f: impl FnOnce(&mut dyn RngCore) -> T) -> T {
    let mut rng = global().lock().unwrap();
    f(&mut *rng)
}
