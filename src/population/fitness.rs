use crate::encoding::GeneCode;
use rand::Rng;
use std::collections::HashMap;
use std::sync::RwLock;
use std::time::Duration;

/// Scalar fitness of one gene code. Implementations must be thread-safe so
/// populations can fan evaluations out to a worker pool.
pub trait FitnessFunction: Send + Sync {
    fn evaluate(&self, code: &GeneCode) -> f64;
}

impl<F> FitnessFunction for F
where
    F: Fn(&GeneCode) -> f64 + Send + Sync,
{
    fn evaluate(&self, code: &GeneCode) -> f64 {
        self(code)
    }
}

/// Memoizing wrapper around an expensive fitness function.
///
/// Results are cached by the code's canonical key, so each distinct gene
/// code is evaluated exactly once. Safe for concurrent use from a worker
/// pool; a cache miss raced by two workers evaluates twice and keeps one
/// result, which is harmless for a deterministic inner function.
pub struct MemoizedFitness<F: FitnessFunction> {
    inner: F,
    cache: RwLock<HashMap<String, f64>>,
}

impl<F: FitnessFunction> MemoizedFitness<F> {
    pub fn new(inner: F) -> Self {
        Self {
            inner,
            cache: RwLock::new(HashMap::new()),
        }
    }

    pub fn obtain_fitness(&self, code: &GeneCode) -> f64 {
        let key = code.canonical_key();
        if let Some(&fitness) = self.cache.read().unwrap().get(&key) {
            return fitness;
        }
        let fitness = self.inner.evaluate(code);
        self.cache.write().unwrap().insert(key, fitness);
        fitness
    }

    /// Number of distinct codes evaluated so far.
    pub fn cached_count(&self) -> usize {
        self.cache.read().unwrap().len()
    }

    pub fn is_cached(&self, code: &GeneCode) -> bool {
        self.cache.read().unwrap().contains_key(&code.canonical_key())
    }
}

impl<F: FitnessFunction> FitnessFunction for MemoizedFitness<F> {
    fn evaluate(&self, code: &GeneCode) -> f64 {
        self.obtain_fitness(code)
    }
}

/// Stand-in for an expensive (possibly simulated) evaluation: sleeps for a
/// fixed delay, then returns a uniform random fitness. Useful for exercising
/// memoization and worker pools in tests.
pub struct DelayedRandomFitness {
    delay: Duration,
}

impl DelayedRandomFitness {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }
}

impl FitnessFunction for DelayedRandomFitness {
    fn evaluate(&self, _code: &GeneCode) -> f64 {
        std::thread::sleep(self.delay);
        rand::thread_rng().gen::<f64>()
    }
}
