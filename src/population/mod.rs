pub mod fitness;

pub use fitness::{DelayedRandomFitness, FitnessFunction, MemoizedFitness};

use crate::encoding::{GeneCode, GeneticEncoding};
use crate::error::{GenespaceError, Result};
use rand::RngCore;
use rayon::prelude::*;
use std::collections::HashSet;
use std::sync::Arc;

/// A collection of gene codes drawn from one encoding space.
///
/// Every population owns its member list; two populations over the same
/// space never share state. Compatibility between populations is checked
/// structurally over their space descriptions, not by reference identity.
pub struct Population {
    space: Arc<GeneticEncoding>,
    members: Vec<GeneCode>,
    seen: HashSet<String>,
}

impl Population {
    pub fn new(space: Arc<GeneticEncoding>) -> Self {
        Self {
            space,
            members: Vec::new(),
            seen: HashSet::new(),
        }
    }

    pub fn space(&self) -> &Arc<GeneticEncoding> {
        &self.space
    }

    /// Add a gene code; duplicates (by canonical key) are rejected with
    /// `Ok(false)`. A code bound to a structurally different space fails.
    pub fn add(&mut self, code: GeneCode) -> Result<bool> {
        if **code.space() != *self.space {
            return Err(GenespaceError::Validation(format!(
                "gene code from space '{}' does not fit into the population over '{}'",
                code.space().name(),
                self.space.name()
            )));
        }
        Ok(self.insert(code))
    }

    fn insert(&mut self, code: GeneCode) -> bool {
        if !self.seen.insert(code.canonical_key()) {
            return false;
        }
        self.members.push(code);
        true
    }

    /// Sample `count` fresh members with the process-wide RNG; duplicates
    /// collapse. Returns the number actually added.
    pub fn grow(&mut self, count: usize) -> usize {
        crate::rng::with_global(|rng| self.grow_with(count, rng))
    }

    pub fn grow_with(&mut self, count: usize, rng: &mut dyn RngCore) -> usize {
        (0..count)
            .filter(|_| {
                let code = GeneCode::sample_random_with(&self.space, rng);
                self.insert(code)
            })
            .count()
    }

    /// Merge another population's members into this one. The two spaces
    /// must be structurally equal.
    pub fn merge(&mut self, other: &Population) -> Result<usize> {
        if *other.space != *self.space {
            return Err(GenespaceError::Validation(format!(
                "encoding spaces of populations to merge do not fit: '{}' vs '{}'",
                self.space.name(),
                other.space.name()
            )));
        }
        Ok(other
            .members
            .iter()
            .filter(|code| self.insert((*code).clone()))
            .count())
    }

    pub fn members(&self) -> &[GeneCode] {
        &self.members
    }

    pub fn iter(&self) -> impl Iterator<Item = &GeneCode> {
        self.members.iter()
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Evaluate every member in parallel. Results align with `members()`.
    pub fn evaluate<F: FitnessFunction>(&self, fitness: &F) -> Vec<f64> {
        self.members
            .par_iter()
            .map(|code| fitness.evaluate(code))
            .collect()
    }

    /// The best member under `fitness`, together with its score.
    pub fn best<F: FitnessFunction>(&self, fitness: &F) -> Option<(&GeneCode, f64)> {
        let scores = self.evaluate(fitness);
        self.members
            .iter()
            .zip(scores)
            .max_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal))
    }
}
