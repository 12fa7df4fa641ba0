pub mod error;
pub mod weighted_choice;

pub use error::ChoiceError;
pub use weighted_choice::{weighted_choice, weighted_choice_with, weighted_index_with};

use log::debug;
use rand::rngs::{StdRng, ThreadRng};
use rand::{Rng, SeedableRng};

///
/// Holds the random generator that weighted choices draw from.
///
/// Seeding a ring makes a run of choices reproducible.
///
#[derive(Debug, Clone)]
pub struct Ring<R: Rng> {
    rng: R,
}

impl<R: Rng> Ring<R> {
    pub fn new(rng: R) -> Ring<R> {
        Ring { rng }
    }

    /// Picks one of `options`, drawing once from this ring's generator.
    pub fn weighted_choice<'a, T>(
        &mut self,
        options: &'a [T],
        weights: &[f64],
    ) -> Result<&'a T, ChoiceError> {
        let rng = &mut self.rng;
        weighted_choice_with(options, weights, || rng.gen::<f64>())
    }

    pub fn weighted_index<T>(
        &mut self,
        options: &[T],
        weights: &[f64],
    ) -> Result<usize, ChoiceError> {
        let rng = &mut self.rng;
        weighted_index_with(options, weights, || rng.gen::<f64>())
    }

    ///
    /// Runs `trials` choices and counts how often each option came up.
    ///
    /// Counts are index-aligned with `options`.
    ///
    pub fn tally<T>(
        &mut self,
        options: &[T],
        weights: &[f64],
        trials: usize,
    ) -> Result<Vec<usize>, ChoiceError> {
        weighted_choice::validate(options, weights)?;
        let mut counts = vec![0; options.len()];
        for _ in 0..trials {
            counts[self.weighted_index(options, weights)?] += 1;
        }
        debug!("Tallied {} trials: {:?}", trials, counts);
        Ok(counts)
    }
}

impl Ring<StdRng> {
    pub fn seeded(seed: u64) -> Ring<StdRng> {
        Ring::new(StdRng::seed_from_u64(seed))
    }

    pub fn from_entropy() -> Ring<StdRng> {
        Ring::new(StdRng::from_entropy())
    }
}

impl Default for Ring<ThreadRng> {
    fn default() -> Self {
        Ring::new(rand::thread_rng())
    }
}
