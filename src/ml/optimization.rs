//! Gradient descent over tokenized text.
//!
//! A training set maps a class label to the texts of that class, each already split into
//! words (see [`crate::text::tokenize`]). Words are turned into hashed bag-of-words features
//! by [`features`], and the optimizers adjust the caller's coefficients in place.

pub mod features;
pub mod logistic;
pub mod softmax;

use std::collections::BTreeMap;

use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::error::{Error, Result};

/// Class label → texts of that class, each broken into words.
pub type TrainingSet = BTreeMap<usize, Vec<Vec<String>>>;

/// Optimizes a single coefficient vector for binary classification.
///
/// Label `0` is the negative class; every other label is positive.
pub trait TextOptimizer {
    fn optimize(&self, training_set: &TrainingSet, coefficients: &mut [f64]) -> Result<()>;
}

/// Optimizes one coefficient vector per class for multi-class classification.
pub trait MultiClassTextOptimizer {
    fn optimize(
        &self,
        training_set: &TrainingSet,
        coefficients: &mut BTreeMap<usize, Vec<f64>>,
    ) -> Result<()>;
}

/// Stochastic or mini-batch gradient descent.
///
/// Samples are shuffled at the start of every epoch with a ChaCha RNG seeded from `seed`,
/// so a run is reproducible.
#[derive(Debug, Clone)]
pub struct GradientDescent {
    /// Step size.
    pub learning_rate: f64,
    /// Passes over the training set.
    pub epochs: usize,
    /// Samples per update; 1 is plain stochastic gradient descent.
    pub batch_size: usize,
    /// L2 penalty applied to the coefficients touched by a batch (bias excluded).
    pub l2: f64,
    pub seed: u64,
}

impl GradientDescent {
    pub fn stochastic(learning_rate: f64, epochs: usize) -> Self {
        Self::mini_batch(learning_rate, epochs, 1)
    }

    pub fn mini_batch(learning_rate: f64, epochs: usize, batch_size: usize) -> Self {
        Self {
            learning_rate,
            epochs,
            batch_size,
            l2: 0.0,
            seed: 42,
        }
    }

    /// Customize the L2 penalty.
    pub fn with_l2(mut self, l2: f64) -> Self {
        self.l2 = l2;
        self
    }

    /// Customize the shuffling seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    fn validate(&self) -> Result<()> {
        if !(self.learning_rate > 0.0 && self.learning_rate.is_finite()) {
            return Err(Error::invalid_parameter(
                "learning_rate",
                format!("must be positive, got {}", self.learning_rate),
            ));
        }
        if self.epochs == 0 {
            return Err(Error::invalid_parameter("epochs", "must be at least 1"));
        }
        if self.batch_size == 0 {
            return Err(Error::invalid_parameter("batch_size", "must be at least 1"));
        }
        if !(self.l2 >= 0.0 && self.l2.is_finite()) {
            return Err(Error::invalid_parameter("l2", "must be a non-negative number"));
        }
        Ok(())
    }

    fn rng(&self) -> ChaCha8Rng {
        ChaCha8Rng::seed_from_u64(self.seed)
    }

    // Shuffles `order` and splits it into batches.
    fn epoch_batches<'a>(
        &self,
        order: &'a mut [usize],
        rng: &mut ChaCha8Rng,
    ) -> std::slice::Chunks<'a, usize> {
        order.shuffle(rng);
        let order: &'a [usize] = order;
        order.chunks(self.batch_size)
    }

    // Applies an accumulated batch gradient to one coefficient vector.
    fn step(&self, coefficients: &mut [f64], gradient: &BTreeMap<usize, f64>, batch_len: usize) {
        let scale = self.learning_rate / batch_len as f64;
        for (&j, &g) in gradient {
            let penalty = if j == features::BIAS { 0.0 } else { self.l2 * coefficients[j] };
            coefficients[j] -= scale * g + self.learning_rate * penalty;
        }
    }
}

impl Default for GradientDescent {
    fn default() -> Self {
        Self::stochastic(0.1, 100)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_config() {
        assert!(GradientDescent::stochastic(0.0, 10).validate().is_err());
        assert!(GradientDescent::stochastic(0.1, 0).validate().is_err());
        assert!(GradientDescent::mini_batch(0.1, 10, 0).validate().is_err());
        assert!(GradientDescent::default().with_l2(-1.0).validate().is_err());
        assert!(GradientDescent::default().validate().is_ok());
    }

    #[test]
    fn test_batches_cover_every_sample() {
        let gd = GradientDescent::mini_batch(0.1, 1, 3);
        let mut order: Vec<usize> = (0..10).collect();
        let mut rng = gd.rng();
        let mut seen: Vec<usize> = gd
            .epoch_batches(&mut order, &mut rng)
            .inspect(|batch| assert!(batch.len() <= 3))
            .flatten()
            .copied()
            .collect();
        seen.sort_unstable();
        assert_eq!(seen, (0..10).collect::<Vec<_>>());
    }

    #[test]
    fn test_step_skips_bias_penalty() {
        let gd = GradientDescent::stochastic(0.5, 1).with_l2(1.0);
        let mut coefficients = vec![1.0, 1.0];
        let gradient: BTreeMap<usize, f64> = [(0, 0.0), (1, 0.0)].into_iter().collect();
        gd.step(&mut coefficients, &gradient, 1);
        assert_eq!(coefficients, vec![1.0, 0.5]);
    }
}
