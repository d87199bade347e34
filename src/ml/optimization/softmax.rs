//! Multi-class softmax regression on hashed text features.

use std::collections::BTreeMap;

use log::{debug, info};

use crate::error::{Error, Result};

use super::features::{self, dot};
use super::{GradientDescent, MultiClassTextOptimizer, TrainingSet};

impl MultiClassTextOptimizer for GradientDescent {
    /// Minimizes the cross-entropy of the softmax over every class's score.
    ///
    /// Every label of the training set needs a coefficient vector; classes with
    /// coefficients but no texts are still pushed down by the other classes' samples.
    ///
    /// # Errors
    /// * `EmptyInput` if there are no coefficient vectors or no texts
    /// * `DimensionMismatch` if the coefficient vectors differ in length
    /// * `UnknownLabel` if a label has no coefficient vector
    fn optimize(
        &self,
        training_set: &TrainingSet,
        coefficients: &mut BTreeMap<usize, Vec<f64>>,
    ) -> Result<()> {
        self.validate()?;
        let dimension = check_coefficients(coefficients)?;
        if let Some(&label) = training_set.keys().find(|l| !coefficients.contains_key(*l)) {
            return Err(Error::UnknownLabel(label));
        }
        let samples = features::labelled_samples(training_set, dimension)?;

        let mut rng = self.rng();
        let mut order: Vec<usize> = (0..samples.len()).collect();
        let mut loss = 0.0;
        for epoch in 1..=self.epochs {
            loss = 0.0;
            for batch in self.epoch_batches(&mut order, &mut rng) {
                let mut gradients: BTreeMap<usize, BTreeMap<usize, f64>> = BTreeMap::new();
                for &s in batch {
                    let (label, x) = &samples[s];
                    let probabilities = softmax(coefficients, x);
                    loss -= probabilities[label].max(1e-12).ln();
                    for (&class, &p) in &probabilities {
                        let error = if class == *label { p - 1.0 } else { p };
                        let gradient = gradients.entry(class).or_default();
                        for &j in x {
                            *gradient.entry(j).or_insert(0.0) += error;
                        }
                    }
                }
                for (class, gradient) in &gradients {
                    if let Some(weights) = coefficients.get_mut(class) {
                        self.step(weights, gradient, batch.len());
                    }
                }
            }
            loss /= samples.len() as f64;
            debug!("Epoch {}: mean cross-entropy {:.6}", epoch, loss);
        }

        info!(
            "Softmax optimization of {} classes finished after {} epochs, mean cross-entropy {:.6}",
            coefficients.len(),
            self.epochs,
            loss
        );
        Ok(())
    }
}

/// Probability of every class for `words`.
pub fn probabilities<S: AsRef<str>>(
    coefficients: &BTreeMap<usize, Vec<f64>>,
    words: &[S],
) -> Result<BTreeMap<usize, f64>> {
    let dimension = check_coefficients(coefficients)?;
    let x = features::extract(words, dimension)?;
    Ok(softmax(coefficients, &x))
}

/// Most probable class for `words`; the lowest label wins ties.
pub fn predict<S: AsRef<str>>(
    coefficients: &BTreeMap<usize, Vec<f64>>,
    words: &[S],
) -> Result<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (class, p) in probabilities(coefficients, words)? {
        if best.map_or(true, |(_, best_p)| p > best_p) {
            best = Some((class, p));
        }
    }
    best.map(|(class, _)| class).ok_or(Error::EmptyInput)
}

fn softmax(coefficients: &BTreeMap<usize, Vec<f64>>, x: &[usize]) -> BTreeMap<usize, f64> {
    let scores: Vec<(usize, f64)> = coefficients
        .iter()
        .map(|(&class, weights)| (class, dot(weights, x)))
        .collect();
    // shift by the max score so exp() cannot overflow
    let max = scores.iter().fold(f64::NEG_INFINITY, |m, &(_, z)| m.max(z));
    let total: f64 = scores.iter().map(|&(_, z)| (z - max).exp()).sum();
    scores
        .into_iter()
        .map(|(class, z)| (class, (z - max).exp() / total))
        .collect()
}

fn check_coefficients(coefficients: &BTreeMap<usize, Vec<f64>>) -> Result<usize> {
    let dimension = match coefficients.values().next() {
        Some(weights) => weights.len(),
        None => return Err(Error::EmptyInput),
    };
    for weights in coefficients.values() {
        if weights.len() != dimension {
            return Err(Error::dimension_mismatch(dimension, weights.len()));
        }
    }
    Ok(dimension)
}
