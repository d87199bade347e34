//! Binary logistic regression on hashed text features.

use std::collections::BTreeMap;

use log::{debug, info};

use crate::error::Result;

use super::features::{self, dot};
use super::{GradientDescent, TextOptimizer, TrainingSet};

impl TextOptimizer for GradientDescent {
    /// Minimizes the log-loss of `sigmoid(coefficients · x)` against the labels.
    ///
    /// # Errors
    /// * `InvalidParameter` for a bad configuration or `coefficients.len() < 2`
    /// * `EmptyInput` if the training set holds no text
    fn optimize(&self, training_set: &TrainingSet, coefficients: &mut [f64]) -> Result<()> {
        self.validate()?;
        let samples = features::labelled_samples(training_set, coefficients.len())?;

        let mut rng = self.rng();
        let mut order: Vec<usize> = (0..samples.len()).collect();
        let mut loss = 0.0;
        for epoch in 1..=self.epochs {
            loss = 0.0;
            for batch in self.epoch_batches(&mut order, &mut rng) {
                let mut gradient = BTreeMap::new();
                for &s in batch {
                    let (label, x) = &samples[s];
                    let target = if *label == 0 { 0.0 } else { 1.0 };
                    let p = sigmoid(dot(coefficients, x));
                    loss += log_loss(p, target);
                    for &j in x {
                        *gradient.entry(j).or_insert(0.0) += p - target;
                    }
                }
                self.step(coefficients, &gradient, batch.len());
            }
            loss /= samples.len() as f64;
            debug!("Epoch {}: mean log-loss {:.6}", epoch, loss);
        }

        info!(
            "Logistic optimization finished after {} epochs, mean log-loss {:.6}",
            self.epochs, loss
        );
        Ok(())
    }
}

/// Probability that `words` belong to the positive class.
pub fn probability<S: AsRef<str>>(coefficients: &[f64], words: &[S]) -> Result<f64> {
    let x = features::extract(words, coefficients.len())?;
    Ok(sigmoid(dot(coefficients, &x)))
}

/// 1 if the positive class is at least as likely as the negative one, 0 otherwise.
pub fn predict<S: AsRef<str>>(coefficients: &[f64], words: &[S]) -> Result<usize> {
    Ok(if probability(coefficients, words)? >= 0.5 {
        1
    } else {
        0
    })
}

/// The logistic sigmoid function.
pub fn sigmoid(z: f64) -> f64 {
    // Numerically stable approach
    if z >= 0.0 {
        let exp_neg = (-z).exp();
        1.0 / (1.0 + exp_neg)
    } else {
        let exp_pos = z.exp();
        exp_pos / (1.0 + exp_pos)
    }
}

fn log_loss(p: f64, target: f64) -> f64 {
    let p = p.clamp(1e-12, 1.0 - 1e-12);
    -(target * p.ln() + (1.0 - target) * (1.0 - p).ln())
}
