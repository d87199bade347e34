use log::{debug, info};

use crate::error::{Error, Result};

/// A training example for binary classification. `desired_output` is +1.0 or -1.0.
#[derive(Debug, Clone, PartialEq)]
pub struct LearningSample {
    pub input: Vec<f64>,
    pub desired_output: f64,
}

impl LearningSample {
    pub fn new(input: Vec<f64>, desired_output: f64) -> Self {
        Self {
            input,
            desired_output,
        }
    }
}

/// Summary of a training run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrainingReport {
    /// Epochs run, including the last one.
    pub epochs: usize,
    /// True when the last epoch classified every sample correctly.
    pub converged: bool,
}

/// The perceptron learning rule for a single neuron.
///
/// Every epoch presents all samples in order. A misclassified sample adjusts the weights by
/// `Δw_k = η · d · x_k`, where `d` is the desired output (+1 or -1) and `x` the input.
/// Training stops after the first epoch without a mistake, which always happens for
/// linearly separable data. Non-separable data never converges, so `max_epochs` bounds
/// the run.
#[derive(Debug, Clone)]
pub struct Perceptron {
    pub learning_rate: f64,
    pub max_epochs: usize,
}

impl Perceptron {
    pub const DEFAULT_LEARNING_RATE: f64 = 0.22;
    pub const DEFAULT_MAX_EPOCHS: usize = 1000;

    pub fn new(learning_rate: f64) -> Self {
        Self {
            learning_rate,
            max_epochs: Self::DEFAULT_MAX_EPOCHS,
        }
    }

    /// Customize the epoch cap.
    pub fn with_max_epochs(mut self, max_epochs: usize) -> Self {
        self.max_epochs = max_epochs;
        self
    }

    /// Trains `weights` in place.
    ///
    /// `neuron_output(input, weights)` computes the neuron's answer for a sample; the sample
    /// counts as correct when the answer equals its desired output.
    ///
    /// # Example
    ///
    /// ```
    /// use mlkit::ml::classic::perceptron::{step_activation, LearningSample, Perceptron};
    ///
    /// // The last input component is a constant bias of 1.0.
    /// let samples = vec![
    ///     LearningSample::new(vec![0.0, 0.0, 1.0], -1.0),
    ///     LearningSample::new(vec![0.0, 1.0, 1.0], -1.0),
    ///     LearningSample::new(vec![1.0, 0.0, 1.0], -1.0),
    ///     LearningSample::new(vec![1.0, 1.0, 1.0], 1.0),
    /// ];
    /// let mut weights = vec![0.0; 3];
    /// let report = Perceptron::default()
    ///     .train(&samples, &mut weights, step_activation)
    ///     .unwrap();
    /// assert!(report.converged);
    /// ```
    ///
    /// # Errors
    /// * `EmptyInput` if there are no samples
    /// * `DimensionMismatch` if a sample's input length differs from the weights
    /// * `InvalidParameter` for a non-positive learning rate or a zero epoch cap
    pub fn train<F>(
        &self,
        samples: &[LearningSample],
        weights: &mut [f64],
        neuron_output: F,
    ) -> Result<TrainingReport>
    where
        F: Fn(&[f64], &[f64]) -> f64,
    {
        self.validate(samples, weights)?;

        let mut epochs = 0;
        let mut converged = false;
        while !converged && epochs < self.max_epochs {
            epochs += 1;
            converged = true;
            let mut mistakes = 0;
            for sample in samples {
                if neuron_output(sample.input.as_slice(), &*weights) != sample.desired_output {
                    converged = false;
                    mistakes += 1;
                    self.adjust_weights(sample, weights);
                }
            }
            debug!("Epoch {}: {} misclassified samples", epochs, mistakes);
        }

        if converged {
            info!("Perceptron converged in {} epochs", epochs);
        } else {
            info!("Perceptron stopped at the {} epoch cap", epochs);
        }
        Ok(TrainingReport { epochs, converged })
    }

    fn adjust_weights(&self, sample: &LearningSample, weights: &mut [f64]) {
        for (w, x) in weights.iter_mut().zip(&sample.input) {
            *w += self.learning_rate * sample.desired_output * x;
        }
    }

    fn validate(&self, samples: &[LearningSample], weights: &[f64]) -> Result<()> {
        if !(self.learning_rate > 0.0 && self.learning_rate.is_finite()) {
            return Err(Error::invalid_parameter(
                "learning_rate",
                format!("must be positive, got {}", self.learning_rate),
            ));
        }
        if self.max_epochs == 0 {
            return Err(Error::invalid_parameter("max_epochs", "must be at least 1"));
        }
        if samples.is_empty() {
            return Err(Error::EmptyInput);
        }
        for sample in samples {
            if sample.input.len() != weights.len() {
                return Err(Error::dimension_mismatch(weights.len(), sample.input.len()));
            }
        }
        Ok(())
    }
}

impl Default for Perceptron {
    fn default() -> Self {
        Self::new(Self::DEFAULT_LEARNING_RATE)
    }
}

/// Sign of the weighted sum: +1.0 when `input · weights > 0`, -1.0 otherwise.
pub fn step_activation(input: &[f64], weights: &[f64]) -> f64 {
    let activation: f64 = input.iter().zip(weights).map(|(x, w)| x * w).sum();
    if activation > 0.0 {
        1.0
    } else {
        -1.0
    }
}
