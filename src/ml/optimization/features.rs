//! Hashed bag-of-words features.
//!
//! A coefficient vector of length `dimension` is addressed by feature index. Index 0 is the
//! bias and is active for every text. A word maps to `1 + fnv1a(word) % (dimension - 1)`,
//! and each occurrence contributes 1.0, so repeated words count repeatedly. Collisions are
//! accepted: a larger dimension makes them rarer.

use crate::error::{Error, Result};

use super::TrainingSet;

/// Feature index of the bias term.
pub const BIAS: usize = 0;

/// Default offset basis and prime for 64-bit FNV-1a.
const FNV64_OFFSET_BASIS: u64 = 0xcbf29ce484222325;
const FNV64_PRIME: u64 = 0x100000001b3;

/// 64-bit FNV-1a hash of `bytes`.
pub fn fnv1a(bytes: &[u8]) -> u64 {
    bytes.iter().fold(FNV64_OFFSET_BASIS, |hash, &byte| {
        (hash ^ byte as u64).wrapping_mul(FNV64_PRIME)
    })
}

// `dimension` must be at least 2, see `check_dimension`.
fn feature_index(word: &str, dimension: usize) -> usize {
    1 + (fnv1a(word.as_bytes()) % (dimension as u64 - 1)) as usize
}

/// Active feature indices of a text: the bias followed by one index per word.
///
/// # Errors
/// * `InvalidParameter` if `dimension < 2`
pub fn extract<S: AsRef<str>>(words: &[S], dimension: usize) -> Result<Vec<usize>> {
    check_dimension(dimension)?;
    let mut features = Vec::with_capacity(words.len() + 1);
    features.push(BIAS);
    features.extend(words.iter().map(|w| feature_index(w.as_ref(), dimension)));
    Ok(features)
}

/// Weighted sum of the active features.
pub fn dot(coefficients: &[f64], features: &[usize]) -> f64 {
    features.iter().map(|&j| coefficients[j]).sum()
}

/// Flattens a training set into `(label, features)` pairs, in label order.
pub(crate) fn labelled_samples(
    training_set: &TrainingSet,
    dimension: usize,
) -> Result<Vec<(usize, Vec<usize>)>> {
    let mut samples = Vec::new();
    for (&label, texts) in training_set {
        for words in texts {
            samples.push((label, extract(words.as_slice(), dimension)?));
        }
    }
    if samples.is_empty() {
        return Err(Error::EmptyInput);
    }
    Ok(samples)
}

fn check_dimension(dimension: usize) -> Result<()> {
    if dimension < 2 {
        return Err(Error::invalid_parameter(
            "dimension",
            format!(
                "coefficient vectors need a bias and at least one word slot, got {}",
                dimension
            ),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fnv1a_known_values() {
        assert_eq!(fnv1a(b""), 0xcbf29ce484222325);
        assert_eq!(fnv1a(b"a"), 0xaf63dc4c8601ec8c);
    }

    #[test]
    fn test_extract() {
        let features = extract(&["win", "cash", "win"], 64).unwrap();
        assert_eq!(features.len(), 4);
        assert_eq!(features[0], BIAS);
        assert_eq!(features[1], features[3]);
        assert!(features[1..].iter().all(|&j| (1..64).contains(&j)));
    }

    #[test]
    fn test_dimension_too_small() {
        assert!(extract(&["word"], 0).is_err());
        assert!(extract(&["word"], 1).is_err());
        assert_eq!(extract(&["word"], 2).unwrap(), vec![BIAS, 1]);
        assert_eq!(extract::<&str>(&[], 2).unwrap(), vec![BIAS]);
    }

    #[test]
    fn test_dot() {
        let coefficients = vec![0.5, 1.0, 2.0];
        assert_eq!(dot(&coefficients, &[0, 2, 2]), 4.5);
    }

    #[test]
    fn test_empty_training_set() {
        let training_set = TrainingSet::new();
        assert_eq!(
            labelled_samples(&training_set, 8).unwrap_err(),
            Error::EmptyInput
        );
    }
}
