//! Initial centroid choices for [`KMeans::fit`](super::KMeans::fit).

use rand::seq::SliceRandom;
use rand::Rng;

use crate::error::{Error, Result};

/// The first `k` points of the dataset.
pub fn first_k(data: &[Vec<f64>], k: usize) -> Result<Vec<Vec<f64>>> {
    check_count(data, k)?;
    Ok(data[..k].to_vec())
}

/// `k` points sampled from distinct positions of the dataset.
///
/// # Example
///
/// ```
/// use mlkit::ml::classic::k_means::seeds;
/// use rand::SeedableRng;
/// use rand_chacha::ChaCha8Rng;
///
/// let data = vec![vec![1.0], vec![2.0], vec![9.0]];
/// let mut rng = ChaCha8Rng::seed_from_u64(7);
/// let chosen = seeds::random(&data, 2, &mut rng).unwrap();
/// assert_eq!(chosen.len(), 2);
/// ```
pub fn random<R: Rng + ?Sized>(data: &[Vec<f64>], k: usize, rng: &mut R) -> Result<Vec<Vec<f64>>> {
    check_count(data, k)?;
    Ok(data.choose_multiple(rng, k).cloned().collect())
}

fn check_count(data: &[Vec<f64>], k: usize) -> Result<()> {
    if data.is_empty() {
        return Err(Error::EmptyInput);
    }
    if k == 0 || k > data.len() {
        return Err(Error::InvalidClusterCount {
            requested: k,
            n_items: data.len(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_first_k() {
        let data = vec![vec![1.0], vec![2.0], vec![3.0]];
        assert_eq!(first_k(&data, 2).unwrap(), vec![vec![1.0], vec![2.0]]);
    }

    #[test]
    fn test_invalid_k() {
        let data = vec![vec![1.0, 2.0], vec![2.0, 3.0]];
        assert_eq!(
            first_k(&data, 5).unwrap_err(),
            Error::InvalidClusterCount {
                requested: 5,
                n_items: 2
            }
        );
        assert!(first_k(&data, 0).is_err());
        assert_eq!(first_k(&[], 1).unwrap_err(), Error::EmptyInput);
    }

    #[test]
    fn test_random_is_reproducible() {
        let data: Vec<Vec<f64>> = (0..20).map(|i| vec![i as f64]).collect();
        let a = random(&data, 4, &mut ChaCha8Rng::seed_from_u64(1)).unwrap();
        let b = random(&data, 4, &mut ChaCha8Rng::seed_from_u64(1)).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.len(), 4);
        for seed in &a {
            assert!(data.contains(seed));
        }
    }
}
