use std::fmt;

use crate::error::{Error, Result};

use super::Member;

/// A cluster maintained incrementally during k-means.
///
/// The cluster keeps the coordinate-wise sum of its members next to the centroid, so
/// adding or removing a member costs O(dimension) instead of a rescan of all members.
/// After every mutation `centroid[i] == sum[i] / size()` holds for every coordinate.
///
/// A cluster is built from a seed and can never be emptied: a removal that would
/// leave no members fails with [`Error::EmptyCluster`] and leaves the cluster as it was.
#[derive(Debug, Clone)]
pub struct Cluster {
    centroid: Vec<f64>,
    sum: Vec<f64>,
    members: Vec<Member>,
}

impl Cluster {
    /// Creates a cluster whose only member, centroid and sum are copies of `seed`.
    pub fn new(seed: Member) -> Self {
        let centroid = seed.data().to_vec();
        let sum = seed.data().to_vec();
        Self {
            centroid,
            sum,
            members: vec![seed],
        }
    }

    /// Adds `member` and moves the centroid towards it.
    ///
    /// # Errors
    /// * `DimensionMismatch` if the member's length differs from the centroid's
    /// * `SumOverflow` if the sum would overflow; the cluster is left as it was
    pub fn add(&mut self, member: Member) -> Result<()> {
        self.sum = self.sum_with(member.data())?;
        self.members.push(member);
        self.update_centroid();
        Ok(())
    }

    /// The running sum with `data` added, checked for dimension and overflow.
    pub(crate) fn sum_with(&self, data: &[f64]) -> Result<Vec<f64>> {
        self.check_dimension(data)?;
        finite(self.sum.iter().zip(data).map(|(s, v)| s + v).collect())
    }

    /// Removes every member matching `predicate` and returns them, in member order.
    ///
    /// Only the removed vectors are subtracted from the running sum. Returns an empty
    /// vector when nothing matches.
    ///
    /// # Errors
    /// * `EmptyCluster` if the predicate matches every member; nothing is removed
    /// * `SumOverflow` if the reduced sum would overflow; nothing is removed
    pub fn remove<P>(&mut self, mut predicate: P) -> Result<Vec<Member>>
    where
        P: FnMut(&Member) -> bool,
    {
        let matches: Vec<bool> = self.members.iter().map(|m| predicate(m)).collect();
        let removed_count = matches.iter().filter(|&&m| m).count();
        if removed_count == 0 {
            return Ok(Vec::new());
        }
        if removed_count == self.members.len() {
            return Err(Error::EmptyCluster);
        }

        let mut sum = self.sum.clone();
        for (member, &matched) in self.members.iter().zip(&matches) {
            if matched {
                for (s, value) in sum.iter_mut().zip(member.data()) {
                    *s -= value;
                }
            }
        }
        self.sum = finite(sum)?;

        let mut kept = Vec::with_capacity(self.members.len() - removed_count);
        let mut removed = Vec::with_capacity(removed_count);
        for (member, matched) in std::mem::take(&mut self.members).into_iter().zip(matches) {
            if matched {
                removed.push(member);
            } else {
                kept.push(member);
            }
        }
        self.members = kept;
        self.update_centroid();

        Ok(removed)
    }

    /// Removes the member standing for dataset point `index`, if present.
    pub fn remove_point(&mut self, index: usize) -> Result<Option<Member>> {
        let mut removed = self.remove(|m| m.index() == Some(index))?;
        Ok(removed.pop())
    }

    /// Squared Euclidean distance from `point` to the current centroid.
    ///
    /// # Errors
    /// * `DimensionMismatch` if `point` has the wrong length
    pub fn distance_to(&self, point: &[f64]) -> Result<f64> {
        self.check_dimension(point)?;
        Ok(squared_euclidean(point, &self.centroid))
    }

    pub fn size(&self) -> usize {
        self.members.len()
    }

    pub fn dimension(&self) -> usize {
        self.centroid.len()
    }

    pub fn members(&self) -> &[Member] {
        &self.members
    }

    /// Returns a copy of the centroid.
    pub fn centroid(&self) -> Vec<f64> {
        self.centroid.clone()
    }

    pub fn centroid_ref(&self) -> &[f64] {
        &self.centroid
    }

    pub fn sum(&self) -> &[f64] {
        &self.sum
    }

    fn check_dimension(&self, data: &[f64]) -> Result<()> {
        if data.len() != self.centroid.len() {
            return Err(Error::dimension_mismatch(self.centroid.len(), data.len()));
        }
        Ok(())
    }

    fn update_centroid(&mut self) {
        let n = self.members.len() as f64;
        for (c, s) in self.centroid.iter_mut().zip(&self.sum) {
            *c = s / n;
        }
    }
}

fn finite(sum: Vec<f64>) -> Result<Vec<f64>> {
    if sum.iter().all(|s| s.is_finite()) {
        Ok(sum)
    } else {
        Err(Error::SumOverflow)
    }
}

/// Clusters are the same cluster when their centroids are equal.
impl PartialEq for Cluster {
    fn eq(&self, other: &Self) -> bool {
        self.centroid == other.centroid
    }
}

impl fmt::Display for Cluster {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, member) in self.members.iter().enumerate() {
            if i > 0 {
                write!(f, ",")?;
            }
            write!(f, "{}", member)?;
        }
        Ok(())
    }
}

/// Sum of squared coordinate differences. No square root, ordering is all k-means needs.
pub fn squared_euclidean(a: &[f64], b: &[f64]) -> f64 {
    a.iter()
        .zip(b.iter())
        .fold(0.0, |acc, (&x, &y)| acc + (x - y).powi(2))
}
