use log::{debug, trace, warn};
#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::error::{Error, Result};

use super::{squared_euclidean, Cluster, Member};

/// What to do when a reassignment would take the last member out of a cluster.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EmptyClusterPolicy {
    /// Stop the run with [`Error::DegeneratePartition`].
    #[default]
    Abort,
    /// Skip the move, leaving the cluster its last member, and count it in
    /// [`Partition::retained`].
    Retain,
}

/// How a refinement round evaluates distances.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UpdateStrategy {
    /// Points are visited in dataset order and every move updates the centroids
    /// before the next point is evaluated.
    #[default]
    Online,
    /// All points are evaluated against a frozen snapshot of the centroids taken at
    /// the start of the round; moves are applied afterwards. With the `parallel`
    /// feature the evaluation runs on the rayon thread pool.
    Batch,
}

/// The state of a k-means run: the clusters, and which cluster every point belongs to.
///
/// Every point of the dataset is a member of exactly one cluster. The state is
/// advanced one round at a time with [`Partition::round`], so a run can be stopped
/// and resumed.
#[derive(Debug, Clone)]
pub struct Partition {
    points: Vec<Vec<f64>>,
    clusters: Vec<Cluster>,
    assignments: Vec<usize>,
    rounds: usize,
    retained: usize,
}

impl Partition {
    /// Builds the initial partition.
    ///
    /// One cluster is created per seed. Each point, in dataset order, joins the cluster
    /// whose centroid is nearest at that moment; the seeds are then evicted so that only
    /// dataset points remain as members. A cluster that attracted no point is handled
    /// according to `policy` (round 0).
    ///
    /// # Errors
    /// * `EmptyInput` if `data` or `seeds` is empty
    /// * `InvalidParameter` if the seeds have no dimensions or are not finite
    /// * `DimensionMismatch` if any vector's length differs from the first seed's
    /// * `NonFiniteValue` if a data point contains NaN or infinity
    /// * `DegeneratePartition` if a seed attracts no point and `policy` is `Abort`
    /// * `SumOverflow` if a cluster's running sum overflows
    pub fn new(
        data: &[Vec<f64>],
        seeds: &[Vec<f64>],
        policy: EmptyClusterPolicy,
    ) -> Result<Self> {
        let dim = validate(data, seeds)?;
        debug!(
            "Seeding partition: {} points, {} clusters, dimension {}",
            data.len(),
            seeds.len(),
            dim
        );

        let mut partition = Self {
            points: data.to_vec(),
            clusters: seeds
                .iter()
                .map(|seed| Cluster::new(Member::new(seed.clone())))
                .collect(),
            assignments: Vec::with_capacity(data.len()),
            rounds: 0,
            retained: 0,
        };

        for (i, point) in data.iter().enumerate() {
            let nearest = nearest_cluster(&partition.clusters, point, None)?;
            partition.clusters[nearest].add(Member::from_point(i, point.clone()))?;
            partition.assignments.push(nearest);
        }

        for c in 0..partition.clusters.len() {
            match partition.clusters[c].remove(|m| m.index().is_none()) {
                Ok(_) => {}
                Err(Error::EmptyCluster) => match policy {
                    EmptyClusterPolicy::Abort => {
                        return Err(Error::DegeneratePartition { cluster: c, round: 0 })
                    }
                    EmptyClusterPolicy::Retain => {
                        warn!("Cluster {} attracted no point; keeping its seed", c);
                        partition.retained += 1;
                    }
                },
                Err(e) => return Err(e),
            }
        }

        Ok(partition)
    }

    /// Runs one refinement round and returns the number of points that changed cluster.
    ///
    /// A point moves only when its nearest cluster differs from its current one. Ties go
    /// to the lowest cluster index, unless the current cluster is among the nearest.
    ///
    /// # Errors
    /// * `DegeneratePartition` if a move would empty a cluster and `policy` is `Abort`;
    ///   moves applied earlier in the round are kept
    /// * `SumOverflow` if a move would overflow a cluster's running sum; the point stays
    ///   where it is
    pub fn round(&mut self, policy: EmptyClusterPolicy, update: UpdateStrategy) -> Result<usize> {
        self.rounds += 1;
        let round = self.rounds;
        let mut moved = 0;

        match update {
            UpdateStrategy::Online => {
                for i in 0..self.points.len() {
                    let current = self.assignments[i];
                    let target = nearest_cluster(&self.clusters, &self.points[i], Some(current))?;
                    if target != current && self.move_point(i, target, policy, round)? {
                        moved += 1;
                    }
                }
            }
            UpdateStrategy::Batch => {
                let frozen: Vec<Cluster> = self
                    .clusters
                    .iter()
                    .map(|c| Cluster::new(Member::new(c.centroid())))
                    .collect();
                let targets = self.evaluate(&frozen)?;
                for (i, target) in targets.into_iter().enumerate() {
                    if target != self.assignments[i] && self.move_point(i, target, policy, round)? {
                        moved += 1;
                    }
                }
            }
        }

        self.evict_seeds()?;
        debug!("Round {}: {} reassignments", round, moved);
        Ok(moved)
    }

    #[cfg(feature = "parallel")]
    fn evaluate(&self, frozen: &[Cluster]) -> Result<Vec<usize>> {
        self.points
            .par_iter()
            .zip(self.assignments.par_iter())
            .map(|(point, &current)| nearest_cluster(frozen, point, Some(current)))
            .collect()
    }

    #[cfg(not(feature = "parallel"))]
    fn evaluate(&self, frozen: &[Cluster]) -> Result<Vec<usize>> {
        self.points
            .iter()
            .zip(&self.assignments)
            .map(|(point, &current)| nearest_cluster(frozen, point, Some(current)))
            .collect()
    }

    // Returns false when the move was retained by the policy.
    fn move_point(
        &mut self,
        index: usize,
        target: usize,
        policy: EmptyClusterPolicy,
        round: usize,
    ) -> Result<bool> {
        let source = self.assignments[index];
        // the target must accept the point before the source gives it up
        self.clusters[target].sum_with(&self.points[index])?;
        let member = match self.clusters[source].remove_point(index) {
            Ok(Some(member)) => member,
            Ok(None) => return Ok(false),
            Err(Error::EmptyCluster) => match policy {
                EmptyClusterPolicy::Abort => {
                    return Err(Error::DegeneratePartition {
                        cluster: source,
                        round,
                    })
                }
                EmptyClusterPolicy::Retain => {
                    warn!(
                        "Round {}: point {} kept in cluster {} to avoid emptying it",
                        round, index, source
                    );
                    self.retained += 1;
                    return Ok(false);
                }
            },
            Err(e) => return Err(e),
        };

        self.clusters[target].add(member)?;
        self.assignments[index] = target;
        trace!("Point {} moved from cluster {} to {}", index, source, target);
        Ok(true)
    }

    // Seeds retained in round 0 leave as soon as a point joins their cluster.
    fn evict_seeds(&mut self) -> Result<()> {
        for cluster in &mut self.clusters {
            if cluster.size() > 1 && cluster.members().iter().any(|m| m.index().is_none()) {
                cluster.remove(|m| m.index().is_none())?;
            }
        }
        Ok(())
    }

    pub fn clusters(&self) -> &[Cluster] {
        &self.clusters
    }

    pub fn into_clusters(self) -> Vec<Cluster> {
        self.clusters
    }

    /// Cluster index of every point, in dataset order.
    pub fn assignments(&self) -> &[usize] {
        &self.assignments
    }

    pub fn assignment(&self, index: usize) -> Option<usize> {
        self.assignments.get(index).copied()
    }

    pub fn points(&self) -> &[Vec<f64>] {
        &self.points
    }

    /// Copies of all centroids, in cluster order.
    pub fn centroids(&self) -> Vec<Vec<f64>> {
        self.clusters.iter().map(Cluster::centroid).collect()
    }

    /// Number of refinement rounds run so far.
    pub fn rounds(&self) -> usize {
        self.rounds
    }

    /// Number of times the empty-cluster policy kept a member in place.
    pub fn retained(&self) -> usize {
        self.retained
    }

    /// Sum of squared distances from every point to the centroid of its cluster.
    pub fn inertia(&self) -> f64 {
        self.points
            .iter()
            .zip(&self.assignments)
            .map(|(point, &c)| squared_euclidean(point, self.clusters[c].centroid_ref()))
            .sum()
    }
}

fn validate(data: &[Vec<f64>], seeds: &[Vec<f64>]) -> Result<usize> {
    if data.is_empty() || seeds.is_empty() {
        return Err(Error::EmptyInput);
    }
    let dim = seeds[0].len();
    if dim == 0 {
        return Err(Error::invalid_parameter(
            "seeds",
            "seed vectors must have at least one dimension",
        ));
    }
    for seed in seeds {
        if seed.len() != dim {
            return Err(Error::dimension_mismatch(dim, seed.len()));
        }
        if !seed.iter().all(|v| v.is_finite()) {
            return Err(Error::invalid_parameter("seeds", "seed vectors must be finite"));
        }
    }
    for (i, point) in data.iter().enumerate() {
        if point.len() != dim {
            return Err(Error::dimension_mismatch(dim, point.len()));
        }
        if !point.iter().all(|v| v.is_finite()) {
            return Err(Error::NonFiniteValue { index: i });
        }
    }
    Ok(dim)
}

/// Index of the cluster nearest to `point`. Ties go to the lowest index, but `current`
/// wins whenever it is at minimum distance.
fn nearest_cluster(clusters: &[Cluster], point: &[f64], current: Option<usize>) -> Result<usize> {
    let mut best = 0;
    let mut best_dist = f64::INFINITY;
    let mut current_dist = None;
    for (idx, cluster) in clusters.iter().enumerate() {
        let dist = cluster.distance_to(point)?;
        if Some(idx) == current {
            current_dist = Some(dist);
        }
        if dist < best_dist {
            best_dist = dist;
            best = idx;
        }
    }
    match (current, current_dist) {
        (Some(c), Some(d)) if d <= best_dist => Ok(c),
        _ => Ok(best),
    }
}
