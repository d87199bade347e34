//! Incremental k-means clustering.
//!
//! Every [`Cluster`] keeps a running sum of its members next to its centroid, so moving a
//! point between clusters costs O(dimension) rather than a recomputation over all members.
//! The [`Partition`] holds the state of a run and [`KMeans`] drives it until no point
//! changes cluster or the iteration cap is reached.

mod cluster;
mod member;
mod partition;
pub mod seeds;

use log::info;

use crate::error::{Error, Result};

pub use cluster::{squared_euclidean, Cluster};
pub use member::Member;
pub use partition::{EmptyClusterPolicy, Partition, UpdateStrategy};

/// Configuration options for k-means clustering.
#[derive(Debug, Clone)]
pub struct KMeansConfig {
    /// Maximum number of refinement rounds after seeding.
    pub max_iterations: usize,
    /// What to do when a cluster would lose its last member.
    pub empty_cluster_policy: EmptyClusterPolicy,
    /// Whether centroids move after every reassignment or once per round.
    pub update: UpdateStrategy,
}

impl KMeansConfig {
    /// Create a new config with default values for max_iterations (300), policy (abort)
    /// and update strategy (online).
    pub fn new() -> Self {
        Self {
            max_iterations: 300,
            empty_cluster_policy: EmptyClusterPolicy::Abort,
            update: UpdateStrategy::Online,
        }
    }

    /// Customize the maximum number of iterations.
    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    /// Customize the empty cluster policy.
    pub fn with_empty_cluster_policy(mut self, policy: EmptyClusterPolicy) -> Self {
        self.empty_cluster_policy = policy;
        self
    }

    /// Customize the update strategy.
    pub fn with_update_strategy(mut self, update: UpdateStrategy) -> Self {
        self.update = update;
        self
    }

    fn validate(&self) -> Result<()> {
        if self.max_iterations == 0 {
            return Err(Error::invalid_parameter(
                "max_iterations",
                "at least one round is required",
            ));
        }
        Ok(())
    }
}

impl Default for KMeansConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Why a run stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Termination {
    /// A full round produced no reassignment.
    Converged,
    /// `max_iterations` rounds ran without reaching a fixed point.
    IterationCap,
}

/// Outcome of a k-means run.
#[derive(Debug, Clone)]
pub struct KMeansResult {
    /// Final clusters and assignments.
    pub partition: Partition,
    pub termination: Termination,
    /// Rounds run by this call (a resumed partition may have run more in total).
    pub rounds: usize,
}

impl KMeansResult {
    pub fn converged(&self) -> bool {
        self.termination == Termination::Converged
    }

    pub fn clusters(&self) -> &[Cluster] {
        self.partition.clusters()
    }

    pub fn assignments(&self) -> &[usize] {
        self.partition.assignments()
    }
}

/// The k-means driver.
#[derive(Debug, Clone, Default)]
pub struct KMeans {
    config: KMeansConfig,
}

impl KMeans {
    pub fn new(config: KMeansConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &KMeansConfig {
        &self.config
    }

    /// Clusters `data` starting from one cluster per seed.
    ///
    /// # Example
    ///
    /// ```
    /// use mlkit::ml::classic::k_means::{KMeans, KMeansConfig};
    ///
    /// let data = vec![vec![1.0], vec![2.0], vec![8.0], vec![9.0], vec![11.0]];
    /// let seeds = vec![vec![0.0], vec![10.0]];
    ///
    /// let result = KMeans::new(KMeansConfig::new().with_max_iterations(10))
    ///     .fit(&data, &seeds)
    ///     .unwrap();
    ///
    /// assert!(result.converged());
    /// assert_eq!(result.assignments(), &[0, 0, 1, 1, 1]);
    /// assert_eq!(result.clusters()[0].centroid(), vec![1.5]);
    /// ```
    ///
    /// # Errors
    /// * `InvalidParameter` if `max_iterations` is 0 or the seeds are unusable
    /// * `EmptyInput`, `DimensionMismatch`, `NonFiniteValue` for malformed input
    /// * `SumOverflow` if the coordinates are too large for a cluster's running sum
    /// * `DegeneratePartition` if a cluster is emptied under `EmptyClusterPolicy::Abort`
    pub fn fit(&self, data: &[Vec<f64>], seeds: &[Vec<f64>]) -> Result<KMeansResult> {
        self.config.validate()?;
        let partition = Partition::new(data, seeds, self.config.empty_cluster_policy)?;
        self.resume(partition)
    }

    /// Continues refining an existing partition for up to `max_iterations` more rounds.
    pub fn resume(&self, mut partition: Partition) -> Result<KMeansResult> {
        self.config.validate()?;

        let mut termination = Termination::IterationCap;
        let mut rounds = 0;
        while rounds < self.config.max_iterations {
            rounds += 1;
            let moved = partition.round(self.config.empty_cluster_policy, self.config.update)?;
            if moved == 0 {
                termination = Termination::Converged;
                break;
            }
        }

        info!(
            "k-means stopped after {} rounds ({:?}), inertia {:.6}",
            rounds,
            termination,
            partition.inertia()
        );

        Ok(KMeansResult {
            partition,
            termination,
            rounds,
        })
    }
}

/// Runs k-means clustering on `data` from the given seeds.
pub fn kmeans(
    data: &[Vec<f64>],
    seeds: &[Vec<f64>],
    config: &KMeansConfig,
) -> Result<KMeansResult> {
    KMeans::new(config.clone()).fit(data, seeds)
}
