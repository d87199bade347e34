use thiserror::Error;

/// Errors returned by the algorithms in this crate.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// Dataset, seed list or training set is empty.
    #[error("empty input")]
    EmptyInput,

    /// A vector does not have the dimension established for the run.
    #[error("dimension mismatch: expected {expected}, found {found}")]
    DimensionMismatch {
        /// Expected dimensionality.
        expected: usize,
        /// Found dimensionality.
        found: usize,
    },

    /// A data point contains NaN or an infinite coordinate.
    #[error("non-finite value in data point {index}")]
    NonFiniteValue {
        /// Position of the offending point in the dataset.
        index: usize,
    },

    /// Finite inputs whose running sum in a cluster overflows to infinity.
    #[error("cluster sum overflowed; the coordinates are too large to average")]
    SumOverflow,

    /// Invalid parameter value.
    #[error("invalid parameter {name}: {message}")]
    InvalidParameter {
        /// Parameter name.
        name: &'static str,
        /// Human-readable explanation.
        message: String,
    },

    /// Requested cluster count is incompatible with the dataset.
    #[error("invalid cluster count: requested {requested}, but dataset has {n_items} items")]
    InvalidClusterCount {
        /// Requested number of clusters.
        requested: usize,
        /// Number of items in the dataset.
        n_items: usize,
    },

    /// Removing members would leave a cluster with no members.
    #[error("cluster would be left with no members")]
    EmptyCluster,

    /// A cluster of the partition lost its last member.
    #[error("degenerate partition: cluster {cluster} emptied in round {round}")]
    DegeneratePartition {
        /// Index of the cluster that would be emptied.
        cluster: usize,
        /// Round in which it happened, 0 being the seeding round.
        round: usize,
    },

    /// A training label has no coefficient vector.
    #[error("no coefficients for class label {0}")]
    UnknownLabel(usize),
}

impl Error {
    pub fn invalid_parameter(name: &'static str, message: impl Into<String>) -> Self {
        Error::InvalidParameter {
            name,
            message: message.into(),
        }
    }

    pub fn dimension_mismatch(expected: usize, found: usize) -> Self {
        Error::DimensionMismatch { expected, found }
    }
}

/// Result type used by this crate.
pub type Result<T> = std::result::Result<T, Error>;
