pub mod k_means;
pub mod perceptron;

// Re-export public types and functions
pub use k_means::{
    kmeans, Cluster, KMeans, KMeansConfig, KMeansResult, Member, Partition, Termination,
};
pub use perceptron::{LearningSample, Perceptron, TrainingReport};
