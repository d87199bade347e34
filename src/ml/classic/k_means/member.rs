use std::fmt;

/// A data point taking part in a clustering run.
///
/// `index` is the position of the point in the dataset it came from. Seed
/// placeholders that only exist to give a cluster its first centroid have no index.
///
/// All members of one run must share the same dimension. This is not checked here;
/// [`Cluster`](super::Cluster) rejects vectors of the wrong length.
#[derive(Debug, Clone, PartialEq)]
pub struct Member {
    data: Vec<f64>,
    index: Option<usize>,
}

impl Member {
    /// Creates a member that does not belong to any dataset position.
    pub fn new(data: Vec<f64>) -> Self {
        Self { data, index: None }
    }

    /// Creates a member for the point at `index` in the dataset.
    pub fn from_point(index: usize, data: Vec<f64>) -> Self {
        Self {
            data,
            index: Some(index),
        }
    }

    pub fn data(&self) -> &[f64] {
        &self.data
    }

    pub fn index(&self) -> Option<usize> {
        self.index
    }

    pub fn dimension(&self) -> usize {
        self.data.len()
    }

    pub fn into_data(self) -> Vec<f64> {
        self.data
    }
}

impl From<Vec<f64>> for Member {
    fn from(data: Vec<f64>) -> Self {
        Member::new(data)
    }
}

impl fmt::Display for Member {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, value) in self.data.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", value)?;
        }
        write!(f, "]")
    }
}
