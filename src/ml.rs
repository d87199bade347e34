pub mod classic;
pub mod optimization;

pub use classic::*;
pub use optimization::*;
