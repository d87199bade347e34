pub mod error;
pub mod ml;
pub mod text;

pub use error::{Error, Result};
pub use ml::{classic, optimization};
