pub mod arch;
pub mod dataset;
pub mod error;
pub mod eval;
pub mod optimization;
mod test;
pub mod training;
pub mod weights;

pub use error::{MlErr, Result};
