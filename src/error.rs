use std::{
    error::Error,
    fmt::{self, Display},
};

/// The result type used in the entire crate.
pub type Result<T> = std::result::Result<T, MlErr>;

/// The crate's error type.
#[derive(Debug)]
pub enum MlErr {
    /// A shape invariant was violated (e.g. mismatched lengths).
    ShapeMismatch {
        what: &'static str,
        got: usize,
        expected: usize,
    },

    /// Tried to remove more rows of a class than the dataset holds.
    ClassUnderflow { requested: usize, available: usize },

    /// An operation that needs labels received none.
    EmptyLabels,

    /// An input is invalid for semantic or domain reasons.
    InvalidInput(&'static str),
}

impl Display for MlErr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MlErr::ShapeMismatch {
                what,
                got,
                expected,
            } => {
                write!(f, "shape mismatch for {what}: got {got}, expected {expected}")
            }
            MlErr::ClassUnderflow {
                requested,
                available,
            } => {
                write!(
                    f,
                    "asked to remove {requested} rows of a class that only has {available}"
                )
            }
            MlErr::EmptyLabels => write!(f, "the label sequence is empty"),
            MlErr::InvalidInput(msg) => write!(f, "invalid input: {msg}"),
        }
    }
}

impl Error for MlErr {}
