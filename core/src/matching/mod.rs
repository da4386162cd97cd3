pub mod matcher;
pub mod matrix;

pub use matcher::{DetectionMatcher, MatchSet};
pub use matrix::MatchMatrixBuilder;
