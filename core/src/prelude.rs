use serde::{Deserialize, Serialize};

/// Shared configuration for one matching run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatcherConfig {
    /// Maximum timestamp spread, in seconds, relative to a window's anchor.
    pub window: f64,
    /// Minimum number of distinct receivers for an accepted match.
    pub min_receivers: usize,
}

impl MatcherConfig {
    pub fn new(window: f64, min_receivers: usize) -> Self {
        Self {
            window,
            min_receivers,
        }
    }

    pub fn validate(&self) -> MatchResult<()> {
        if !self.window.is_finite() || self.window < 0.0 {
            return Err(MatchError::Configuration(format!(
                "window must be a non-negative finite duration, got {}",
                self.window
            )));
        }
        if self.min_receivers < 1 {
            return Err(MatchError::Configuration(
                "min_receivers must be at least 1".into(),
            ));
        }
        Ok(())
    }
}

/// Common error type for the matching core.
#[derive(thiserror::Error, Debug)]
pub enum MatchError {
    #[error("detections out of order at index {index}: timestamp {current} precedes {previous}")]
    Ordering {
        index: usize,
        previous: f64,
        current: f64,
    },
    #[error("invalid configuration: {0}")]
    Configuration(String),
    #[error("match file line {line}: invalid token {token:?}")]
    Parse { line: usize, token: String },
    #[error("internal failure: {0}")]
    Internal(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type MatchResult<T> = Result<T, MatchError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_accepts_zero_window() {
        assert!(MatcherConfig::new(0.0, 1).validate().is_ok());
    }

    #[test]
    fn config_rejects_negative_window() {
        assert!(matches!(
            MatcherConfig::new(-0.1, 2).validate(),
            Err(MatchError::Configuration(_))
        ));
    }

    #[test]
    fn config_rejects_nan_window() {
        assert!(MatcherConfig::new(f64::NAN, 2).validate().is_err());
    }

    #[test]
    fn config_rejects_zero_quorum() {
        assert!(matches!(
            MatcherConfig::new(0.2, 0).validate(),
            Err(MatchError::Configuration(_))
        ));
    }
}
