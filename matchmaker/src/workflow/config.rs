use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use toadcore::prelude::MatcherConfig;
use toadcore::toads::{RxId, TxId};

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MatchmakerConfig {
    pub window: f64,
    pub min_receivers: usize,
    /// Canonical receiver ordering for the match matrix; empty means no
    /// matrix is built.
    #[serde(default)]
    pub receivers: Vec<RxId>,
    /// Restrict matrix rows to these transmitters; empty means all.
    #[serde(default)]
    pub transmitters: Vec<TxId>,
}

impl MatchmakerConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path_ref = path.as_ref();
        let contents = fs::read_to_string(path_ref)
            .with_context(|| format!("reading matchmaker config {}", path_ref.display()))?;
        let config: MatchmakerConfig = serde_yaml::from_str(&contents)
            .with_context(|| format!("parsing matchmaker config {}", path_ref.display()))?;
        Ok(config)
    }

    pub fn from_args(window: f64, min_receivers: usize) -> Self {
        Self {
            window,
            min_receivers,
            receivers: Vec::new(),
            transmitters: Vec::new(),
        }
    }

    pub fn to_matcher_config(&self) -> MatcherConfig {
        MatcherConfig::new(self.window, self.min_receivers)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn config_from_args_produces_matcher_config() {
        let cfg = MatchmakerConfig::from_args(0.2, 3);
        assert_eq!(cfg.to_matcher_config().min_receivers, 3);
        assert!(cfg.receivers.is_empty());
    }

    #[test]
    fn config_load_reads_yaml() {
        let mut temp = NamedTempFile::new().unwrap();
        temp.write_all(b"window: 0.1\nmin_receivers: 3\nreceivers: [2, 0, 1]\n")
            .unwrap();
        let path = temp.into_temp_path();
        let cfg = MatchmakerConfig::load(&path).unwrap();
        assert_eq!(cfg.window, 0.1);
        assert_eq!(cfg.receivers, vec![2, 0, 1]);
        assert!(cfg.transmitters.is_empty());
    }
}
