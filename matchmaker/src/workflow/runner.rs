use crate::workflow::config::MatchmakerConfig;
use anyhow::Context;
use toadcore::matching::{DetectionMatcher, MatchMatrixBuilder, MatchSet};
use toadcore::toads::DetectionRecord;

pub struct WorkflowResult {
    pub match_set: MatchSet,
    /// Usable TDOA matrix rows, when a canonical receiver order is
    /// configured.
    pub matrix_rows: Option<usize>,
}

#[derive(Clone)]
pub struct Runner {
    config: MatchmakerConfig,
}

impl Runner {
    pub fn new(config: MatchmakerConfig) -> Self {
        Self { config }
    }

    pub fn execute(&self, toads: &[DetectionRecord]) -> anyhow::Result<WorkflowResult> {
        let matcher = DetectionMatcher::new(self.config.to_matcher_config())
            .context("configuring detection matcher")?;
        let match_set = matcher.run(toads).context("matching detections")?;

        let matrix_rows = if self.config.receivers.is_empty() {
            None
        } else {
            let mut builder = MatchMatrixBuilder::new(self.config.receivers.clone())
                .context("configuring match matrix")?;
            if !self.config.transmitters.is_empty() {
                builder = builder
                    .with_transmitter_filter(self.config.transmitters.iter().copied().collect());
            }
            let matrix = builder
                .build(toads, &match_set.matches)
                .context("building match matrix")?;
            Some(matrix.nrows())
        };

        Ok(WorkflowResult {
            match_set,
            matrix_rows,
        })
    }
}
