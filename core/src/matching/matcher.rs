use crate::prelude::{MatchError, MatchResult, MatcherConfig};
use crate::telemetry::log::LogManager;
use crate::toads::{Collision, DetectionRecord, Match, RxId};

/// Everything one matching run produces. Every detection index lands in at
/// most one of the three buckets; non-anchor members of windows that missed
/// quorum land in none.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MatchSet {
    pub matches: Vec<Match>,
    pub misses: Vec<usize>,
    pub collisions: Vec<Collision>,
}

/// Consumption state of one detection during a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ConsumeState {
    Unconsumed,
    Matched,
    CollisionLoser,
}

/// Windowed greedy matcher that partitions a timestamp-sorted detection
/// stream into matches, misses, and collisions.
pub struct DetectionMatcher {
    config: MatcherConfig,
    logger: LogManager,
}

impl DetectionMatcher {
    pub fn new(config: MatcherConfig) -> MatchResult<Self> {
        config.validate()?;
        Ok(Self {
            config,
            logger: LogManager::new(),
        })
    }

    pub fn config(&self) -> &MatcherConfig {
        &self.config
    }

    /// Runs one matching pass over a fully materialized detection batch.
    ///
    /// The input must be globally non-decreasing in timestamp; the forward
    /// scan's early exit relies on it across transmitters, so a violation is
    /// rejected up front rather than silently mis-matched.
    pub fn run(&self, toads: &[DetectionRecord]) -> MatchResult<MatchSet> {
        check_ordering(toads)?;

        let mut states = vec![ConsumeState::Unconsumed; toads.len()];
        let mut result = MatchSet::default();

        for i in 0..toads.len() {
            if states[i] != ConsumeState::Unconsumed {
                continue;
            }
            let anchor = &toads[i];
            let deadline = anchor.timestamp + self.config.window;

            // Accumulated rxid -> index for this window. Windows hold a
            // handful of detections, so a linear-probe vector doubles as the
            // deterministic emission order.
            let mut house: Vec<(RxId, usize)> = vec![(anchor.rxid, i)];

            for (j, toad) in toads.iter().enumerate().skip(i + 1) {
                if toad.timestamp > deadline {
                    // Sorted globally, so every later detection is out of
                    // window for every transmitter, not just this one.
                    break;
                }
                if toad.txid != anchor.txid {
                    continue;
                }
                states[j] = ConsumeState::Matched;

                match house.iter_mut().find(|(rxid, _)| *rxid == toad.rxid) {
                    Some(slot) => {
                        let prev = slot.1;
                        let winner = if toads[prev].energy > toad.energy {
                            prev
                        } else {
                            j
                        };
                        let loser = if winner == prev { j } else { prev };
                        states[loser] = ConsumeState::CollisionLoser;
                        slot.1 = winner;
                        self.logger.trace(&format!(
                            "collision on rx {} tx {}: #{} loses to #{}",
                            toad.rxid, toad.txid, loser, winner
                        ));
                        result.collisions.push(Collision { loser, winner });
                    }
                    None => house.push((toad.rxid, j)),
                }
            }

            if house.len() >= self.config.min_receivers {
                result
                    .matches
                    .push(Match::new(house.into_iter().map(|(_, idx)| idx).collect()));
            } else {
                // Non-anchor detections absorbed into this window stay
                // consumed and are not re-queued as candidates.
                result.misses.push(i);
            }
        }

        self.logger.record(&format!(
            "matched {} windows, {} misses, {} collisions over {} detections",
            result.matches.len(),
            result.misses.len(),
            result.collisions.len(),
            toads.len()
        ));

        Ok(result)
    }
}

fn check_ordering(toads: &[DetectionRecord]) -> MatchResult<()> {
    for (i, pair) in toads.windows(2).enumerate() {
        if pair[1].timestamp < pair[0].timestamp {
            return Err(MatchError::Ordering {
                index: i + 1,
                previous: pair[0].timestamp,
                current: pair[1].timestamp,
            });
        }
    }
    Ok(())
}
