use crate::prelude::{MatchError, MatchResult};
use crate::toads::{DetectionRecord, Match, RxId, TxId};
use ndarray::Array2;
use std::collections::HashSet;

/// Projects accepted matches onto a fixed canonical receiver ordering,
/// producing the index matrix the TDOA estimator consumes: one row per
/// usable match, one column per receiver.
///
/// Stricter than the matcher's quorum: a match missing any canonical
/// receiver contributes no row at all.
pub struct MatchMatrixBuilder {
    receiver_order: Vec<RxId>,
    transmitter_filter: Option<HashSet<TxId>>,
}

impl MatchMatrixBuilder {
    pub fn new(receiver_order: Vec<RxId>) -> MatchResult<Self> {
        if receiver_order.is_empty() {
            return Err(MatchError::Configuration(
                "receiver order must name at least one receiver".into(),
            ));
        }
        let mut unique: HashSet<RxId> = HashSet::with_capacity(receiver_order.len());
        for &rxid in &receiver_order {
            if !unique.insert(rxid) {
                return Err(MatchError::Configuration(format!(
                    "receiver order lists rx {} more than once",
                    rxid
                )));
            }
        }
        Ok(Self {
            receiver_order,
            transmitter_filter: None,
        })
    }

    pub fn with_transmitter_filter(mut self, txids: HashSet<TxId>) -> Self {
        self.transmitter_filter = Some(txids);
        self
    }

    pub fn receiver_count(&self) -> usize {
        self.receiver_order.len()
    }

    /// Pure projection; match order is preserved row for row.
    pub fn build(
        &self,
        toads: &[DetectionRecord],
        matches: &[Match],
    ) -> MatchResult<Array2<usize>> {
        let columns = self.receiver_order.len();
        let mut cells = Vec::new();
        let mut rows = 0;
        let mut row = Vec::with_capacity(columns);

        for m in matches {
            let members = self.resolve(toads, m)?;
            if let Some(filter) = &self.transmitter_filter {
                let txid = match members.first() {
                    Some(&(_, toad)) => toad.txid,
                    None => continue,
                };
                if !filter.contains(&txid) {
                    continue;
                }
            }

            row.clear();
            for &rxid in &self.receiver_order {
                match members.iter().find(|(_, toad)| toad.rxid == rxid) {
                    Some(&(idx, _)) => row.push(idx),
                    None => break,
                }
            }
            if row.len() == columns {
                cells.extend_from_slice(&row);
                rows += 1;
            }
        }

        Array2::from_shape_vec((rows, columns), cells)
            .map_err(|err| MatchError::Internal(format!("match matrix shape: {}", err)))
    }

    fn resolve<'a>(
        &self,
        toads: &'a [DetectionRecord],
        m: &Match,
    ) -> MatchResult<Vec<(usize, &'a DetectionRecord)>> {
        m.indices
            .iter()
            .map(|&idx| {
                toads
                    .get(idx)
                    .map(|toad| (idx, toad))
                    .ok_or_else(|| {
                        MatchError::Internal(format!(
                            "match references detection #{} outside a batch of {}",
                            idx,
                            toads.len()
                        ))
                    })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn toad(index: usize, timestamp: f64, txid: u32, rxid: u32) -> DetectionRecord {
        DetectionRecord::new(index, timestamp, txid, rxid, 1.0, 0)
    }

    fn batch() -> Vec<DetectionRecord> {
        vec![
            toad(0, 0.00, 1, 10),
            toad(1, 0.01, 1, 11),
            toad(2, 0.02, 1, 12),
            toad(3, 0.50, 2, 11),
            toad(4, 0.51, 2, 10),
            toad(5, 0.52, 2, 12),
            toad(6, 1.00, 1, 10),
            toad(7, 1.01, 1, 11),
        ]
    }

    #[test]
    fn rows_follow_the_canonical_receiver_order() {
        let builder = MatchMatrixBuilder::new(vec![10, 11, 12]).unwrap();
        let matches = [Match::new(vec![0, 1, 2]), Match::new(vec![3, 4, 5])];
        let matrix = builder.build(&batch(), &matches).unwrap();

        assert_eq!(matrix.nrows(), 2);
        assert_eq!(matrix.row(0).to_vec(), vec![0, 1, 2]);
        // Second match holds the same receivers in a different member order.
        assert_eq!(matrix.row(1).to_vec(), vec![4, 3, 5]);
    }

    #[test]
    fn incomplete_matches_contribute_no_row() {
        let builder = MatchMatrixBuilder::new(vec![10, 11, 12]).unwrap();
        let matches = [Match::new(vec![0, 1, 2]), Match::new(vec![6, 7])];
        let matrix = builder.build(&batch(), &matches).unwrap();

        assert_eq!(matrix.nrows(), 1);
        assert_eq!(matrix.row(0).to_vec(), vec![0, 1, 2]);
    }

    #[test]
    fn transmitter_filter_drops_foreign_rows() {
        let builder = MatchMatrixBuilder::new(vec![10, 11, 12])
            .unwrap()
            .with_transmitter_filter([2].into_iter().collect());
        let matches = [Match::new(vec![0, 1, 2]), Match::new(vec![3, 4, 5])];
        let matrix = builder.build(&batch(), &matches).unwrap();

        assert_eq!(matrix.nrows(), 1);
        assert_eq!(matrix.row(0).to_vec(), vec![4, 3, 5]);
    }

    #[test]
    fn no_matches_yield_an_empty_matrix() {
        let builder = MatchMatrixBuilder::new(vec![10, 11]).unwrap();
        let matrix = builder.build(&batch(), &[]).unwrap();
        assert_eq!(matrix.nrows(), 0);
        assert_eq!(matrix.ncols(), 2);
    }

    #[test]
    fn out_of_range_index_is_an_internal_error() {
        let builder = MatchMatrixBuilder::new(vec![10]).unwrap();
        let result = builder.build(&batch(), &[Match::new(vec![99])]);
        assert!(matches!(result, Err(MatchError::Internal(_))));
    }

    #[test]
    fn receiver_order_must_be_distinct_and_non_empty() {
        assert!(MatchMatrixBuilder::new(vec![]).is_err());
        assert!(MatchMatrixBuilder::new(vec![10, 10]).is_err());
    }
}
