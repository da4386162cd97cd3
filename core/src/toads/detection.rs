use serde::{Deserialize, Serialize};

/// Transmitter identity.
pub type TxId = u32;
/// Receiver identity, unique per physical receiver.
pub type RxId = u32;
/// Opaque identifier of the sample block a detection originated from.
pub type BlockId = u64;

/// One time-of-arrival detection (TOAD) emitted by a receiver's
/// physical-layer detector.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetectionRecord {
    /// Position in the input sequence; stable identity used downstream.
    pub index: usize,
    /// Arrival time in seconds. The input sequence must be non-decreasing
    /// in this field.
    pub timestamp: f64,
    pub txid: TxId,
    pub rxid: RxId,
    /// Correlation-peak amplitude; used only to break duplicate-detection
    /// ties.
    pub energy: f64,
    /// Carried through for traceability, never interpreted.
    pub block: BlockId,
}

impl DetectionRecord {
    pub fn new(
        index: usize,
        timestamp: f64,
        txid: TxId,
        rxid: RxId,
        energy: f64,
        block: BlockId,
    ) -> Self {
        Self {
            index,
            timestamp,
            txid,
            rxid,
            energy,
            block,
        }
    }
}

/// Detection indices that all belong to one physical transmission: at most
/// one per distinct receiver, all sharing a transmitter, all within one
/// window of the earliest member. Index order is the anchor first, then the
/// order each receiver was first seen in the scan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Match {
    pub indices: Vec<usize>,
}

impl Match {
    pub fn new(indices: Vec<usize>) -> Self {
        Self { indices }
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }
}

/// Two same-receiver detections of the same transmitter inside one window.
/// The winner stays in the match; the loser is discarded from consideration
/// entirely and is never reported as a miss.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Collision {
    pub loser: usize,
    pub winner: usize,
}
