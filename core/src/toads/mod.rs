pub mod detection;

pub use detection::{BlockId, Collision, DetectionRecord, Match, RxId, TxId};
