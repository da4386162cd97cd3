//! Detection-matching core for the Rust TDOA geolocation platform.
//!
//! The modules group per-receiver time-of-arrival detections (TOADs) into
//! matches of the same physical transmission, project accepted matches onto
//! a fixed receiver ordering, and persist match index lists for downstream
//! TDOA estimation.

pub mod matching;
pub mod prelude;
pub mod store;
pub mod telemetry;
pub mod toads;

pub use prelude::{MatchError, MatchResult, MatcherConfig};
