pub mod matchfile;

pub use matchfile::{load_matches, load_matches_lenient, save_matches};
