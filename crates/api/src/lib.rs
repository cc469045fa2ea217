pub mod error;
pub mod finder;

pub use error::FinderError;
pub use finder::{CandidateFinder, ClasspathProposer};
