pub mod cache;
pub mod candidate;
pub mod location;
pub mod resolver;
mod task;

pub use cache::{ExtractedJar, ExtractionCache};
pub use candidate::{CandidateSet, ModCandidate};
pub use location::{Location, LocationSource};
pub use resolver::{ModResolver, ResolverConfig};
