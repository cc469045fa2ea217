pub mod discovery;
pub mod error;
pub mod finder;
pub mod logging;
pub mod metadata;

pub use discovery::{ModCandidate, ModResolver, ResolverConfig};
pub use error::{DiscoveryError, ResolveError, Result};
pub use finder::{ClasspathEntryFinder, DirectoryModFinder};
pub use metadata::{DESCRIPTOR_NAME, LATEST_SCHEMA_VERSION, ModMetadata, Version, VersionRange};
