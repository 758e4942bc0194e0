pub mod classifier;
pub mod config;
pub mod errors;
pub mod fetcher;
pub mod reporter;
pub mod resolution;
pub mod types;

pub use classifier::{KeyClassifier, SuffixClassifier};
pub use errors::{FetchError, ResolveError, Result};
pub use fetcher::{DirectoryFetcher, EntityFetcher, FetcherRegistry};
pub use reporter::{DefectLog, DefectReporter};
pub use resolution::Resolver;
