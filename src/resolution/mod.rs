/// Reference resolution module.
///
/// Walks a decoded JSON document, fetches the entities its reference fields
/// point at, and splices them into the document.
mod resolver;

pub use resolver::{identifier, Resolver};
