use thiserror::Error;

use crate::types::Defect;

/// Error type returned by injected entity fetchers for hard failures.
pub type FetchError = Box<dyn std::error::Error + Send + Sync>;

/// Errors that abort a resolve call.
#[derive(Error, Debug)]
pub enum ResolveError {
    #[error("input is empty")]
    EmptyInput,

    #[error("unsupported root shape: document must start with '{{' or '[', found '{found}'")]
    UnsupportedRootShape { found: char },

    #[error("invalid identifier type: field '{key}' holds {found}, expected a string or number")]
    InvalidIdentifierType { key: String, found: &'static str },

    #[error("fetch error: {source} (entity: {entity}, id: {id})")]
    Fetch {
        entity: String,
        id: String,
        #[source]
        source: FetchError,
    },

    #[error("unresolved reference in list: {0}")]
    Defect(Defect),

    #[error("config error: {message}")]
    Config { message: String },

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Convenience alias for results using `ResolveError`.
pub type Result<T> = std::result::Result<T, ResolveError>;
