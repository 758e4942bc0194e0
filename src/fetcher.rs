//! Entity fetchers: turning an `(entity, id)` pair into raw JSON bytes.

use std::collections::HashMap;
use std::fmt;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::errors::FetchError;

/// Resolves one identifier of an entity into the raw JSON of that entity.
///
/// Returning `Ok` with empty bytes, non-object JSON or malformed JSON is a
/// recoverable defect. Returning `Err` aborts the whole resolve call.
pub trait EntityFetcher {
    /// Fetches the raw JSON object for `id` of `entity`.
    fn fetch(&self, entity: &str, id: &str) -> Result<Vec<u8>, FetchError>;

    /// Whether this fetcher knows how to resolve `entity` at all.
    ///
    /// Fields referencing an entity that is not handled are left untouched.
    fn handles(&self, _entity: &str) -> bool {
        true
    }
}

impl<F> EntityFetcher for F
where
    F: Fn(&str, &str) -> Result<Vec<u8>, FetchError>,
{
    fn fetch(&self, entity: &str, id: &str) -> Result<Vec<u8>, FetchError> {
        self(entity, id)
    }
}

type Getter = Box<dyn Fn(&str) -> Result<Vec<u8>, FetchError> + Send + Sync>;

/// A fetcher dispatching to one getter per entity name.
#[derive(Default)]
pub struct FetcherRegistry {
    getters: HashMap<String, Getter>,
}

impl FetcherRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers the getter for `entity`, replacing any previous one.
    pub fn register<G>(&mut self, entity: impl Into<String>, getter: G)
    where
        G: Fn(&str) -> Result<Vec<u8>, FetchError> + Send + Sync + 'static,
    {
        self.getters.insert(entity.into(), Box::new(getter));
    }

    /// Builder-style variant of [`register`](Self::register).
    pub fn with<G>(mut self, entity: impl Into<String>, getter: G) -> Self
    where
        G: Fn(&str) -> Result<Vec<u8>, FetchError> + Send + Sync + 'static,
    {
        self.register(entity, getter);
        self
    }

    /// Names of all registered entities, sorted.
    pub fn entities(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.getters.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

impl fmt::Debug for FetcherRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FetcherRegistry")
            .field("entities", &self.entities())
            .finish()
    }
}

impl EntityFetcher for FetcherRegistry {
    fn fetch(&self, entity: &str, id: &str) -> Result<Vec<u8>, FetchError> {
        match self.getters.get(entity) {
            Some(getter) => getter(id),
            None => Err(format!("no getter registered for entity '{}'", entity).into()),
        }
    }

    fn handles(&self, entity: &str) -> bool {
        self.getters.contains_key(entity)
    }
}

/// A fetcher reading `<root>/<entity>/<id>.json` files.
///
/// A missing file yields empty bytes, which the resolver reports as a defect.
#[derive(Debug, Clone)]
pub struct DirectoryFetcher {
    root: PathBuf,
}

impl DirectoryFetcher {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Returns the file path backing `(entity, id)`.
    ///
    /// Segments containing path separators or `..` are rejected so lookups
    /// cannot escape the root directory.
    pub fn entity_path(&self, entity: &str, id: &str) -> Result<PathBuf, FetchError> {
        for segment in [entity, id] {
            if segment.is_empty()
                || segment == "."
                || segment.contains("..")
                || segment.contains(['/', '\\'])
            {
                return Err(format!("invalid path segment '{}'", segment).into());
            }
        }
        Ok(self.root.join(entity).join(format!("{}.json", id)))
    }
}

impl EntityFetcher for DirectoryFetcher {
    fn fetch(&self, entity: &str, id: &str) -> Result<Vec<u8>, FetchError> {
        let path = self.entity_path(entity, id)?;
        match std::fs::read(&path) {
            Ok(bytes) => Ok(bytes),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(Vec::new()),
            Err(e) => Err(format!("failed to read '{}': {}", path.display(), e).into()),
        }
    }
}
