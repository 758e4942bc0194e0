use std::sync::Arc;

use serde_json::{Map, Value};
use tracing::{debug, trace};

use crate::classifier::{KeyClassifier, SuffixClassifier};
use crate::config::ResolverConfig;
use crate::errors::{ResolveError, Result};
use crate::fetcher::EntityFetcher;
use crate::reporter::DefectReporter;
use crate::types::*;

/// Resolves reference fields in JSON documents by fetching the referenced
/// entities and splicing them into the document.
///
/// A field is a reference when the classifier recognizes its name. Scalar
/// references are replaced by one fetched object; arrays of scalars become a
/// list of fetched objects. Objects are always walked structurally, whatever
/// their key.
pub struct Resolver<C, F> {
    classifier: C,
    fetcher: F,
    mode: SpliceMode,
    plural_policy: PluralPolicy,
    reporter: Option<Arc<dyn DefectReporter + Send + Sync>>,
}

/// Result of fetching one identifier.
enum Fetched {
    Entity(Map<String, Value>),
    Defect(Defect),
}

/// An array after structural recursion, plus the resolved list when its key
/// classified as a reference.
struct WalkedArray {
    items: Vec<Value>,
    resolved: Option<(String, Vec<Value>)>,
}

impl<F: EntityFetcher> Resolver<SuffixClassifier, F> {
    /// Creates a resolver using the suffix naming convention, splice mode
    /// and plural policy from `config`.
    pub fn from_config(config: &ResolverConfig, fetcher: F) -> Self {
        Resolver::new(SuffixClassifier::new(&config.naming), fetcher)
            .with_mode(config.mode)
            .with_plural_policy(config.plural_policy)
    }
}

impl<C: KeyClassifier, F: EntityFetcher> Resolver<C, F> {
    /// Creates a resolver in replace mode, omitting defective list elements,
    /// with no defect reporter.
    pub fn new(classifier: C, fetcher: F) -> Self {
        Self {
            classifier,
            fetcher,
            mode: SpliceMode::default(),
            plural_policy: PluralPolicy::default(),
            reporter: None,
        }
    }

    pub fn with_mode(mut self, mode: SpliceMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_plural_policy(mut self, policy: PluralPolicy) -> Self {
        self.plural_policy = policy;
        self
    }

    /// Sets the sink for defects. Without one, defects are dropped.
    pub fn with_reporter(mut self, reporter: Arc<dyn DefectReporter + Send + Sync>) -> Self {
        self.reporter = Some(reporter);
        self
    }

    pub fn mode(&self) -> SpliceMode {
        self.mode
    }

    pub fn plural_policy(&self) -> PluralPolicy {
        self.plural_policy
    }

    /// Resolves every reference in a raw JSON document and re-encodes it.
    ///
    /// The document must be an object or an array. Any hard error aborts the
    /// call and no output is produced.
    pub fn resolve(&self, input: &[u8]) -> Result<Vec<u8>> {
        let start = input
            .iter()
            .position(|b| !b.is_ascii_whitespace())
            .ok_or(ResolveError::EmptyInput)?;
        trace!(bytes = input.len(), "resolving document");

        match input[start] {
            b'{' => {
                let map: Map<String, Value> = serde_json::from_slice(input)?;
                let resolved = self.walk_object(map)?;
                Ok(serde_json::to_vec(&resolved)?)
            }
            b'[' => {
                let items: Vec<Value> = serde_json::from_slice(input)?;
                let walked = self.walk_array(None, items)?;
                Ok(serde_json::to_vec(&walked.items)?)
            }
            other => Err(ResolveError::UnsupportedRootShape {
                found: char::from(other),
            }),
        }
    }

    /// Same as [`resolve`](Self::resolve) on an already decoded document.
    pub fn resolve_value(&self, value: Value) -> Result<Value> {
        match value {
            Value::Object(map) => Ok(Value::Object(self.walk_object(map)?)),
            Value::Array(items) => Ok(Value::Array(self.walk_array(None, items)?.items)),
            other => Err(ResolveError::UnsupportedRootShape {
                found: leading_char(&other),
            }),
        }
    }

    // ------------------------------------------------------------------
    // Walk
    // ------------------------------------------------------------------

    fn walk_object(&self, map: Map<String, Value>) -> Result<Map<String, Value>> {
        let mut out = Map::new();
        // Resolved entries are written last so they win over literal siblings.
        let mut spliced: Vec<(String, Value)> = Vec::new();

        for (key, value) in map {
            match value {
                Value::Object(inner) => {
                    out.insert(key, Value::Object(self.walk_object(inner)?));
                }
                Value::Array(items) => {
                    let walked = self.walk_array(Some(&key), items)?;
                    let original = Value::Array(walked.items);
                    match walked.resolved {
                        Some((entity, list)) => {
                            let list = Value::Array(list);
                            self.splice(&mut out, &mut spliced, key, original, entity, list);
                        }
                        None => {
                            out.insert(key, original);
                        }
                    }
                }
                scalar => match self.resolve_scalar(&key, &scalar)? {
                    Some((entity, resolved)) => {
                        self.splice(&mut out, &mut spliced, key, scalar, entity, resolved);
                    }
                    None => {
                        out.insert(key, scalar);
                    }
                },
            }
        }

        out.extend(spliced);
        Ok(out)
    }

    /// Walks an array found under `key` (`None` for arrays nested in arrays
    /// or at the root).
    ///
    /// Nested objects and arrays are walked first. If `key` is a reference,
    /// every scalar element is then fetched into a new list; defective
    /// elements are left out of it.
    fn walk_array(&self, key: Option<&str>, items: Vec<Value>) -> Result<WalkedArray> {
        let items = items
            .into_iter()
            .map(|item| match item {
                Value::Object(map) => Ok(Value::Object(self.walk_object(map)?)),
                Value::Array(inner) => Ok(Value::Array(self.walk_array(None, inner)?.items)),
                scalar => Ok(scalar),
            })
            .collect::<Result<Vec<_>>>()?;

        let Some((key, entity)) = key.and_then(|k| self.reference_entity(k).map(|e| (k, e))) else {
            return Ok(WalkedArray {
                items,
                resolved: None,
            });
        };

        let mut list = Vec::new();
        for scalar in items.iter().filter(|v| !v.is_object() && !v.is_array()) {
            let id = identifier(key, scalar)?;
            match self.fetch_entity(&entity, &id)? {
                Fetched::Entity(obj) => list.push(Value::Object(obj)),
                Fetched::Defect(defect) => {
                    self.report(&defect);
                    if self.plural_policy == PluralPolicy::Abort {
                        return Err(ResolveError::Defect(defect));
                    }
                }
            }
        }

        debug!(
            key,
            entity = entity.as_str(),
            elements = items.len(),
            resolved = list.len(),
            "resolved reference list"
        );

        Ok(WalkedArray {
            items,
            resolved: Some((entity, list)),
        })
    }

    /// Resolves a scalar field. Returns the entity name and fetched object,
    /// or `None` when the field is not a reference or the fetch was defective.
    fn resolve_scalar(&self, key: &str, scalar: &Value) -> Result<Option<(String, Value)>> {
        let Some(entity) = self.reference_entity(key) else {
            return Ok(None);
        };
        let id = identifier(key, scalar)?;

        match self.fetch_entity(&entity, &id)? {
            Fetched::Entity(obj) => {
                debug!(key, entity = entity.as_str(), id = id.as_str(), "resolved reference");
                Ok(Some((entity, Value::Object(obj))))
            }
            Fetched::Defect(defect) => {
                self.report(&defect);
                Ok(None)
            }
        }
    }

    /// Places a resolved value under `entity`, keeping `key` only in augment
    /// mode and only when the names differ.
    fn splice(
        &self,
        out: &mut Map<String, Value>,
        spliced: &mut Vec<(String, Value)>,
        key: String,
        original: Value,
        entity: String,
        resolved: Value,
    ) {
        if entity != key && self.mode == SpliceMode::Augment {
            out.insert(key, original);
        }
        spliced.push((entity, resolved));
    }

    // ------------------------------------------------------------------
    // Private helpers
    // ------------------------------------------------------------------

    /// Classifies `key`, treating entities the fetcher does not handle as
    /// non-references.
    fn reference_entity(&self, key: &str) -> Option<String> {
        if key.is_empty() {
            return None;
        }
        self.classifier
            .classify(key)
            .filter(|entity| self.fetcher.handles(entity))
    }

    fn fetch_entity(&self, entity: &str, id: &str) -> Result<Fetched> {
        let bytes = self
            .fetcher
            .fetch(entity, id)
            .map_err(|source| ResolveError::Fetch {
                entity: entity.to_string(),
                id: id.to_string(),
                source,
            })?;

        let defect = |kind| {
            Fetched::Defect(Defect {
                kind,
                entity: entity.to_string(),
                id: id.to_string(),
            })
        };

        if bytes.is_empty() {
            return Ok(defect(DefectKind::EmptyFetchResult));
        }
        if bytes[0] != b'{' {
            return Ok(defect(DefectKind::NonObjectFetchResult));
        }
        match serde_json::from_slice::<Map<String, Value>>(&bytes) {
            Ok(obj) => Ok(Fetched::Entity(obj)),
            Err(_) => Ok(defect(DefectKind::MalformedFetchResult)),
        }
    }

    fn report(&self, defect: &Defect) {
        debug!(
            kind = defect.kind.as_str(),
            entity = defect.entity.as_str(),
            id = defect.id.as_str(),
            "reference left unresolved"
        );
        if let Some(reporter) = &self.reporter {
            reporter.report(defect);
        }
    }
}

/// Extracts an identifier from a scalar found under `key`.
///
/// Strings are used as-is. Numbers are truncated to an integer and rendered
/// in decimal, so `42.9` becomes `"42"`. Anything else is a contract
/// violation.
pub fn identifier(key: &str, value: &Value) -> Result<String> {
    match value {
        Value::String(s) => Ok(s.clone()),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Ok(i.to_string())
            } else if let Some(u) = n.as_u64() {
                Ok(u.to_string())
            } else {
                let truncated = n.as_f64().unwrap_or_default().trunc();
                if truncated == 0.0 {
                    Ok("0".to_string())
                } else {
                    Ok(format!("{:.0}", truncated))
                }
            }
        }
        other => Err(ResolveError::InvalidIdentifierType {
            key: key.to_string(),
            found: value_kind(other),
        }),
    }
}

/// First character of the JSON encoding of a scalar root.
fn leading_char(value: &Value) -> char {
    match value {
        Value::Null => 'n',
        Value::Bool(true) => 't',
        Value::Bool(false) => 'f',
        Value::String(_) => '"',
        Value::Number(n) => n.to_string().chars().next().unwrap_or('0'),
        Value::Array(_) => '[',
        Value::Object(_) => '{',
    }
}
