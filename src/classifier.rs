//! Key classification: deciding which field names are references.

use glob::Pattern;

use crate::config::NamingConfig;

/// Decides whether a field name encodes a reference and to which entity.
///
/// Implementations must be pure: the same key always yields the same answer
/// within one resolve call.
pub trait KeyClassifier {
    /// Returns the entity name referenced by `key`, or `None` if `key` is not
    /// a reference field.
    fn classify(&self, key: &str) -> Option<String>;
}

impl<F> KeyClassifier for F
where
    F: Fn(&str) -> Option<String>,
{
    fn classify(&self, key: &str) -> Option<String> {
        self(key)
    }
}

/// Classifier for the `<entity>_id` / `<entity>_ids` naming convention.
///
/// `teacher_id` maps to `teacher`; `student_ids` maps to `students` (the stem
/// plus the configured plural entity suffix). Keys that are exactly a suffix,
/// such as `_id`, do not match.
#[derive(Debug, Clone)]
pub struct SuffixClassifier {
    singular_suffix: String,
    plural_suffix: String,
    plural_entity_suffix: String,
    lowercase: bool,
    exclude: Vec<Pattern>,
}

impl SuffixClassifier {
    /// Builds a classifier from a naming configuration.
    ///
    /// Exclude patterns that fail to parse are skipped; `validate_config`
    /// reports them up front.
    pub fn new(naming: &NamingConfig) -> Self {
        let exclude = naming
            .exclude_keys
            .iter()
            .filter_map(|p| Pattern::new(p).ok())
            .collect();
        Self {
            singular_suffix: naming.singular_suffix.clone(),
            plural_suffix: naming.plural_suffix.clone(),
            plural_entity_suffix: naming.plural_entity_suffix.clone(),
            lowercase: naming.lowercase,
            exclude,
        }
    }

    fn is_excluded(&self, key: &str) -> bool {
        self.exclude.iter().any(|p| p.matches(key))
    }

    fn stem(&self, stem: &str) -> String {
        if self.lowercase {
            stem.to_lowercase()
        } else {
            stem.to_string()
        }
    }
}

impl Default for SuffixClassifier {
    fn default() -> Self {
        Self::new(&NamingConfig::default())
    }
}

impl KeyClassifier for SuffixClassifier {
    fn classify(&self, key: &str) -> Option<String> {
        if self.is_excluded(key) {
            return None;
        }

        // The plural suffix usually ends with the singular one, so check it first.
        if let Some(stem) = key.strip_suffix(self.plural_suffix.as_str()) {
            if !stem.is_empty() {
                return Some(format!("{}{}", self.stem(stem), self.plural_entity_suffix));
            }
        }

        match key.strip_suffix(self.singular_suffix.as_str()) {
            Some(stem) if !stem.is_empty() => Some(self.stem(stem)),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_default_suffixes() {
        let c = SuffixClassifier::default();
        assert_eq!(c.classify("teacher_id").as_deref(), Some("teacher"));
        assert_eq!(c.classify("student_ids").as_deref(), Some("students"));
        assert_eq!(c.classify("Owner_id").as_deref(), Some("owner"));
        assert_eq!(c.classify("_id"), None);
        assert_eq!(c.classify("_ids"), None);
        assert_eq!(c.classify("identity"), None);
        assert_eq!(c.classify("teacher_id_old"), None);
    }

    #[test]
    fn exclude_patterns_suppress_matches() {
        let naming = NamingConfig {
            exclude_keys: vec!["external_*".to_string()],
            ..NamingConfig::default()
        };
        let c = SuffixClassifier::new(&naming);
        assert_eq!(c.classify("external_id"), None);
        assert_eq!(c.classify("teacher_id").as_deref(), Some("teacher"));
    }
}
