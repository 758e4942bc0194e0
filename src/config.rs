use std::fs;
use std::path::Path;

use glob::Pattern;
use serde::{Deserialize, Serialize};

use crate::errors::{ResolveError, Result};
use crate::types::{PluralPolicy, SpliceMode};

/// Default file name used by the CLI when no config path is given.
pub const CONFIG_FILENAME: &str = "refsplice.json";

/// Configuration for a resolver.
///
/// Controls the splice mode, how defects in reference lists are handled, and
/// the naming convention used to recognize reference fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolverConfig {
    /// Schema version of the configuration.
    pub version: u32,
    /// Whether the original key is removed after a successful rename.
    pub mode: SpliceMode,
    /// What to do when one element of a reference list cannot be resolved.
    pub plural_policy: PluralPolicy,
    /// Naming convention for reference fields.
    pub naming: NamingConfig,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            version: 1,
            mode: SpliceMode::default(),
            plural_policy: PluralPolicy::default(),
            naming: NamingConfig::default(),
        }
    }
}

/// Suffix-based naming convention for reference fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NamingConfig {
    /// Suffix marking a single identifier, e.g. `teacher_id`.
    pub singular_suffix: String,
    /// Suffix marking a list of identifiers, e.g. `student_ids`.
    pub plural_suffix: String,
    /// Appended to the stem of a list field to form its entity name.
    pub plural_entity_suffix: String,
    /// Whether entity names are lowercased.
    pub lowercase: bool,
    /// Glob patterns for keys that are never treated as references.
    pub exclude_keys: Vec<String>,
}

impl Default for NamingConfig {
    fn default() -> Self {
        Self {
            singular_suffix: "_id".to_string(),
            plural_suffix: "_ids".to_string(),
            plural_entity_suffix: "s".to_string(),
            lowercase: true,
            exclude_keys: Vec::new(),
        }
    }
}

/// Loads the configuration from disk.
///
/// If the file does not exist, returns the default configuration.
pub fn load_config(path: &Path) -> Result<ResolverConfig> {
    if !path.exists() {
        return Ok(ResolverConfig::default());
    }

    let contents = fs::read_to_string(path).map_err(|e| ResolveError::Config {
        message: format!("failed to read config file '{}': {}", path.display(), e),
    })?;

    let config: ResolverConfig =
        serde_json::from_str(&contents).map_err(|e| ResolveError::Config {
            message: format!("failed to parse config file '{}': {}", path.display(), e),
        })?;

    validate_config(&config)?;
    Ok(config)
}

/// Saves the configuration to disk using an atomic write.
///
/// Writes to a temporary file first and then renames it to the final location,
/// so a partial write never corrupts the configuration.
pub fn save_config(path: &Path, config: &ResolverConfig) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| ResolveError::Config {
            message: format!(
                "failed to create config directory '{}': {}",
                parent.display(),
                e
            ),
        })?;
    }

    let tmp_path = path.with_extension("tmp");

    let json = serde_json::to_string_pretty(config).map_err(|e| ResolveError::Config {
        message: format!("failed to serialize config: {}", e),
    })?;

    fs::write(&tmp_path, &json).map_err(|e| ResolveError::Config {
        message: format!(
            "failed to write temporary config file '{}': {}",
            tmp_path.display(),
            e
        ),
    })?;

    fs::rename(&tmp_path, path).map_err(|e| ResolveError::Config {
        message: format!(
            "failed to rename temporary config file '{}' to '{}': {}",
            tmp_path.display(),
            path.display(),
            e
        ),
    })?;

    Ok(())
}

/// Checks that the naming section is usable.
///
/// Suffixes must be non-empty and every exclude pattern must be a valid glob.
pub fn validate_config(config: &ResolverConfig) -> Result<()> {
    let naming = &config.naming;
    if naming.singular_suffix.is_empty() || naming.plural_suffix.is_empty() {
        return Err(ResolveError::Config {
            message: "reference suffixes must not be empty".to_string(),
        });
    }
    for pattern_str in &naming.exclude_keys {
        Pattern::new(pattern_str).map_err(|e| ResolveError::Config {
            message: format!("invalid exclude pattern '{}': {}", pattern_str, e),
        })?;
    }
    Ok(())
}
