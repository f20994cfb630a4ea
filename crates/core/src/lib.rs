//! reflectgen: reflection metadata generator for C++ headers.
//!
//! Scans headers for declarations marked with `REFLECT_STRUCT` / `REFLECT_ENUM`,
//! extracts their `REFLECT(field)` members and enum cases, and writes a
//! `_generated.h` companion of `REFLECT_IMPL_*` macro invocations.
//!
//! # Modules
//!
//! - [`normalize`]: Comment/directive stripping and whitespace canonicalization
//! - [`lexer`]: Tokens with byte spans, brace pairing, extraction cursor
//! - [`scope`]: Namespace scope tree and qualifier resolution
//! - [`extract`]: Struct and enum extraction
//! - [`emit`]: Generated file rendering
//! - [`generate`]: Per-file and directory-walk orchestration
//! - [`types`]: Descriptors, configuration, outcomes
//! - [`error`]: Error types

pub mod emit;
pub mod error;
pub mod extract;
pub mod generate;
pub mod lexer;
pub mod normalize;
pub mod scope;
pub mod types;

use std::path::Path;

use tracing::{debug, warn};

pub use error::{ParseError, ReflectError};
pub use generate::{extract_source, generate_dir, generate_file, preview_file};
use types::*;

// ---------------------------------------------------------------------------
// .reflectgen.toml config loading
// ---------------------------------------------------------------------------

/// Name of the optional config file looked up next to the headers.
pub const CONFIG_FILE_NAME: &str = ".reflectgen.toml";

/// Known keys in `.reflectgen.toml` for config validation.
const KNOWN_CONFIG_KEYS: &[&str] = &["extension", "generated_suffix", "sentinel_cases", "skip_dirs"];

/// Simple Levenshtein edit distance for typo suggestions.
fn edit_distance(a: &str, b: &str) -> usize {
    let (a, b) = (a.as_bytes(), b.as_bytes());
    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr = vec![0; b.len() + 1];
    for (i, &ca) in a.iter().enumerate() {
        curr[0] = i + 1;
        for (j, &cb) in b.iter().enumerate() {
            let cost = if ca == cb { 0 } else { 1 };
            curr[j + 1] = (prev[j + 1] + 1).min(curr[j] + 1).min(prev[j] + cost);
        }
        std::mem::swap(&mut prev, &mut curr);
    }
    prev[b.len()]
}

fn string_array(value: &toml::Value, key: &str) -> Result<Vec<String>, String> {
    let items = value.as_array().ok_or_else(|| format!("'{key}' must be an array of strings"))?;
    items
        .iter()
        .map(|v| v.as_str().map(str::to_string))
        .collect::<Option<Vec<_>>>()
        .ok_or_else(|| format!("'{key}' must be an array of strings"))
}

fn non_empty_string(value: &toml::Value, key: &str) -> Result<String, String> {
    match value.as_str() {
        Some(s) if !s.is_empty() => Ok(s.to_string()),
        _ => Err(format!("'{key}' must be a non-empty string")),
    }
}

/// Parse `.reflectgen.toml` contents over the defaults.
///
/// Unknown keys only warn, with a typo suggestion when one is close.
pub fn parse_config(content: &str) -> Result<ReflectConfig, String> {
    let table = content.parse::<toml::Table>().map_err(|e| e.to_string())?;
    let mut config = ReflectConfig::default();

    // Unknown keys only warn
    for key in table.keys() {
        if KNOWN_CONFIG_KEYS.contains(&key.as_str()) {
            continue;
        }
        let suggestion = KNOWN_CONFIG_KEYS.iter().min_by_key(|k| edit_distance(key, k));
        match suggestion {
            Some(s) if edit_distance(key, s) <= 3 => warn!(
                key = key.as_str(),
                suggestion = *s,
                "Unknown key in {CONFIG_FILE_NAME}, did you mean '{s}'?"
            ),
            _ => warn!(
                key = key.as_str(),
                "Unknown key in {CONFIG_FILE_NAME} (known keys: {})",
                KNOWN_CONFIG_KEYS.join(", ")
            ),
        }
    }

    if let Some(v) = table.get("extension") {
        config.extension = non_empty_string(v, "extension")?.trim_start_matches('.').to_string();
    }

    if let Some(v) = table.get("generated_suffix") {
        config.generated_suffix = non_empty_string(v, "generated_suffix")?;
    }

    // sentinel_cases replaces the defaults; an empty list reflects every case
    if let Some(v) = table.get("sentinel_cases") {
        config.sentinel_cases = SentinelCases::new(string_array(v, "sentinel_cases")?);
        debug!(sentinels = ?config.sentinel_cases.names(), "Custom sentinel cases");
    }

    // skip_dirs merges with the defaults
    if let Some(v) = table.get("skip_dirs") {
        config.skip_dirs.extend(string_array(v, "skip_dirs")?);
    }

    Ok(config)
}

/// Load an explicitly named config file. Missing or malformed files are errors.
pub fn load_config_file(path: &Path) -> Result<ReflectConfig, ReflectError> {
    let content = std::fs::read_to_string(path).map_err(|source| ReflectError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_config(&content)
        .map_err(|message| ReflectError::Config { path: path.to_path_buf(), message })
}

/// Load `.reflectgen.toml` from `dir` if present.
///
/// Returns defaults when the file doesn't exist, or with a warning when it
/// can't be read or parsed.
pub fn load_reflect_config(dir: &Path) -> ReflectConfig {
    let config_path = dir.join(CONFIG_FILE_NAME);
    if !config_path.exists() {
        return ReflectConfig::default();
    }

    debug!(path = %config_path.display(), "Loading {CONFIG_FILE_NAME}");
    match load_config_file(&config_path) {
        Ok(config) => config,
        Err(e) => {
            warn!(error = %e, "Failed to load config, using defaults");
            ReflectConfig::default()
        }
    }
}
