//! Core types shared across reflectgen: extracted descriptors, scope ranges,
//! generation configuration, and per-file / per-walk outcomes.

use serde::Serialize;
use std::collections::HashSet;
use std::path::PathBuf;

// ---------------------------------------------------------------------------
// Extracted declarations
// ---------------------------------------------------------------------------

/// A struct or class marked with `REFLECT_STRUCT`, plus its `REFLECT(..)` fields
/// in declaration order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StructDescriptor {
    pub name: String,
    /// `::`-joined enclosing namespaces. Empty for top-level declarations.
    pub qualifier: String,
    pub fields: Vec<String>,
}

/// An `enum class` marked with `REFLECT_ENUM`, with every case in declaration
/// order. Sentinel cases are kept here and dropped by the emitter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EnumDescriptor {
    pub name: String,
    pub qualifier: String,
    pub cases: Vec<String>,
}

impl StructDescriptor {
    pub fn qualified_name(&self) -> String {
        qualify(&self.qualifier, &self.name)
    }
}

impl EnumDescriptor {
    pub fn qualified_name(&self) -> String {
        qualify(&self.qualifier, &self.name)
    }
}

fn qualify(qualifier: &str, name: &str) -> String {
    if qualifier.is_empty() {
        name.to_string()
    } else {
        format!("{qualifier}::{name}")
    }
}

/// Everything extracted from one header.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Extraction {
    pub structs: Vec<StructDescriptor>,
    pub enums: Vec<EnumDescriptor>,
}

impl Extraction {
    pub fn is_empty(&self) -> bool {
        self.structs.is_empty() && self.enums.is_empty()
    }
}

/// One named namespace occurrence in normalized text. `start` is the offset of
/// its `{`, `end` the offset of the matching `}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScopeRange {
    pub name: String,
    pub start: usize,
    pub end: usize,
}

impl ScopeRange {
    /// Inclusive on both ends.
    pub fn contains(&self, offset: usize) -> bool {
        self.start <= offset && offset <= self.end
    }
}

// ---------------------------------------------------------------------------
// Sentinel cases
// ---------------------------------------------------------------------------

/// Enum case names that are never reflected. By convention `Invalid` marks a
/// failed parse and `Count` the number of cases.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentinelCases(Vec<String>);

pub const DEFAULT_SENTINEL_CASES: &[&str] = &["Invalid", "Count"];

impl SentinelCases {
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(names.into_iter().map(Into::into).collect())
    }

    pub fn contains(&self, case: &str) -> bool {
        self.0.iter().any(|s| s == case)
    }

    pub fn names(&self) -> &[String] {
        &self.0
    }
}

impl Default for SentinelCases {
    fn default() -> Self {
        Self::new(DEFAULT_SENTINEL_CASES.iter().copied())
    }
}

// ---------------------------------------------------------------------------
// Generation configuration
// ---------------------------------------------------------------------------

/// Runtime configuration for generation. Loaded from `.reflectgen.toml` or defaults.
#[derive(Debug, Clone)]
pub struct ReflectConfig {
    /// Header extension without the dot.
    pub extension: String,
    /// Inserted before the extension to name the generated file.
    pub generated_suffix: String,
    pub sentinel_cases: SentinelCases,
    /// Directory names to skip during a directory walk.
    pub skip_dirs: HashSet<String>,
}

impl ReflectConfig {
    /// `.h`
    pub fn header_ext(&self) -> String {
        format!(".{}", self.extension)
    }

    /// `_generated.h`
    pub fn generated_ext(&self) -> String {
        format!("{}.{}", self.generated_suffix, self.extension)
    }

    /// True for headers the generator should read: right extension, and not
    /// one of its own outputs.
    pub fn is_input_name(&self, file_name: &str) -> bool {
        file_name.ends_with(&self.header_ext()) && !file_name.ends_with(&self.generated_ext())
    }
}

impl Default for ReflectConfig {
    fn default() -> Self {
        Self {
            extension: "h".to_string(),
            generated_suffix: "_generated".to_string(),
            sentinel_cases: SentinelCases::default(),
            skip_dirs: [".git", "target", "build", "node_modules"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

// ---------------------------------------------------------------------------
// Outcomes
// ---------------------------------------------------------------------------

/// Result of running the generator over one header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileOutcome {
    Generated {
        input: PathBuf,
        output: PathBuf,
        extraction: Extraction,
    },
    /// No markers were found. No output file exists afterwards.
    Skipped { input: PathBuf },
}

impl FileOutcome {
    pub fn input(&self) -> &PathBuf {
        match self {
            FileOutcome::Generated { input, .. } | FileOutcome::Skipped { input } => input,
        }
    }

    pub fn to_json(&self) -> serde_json::Value {
        match self {
            FileOutcome::Generated { input, output, extraction } => serde_json::json!({
                "input": input.display().to_string(),
                "status": "generated",
                "output": output.display().to_string(),
                "structs": extraction.structs,
                "enums": extraction.enums,
            }),
            FileOutcome::Skipped { input } => serde_json::json!({
                "input": input.display().to_string(),
                "status": "skipped",
            }),
        }
    }
}

/// Outcomes of a directory walk, in traversal order.
#[derive(Debug, Clone, Default)]
pub struct WalkSummary {
    pub outcomes: Vec<FileOutcome>,
}

impl WalkSummary {
    pub fn generated(&self) -> impl Iterator<Item = &FileOutcome> {
        self.outcomes.iter().filter(|o| matches!(o, FileOutcome::Generated { .. }))
    }

    pub fn skipped(&self) -> impl Iterator<Item = &FileOutcome> {
        self.outcomes.iter().filter(|o| matches!(o, FileOutcome::Skipped { .. }))
    }
}
