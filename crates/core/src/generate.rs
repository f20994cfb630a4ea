use crate::emit::render_file;
use crate::error::{ParseError, ReflectError, Result};
use crate::extract::extract;
use crate::lexer::tokenize;
use crate::normalize::normalize;
use crate::scope::ScopeTree;
use crate::types::*;
use ignore::WalkBuilder;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

// ---------------------------------------------------------------------------
// In-memory pipeline
// ---------------------------------------------------------------------------

/// Extract every reflected struct and enum from raw header text.
pub fn extract_source(raw: &str) -> Result<Extraction, ParseError> {
    let text = normalize(raw)?;
    debug!(raw_len = raw.len(), normalized_len = text.len(), "Normalized header");
    let stream = tokenize(&text)?;
    let scopes = ScopeTree::build(&stream);
    debug!(tokens = stream.len(), namespaces = scopes.nodes().len(), "Tokenized header");
    extract(&stream, &scopes)
}

// ---------------------------------------------------------------------------
// Single file
// ---------------------------------------------------------------------------

/// `dir/foo.h` → `dir/foo_generated.h`. Fails if `input` lacks the header extension.
pub fn output_path(input: &Path, config: &ReflectConfig) -> Result<PathBuf> {
    let header_ext = config.header_ext();
    let file_name = input.file_name().map(|n| n.to_string_lossy()).unwrap_or_default();
    let stem = file_name.strip_suffix(header_ext.as_str()).ok_or_else(|| {
        ReflectError::WrongExtension { path: input.to_path_buf(), extension: header_ext.clone() }
    })?;
    Ok(input.with_file_name(format!("{stem}{}", config.generated_ext())))
}

fn read_extraction(input: &Path) -> Result<Extraction> {
    if !input.is_file() {
        return Err(ReflectError::InputNotFound(input.to_path_buf()));
    }
    let raw = fs::read_to_string(input).map_err(|e| ReflectError::io(input, e))?;
    extract_source(&raw)
        .map_err(|source| ReflectError::Parse { path: input.to_path_buf(), source })
}

fn remove_stale(output: &Path) -> Result<()> {
    match fs::remove_file(output) {
        Ok(()) => {
            debug!(path = %output.display(), "Removed previous output");
            Ok(())
        }
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
        Err(e) => Err(ReflectError::io(output, e)),
    }
}

/// Generate the companion file for one header.
///
/// Any previous output is deleted first, so a header that lost all its markers
/// leaves no stale generated file behind.
pub fn generate_file(input: &Path, config: &ReflectConfig) -> Result<FileOutcome> {
    let output = output_path(input, config)?;
    remove_stale(&output)?;

    let extraction = read_extraction(input)?;
    if extraction.is_empty() {
        info!(path = %input.display(), "Skipped (no reflection markers)");
        return Ok(FileOutcome::Skipped { input: input.to_path_buf() });
    }

    let text = render_file(&extraction, &config.sentinel_cases);
    fs::write(&output, text).map_err(|e| ReflectError::io(&output, e))?;
    info!(
        path = %output.display(),
        structs = extraction.structs.len(),
        enums = extraction.enums.len(),
        "Generated reflection"
    );

    Ok(FileOutcome::Generated { input: input.to_path_buf(), output, extraction })
}

/// Render what [`generate_file`] would write, touching nothing on disk.
/// `None` when the header has no markers.
pub fn preview_file(input: &Path, config: &ReflectConfig) -> Result<Option<String>> {
    output_path(input, config)?;
    let extraction = read_extraction(input)?;
    if extraction.is_empty() {
        return Ok(None);
    }
    Ok(Some(render_file(&extraction, &config.sentinel_cases)))
}

// ---------------------------------------------------------------------------
// Directory walk
// ---------------------------------------------------------------------------

/// Headers under `root` eligible for generation, sorted by path within each directory.
pub fn collect_headers(root: &Path, config: &ReflectConfig) -> Result<Vec<PathBuf>> {
    let skip = config.skip_dirs.clone();
    let walker = WalkBuilder::new(root)
        .hidden(true)
        .git_ignore(false)
        .git_global(false)
        .git_exclude(false)
        .sort_by_file_name(|a, b| a.cmp(b))
        .filter_entry(move |entry| {
            if entry.file_type().is_some_and(|ft| ft.is_dir()) && entry.depth() > 0 {
                let name = entry.file_name().to_string_lossy();
                return !skip.contains(name.as_ref());
            }
            true
        })
        .build();

    let mut headers = Vec::new();
    for entry in walker {
        let entry =
            entry.map_err(|source| ReflectError::Walk { path: root.to_path_buf(), source })?;
        if !entry.file_type().is_some_and(|ft| ft.is_file()) {
            continue;
        }
        if config.is_input_name(&entry.file_name().to_string_lossy()) {
            headers.push(entry.into_path());
        }
    }
    Ok(headers)
}

/// Run [`generate_file`] on every eligible header under `root`, one at a time.
/// Stops at the first failing file.
pub fn generate_dir(root: &Path, config: &ReflectConfig) -> Result<WalkSummary> {
    let headers = collect_headers(root, config)?;
    info!(root = %root.display(), headers = headers.len(), "Generating reflection");

    let mut summary = WalkSummary::default();
    for header in &headers {
        summary.outcomes.push(generate_file(header, config)?);
    }

    info!(
        generated = summary.generated().count(),
        skipped = summary.skipped().count(),
        "Walk complete"
    );
    Ok(summary)
}
