// ---------------------------------------------------------------------------
// Header normalization: strip comments and directives, canonicalize spacing
// ---------------------------------------------------------------------------

use crate::error::ParseError;

/// Reduce raw header text to a single canonical line with no comments or
/// preprocessor directives.
///
/// The passes run in a fixed order: directive and comment detection depend on
/// newlines, so whitespace is only flattened once they are gone. Spacing around
/// `{`, `}` and `;` is removed so `struct Foo {` and `struct Foo{` lex the same.
pub fn normalize(raw: &str) -> Result<String, ParseError> {
    let text = strip_preprocessor_directives(raw);
    let text = strip_block_comments(&text)?;
    let text = strip_line_comments(&text);
    let text = text.replace(['\n', '\r', '\t'], " ");
    let text = collapse_spaces(&text);
    let text = strip_unnecessary_spaces(&text);
    Ok(match text.strip_prefix(' ') {
        Some(rest) => rest.to_string(),
        None => text,
    })
}

/// Blank out every line whose first non-blank character is `#`, along with any
/// lines it continues onto with a trailing backslash.
///
/// Directive bytes become spaces rather than being removed, so byte offsets in
/// the result still match the raw header.
fn strip_preprocessor_directives(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut continuing = false;

    for line in text.split_inclusive('\n') {
        let body = line.trim_end_matches(['\n', '\r']);
        let is_directive = continuing || body.trim_start_matches([' ', '\t']).starts_with('#');
        if !is_directive {
            out.push_str(line);
            continue;
        }
        continuing = body.ends_with('\\');
        for ch in line.chars() {
            if ch == '\n' {
                out.push('\n');
            } else {
                out.push_str(&" ".repeat(ch.len_utf8()));
            }
        }
    }

    out
}

/// Remove `/* ... */` spans. The first `*/` after a `/*` closes it.
fn strip_block_comments(text: &str) -> Result<String, ParseError> {
    let mut out = String::with_capacity(text.len());
    let mut pos = 0;

    while let Some(found) = text[pos..].find("/*") {
        let start = pos + found;
        let close = text[start + 2..]
            .find("*/")
            .ok_or(ParseError::UnterminatedComment { offset: start })?;
        out.push_str(&text[pos..start]);
        pos = start + 2 + close + 2;
    }
    out.push_str(&text[pos..]);

    Ok(out)
}

/// Remove `//` comments up to (not including) the end of their line.
fn strip_line_comments(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut pos = 0;

    while let Some(found) = text[pos..].find("//") {
        let start = pos + found;
        out.push_str(&text[pos..start]);
        pos = match text[start..].find('\n') {
            Some(nl) => start + nl,
            None => text.len(),
        };
    }
    out.push_str(&text[pos..]);

    out
}

fn collapse_spaces(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut prev_space = false;
    for ch in text.chars() {
        if ch == ' ' {
            if !prev_space {
                out.push(' ');
            }
            prev_space = true;
        } else {
            out.push(ch);
            prev_space = false;
        }
    }
    out
}

/// `namespace A { struct B {}; }` becomes `namespace A{struct B{};}`.
/// Expects spaces to be collapsed already.
fn strip_unnecessary_spaces(text: &str) -> String {
    text.replace(" {", "{")
        .replace("{ ", "{")
        .replace("} ", "}")
        .replace(" }", "}")
        .replace("; ", ";")
}
