// ---------------------------------------------------------------------------
// Marker extraction: reflected structs, their fields, reflected enums
// ---------------------------------------------------------------------------

use crate::error::ParseError;
use crate::lexer::{Cursor, TokenKind, TokenStream};
use crate::scope::ScopeTree;
use crate::types::{EnumDescriptor, Extraction, StructDescriptor};
use tracing::debug;

/// Marks a struct or class for reflection.
pub const STRUCT_MARKER: &str = "REFLECT_STRUCT";
/// Marks an `enum class` for reflection.
pub const ENUM_MARKER: &str = "REFLECT_ENUM";
/// Wraps a field name: `int REFLECT(count);`
pub const FIELD_MARKER: &str = "REFLECT";

/// Run both extractors over one tokenized header.
pub fn extract(stream: &TokenStream, scopes: &ScopeTree) -> Result<Extraction, ParseError> {
    Ok(Extraction {
        structs: extract_structs(stream, scopes)?,
        enums: extract_enums(stream, scopes)?,
    })
}

/// The part of a declaration before its body.
struct DeclarationHead {
    /// Token index where the (possibly qualified) name starts
    name_start: usize,
    name: String,
    /// Token index of the body's `{`
    open: usize,
}

/// Every `REFLECT_STRUCT`-marked struct or class, in marker order.
///
/// The marker may precede the keyword (`REFLECT_STRUCT struct Foo{`) or sit
/// between keyword and name (`struct REFLECT_STRUCT Foo{`). The qualifier is
/// resolved at the declared name.
pub fn extract_structs(
    stream: &TokenStream,
    scopes: &ScopeTree,
) -> Result<Vec<StructDescriptor>, ParseError> {
    let mut cursor = Cursor::new(stream);
    let mut structs = Vec::new();

    while let Some(marker) = cursor.next_ident(STRUCT_MARKER) {
        let keyword = struct_keyword(stream, marker)?;
        let head = declaration_head(stream, marker, STRUCT_MARKER, keyword + 1)?;
        let close = body_close(stream, head.open)?;
        let qualifier = scopes.qualifier_at(stream.offset(head.name_start));
        let fields = collect_fields(stream, head.open, close)?;

        debug!(
            name = head.name.as_str(),
            qualifier = qualifier.as_str(),
            fields = fields.len(),
            "Reflected struct"
        );
        structs.push(StructDescriptor { name: head.name, qualifier, fields });

        // Resume inside the body so nested reflected structs are found too.
        cursor.advance_to(head.open + 1);
    }

    Ok(structs)
}

/// Every `REFLECT_ENUM`-marked `enum class`, in marker order.
///
/// Unlike structs, the qualifier is resolved at the marker.
pub fn extract_enums(
    stream: &TokenStream,
    scopes: &ScopeTree,
) -> Result<Vec<EnumDescriptor>, ParseError> {
    let mut cursor = Cursor::new(stream);
    let mut enums = Vec::new();

    while let Some(marker) = cursor.next_ident(ENUM_MARKER) {
        let name_from = enum_keyword_end(stream, marker)?;
        let head = declaration_head(stream, marker, ENUM_MARKER, name_from)?;
        let close = body_close(stream, head.open)?;
        let qualifier = scopes.qualifier_at(stream.offset(marker));
        let cases = collect_cases(stream, head.open, close);

        debug!(
            name = head.name.as_str(),
            qualifier = qualifier.as_str(),
            cases = cases.len(),
            "Reflected enum"
        );
        enums.push(EnumDescriptor { name: head.name, qualifier, cases });

        cursor.advance_to(head.open + 1);
    }

    Ok(enums)
}

fn ends_head(stream: &TokenStream, idx: usize) -> bool {
    stream.is_punct(idx, '{') || stream.is_punct(idx, ';') || stream.is_punct(idx, '}')
}

fn is_struct_keyword(stream: &TokenStream, idx: usize) -> bool {
    let keyword = stream.is_ident(idx, "struct") || stream.is_ident(idx, "class");
    keyword && !(idx > 0 && stream.is_ident(idx - 1, "enum"))
}

/// Token index of the `struct`/`class` keyword a struct marker belongs to.
fn struct_keyword(stream: &TokenStream, marker: usize) -> Result<usize, ParseError> {
    if marker > 0 && is_struct_keyword(stream, marker - 1) {
        return Ok(marker - 1);
    }
    (marker + 1..stream.len())
        .take_while(|&i| !ends_head(stream, i))
        .find(|&i| is_struct_keyword(stream, i))
        .ok_or(ParseError::MissingKeyword {
            marker: STRUCT_MARKER,
            expected: "struct",
            offset: stream.offset(marker),
        })
}

fn is_enum_keyword(stream: &TokenStream, idx: usize) -> bool {
    stream.is_ident(idx, "enum")
        && (stream.is_ident(idx + 1, "class") || stream.is_ident(idx + 1, "struct"))
}

/// Token index right after the `enum class` an enum marker belongs to.
fn enum_keyword_end(stream: &TokenStream, marker: usize) -> Result<usize, ParseError> {
    if marker >= 2 && is_enum_keyword(stream, marker - 2) {
        return Ok(marker + 1);
    }
    (marker + 1..stream.len())
        .take_while(|&i| !ends_head(stream, i))
        .find(|&i| is_enum_keyword(stream, i))
        .map(|i| i + 2)
        .ok_or(ParseError::MissingKeyword {
            marker: ENUM_MARKER,
            expected: "enum class",
            offset: stream.offset(marker),
        })
}

/// Find the body brace and declared name of the declaration starting at `from`.
///
/// The name is the trailing `a::b::Name` before the body or before a base /
/// underlying-type clause. Markers and `final` in that position are skipped, so
/// export macros or attributes ahead of the name do not leak into it.
fn declaration_head(
    stream: &TokenStream,
    marker: usize,
    marker_name: &'static str,
    from: usize,
) -> Result<DeclarationHead, ParseError> {
    let open = (from..stream.len())
        .find(|&i| ends_head(stream, i))
        .filter(|&i| stream.is_punct(i, '{'))
        .ok_or(ParseError::MissingDelimiter {
            marker: marker_name,
            expected: '{',
            offset: stream.offset(marker),
        })?;

    let clause = stream.find_punct(from, open, ':').unwrap_or(open);
    let mut end = clause;
    while end > from && (stream.is_ident(end - 1, "final") || stream.is_ident(end - 1, marker_name))
    {
        end -= 1;
    }

    let is_word = |i: usize| stream.token(i).is_some_and(|t| t.kind == TokenKind::Ident);
    let is_sep = |i: usize| stream.token(i).is_some_and(|t| t.kind == TokenKind::PathSep);

    if end == from || !is_word(end - 1) {
        return Err(ParseError::MissingName { marker: marker_name, offset: stream.offset(marker) });
    }
    let mut start = end - 1;
    while start >= from + 2 && is_sep(start - 1) && is_word(start - 2) {
        start -= 2;
    }

    let name: String = (start..end).map(|i| stream.text(i)).collect();
    Ok(DeclarationHead { name_start: start, name, open })
}

fn body_close(stream: &TokenStream, open: usize) -> Result<usize, ParseError> {
    stream.closer(open).ok_or(ParseError::UnterminatedScope { offset: stream.offset(open) })
}

/// `REFLECT(name)` markers between `open` and `close`, in order. Nested blocks
/// are searched too, so markers inside a nested type also count as fields of
/// the enclosing struct.
fn collect_fields(
    stream: &TokenStream,
    open: usize,
    close: usize,
) -> Result<Vec<String>, ParseError> {
    let mut fields = Vec::new();
    let mut idx = open + 1;

    while let Some(marker) = stream.find_ident(idx, close, FIELD_MARKER) {
        if !stream.is_punct(marker + 1, '(') {
            idx = marker + 1;
            continue;
        }
        let rparen = stream.find_punct(marker + 2, close, ')').ok_or(
            ParseError::MissingDelimiter {
                marker: FIELD_MARKER,
                expected: ')',
                offset: stream.offset(marker),
            },
        )?;
        fields.push(stream.text_between(marker + 2, rparen).trim().to_string());
        idx = rparen + 1;
    }

    Ok(fields)
}

/// Case names between `open` and `close`, split on top-level commas.
/// Initializers (`= 4`) and spaces are dropped, as are empty pieces left by a
/// trailing comma.
fn collect_cases(stream: &TokenStream, open: usize, close: usize) -> Vec<String> {
    let mut cases = Vec::new();
    let mut depth = 0usize;
    let mut piece_start = open + 1;
    let mut piece_end: Option<usize> = None;

    for idx in open + 1..=close {
        let at_end = idx == close;
        if !at_end {
            match stream.token(idx).map(|t| t.kind) {
                Some(TokenKind::Punct('(' | '{' | '[')) => depth += 1,
                Some(TokenKind::Punct(')' | '}' | ']')) => depth = depth.saturating_sub(1),
                Some(TokenKind::Punct('=')) if depth == 0 && piece_end.is_none() => {
                    piece_end = Some(idx);
                }
                _ => {}
            }
        }

        if at_end || (depth == 0 && stream.is_punct(idx, ',')) {
            let end = piece_end.take().unwrap_or(idx);
            let case = stream.text_between(piece_start, end).replace(' ', "");
            if !case.is_empty() {
                cases.push(case);
            }
            piece_start = idx + 1;
        }
    }

    cases
}
