//! Rendering of extracted descriptors into generated header text.
//!
//! The output is a list of macro invocations rather than C++ code, so the
//! expansion can change in `reflect.h` without regenerating anything.

use crate::types::{EnumDescriptor, Extraction, SentinelCases, StructDescriptor};

/// Banner at the top of every generated file.
pub const GENERATED_HEADER: &str = "\
// -----------------------------------------------------------
// automatically generated with reflectgen
// don't edit this file directly.
// -----------------------------------------------------------

";

pub fn emit_structs(structs: &[StructDescriptor]) -> String {
    let mut out = String::new();
    for s in structs {
        out.push_str(&format!("REFLECT_IMPL_STRUCT_BEGIN({})\n", s.qualified_name()));
        for field in &s.fields {
            out.push_str(&format!("    REFLECT_IMPL_FIELD({field})\n"));
        }
        out.push_str("REFLECT_IMPL_STRUCT_END\n\n");
    }
    out
}

/// Sentinel cases are left out of the case list.
pub fn emit_enums(enums: &[EnumDescriptor], sentinels: &SentinelCases) -> String {
    let mut out = String::new();
    for e in enums {
        out.push_str(&format!("REFLECT_IMPL_ENUM_BEGIN({})\n", e.qualified_name()));
        for case in e.cases.iter().filter(|c| !sentinels.contains(c)) {
            out.push_str(&format!("    REFLECT_IMPL_CASE({case})\n"));
        }
        out.push_str("REFLECT_IMPL_ENUM_END\n\n");
    }
    out
}

/// All struct blocks, then all enum blocks. No banner.
pub fn emit(extraction: &Extraction, sentinels: &SentinelCases) -> String {
    let mut out = emit_structs(&extraction.structs);
    out.push_str(&emit_enums(&extraction.enums, sentinels));
    out
}

/// Full contents of a generated file.
pub fn render_file(extraction: &Extraction, sentinels: &SentinelCases) -> String {
    let mut out = String::from(GENERATED_HEADER);
    out.push_str(&emit(extraction, sentinels));
    out
}
