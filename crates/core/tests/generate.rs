//! Integration tests for single-file and directory generation.
//!
//! Each test copies a fixture include tree into a temp dir and runs the
//! generator against it on disk.

mod helpers;

use helpers::Fixture;
use reflectgen_core::types::{FileOutcome, ReflectConfig, SentinelCases};
use reflectgen_core::{
    generate_dir, generate_file, load_reflect_config, preview_file, ParseError, ReflectError,
    CONFIG_FILE_NAME,
};

const TRACKING_GENERATED: &str = "\
// -----------------------------------------------------------
// automatically generated with reflectgen
// don't edit this file directly.
// -----------------------------------------------------------

REFLECT_IMPL_STRUCT_BEGIN(data::tracking::Framerate)
    REFLECT_IMPL_FIELD(numerator)
    REFLECT_IMPL_FIELD(denominator)
REFLECT_IMPL_STRUCT_END

REFLECT_IMPL_STRUCT_BEGIN(data::tracking::SourceSettings)
    REFLECT_IMPL_FIELD(mode)
    REFLECT_IMPL_FIELD(framerate)
    REFLECT_IMPL_FIELD(max_frames)
REFLECT_IMPL_STRUCT_END

REFLECT_IMPL_STRUCT_BEGIN(data::Endpoint)
    REFLECT_IMPL_FIELD(address)
    REFLECT_IMPL_FIELD(port)
REFLECT_IMPL_STRUCT_END

REFLECT_IMPL_ENUM_BEGIN(data::tracking::SourceMode)
    REFLECT_IMPL_CASE(EngineTime)
    REFLECT_IMPL_CASE(Latest)
    REFLECT_IMPL_CASE(Timecode)
REFLECT_IMPL_ENUM_END

";

// ---------------------------------------------------------------------------
// Single file
// ---------------------------------------------------------------------------

#[test]
fn test_generate_file_writes_expected_output() {
    let f = Fixture::new("basic");
    let outcome = generate_file(&f.path("include/data/tracking.h"), &ReflectConfig::default())
        .expect("generation failed");

    match &outcome {
        FileOutcome::Generated { output, extraction, .. } => {
            assert_eq!(output, &f.path("include/data/tracking_generated.h"));
            assert_eq!(extraction.structs.len(), 3);
            assert_eq!(extraction.enums.len(), 1);
        }
        other => panic!("expected Generated, got {other:?}"),
    }
    assert_eq!(f.read("include/data/tracking_generated.h"), TRACKING_GENERATED);
}

#[test]
fn test_generate_file_parse_error_header() {
    let f = Fixture::new("basic");
    generate_file(&f.path("include/data/parse_error.h"), &ReflectConfig::default()).unwrap();
    let text = f.read("include/data/parse_error_generated.h");

    assert!(text.contains(
        "REFLECT_IMPL_STRUCT_BEGIN(data::ParseError)\n    REFLECT_IMPL_FIELD(code)\n    REFLECT_IMPL_FIELD(containing_object)\n    REFLECT_IMPL_FIELD(value)\n    REFLECT_IMPL_FIELD(message)\nREFLECT_IMPL_STRUCT_END\n"
    ), "got:\n{text}");
    assert!(text.contains(
        "REFLECT_IMPL_ENUM_BEGIN(data::ParseErrorCode)\n    REFLECT_IMPL_CASE(InternalError)\n    REFLECT_IMPL_CASE(InvalidJson)\n    REFLECT_IMPL_CASE(InvalidValue)\n    REFLECT_IMPL_CASE(InvalidField)\nREFLECT_IMPL_ENUM_END\n"
    ), "got:\n{text}");
    assert!(!text.contains("CASE(Invalid)"), "sentinel leaked:\n{text}");
    assert!(!text.contains("CASE(Count)"), "sentinel leaked:\n{text}");
}

#[test]
fn test_generate_file_is_idempotent() {
    let f = Fixture::new("basic");
    let input = f.path("include/data/tracking.h");
    let config = ReflectConfig::default();

    generate_file(&input, &config).unwrap();
    let first = f.read("include/data/tracking_generated.h");
    std::fs::remove_file(f.path("include/data/tracking_generated.h")).unwrap();
    generate_file(&input, &config).unwrap();
    let second = f.read("include/data/tracking_generated.h");

    assert_eq!(first, second);
}

#[test]
fn test_regenerating_overwrites_existing_output() {
    let f = Fixture::new("basic");
    let stale = f.write("include/data/tracking_generated.h", "stale contents\n");
    generate_file(&f.path("include/data/tracking.h"), &ReflectConfig::default()).unwrap();
    assert_eq!(std::fs::read_to_string(stale).unwrap(), TRACKING_GENERATED);
}

#[test]
fn test_no_markers_skips_and_removes_stale_output() {
    let f = Fixture::new("basic");
    let stale = f.write("include/data/plain_generated.h", "REFLECT_IMPL_STRUCT_BEGIN(Old)\n");

    let outcome = generate_file(&f.path("include/data/plain.h"), &ReflectConfig::default()).unwrap();

    assert!(matches!(outcome, FileOutcome::Skipped { .. }), "got {outcome:?}");
    assert!(!stale.exists(), "stale generated file should have been removed");
}

#[test]
fn test_wrong_extension_is_rejected() {
    let f = Fixture::new("basic");
    let err = generate_file(&f.path("include/data/notes.hpp"), &ReflectConfig::default())
        .unwrap_err();
    assert!(matches!(err, ReflectError::WrongExtension { .. }), "got {err:?}");
    assert!(err.to_string().contains("'.h'"), "got: {err}");
}

#[test]
fn test_missing_input_is_rejected_and_output_removed() {
    let f = Fixture::empty();
    let stale = f.write("gone_generated.h", "old\n");
    let err = generate_file(&f.path("gone.h"), &ReflectConfig::default()).unwrap_err();
    assert!(matches!(err, ReflectError::InputNotFound(_)), "got {err:?}");
    assert!(!stale.exists(), "output is deleted before the input is checked");
}

#[test]
fn test_malformed_header_names_file_and_offset() {
    let f = Fixture::new("malformed");
    let input = f.path("unbalanced.h");
    let err = generate_file(&input, &ReflectConfig::default()).unwrap_err();

    match &err {
        ReflectError::Parse { path, source } => {
            assert_eq!(path, &input);
            assert!(matches!(source, ParseError::UnterminatedScope { offset: 16 }), "got {source:?}");
        }
        other => panic!("expected Parse error, got {other:?}"),
    }
    assert!(err.to_string().contains("unbalanced.h"), "got: {err}");
    assert!(!f.path("unbalanced_generated.h").exists());
}

#[test]
fn test_unterminated_comment_is_a_parse_error() {
    let f = Fixture::empty();
    let input = f.write("bad.h", "REFLECT_STRUCT struct A { int REFLECT(a); };\n/* oops\n");
    let err = generate_file(&input, &ReflectConfig::default()).unwrap_err();
    assert!(
        matches!(err, ReflectError::Parse { source: ParseError::UnterminatedComment { .. }, .. }),
        "got {err:?}"
    );
}

#[test]
fn test_preview_does_not_touch_disk() {
    let f = Fixture::new("basic");
    let text = preview_file(&f.path("include/data/tracking.h"), &ReflectConfig::default())
        .unwrap()
        .expect("tracking.h has markers");
    assert_eq!(text, TRACKING_GENERATED);
    assert!(!f.path("include/data/tracking_generated.h").exists());

    let none = preview_file(&f.path("include/data/plain.h"), &ReflectConfig::default()).unwrap();
    assert!(none.is_none());
}

#[test]
fn test_custom_sentinels_from_config() {
    let f = Fixture::new("basic");
    let config = ReflectConfig {
        sentinel_cases: SentinelCases::new(["Latest"]),
        ..ReflectConfig::default()
    };
    generate_file(&f.path("include/data/tracking.h"), &config).unwrap();
    let text = f.read("include/data/tracking_generated.h");
    assert!(text.contains("REFLECT_IMPL_CASE(Invalid)"), "got:\n{text}");
    assert!(text.contains("REFLECT_IMPL_CASE(Count)"), "got:\n{text}");
    assert!(!text.contains("REFLECT_IMPL_CASE(Latest)"), "got:\n{text}");
}

// ---------------------------------------------------------------------------
// Directory walk
// ---------------------------------------------------------------------------

#[test]
fn test_generate_dir_processes_eligible_headers() {
    let f = Fixture::new("basic");
    let summary = generate_dir(&f.root, &ReflectConfig::default()).expect("walk failed");

    let inputs: Vec<String> = summary
        .outcomes
        .iter()
        .map(|o| o.input().file_name().unwrap().to_string_lossy().to_string())
        .collect();
    assert_eq!(inputs, vec!["parse_error.h", "plain.h", "tracking.h"]);
    assert_eq!(summary.generated().count(), 2);
    assert_eq!(summary.skipped().count(), 1);

    assert!(f.path("include/data/parse_error_generated.h").exists());
    assert!(f.path("include/data/tracking_generated.h").exists());
    assert!(!f.path("include/data/plain_generated.h").exists());
    // Generated files, other extensions and skipped dirs are never inputs
    assert!(!f.path("include/data/legacy_generated_generated.h").exists());
    assert!(!f.path("include/data/notes_generated.hpp").exists());
    assert!(!f.path("include/build/skipped_generated.h").exists());
}

#[test]
fn test_generate_dir_twice_does_not_reprocess_outputs() {
    let f = Fixture::new("basic");
    let config = ReflectConfig::default();
    let first = generate_dir(&f.root, &config).unwrap();
    let second = generate_dir(&f.root, &config).unwrap();
    assert_eq!(first.outcomes.len(), second.outcomes.len());
    assert!(!f.path("include/data/tracking_generated_generated.h").exists());
}

#[test]
fn test_generate_dir_stops_at_first_failure() {
    let f = Fixture::new("malformed");
    let err = generate_dir(&f.root, &ReflectConfig::default()).unwrap_err();
    assert!(matches!(err, ReflectError::Parse { .. }), "got {err:?}");
    // fine.h sorts before unbalanced.h and was already written
    assert!(f.path("fine_generated.h").exists());
}

#[test]
fn test_config_file_changes_walk() {
    let f = Fixture::new("basic");
    f.write(CONFIG_FILE_NAME, "skip_dirs = [\"data\"]\n");
    let config = load_reflect_config(&f.root);

    let summary = generate_dir(&f.root, &config).unwrap();
    assert!(summary.outcomes.is_empty(), "data/ and build/ are both skipped");
}
