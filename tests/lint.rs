use devicelint::error::{Diagnostics, FrontendError, LoadError, Severity, SourceFile};
use devicelint::load::{Frontend, load_library, remap_location};
use devicelint::types::Library;
use devicelint::lint;

/// Test front-end: the concatenated manifest + dataset buffer is itself a
/// YAML mapping, so two stanzas concatenate into one parseable library.
struct YamlFrontend;

impl Frontend for YamlFrontend {
    fn parse_and_typecheck(
        &self,
        source: &str,
        _allow_abstract: bool,
    ) -> Result<Library, FrontendError> {
        let value: serde_json::Value =
            serde_saphyr::from_str(source).map_err(|e| FrontendError::Other(e.to_string()))?;
        serde_json::from_value(value).map_err(|e| FrontendError::Other(e.to_string()))
    }
}

/// Test front-end that always reports a syntax error at a fixed location.
struct FailingFrontend {
    line: u32,
}

impl Frontend for FailingFrontend {
    fn parse_and_typecheck(
        &self,
        _source: &str,
        _allow_abstract: bool,
    ) -> Result<Library, FrontendError> {
        Err(FrontendError::Syntax {
            line: self.line,
            column: 1,
            message: "unexpected token".to_string(),
        })
    }
}

const MANIFEST: &str = r#"classes:
  - kind: com.example.foo
    loader: { module: org.thingpedia.v2 }
    config: { module: org.thingpedia.config.none }
    metadata:
      thingpedia_name: Foo
      thingpedia_description: An example device
    annotations:
      license: Apache-2.0
      license_gplcompatible: true
      subcategory: service
    queries:
      get:
        metadata: { canonical: get, confirmation: get things }
        args: [bar]
        arguments:
          bar: { type: string }
"#;

const DATASET: &str = r#"datasets:
  - name: "@com.example.foo"
    language: en
    examples:
      - args: { bar: string }
        invocations: [{ selector: com.example.foo, function: get }]
        utterances: ["get $bar"]
"#;

fn error_messages(report: &devicelint::LintReport) -> Vec<String> {
    report
        .diagnostics
        .iter()
        .filter(|d| d.severity == Severity::Error)
        .map(|d| d.message.clone())
        .collect()
}

// ─── End to end ─────────────────────────────────────────────────────────────

#[test]
fn well_formed_pair_passes_with_no_diagnostics() {
    let report = lint(&YamlFrontend, MANIFEST, DATASET).expect("load should succeed");
    assert!(report.passed());
    assert!(
        report.diagnostics.is_empty(),
        "got: {:?}",
        report.diagnostics
    );
    assert_eq!(report.class.kind, "com.example.foo");
    assert_eq!(report.dataset.name, "@com.example.foo");
}

#[test]
fn dropping_the_placeholder_yields_exactly_one_error() {
    let dataset = DATASET.replace("get $bar", "get");
    let report = lint(&YamlFrontend, MANIFEST, &dataset).expect("load should succeed");
    assert!(!report.passed());
    assert_eq!(
        error_messages(&report),
        vec!["Error in example 1: Missing placeholder for argument bar"]
    );
}

#[test]
fn usage_sets_surface_in_the_report() {
    let manifest = MANIFEST.replace(
        "bar: { type: string }",
        r#"bar:
            type: { entity: "tt:username" }
            annotations: { string_values: "tt:person_first_name" }"#,
    );
    let report = lint(&YamlFrontend, &manifest, DATASET).expect("load should succeed");
    assert!(report.entities.contains("tt:username"));
    assert!(report.string_datasets.contains("tt:person_first_name"));
}

// ─── Library invariants ─────────────────────────────────────────────────────

#[test]
fn more_than_one_class_is_rejected() {
    let manifest = "classes:\n  - kind: com.example.foo\n  - kind: com.example.bar\n";
    let err = lint(&YamlFrontend, manifest, "").expect_err("load should fail");
    match err {
        LoadError::InvalidManifest(message) => {
            assert!(message.contains("exactly one class"), "got: {}", message);
        }
        other => panic!("expected InvalidManifest, got: {:?}", other),
    }
}

#[test]
fn dataset_name_mismatch_is_fatal_but_recoverable() {
    let dataset = DATASET.replace("\"@com.example.foo\"", "\"@com.example.wrong\"");
    let report = lint(&YamlFrontend, MANIFEST, &dataset).expect("load should succeed");
    assert!(!report.passed());
    assert!(
        error_messages(&report)
            .iter()
            .any(|m| m.contains("must contain exactly one dataset")),
        "got: {:?}",
        report.diagnostics
    );
}

#[test]
fn non_english_dataset_is_fatal() {
    let dataset = DATASET.replace("language: en", "language: it");
    let report = lint(&YamlFrontend, MANIFEST, &dataset).expect("load should succeed");
    assert!(
        error_messages(&report)
            .iter()
            .any(|m| m.contains("use `en` as the language tag")),
        "got: {:?}",
        report.diagnostics
    );
}

#[test]
fn missing_dataset_is_synthesized_with_a_warning() {
    let report = lint(&YamlFrontend, MANIFEST, "").expect("load should succeed");
    assert!(report.passed());
    assert_eq!(report.dataset.name, "@com.example.foo");
    assert_eq!(report.dataset.language, "en");
    assert!(report.dataset.examples.is_empty());
    assert!(
        report
            .diagnostics
            .iter()
            .any(|d| d.severity == Severity::Warning && d.message.contains("has no examples")),
        "got: {:?}",
        report.diagnostics
    );
}

// ─── Error-location remapping ───────────────────────────────────────────────

fn eight_line_manifest() -> String {
    (1..=8)
        .map(|i| format!("line {}", i))
        .collect::<Vec<_>>()
        .join("\n")
}

#[test]
fn syntax_error_past_the_boundary_remaps_to_the_dataset() {
    let manifest = eight_line_manifest();
    let err = load_library(
        &FailingFrontend { line: 12 },
        &manifest,
        "datasets: []",
        &mut Diagnostics::new(),
    )
    .expect_err("load should fail");
    assert_eq!(
        err,
        LoadError::Syntax {
            file: SourceFile::Dataset,
            line: 4,
            message: "unexpected token".to_string(),
        }
    );
    assert_eq!(
        err.to_string(),
        "Syntax error in dataset.tt line 4: unexpected token"
    );
}

#[test]
fn syntax_error_before_the_boundary_stays_in_the_manifest() {
    let manifest = eight_line_manifest();
    let err = load_library(
        &FailingFrontend { line: 5 },
        &manifest,
        "datasets: []",
        &mut Diagnostics::new(),
    )
    .expect_err("load should fail");
    assert_eq!(
        err,
        LoadError::Syntax {
            file: SourceFile::Manifest,
            line: 5,
            message: "unexpected token".to_string(),
        }
    );
}

#[test]
fn remap_arithmetic() {
    let manifest = eight_line_manifest();
    assert_eq!(remap_location(&manifest, 3), (SourceFile::Manifest, 3));
    // The injected separator still counts as manifest territory.
    assert_eq!(remap_location(&manifest, 9), (SourceFile::Manifest, 9));
    assert_eq!(remap_location(&manifest, 10), (SourceFile::Dataset, 2));
    assert_eq!(remap_location(&manifest, 12), (SourceFile::Dataset, 4));
}

#[test]
fn non_syntax_frontend_errors_pass_through() {
    struct TypecheckFrontend;
    impl Frontend for TypecheckFrontend {
        fn parse_and_typecheck(
            &self,
            _source: &str,
            _allow_abstract: bool,
        ) -> Result<Library, FrontendError> {
            Err(FrontendError::Other("unknown type Foo".to_string()))
        }
    }
    let err = lint(&TypecheckFrontend, "classes: []", "").expect_err("load should fail");
    assert_eq!(err, LoadError::Frontend("unknown type Foo".to_string()));
}
