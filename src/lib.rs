//! Validation engine for device class manifests and primitive template
//! datasets.
//!
//! A *class manifest* declares the callable surface of one pluggable
//! integration (its queries and actions plus publication metadata); a
//! *dataset* pairs canonical invocations of those functions with the
//! natural-language utterances that should trigger them. This crate checks
//! both before the artifact is published to a shared registry:
//!
//! ```text
//! load_library(frontend, manifest, dataset)
//!     → (ClassDef, Dataset)
//!     → validate_device(class)          → entity/string usage + diagnostics
//!     → validate_dataset(dataset, kind) → per-example diagnostics
//! ```
//!
//! Parsing and typechecking the definition language are not part of this
//! crate: a [`Frontend`] implementation supplies the structured [`Library`]
//! and the validator walks it. Every finding lands in a [`Diagnostics`]
//! collector; warnings are advisory, errors block publication, and the run
//! passes iff no error was recorded. The only failure that aborts a run is a
//! front-end syntax error, re-raised after its location is remapped to the
//! author-facing file.
//!
//! # Quick start
//!
//! The front-end below hands back a pre-parsed [`Library`] from JSON; a real
//! deployment wraps the definition-language parser instead.
//!
//! ```rust
//! use devicelint::{Frontend, FrontendError, Library, lint};
//!
//! struct JsonFrontend;
//!
//! impl Frontend for JsonFrontend {
//!     fn parse_and_typecheck(
//!         &self,
//!         source: &str,
//!         _allow_abstract: bool,
//!     ) -> Result<Library, FrontendError> {
//!         serde_json::from_str(source).map_err(|e| FrontendError::Other(e.to_string()))
//!     }
//! }
//!
//! let manifest = r#"{
//!   "classes": [{
//!     "kind": "com.example.foo",
//!     "loader": { "module": "org.thingpedia.v2" },
//!     "queries": {
//!       "get": {
//!         "metadata": { "canonical": "get", "confirmation": "get things" },
//!         "args": ["bar"],
//!         "arguments": { "bar": { "type": "string" } }
//!       }
//!     }
//!   }],
//!   "datasets": [{
//!     "name": "@com.example.foo",
//!     "language": "en",
//!     "examples": [{
//!       "args": { "bar": "string" },
//!       "invocations": [{ "selector": "com.example.foo", "function": "get" }],
//!       "utterances": ["get $bar"]
//!     }]
//!   }]
//! }"#;
//!
//! let report = lint(&JsonFrontend, manifest, "").expect("parse should succeed");
//! assert!(report.passed());
//! ```

pub mod error;
pub mod load;
pub mod placeholder;
pub mod policy;
pub mod types;
pub mod validate;

pub use error::*;
pub use types::*;

// Re-export entry-point functions at the crate root for convenience.
pub use load::{Frontend, load_library, remap_location};
pub use validate::{
    InvocationChecks, ResolvedDevice, validate_all_invocations, validate_dataset, validate_device,
};

use std::collections::BTreeSet;

/// Result of the [`lint`] convenience entry point.
#[derive(Clone, Debug)]
pub struct LintReport {
    /// The class, fully resolved (config mixin synthesized if absent).
    pub class: ClassDef,
    pub dataset: Dataset,
    /// Entity type identifiers referenced by the class's arguments.
    pub entities: BTreeSet<String>,
    /// External string-value dataset identifiers referenced.
    pub string_datasets: BTreeSet<String>,
    /// Every finding, in emission order.
    pub diagnostics: Vec<Diagnostic>,
}

impl LintReport {
    /// True iff no error-severity diagnostic was recorded.
    pub fn passed(&self) -> bool {
        self.diagnostics
            .iter()
            .all(|d| d.severity != Severity::Error)
    }
}

/// Convenience entry point composing load → validate class → validate dataset.
///
/// # Errors
///
/// Returns `Err(LoadError)` only when no structured AST could be recovered
/// (front-end syntax error, or not exactly one class). All validation
/// findings are collected into the report instead.
pub fn lint(
    frontend: &dyn Frontend,
    manifest_code: &str,
    dataset_code: &str,
) -> Result<LintReport, LoadError> {
    let mut diags = Diagnostics::new();
    let (class, dataset) = load_library(frontend, manifest_code, dataset_code, &mut diags)?;

    let resolved = validate_device(&class, &mut diags);
    validate_dataset(&dataset, &class.kind, &mut diags);

    Ok(LintReport {
        class: resolved.class,
        dataset,
        entities: resolved.entities,
        string_datasets: resolved.string_datasets,
        diagnostics: diags.into_vec(),
    })
}
