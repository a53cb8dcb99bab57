//! Loading a manifest/dataset pair through the external front-end.
//!
//! The front-end sees the class definition and the dataset concatenated into
//! one buffer; syntax-error locations it reports are remapped back to the
//! author-facing file before surfacing.

use crate::error::{Diagnostics, FrontendError, LoadError, SourceFile};
use crate::policy::DATASET_LANGUAGE;
use crate::types::{ClassDef, Dataset, Library};

/// The external parse/typecheck collaborator.
///
/// Implementations wrap the definition-language parser; the validator only
/// consumes the structured [`Library`] they produce. Whatever schema context
/// typechecking needs lives in the implementor, not in this interface.
pub trait Frontend {
    fn parse_and_typecheck(
        &self,
        source: &str,
        allow_abstract: bool,
    ) -> Result<Library, FrontendError>;
}

/// Translate a line number in the concatenated buffer back to the manifest or
/// dataset file it came from.
///
/// The boundary includes the newline injected between the two sources; the
/// rebasing arithmetic mirrors what the registry backend expects.
pub fn remap_location(manifest_src: &str, reported_line: u32) -> (SourceFile, u32) {
    let boundary = manifest_src.split('\n').count() as u32 + 1;
    if reported_line > boundary {
        (SourceFile::Dataset, reported_line - boundary + 1)
    } else {
        (SourceFile::Manifest, reported_line)
    }
}

/// Parse and typecheck the manifest and dataset sources into a class/dataset
/// pair ready for validation.
///
/// A missing dataset stanza is repaired by synthesizing an empty one named
/// after the class; an empty dataset only warns. Naming and language
/// violations are recorded as errors but do not stop the load, so the caller
/// can still run every remaining check.
pub fn load_library(
    frontend: &dyn Frontend,
    manifest_code: &str,
    dataset_code: &str,
    diags: &mut Diagnostics,
) -> Result<(ClassDef, Dataset), LoadError> {
    let combined = format!("{}\n{}", manifest_code, dataset_code);
    let library = match frontend.parse_and_typecheck(&combined, true) {
        Ok(library) => library,
        Err(FrontendError::Syntax { line, message, .. }) => {
            let (file, line) = remap_location(manifest_code, line);
            return Err(LoadError::Syntax {
                file,
                line,
                message,
            });
        }
        Err(FrontendError::Other(message)) => return Err(LoadError::Frontend(message)),
    };

    let mut classes = library.classes;
    if classes.len() != 1 {
        return Err(LoadError::InvalidManifest(
            "must contain exactly one class, with the same identifier as the device".to_string(),
        ));
    }
    let class = classes.remove(0);

    let expected_name = format!("@{}", class.kind);
    let datasets = library.datasets;
    if datasets.len() > 1
        || datasets
            .first()
            .is_some_and(|dataset| dataset.name != expected_name)
    {
        diags.error(
            "Invalid dataset file: must contain exactly one dataset, with the same identifier as the class",
        );
    }
    if let Some(dataset) = datasets.first()
        && dataset.language != DATASET_LANGUAGE
    {
        diags.error("The dataset must be for English: use `en` as the language tag.");
    }

    let dataset = datasets.into_iter().next().unwrap_or_else(|| Dataset {
        name: expected_name,
        language: DATASET_LANGUAGE.to_string(),
        examples: Vec::new(),
    });
    if dataset.examples.is_empty() {
        diags.warn(format!(
            "Dataset {} has no examples: the device will not be reachable in natural language",
            dataset.name
        ));
    }

    Ok((class, dataset))
}
