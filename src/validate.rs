//! Class and dataset validation.
//!
//! Returns **all** errors and warnings, not just the first. Validation does
//! not modify its input: the one repair it performs (synthesizing a default
//! config mixin) lands on the returned copy of the class.

use crate::error::Diagnostics;
use crate::placeholder::{Chunk, split_placeholders};
use crate::policy::{
    ALLOWED_ARG_METADATA, ALLOWED_CLASS_METADATA, ALLOWED_FUNCTION_METADATA,
    DEFAULT_CONFIG_MODULE, PLACEHOLDER_OPTIONS, SUBCATEGORIES,
};
use crate::types::*;
use regex::Regex;
use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::sync::LazyLock;

static BLANKS_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"_{4}").unwrap());

// ─── Class validation ───────────────────────────────────────────────────────

/// A validated class plus the auxiliary registries it references.
#[derive(Clone, Debug)]
pub struct ResolvedDevice {
    /// The class, with a config mixin synthesized if the input had none.
    pub class: ClassDef,
    /// Entity type identifiers referenced by any argument.
    pub entities: BTreeSet<String>,
    /// External string-value dataset identifiers referenced by any argument.
    pub string_datasets: BTreeSet<String>,
}

/// Which optional checks to run during invocation validation.
#[derive(Clone, Copy, Debug)]
pub struct InvocationChecks {
    /// Require `#[poll_interval]` on monitorable queries.
    /// Disabled for abstract classes, which have nothing to poll.
    pub poll_interval: bool,
}

impl Default for InvocationChecks {
    fn default() -> Self {
        InvocationChecks {
            poll_interval: true,
        }
    }
}

/// Validate a class definition: publication metadata, loader/config mixins,
/// and every declared query and action.
pub fn validate_device(class: &ClassDef, diags: &mut Diagnostics) -> ResolvedDevice {
    for key in ["thingpedia_name", "thingpedia_description"] {
        if !class.metadata.contains_key(key) {
            diags.warn(format!("Missing required class annotation #_[{}]", key));
        }
    }

    for annot in ["license", "license_gplcompatible", "subcategory"] {
        let Some(value) = class.annotations.get(annot) else {
            diags.warn(format!("Missing required class annotation #[{}]", annot));
            continue;
        };
        if annot == "subcategory" {
            let known = value
                .as_str()
                .is_some_and(|category| SUBCATEGORIES.contains(&category));
            if !known {
                diags.error(format!("Invalid device category {}", value));
            }
        }
    }

    validate_metadata(&class.metadata, ALLOWED_CLASS_METADATA, diags);

    let mut resolved = class.clone();
    if !class.is_abstract {
        if class.loader.is_none() {
            diags.error("loader mixin missing from class declaration");
        }
        if resolved.config.is_none() {
            resolved.config = Some(Mixin::new(DEFAULT_CONFIG_MODULE));
        }
    }

    let checks = InvocationChecks {
        poll_interval: !class.is_abstract,
    };
    let (entities, string_datasets) = validate_all_invocations(class, checks, diags);

    ResolvedDevice {
        class: resolved,
        entities,
        string_datasets,
    }
}

/// Validate every action and query of a class, collecting the entity types
/// and string-value datasets their arguments reference.
pub fn validate_all_invocations(
    class: &ClassDef,
    checks: InvocationChecks,
    diags: &mut Diagnostics,
) -> (BTreeSet<String>, BTreeSet<String>) {
    let mut entities = BTreeSet::new();
    let mut string_datasets = BTreeSet::new();
    validate_invocations(
        &class.actions,
        FunctionKind::Action,
        checks,
        &mut entities,
        &mut string_datasets,
        diags,
    );
    validate_invocations(
        &class.queries,
        FunctionKind::Query,
        checks,
        &mut entities,
        &mut string_datasets,
        diags,
    );
    (entities, string_datasets)
}

fn validate_invocations(
    functions: &BTreeMap<String, FunctionDef>,
    kind: FunctionKind,
    checks: InvocationChecks,
    entities: &mut BTreeSet<String>,
    string_datasets: &mut BTreeSet<String>,
    diags: &mut Diagnostics,
) {
    for (name, fndef) in functions {
        validate_metadata(&fndef.metadata, ALLOWED_FUNCTION_METADATA, diags);

        if let Some(canonical) = fndef.metadata.get("canonical")
            && canonical.contains('$')
        {
            diags.warn(format!(
                "Detected placeholder in canonical form for {}: this is incorrect, the canonical form must not contain parameters",
                name
            ));
        }
        if !fndef.metadata.contains_key("confirmation") {
            diags.warn(format!("Missing confirmation for {}", name));
        }
        if let Some(confirm) = fndef.annotations.get("confirm")
            && confirm.as_bool().is_none()
        {
            diags.error(format!(
                "Invalid #[confirm] annotation for {}, must be a Boolean",
                name
            ));
        }
        if checks.poll_interval && kind == FunctionKind::Query && fndef.is_monitorable {
            match fndef.annotations.get("poll_interval") {
                None => diags.error(format!(
                    "Missing poll interval for monitorable query {}",
                    name
                )),
                Some(interval) => {
                    if interval.as_number().is_some_and(|n| n < 0.0) {
                        diags.error(format!(
                            "Invalid negative poll interval for monitorable query {}",
                            name
                        ));
                    }
                }
            }
        }

        for argname in &fndef.args {
            let Some(arg) = fndef.argument(argname) else {
                diags.error(format!(
                    "Declared argument {} of {} {} has no definition",
                    argname, kind, name
                ));
                continue;
            };
            validate_metadata(&arg.metadata, ALLOWED_ARG_METADATA, diags);

            let string_values = arg.annotations.get("string_values");
            match arg.arg_type.elem() {
                ArgType::Entity(entity_type) => {
                    entities.insert(entity_type.clone());
                    if let Some(value) = string_values {
                        record_string_values(value, string_datasets, diags);
                    }
                }
                ArgType::String => {
                    if let Some(value) = string_values {
                        record_string_values(value, string_datasets, diags);
                    }
                }
                _ => {
                    if string_values.is_some() {
                        diags.error(
                            "The string_values annotation is valid only for String-typed parameters",
                        );
                    }
                }
            }
        }
    }
}

fn record_string_values(
    value: &AnnotationValue,
    string_datasets: &mut BTreeSet<String>,
    diags: &mut Diagnostics,
) {
    match value.as_str() {
        Some(id) => {
            string_datasets.insert(id.to_string());
        }
        None => diags.error("Invalid #[string_values] annotation, must be a string"),
    }
}

fn validate_metadata(
    metadata: &BTreeMap<String, String>,
    allowed: &[&str],
    diags: &mut Diagnostics,
) {
    for key in metadata.keys() {
        if !allowed.contains(&key.as_str()) {
            diags.warn(format!("Invalid natural language annotation {}", key));
        }
    }
}

// ─── Dataset validation ─────────────────────────────────────────────────────

/// Validate every example of a dataset against the owning class's identifier.
///
/// Examples are independent: a failure in one is recorded against its 1-based
/// index and checking continues with the next.
pub fn validate_dataset(dataset: &Dataset, kind: &str, diags: &mut Diagnostics) {
    let mut names = HashSet::new();
    for (i, example) in dataset.examples.iter().enumerate() {
        let index = i + 1;
        if let Err(message) = validate_example(example, index, kind, &mut names, diags) {
            diags.error(format!("Error in example {}: {}", index, message));
        }
    }
}

fn validate_example(
    example: &Example,
    index: usize,
    kind: &str,
    names: &mut HashSet<String>,
    diags: &mut Diagnostics,
) -> Result<(), String> {
    example.to_program().map_err(|e| e.to_string())?;

    let found_our_device = example.primitives().any(|prim| prim.selector == kind);
    if !found_our_device {
        diags.warn(format!(
            "Example {} does not use any function from this device",
            index
        ));
    }

    if example.utterances.is_empty() {
        if example.annotations.contains_key("utterances") {
            return Err(
                "utterances must be a natural language annotation (with #_[]), not an implementation annotation"
                    .to_string(),
            );
        }
        return Err("missing utterances annotation".to_string());
    }

    if let Some(value) = example.annotations.get("name") {
        let Some(name) = value.as_str() else {
            return Err("invalid #[name] annotation (must be a string)".to_string());
        };
        if name.len() > 128 {
            return Err("the #[name] annotation must be at most 128 characters".to_string());
        }
        if !names.insert(name.to_string()) {
            return Err("duplicate name".to_string());
        }
    }

    let mut placeholders = HashSet::new();
    for utterance in &example.utterances {
        scan_utterance(utterance, &example.args, &mut placeholders)?;
    }
    // Coverage is per example: each argument must appear in at least one
    // utterance, not in every utterance.
    for arg in example.args.keys() {
        if !placeholders.contains(arg.as_str()) {
            return Err(format!("Missing placeholder for argument {}", arg));
        }
    }

    Ok(())
}

fn scan_utterance(
    utterance: &str,
    args: &BTreeMap<String, ArgType>,
    placeholders: &mut HashSet<String>,
) -> Result<(), String> {
    if BLANKS_RE.is_match(utterance) {
        return Err(
            "Do not use blanks (4 underscores or more) in utterance, use placeholders".to_string(),
        );
    }

    for chunk in split_placeholders(utterance.trim()) {
        match chunk {
            Chunk::Literal(_) | Chunk::Escape => {}
            Chunk::Placeholder { name, option } => {
                if !args.contains_key(&name) {
                    return Err(format!("Invalid placeholder {}", name));
                }
                if let Some(opt) = &option
                    && !PLACEHOLDER_OPTIONS.contains(&opt.as_str())
                {
                    return Err(format!("Invalid placeholder option {} for {}", opt, name));
                }
                placeholders.insert(name);
            }
        }
    }

    Ok(())
}
