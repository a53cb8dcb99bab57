use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;

use crate::error::ProgramError;

// ─── Annotation values ──────────────────────────────────────────────────────

/// A typed implementation-annotation value (`#[...]` in the definition
/// language). The definition language allows richer values; everything the
/// validator inspects decodes to one of these three.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AnnotationValue {
    Bool(bool),
    Number(f64),
    String(String),
}

impl AnnotationValue {
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            AnnotationValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            AnnotationValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            AnnotationValue::String(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for AnnotationValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnnotationValue::Bool(b) => write!(f, "{}", b),
            AnnotationValue::Number(n) => write!(f, "{}", n),
            AnnotationValue::String(s) => f.write_str(s),
        }
    }
}

// ─── Argument types ─────────────────────────────────────────────────────────

/// Declared argument types, as a closed set.
///
/// The validator only distinguishes strings, entities, and arrays; every
/// other type arrives as `Primitive` carrying its source-language name.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArgType {
    Primitive(String),
    String,
    Entity(String),
    Array(Box<ArgType>),
}

impl ArgType {
    /// Recursively unwrap arrays to their element type.
    pub fn elem(&self) -> &ArgType {
        match self {
            ArgType::Array(inner) => inner.elem(),
            other => other,
        }
    }
}

// ─── Class definitions ──────────────────────────────────────────────────────

/// One formal parameter of a query or action.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ArgumentDef {
    /// Natural-language documentation (`#_[...]`).
    #[serde(default)]
    pub metadata: BTreeMap<String, String>,
    /// Implementation annotations (`#[...]`).
    #[serde(default)]
    pub annotations: BTreeMap<String, AnnotationValue>,
    #[serde(rename = "type")]
    pub arg_type: ArgType,
}

/// A single query or action declared by a class.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FunctionDef {
    #[serde(default)]
    pub metadata: BTreeMap<String, String>,
    #[serde(default)]
    pub annotations: BTreeMap<String, AnnotationValue>,
    #[serde(default)]
    pub is_monitorable: bool,
    /// Argument names in declaration order.
    #[serde(default)]
    pub args: Vec<String>,
    #[serde(default)]
    pub arguments: BTreeMap<String, ArgumentDef>,
}

impl FunctionDef {
    /// Declared type of an argument, if the argument exists.
    pub fn arg_type(&self, name: &str) -> Option<&ArgType> {
        self.arguments.get(name).map(|arg| &arg.arg_type)
    }

    pub fn argument(&self, name: &str) -> Option<&ArgumentDef> {
        self.arguments.get(name)
    }
}

/// Whether a function is invoked for its result or for its effect.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FunctionKind {
    Query,
    Action,
}

impl fmt::Display for FunctionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FunctionKind::Query => f.write_str("query"),
            FunctionKind::Action => f.write_str("action"),
        }
    }
}

/// A loader or config mixin reference.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Mixin {
    pub module: String,
    /// Free-form mixin parameters; not inspected by the validator.
    #[serde(default)]
    pub params: BTreeMap<String, Value>,
}

impl Mixin {
    pub fn new(module: impl Into<String>) -> Self {
        Mixin {
            module: module.into(),
            params: BTreeMap::new(),
        }
    }
}

/// The structured description of one pluggable integration: its callable
/// surface (queries and actions) plus publication metadata.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ClassDef {
    pub kind: String,
    #[serde(default)]
    pub is_abstract: bool,
    #[serde(default)]
    pub metadata: BTreeMap<String, String>,
    #[serde(default)]
    pub annotations: BTreeMap<String, AnnotationValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub loader: Option<Mixin>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config: Option<Mixin>,
    #[serde(default)]
    pub queries: BTreeMap<String, FunctionDef>,
    #[serde(default)]
    pub actions: BTreeMap<String, FunctionDef>,
}

// ─── Datasets ───────────────────────────────────────────────────────────────

/// One invocation primitive inside an example: which device and function the
/// template calls.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvocationPrimitive {
    pub selector: String,
    pub function: String,
}

/// A primitive template: a canonical invocation paired with the
/// natural-language utterances that should trigger it.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Example {
    /// Argument-name to type mapping, inherited from the invoked function.
    #[serde(default)]
    pub args: BTreeMap<String, ArgType>,
    #[serde(default)]
    pub invocations: Vec<InvocationPrimitive>,
    #[serde(default)]
    pub annotations: BTreeMap<String, AnnotationValue>,
    #[serde(default)]
    pub utterances: Vec<String>,
}

impl Example {
    /// Render the canonical machine-readable invocation form.
    ///
    /// Fails when the example declares no invocation primitive, or when a
    /// primitive does not name a function.
    pub fn to_program(&self) -> Result<String, ProgramError> {
        if self.invocations.is_empty() {
            return Err(ProgramError {
                message: "the example has no invocation".to_string(),
            });
        }
        let params: Vec<String> = self
            .args
            .keys()
            .map(|name| format!("{}=${}", name, name))
            .collect();
        let mut stages = Vec::with_capacity(self.invocations.len());
        for prim in &self.invocations {
            if prim.function.is_empty() {
                return Err(ProgramError {
                    message: "an invocation does not name a function".to_string(),
                });
            }
            stages.push(format!(
                "@{}.{}({})",
                prim.selector,
                prim.function,
                params.join(", ")
            ));
        }
        Ok(stages.join(" => "))
    }

    /// Iterate the invocation primitives in declaration order.
    pub fn primitives(&self) -> impl Iterator<Item = &InvocationPrimitive> {
        self.invocations.iter()
    }
}

/// The example templates belonging to one class.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Dataset {
    /// Must be `"@"` followed by the owning class's kind.
    pub name: String,
    pub language: String,
    #[serde(default)]
    pub examples: Vec<Example>,
}

// ─── Library ────────────────────────────────────────────────────────────────

/// The front-end's parse result for one concatenated manifest + dataset
/// buffer: the classes and datasets it contained, in source order.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Library {
    #[serde(default)]
    pub classes: Vec<ClassDef>,
    #[serde(default)]
    pub datasets: Vec<Dataset>,
}
