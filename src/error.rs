use serde::{Deserialize, Serialize};
use std::fmt;

/// Diagnostic severity level.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Warning,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Warning => f.write_str("WARNING"),
            Severity::Error => f.write_str("ERROR"),
        }
    }
}

/// A single validation finding. Warnings are advisory; errors block publication.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub severity: Severity,
    pub message: String,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.severity, self.message)
    }
}

/// Accumulates warnings and errors for one validation run.
///
/// A fresh collector is constructed per run and threaded through every check,
/// so concurrent or repeated runs in the same process cannot observe each
/// other's state. The run fails iff [`Diagnostics::has_errors`] is true.
#[derive(Clone, Debug, Default)]
pub struct Diagnostics {
    items: Vec<Diagnostic>,
    error_count: usize,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an advisory finding.
    pub fn warn(&mut self, message: impl Into<String>) {
        self.items.push(Diagnostic {
            severity: Severity::Warning,
            message: message.into(),
        });
    }

    /// Record a fatal finding.
    pub fn error(&mut self, message: impl Into<String>) {
        self.error_count += 1;
        self.items.push(Diagnostic {
            severity: Severity::Error,
            message: message.into(),
        });
    }

    pub fn has_errors(&self) -> bool {
        self.error_count > 0
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.items.iter()
    }

    /// Consume the collector, yielding the findings in emission order.
    pub fn into_vec(self) -> Vec<Diagnostic> {
        self.items
    }
}

/// Which of the two author-facing source files a remapped location points at.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceFile {
    Manifest,
    Dataset,
}

impl fmt::Display for SourceFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceFile::Manifest => f.write_str("manifest.tt"),
            SourceFile::Dataset => f.write_str("dataset.tt"),
        }
    }
}

/// Raised by the external parse/typecheck front-end.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FrontendError {
    /// Malformed source text, with a location into the concatenated buffer.
    Syntax {
        line: u32,
        column: u32,
        message: String,
    },
    /// Any other front-end failure (typechecking, unresolved schemas).
    Other(String),
}

impl fmt::Display for FrontendError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FrontendError::Syntax {
                line,
                column,
                message,
            } => write!(f, "{}:{}: {}", line, column, message),
            FrontendError::Other(message) => f.write_str(message),
        }
    }
}

impl std::error::Error for FrontendError {}

/// Produced by `load_library` when no class/dataset pair can be recovered.
///
/// This is the one failure the validator does not record and continue from:
/// without a structured AST there is nothing left to check.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LoadError {
    /// A front-end syntax error, remapped to the author-facing file.
    Syntax {
        file: SourceFile,
        line: u32,
        message: String,
    },
    /// The parsed library did not contain exactly one class.
    InvalidManifest(String),
    /// A non-syntax front-end failure, passed through verbatim.
    Frontend(String),
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadError::Syntax {
                file,
                line,
                message,
            } => write!(f, "Syntax error in {} line {}: {}", file, line, message),
            LoadError::InvalidManifest(message) => write!(f, "Invalid manifest file: {}", message),
            LoadError::Frontend(message) => f.write_str(message),
        }
    }
}

impl std::error::Error for LoadError {}

/// Conversion failure from [`crate::types::Example::to_program`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProgramError {
    pub message: String,
}

impl fmt::Display for ProgramError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for ProgramError {}
