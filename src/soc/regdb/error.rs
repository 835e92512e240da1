use std::fmt;
use std::path::PathBuf;

/// Position inside a schema file, rendered as `file:line:column`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceLocation {
    pub file: PathBuf,
    pub line: u32,
    pub column: u32,
}

impl SourceLocation {
    pub fn new(file: impl Into<PathBuf>, line: u32, column: u32) -> Self {
        Self {
            file: file.into(),
            line,
            column,
        }
    }
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.file.display(), self.line, self.column)
    }
}

/// Represents any failure that can occur while loading a register schema. All of them are fatal:
/// no partially built database is handed back.
#[derive(Debug, thiserror::Error)]
pub enum SchemaError {
    #[error("failed to read schema file {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("{location}: malformed XML: {message}")]
    Xml {
        location: SourceLocation,
        message: String,
    },
    #[error("{location}: <{element}> is missing required attribute '{attribute}'")]
    MissingAttribute {
        location: SourceLocation,
        element: String,
        attribute: String,
    },
    #[error("{location}: invalid integer '{text}' for attribute '{attribute}': {reason}")]
    InvalidInteger {
        location: SourceLocation,
        attribute: String,
        text: String,
        reason: &'static str,
    },
    #[error("{location}: unknown varset enum '{name}'")]
    UnknownVarset { location: SourceLocation, name: String },
    #[error("{location}: variant '{variant}' is not a member of varset '{varset}'")]
    UnknownVariant {
        location: SourceLocation,
        variant: String,
        varset: String,
    },
    #[error("{location}: variants '{variants}' used without an active varset")]
    MissingVarset {
        location: SourceLocation,
        variants: String,
    },
    #[error("{location}: bitfield '{field}': {reason}")]
    FieldRange {
        location: SourceLocation,
        field: String,
        reason: String,
    },
}

impl SchemaError {
    pub fn location(&self) -> Option<&SourceLocation> {
        match self {
            SchemaError::Io { .. } => None,
            SchemaError::Xml { location, .. }
            | SchemaError::MissingAttribute { location, .. }
            | SchemaError::InvalidInteger { location, .. }
            | SchemaError::UnknownVarset { location, .. }
            | SchemaError::UnknownVariant { location, .. }
            | SchemaError::MissingVarset { location, .. }
            | SchemaError::FieldRange { location, .. } => Some(location),
        }
    }
}
