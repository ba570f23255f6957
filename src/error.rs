//! Error types for loading, validating and materializing a project.

use std::fmt;
use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Library-wide error type.
#[derive(Debug, Error)]
pub enum ScaffoldError {
    /// The configuration file does not exist at the resolved location.
    #[error("'{}' not found", .path.display())]
    ConfigNotFound { path: PathBuf },

    /// The configuration file exists but could not be read.
    #[error("Failed to read '{}'", .path.display())]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The configuration file is not valid JSON for the expected schema.
    #[error("Error decoding JSON from '{}': {message}", .path.display())]
    ConfigParse {
        path: PathBuf,
        line: usize,
        column: usize,
        message: String,
    },

    /// The configuration parsed but failed validation.
    #[error("Invalid configuration ({} problem(s)):\n{}", .0.len(), ValidationList(.0))]
    Invalid(Vec<ValidationError>),

    /// The project root is already present on disk.
    #[error("Directory '{}' already exists", .path.display())]
    AlreadyExists { path: PathBuf },

    /// A filesystem operation failed while writing the project tree.
    #[error("Failed to write '{}'", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// A single problem found by the configuration validator.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("missing required field '{field}'")]
    MissingField { field: String },

    #[error("invalid {kind} name '{name}'")]
    InvalidIdentifier { kind: TargetKind, name: String },

    #[error("target name '{name}' is declared more than once")]
    DuplicateName { name: String },

    #[error("unsupported language standard {value:?} for '{field}'")]
    InvalidStandard { field: String, value: String },

    #[error("target '{target}' has no sources")]
    EmptySources { target: String },

    #[error("target '{target}' declares invalid path '{path}'")]
    InvalidPath { target: String, path: String },

    #[error("path '{path}' is generated more than once")]
    DuplicatePath { path: String },

    #[error("path '{path}' is both a file and a directory")]
    PathConflict { path: String },
}

/// What a validated name belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetKind {
    Project,
    Library,
    Executable,
}

impl fmt::Display for TargetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TargetKind::Project => write!(f, "project"),
            TargetKind::Library => write!(f, "library"),
            TargetKind::Executable => write!(f, "executable"),
        }
    }
}

struct ValidationList<'a>(&'a [ValidationError]);

impl fmt::Display for ValidationList<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, issue) in self.0.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "  - {}", issue)?;
        }
        Ok(())
    }
}
