//! Error types for link extraction and batching, with context and recovery information

use std::error::Error;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors surfaced by the link engine
///
/// Per-entry manifest problems are not errors; see [`crate::parse_wabbajack::SkipReason`].
#[derive(Error, Debug)]
pub enum LinkError {
    /// The manifest bytes could not be decoded or parsed as a document
    #[error("Failed to parse modlist manifest: {message}")]
    ManifestParse {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// The link list has not been written yet
    #[error("Link list '{path}' does not exist")]
    NotFound {
        path: PathBuf,
    },

    /// The modlist file to extract from does not exist
    #[error("Modlist file '{path}' does not exist")]
    ModlistNotFound {
        path: PathBuf,
    },

    /// File system I/O errors with file context
    #[error("File operation failed on '{path}' while {operation}")]
    FileSystem {
        path: PathBuf,
        operation: FileOperation,
        #[source]
        source: std::io::Error,
    },

    /// Permission denied errors with suggestions
    #[error("Permission denied accessing '{path}': {suggestion}")]
    PermissionDenied {
        path: PathBuf,
        operation: FileOperation,
        suggestion: String,
        #[source]
        source: std::io::Error,
    },

    /// The Wabbajack archive could not be opened or lacks the manifest entry
    #[error("Failed to read '{entry}' from archive '{path}'")]
    Archive {
        path: PathBuf,
        entry: String,
        #[source]
        source: zip::result::ZipError,
    },

    /// The consent step refused to replace an existing link list
    #[error("Overwriting '{path}' was declined")]
    OverwriteDeclined {
        path: PathBuf,
    },

    /// Configuration errors
    #[error("Invalid configuration: {message}")]
    Configuration {
        message: String,
        field: Option<String>,
        suggestion: Option<String>,
    },
}

/// Types of file operations for error context
#[derive(Debug, Clone, PartialEq)]
pub enum FileOperation {
    Read,
    Write,
    Create,
    Move,
}

impl std::fmt::Display for FileOperation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FileOperation::Read => write!(f, "reading"),
            FileOperation::Write => write!(f, "writing"),
            FileOperation::Create => write!(f, "creating"),
            FileOperation::Move => write!(f, "moving"),
        }
    }
}

pub type Result<T> = std::result::Result<T, LinkError>;

impl LinkError {
    /// Build a manifest parse error from any underlying cause
    pub fn manifest<E>(message: impl Into<String>, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        LinkError::ManifestParse {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Build a manifest parse error for a document with the wrong shape
    pub fn manifest_shape(message: impl Into<String>) -> Self {
        LinkError::ManifestParse {
            message: message.into(),
            source: None,
        }
    }

    /// Map an I/O error on `path`, splitting out missing files and permission problems
    pub fn io(path: &Path, operation: FileOperation, source: std::io::Error) -> Self {
        match source.kind() {
            std::io::ErrorKind::NotFound if operation == FileOperation::Read => LinkError::NotFound {
                path: path.to_path_buf(),
            },
            std::io::ErrorKind::PermissionDenied => LinkError::PermissionDenied {
                path: path.to_path_buf(),
                suggestion: format!("Check that the current user may {} this file", verb(&operation)),
                operation,
                source,
            },
            _ => LinkError::FileSystem {
                path: path.to_path_buf(),
                operation,
                source,
            },
        }
    }

    /// Map an I/O error while reading the modlist itself
    ///
    /// A missing modlist is reported as such, never as a missing link list.
    pub fn modlist_io(path: &Path, source: std::io::Error) -> Self {
        match source.kind() {
            std::io::ErrorKind::NotFound => LinkError::ModlistNotFound {
                path: path.to_path_buf(),
            },
            _ => LinkError::io(path, FileOperation::Read, source),
        }
    }

    /// Build a configuration error for a named field
    pub fn configuration(field: &str, message: impl Into<String>, suggestion: impl Into<String>) -> Self {
        LinkError::Configuration {
            message: message.into(),
            field: Some(field.to_string()),
            suggestion: Some(suggestion.into()),
        }
    }

    /// Check if the caller can carry on after this error
    pub fn is_recoverable(&self) -> bool {
        match self {
            LinkError::ManifestParse { .. } => true,     // Previous link list is untouched
            LinkError::NotFound { .. } => true,          // Nothing imported yet
            LinkError::ModlistNotFound { .. } => true,   // Pick another file
            LinkError::OverwriteDeclined { .. } => true, // Caller chose to keep the old list
            LinkError::Archive { .. } => true,           // Pick another file
            LinkError::FileSystem { source, .. } => {
                matches!(source.kind(),
                    std::io::ErrorKind::Interrupted |
                    std::io::ErrorKind::TimedOut |
                    std::io::ErrorKind::WouldBlock
                )
            }
            LinkError::PermissionDenied { .. } => false,
            LinkError::Configuration { .. } => false,
        }
    }

    /// Get error category for logging
    pub fn category(&self) -> &'static str {
        match self {
            LinkError::ManifestParse { .. } => "manifest_parse",
            LinkError::NotFound { .. } => "not_found",
            LinkError::ModlistNotFound { .. } => "modlist_not_found",
            LinkError::FileSystem { .. } => "file_system",
            LinkError::PermissionDenied { .. } => "permission_denied",
            LinkError::Archive { .. } => "archive",
            LinkError::OverwriteDeclined { .. } => "overwrite_declined",
            LinkError::Configuration { .. } => "configuration",
        }
    }

    /// Get severity level for error prioritization
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            LinkError::NotFound { .. } => ErrorSeverity::Low,
            LinkError::ModlistNotFound { .. } => ErrorSeverity::Medium,
            LinkError::OverwriteDeclined { .. } => ErrorSeverity::Low,
            LinkError::ManifestParse { .. } => ErrorSeverity::Medium,
            LinkError::Archive { .. } => ErrorSeverity::Medium,
            LinkError::FileSystem { .. } => ErrorSeverity::High,
            LinkError::Configuration { .. } => ErrorSeverity::High,
            LinkError::PermissionDenied { .. } => ErrorSeverity::Critical,
        }
    }

    /// Get user-friendly suggestion for resolving the error
    pub fn suggestion(&self) -> Option<&str> {
        match self {
            LinkError::ManifestParse { .. } => {
                Some("Make sure the file is a Wabbajack modlist or its extracted 'modlist' entry")
            }
            LinkError::NotFound { .. } => Some("Extract a modlist first to create the link list"),
            LinkError::ModlistNotFound { .. } => Some("Check the path to the .wabbajack or modlist file"),
            LinkError::Archive { .. } => Some("Select a valid .wabbajack file"),
            LinkError::PermissionDenied { suggestion, .. } => Some(suggestion),
            LinkError::Configuration { suggestion, .. } => suggestion.as_deref(),
            _ => None,
        }
    }

    /// Create a detailed error report for debugging
    pub fn detailed_report(&self) -> String {
        let mut report = format!("Error: {}\n", self);
        report.push_str(&format!("Category: {}\n", self.category()));
        report.push_str(&format!("Severity: {:?}\n", self.severity()));
        report.push_str(&format!("Recoverable: {}\n", self.is_recoverable()));

        if let Some(suggestion) = self.suggestion() {
            report.push_str(&format!("Suggestion: {}\n", suggestion));
        }

        if let Some(source) = self.source() {
            report.push_str(&format!("Root cause: {}\n", source));
        }

        report
    }
}

fn verb(operation: &FileOperation) -> &'static str {
    match operation {
        FileOperation::Read => "read",
        FileOperation::Write | FileOperation::Create | FileOperation::Move => "write",
    }
}

/// Error severity levels for prioritization
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}
