//! # Error Handling
//!
//! Error types for the site asset tools. Every variant carries an [`ErrorContext`]
//! with the operation being performed, free-form context, a recovery suggestion and
//! a severity. `Display` prefixes the operation and appends the context, so the
//! messages recorded in reports name the job or image they came from.
//!
//! Per-item failures (one crop job, one classified image) are always caught by the
//! batch runners and recorded; only configuration and run-level I/O errors end a run.
//!
//! ## Usage
//!
//! ```rust
//! use site_assets::error::{AssetError, HasRecoverySuggestion};
//!
//! let error = AssetError::geometry("app-map.jpg", "crop rectangle exceeds image bounds")
//!     .with_context("cropping feature card")
//!     .with_recovery_suggestion("Check the crop table against the screenshot size");
//!
//! assert_eq!(error.category(), "geometry");
//! assert!(error.recovery_suggestion().is_some());
//! ```

use std::{error::Error as StdError, fmt, path::Path};

use crate::config::ConfigViolation;

/// Severity levels for errors
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    /// Errors that fail the current item but not the batch
    Error,
    /// Errors that end the whole run
    Fatal,
}

/// Metadata about where an error occurred
#[derive(Debug, Clone)]
pub struct ErrorContext {
    /// The operation being performed when the error occurred
    pub operation: Option<String>,
    /// Additional context about the error
    pub context: Option<String>,
    /// Suggested recovery action
    pub recovery_suggestion: Option<String>,
    /// Error severity level
    pub severity: ErrorSeverity,
}

impl Default for ErrorContext {
    fn default() -> Self {
        Self {
            operation: None,
            context: None,
            recovery_suggestion: None,
            severity: ErrorSeverity::Error,
        }
    }
}

impl ErrorContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_severity(mut self, severity: ErrorSeverity) -> Self {
        self.severity = severity;
        self
    }
}

/// Base error type for the site asset tools
#[derive(Debug)]
pub enum AssetError {
    /// Configuration validation errors
    Config {
        field: String,
        value: String,
        reason: String,
        context: ErrorContext,
    },
    /// I/O errors
    Io {
        operation: String,
        path: Option<String>,
        source: std::io::Error,
        context: ErrorContext,
    },
    /// Image decode/encode failures
    Codec {
        path: String,
        source: image::ImageError,
        context: ErrorContext,
    },
    /// Crop rectangles or buffers that do not match the image
    Geometry {
        subject: String,
        reason: String,
        context: ErrorContext,
    },
    /// Vision classifier failures (transport, status, malformed replies)
    Classifier {
        backend: String,
        reason: String,
        source: Option<Box<dyn StdError + Send + Sync>>,
        context: ErrorContext,
    },
    /// Timeout errors
    Timeout {
        operation: String,
        duration_ms: u64,
        context: ErrorContext,
    },
    /// External library errors
    External {
        library: String,
        source: Box<dyn StdError + Send + Sync>,
        context: ErrorContext,
    },
}

impl AssetError {
    /// Create a configuration error
    pub fn config(
        field: impl Into<String>,
        value: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::Config {
            field: field.into(),
            value: value.into(),
            reason: reason.into(),
            context: ErrorContext::new().with_severity(ErrorSeverity::Fatal),
        }
    }

    /// Create an I/O error
    pub fn io(operation: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            operation: operation.into(),
            path: None,
            source,
            context: ErrorContext::new(),
        }
    }

    /// Create an I/O error tied to a path
    pub fn io_at(operation: impl Into<String>, path: &Path, source: std::io::Error) -> Self {
        Self::Io {
            operation: operation.into(),
            path: Some(path.display().to_string()),
            source,
            context: ErrorContext::new(),
        }
    }

    /// Create a codec error for an image file
    pub fn codec(path: &Path, source: image::ImageError) -> Self {
        Self::Codec {
            path: path.display().to_string(),
            source,
            context: ErrorContext::new(),
        }
    }

    /// Create a geometry error
    pub fn geometry(subject: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Geometry {
            subject: subject.into(),
            reason: reason.into(),
            context: ErrorContext::new(),
        }
    }

    /// Create a classifier error
    pub fn classifier(backend: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Classifier {
            backend: backend.into(),
            reason: reason.into(),
            source: None,
            context: ErrorContext::new(),
        }
    }

    /// Create a classifier error with an underlying cause
    pub fn classifier_source(
        backend: impl Into<String>,
        reason: impl Into<String>,
        source: impl StdError + Send + Sync + 'static,
    ) -> Self {
        Self::Classifier {
            backend: backend.into(),
            reason: reason.into(),
            source: Some(Box::new(source)),
            context: ErrorContext::new(),
        }
    }

    /// Create a timeout error
    pub fn timeout(operation: impl Into<String>, duration_ms: u64) -> Self {
        Self::Timeout {
            operation: operation.into(),
            duration_ms,
            context: ErrorContext::new(),
        }
    }

    /// Create an external library error
    pub fn external(
        library: impl Into<String>,
        source: impl StdError + Send + Sync + 'static,
    ) -> Self {
        Self::External {
            library: library.into(),
            source: Box::new(source),
            context: ErrorContext::new(),
        }
    }

    /// Add context to the error
    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context_mut().context = Some(context.into());
        self
    }

    /// Set the operation
    pub fn with_operation(mut self, operation: impl Into<String>) -> Self {
        self.context_mut().operation = Some(operation.into());
        self
    }

    /// Add a recovery suggestion
    pub fn with_recovery_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.context_mut().recovery_suggestion = Some(suggestion.into());
        self
    }

    /// Set severity
    pub fn with_severity(mut self, severity: ErrorSeverity) -> Self {
        self.context_mut().severity = severity;
        self
    }

    /// Get the error context
    pub fn context(&self) -> &ErrorContext {
        match self {
            Self::Config { context, .. }
            | Self::Io { context, .. }
            | Self::Codec { context, .. }
            | Self::Geometry { context, .. }
            | Self::Classifier { context, .. }
            | Self::Timeout { context, .. }
            | Self::External { context, .. } => context,
        }
    }

    fn context_mut(&mut self) -> &mut ErrorContext {
        match self {
            Self::Config { context, .. }
            | Self::Io { context, .. }
            | Self::Codec { context, .. }
            | Self::Geometry { context, .. }
            | Self::Classifier { context, .. }
            | Self::Timeout { context, .. }
            | Self::External { context, .. } => context,
        }
    }

    /// Short category name, used as a log field
    pub fn category(&self) -> &'static str {
        match self {
            Self::Config { .. } => "config",
            Self::Io { .. } => "io",
            Self::Codec { .. } => "codec",
            Self::Geometry { .. } => "geometry",
            Self::Classifier { .. } => "classifier",
            Self::Timeout { .. } => "timeout",
            Self::External { .. } => "external",
        }
    }
}

impl fmt::Display for AssetError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let context = self.context();
        if let Some(operation) = &context.operation {
            write!(f, "{operation}: ")?;
        }

        match self {
            Self::Config {
                field,
                value,
                reason,
                ..
            } => write!(f, "Invalid configuration: {field}={value:?} ({reason})")?,
            Self::Io {
                operation,
                path,
                source,
                ..
            } => match path {
                Some(path) => write!(f, "I/O error during {operation} on {path}: {source}")?,
                None => write!(f, "I/O error during {operation}: {source}")?,
            },
            Self::Codec { path, source, .. } => write!(f, "Image codec error for {path}: {source}")?,
            Self::Geometry {
                subject, reason, ..
            } => write!(f, "Geometry error for {subject}: {reason}")?,
            Self::Classifier {
                backend, reason, ..
            } => write!(f, "Classifier '{backend}' failed: {reason}")?,
            Self::Timeout {
                operation,
                duration_ms,
                ..
            } => write!(f, "Operation '{operation}' timed out after {duration_ms}ms")?,
            Self::External {
                library, source, ..
            } => write!(f, "{library} error: {source}")?,
        }

        if let Some(extra) = &context.context {
            write!(f, " (while {extra})")?;
        }
        Ok(())
    }
}

impl StdError for AssetError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Codec { source, .. } => Some(source),
            Self::Classifier {
                source: Some(source),
                ..
            } => Some(source.as_ref()),
            Self::External { source, .. } => Some(source.as_ref()),
            _ => None,
        }
    }
}

/// Trait for errors that carry a severity level
pub trait HasSeverity {
    fn severity(&self) -> ErrorSeverity;
}

impl HasSeverity for AssetError {
    fn severity(&self) -> ErrorSeverity {
        self.context().severity
    }
}

/// Trait for errors that can provide recovery suggestions
pub trait HasRecoverySuggestion {
    fn recovery_suggestion(&self) -> Option<&str>;
}

impl HasRecoverySuggestion for AssetError {
    fn recovery_suggestion(&self) -> Option<&str> {
        self.context().recovery_suggestion.as_deref()
    }
}

impl From<std::io::Error> for AssetError {
    fn from(error: std::io::Error) -> Self {
        Self::io("unknown", error)
    }
}

impl From<ConfigViolation> for AssetError {
    fn from(violation: ConfigViolation) -> Self {
        Self::config(violation.field, violation.value, violation.reason)
    }
}

impl From<serde_json::Error> for AssetError {
    fn from(error: serde_json::Error) -> Self {
        Self::external("serde_json", error)
    }
}

impl From<card_scale::cpu::ScaleError> for AssetError {
    fn from(error: card_scale::cpu::ScaleError) -> Self {
        Self::external("card_scale", error)
    }
}

/// Result alias used across the library
pub type Result<T> = std::result::Result<T, AssetError>;
