//! Error types for the contacts exchange engine.
//!
//! This module defines custom error types using `thiserror` for precise error
//! handling. Export-time failures are carried by [`ExportError`], a tagged
//! type replacing the loose `(error, count, recoverable)` convention: the
//! kind names the failure for localization and the `recoverable` flag drives
//! whether a retry is offered.

use thiserror::Error;

/// Errors that can occur when talking to the contact store.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Underlying I/O failure (JSON-file store)
    #[error("store I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to parse stored data
    #[error("store parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Record rejected by the store
    #[error("invalid record: {0}")]
    InvalidRecord(String),

    /// Generic store error with context
    #[error("store error: {0}")]
    Other(String),
}

/// Errors that can occur during configuration loading.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Environment variable has invalid value
    #[error("Invalid value for {var}: {reason}")]
    InvalidValue { var: String, reason: String },

    /// Generic configuration error
    #[error("Configuration error: {0}")]
    Other(String),
}

/// Hard local failures of the export orchestrator.
///
/// These are precondition violations and store failures, not the
/// user-recoverable export errors a strategy reports through
/// [`ExportError`]. They never reach the confirm dialog.
#[derive(Error, Debug)]
pub enum ExporterError {
    /// `start()` was called before `init()` resolved any contacts
    #[error("no contacts resolved; call init() with a non-empty id set first")]
    NotReady,

    /// `init()` was given an empty id set
    #[error("contact id set is empty")]
    EmptyIdSet,

    /// `start()` was called with no strategy configured
    #[error("no export strategy configured")]
    MissingStrategy,

    /// Contact store query failed during id resolution
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Classification of an export-time failure.
///
/// The slug returned by [`ExportErrorKind::reason`] composes the
/// localization key `exportError-<strategy>-<reason>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportErrorKind {
    /// User-initiated stop; handled silently, never shown as a dialog
    Cancelled,
    /// Transient transport failure
    Network,
    /// Destination medium rejected a write
    Storage,
    /// Destination medium is full
    NoFreeSpace,
    /// Anything else, carrying its own reason slug
    Other(String),
}

impl ExportErrorKind {
    /// The reason slug used in localization keys.
    pub fn reason(&self) -> &str {
        match self {
            Self::Cancelled => "cancelled",
            Self::Network => "network",
            Self::Storage => "storage",
            Self::NoFreeSpace => "noFreeSpace",
            Self::Other(slug) => slug,
        }
    }
}

/// An export failure reported by a strategy.
///
/// `recoverable` is tri-state: `Some(false)` means retrying cannot help and
/// the retry action is omitted from the error dialog; `Some(true)` and
/// `None` both leave retry available, matching the convention where an
/// unset flag defaults to retryable.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("export failed: {}", self.kind.reason())]
pub struct ExportError {
    pub kind: ExportErrorKind,
    pub recoverable: Option<bool>,
}

impl ExportError {
    /// A failure of the given kind with the recoverable flag unset.
    pub fn new(kind: ExportErrorKind) -> Self {
        Self {
            kind,
            recoverable: None,
        }
    }

    /// The silent user-cancellation marker.
    pub fn cancelled() -> Self {
        Self::new(ExportErrorKind::Cancelled)
    }

    /// Mark this failure as explicitly recoverable or not.
    pub fn with_recoverable(mut self, recoverable: bool) -> Self {
        self.recoverable = Some(recoverable);
        self
    }

    /// Whether this failure is the silent cancellation marker.
    pub fn is_cancelled(&self) -> bool {
        self.kind == ExportErrorKind::Cancelled
    }

    /// Whether the error dialog should offer a retry action.
    pub fn retry_allowed(&self) -> bool {
        self.recoverable != Some(false)
    }
}

/// Convenience type alias for Results with StoreError
pub type StoreResult<T> = Result<T, StoreError>;

/// Convenience type alias for Results with ConfigError
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Convenience type alias for Results with ExporterError
pub type ExporterResult<T> = Result<T, ExporterError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = StoreError::Other("backend gone".to_string());
        assert_eq!(err.to_string(), "store error: backend gone");

        let err = ExporterError::NotReady;
        assert!(err.to_string().contains("init()"));

        let err = ExportError::new(ExportErrorKind::NoFreeSpace);
        assert_eq!(err.to_string(), "export failed: noFreeSpace");
    }

    #[test]
    fn test_reason_slugs() {
        assert_eq!(ExportErrorKind::Cancelled.reason(), "cancelled");
        assert_eq!(ExportErrorKind::Network.reason(), "network");
        assert_eq!(
            ExportErrorKind::Other("simFull".to_string()).reason(),
            "simFull"
        );
    }

    #[test]
    fn test_retry_allowed_defaults() {
        assert!(ExportError::new(ExportErrorKind::Network).retry_allowed());
        assert!(ExportError::new(ExportErrorKind::Network)
            .with_recoverable(true)
            .retry_allowed());
        assert!(!ExportError::new(ExportErrorKind::Storage)
            .with_recoverable(false)
            .retry_allowed());
    }

    #[test]
    fn test_cancelled_marker() {
        let err = ExportError::cancelled();
        assert!(err.is_cancelled());
        assert!(!ExportError::new(ExportErrorKind::Network).is_cancelled());
    }
}
