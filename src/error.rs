use std::fmt;

/// Error raised when the audit wiring is misconfigured.
///
/// Configuration errors surface at startup, while operations are being
/// declared in an [`OperationRegistry`](crate::OperationRegistry) or wired
/// into an [`AuditDispatcher`](crate::AuditDispatcher), never per request.
/// A host that receives one should refuse to start (or refuse the affected
/// route) rather than accept calls it cannot audit.
///
/// # Examples
///
/// ```
/// use audit_stamp::{ConfigError, ConfigErrorKind};
///
/// let error = ConfigError::new(
///     ConfigErrorKind::UnknownOperation,
///     "operation 'employee.insert' has no declared kind",
/// );
/// assert_eq!(error.kind(), ConfigErrorKind::UnknownOperation);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigError {
    kind: ConfigErrorKind,
    message: String,
}

impl ConfigError {
    /// Creates a new configuration error.
    pub fn new(kind: ConfigErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    /// Returns the error kind.
    pub fn kind(&self) -> ConfigErrorKind {
        self.kind
    }

    /// Returns the error message.
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "audit configuration error ({}): {}", self.kind, self.message)
    }
}

impl std::error::Error for ConfigError {}

/// Kind of configuration error.
///
/// Categorizes what went wrong during declaration or wiring.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigErrorKind {
    /// An operation was wired for interception without a declared kind.
    UnknownOperation,
    /// An operation name was declared more than once with different kinds.
    ConflictingDeclaration,
}

impl fmt::Display for ConfigErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownOperation => write!(f, "unknown operation"),
            Self::ConflictingDeclaration => write!(f, "conflicting declaration"),
        }
    }
}
