//! Error types for the caseflow engine
//!
//! Each error type has a corresponding error code for programmatic handling,
//! and a user-facing message that keeps permission, pending-work, last-admin
//! and network failures distinguishable.

use thiserror::Error;

/// Result type alias for caseflow operations
pub type Result<T> = std::result::Result<T, CaseflowError>;

/// Main error type for all caseflow operations
#[derive(Debug, Error)]
pub enum CaseflowError {
    /// The actor's role does not permit the requested action
    #[error("Forbidden: {role} may not {action}")]
    Forbidden { action: String, role: String },

    /// Case closure attempted while documents remain unresolved
    #[error("Case {case_id} has unresolved documents: {}", blocking.join(", "))]
    BlockedByPendingWork {
        case_id: String,
        blocking: Vec<String>,
    },

    /// Reclassification would leave the board without an Admin
    #[error("Cannot move {0} out of Admins: at least one Admin must remain")]
    LastAdminViolation(String),

    /// The persistence collaborator failed or could not be reached
    #[error("Transport failure: {0}")]
    TransportFailure(String),

    /// Malformed input or an illegal transition for the current state
    #[error("Validation failed: {0}")]
    ValidationFailure(String),

    /// No .caseflow directory found
    #[error("Workspace not found: {0}")]
    WorkspaceNotFound(String),

    /// Invalid JSON format
    #[error("Invalid JSON: {0}")]
    InvalidJson(String),

    /// File not found
    #[error("File not found: {0}")]
    FileNotFound(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// IO error wrapper
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic wrapped error with context
    #[error("{context}: {message}")]
    Wrapped { context: String, message: String },
}

impl CaseflowError {
    /// Get the error code for this error type
    pub fn code(&self) -> &'static str {
        match self {
            CaseflowError::Forbidden { .. } => "FORBIDDEN",
            CaseflowError::BlockedByPendingWork { .. } => "BLOCKED_BY_PENDING_WORK",
            CaseflowError::LastAdminViolation(_) => "LAST_ADMIN_VIOLATION",
            CaseflowError::TransportFailure(_) => "TRANSPORT_FAILURE",
            CaseflowError::ValidationFailure(_) => "VALIDATION_FAILURE",
            CaseflowError::WorkspaceNotFound(_) => "WORKSPACE_NOT_FOUND",
            CaseflowError::InvalidJson(_) => "INVALID_JSON",
            CaseflowError::FileNotFound(_) => "FILE_NOT_FOUND",
            CaseflowError::ConfigError(_) => "CONFIG_ERROR",
            CaseflowError::Io(_) => "IO_ERROR",
            CaseflowError::Wrapped { .. } => "WRAPPED_ERROR",
        }
    }

    /// Message suitable for showing to the person who triggered the action
    pub fn user_message(&self) -> String {
        match self {
            CaseflowError::Forbidden { action, .. } => {
                format!("You do not have permission to {}.", action)
            }
            CaseflowError::BlockedByPendingWork { blocking, .. } => format!(
                "This case still has {} unresolved document(s). Approve or remove them before closing.",
                blocking.len()
            ),
            CaseflowError::LastAdminViolation(_) => {
                "There must be at least one Admin. Promote someone else first.".to_string()
            }
            CaseflowError::TransportFailure(_) => {
                "The change could not be saved. Check your connection and try again.".to_string()
            }
            CaseflowError::ValidationFailure(reason) => reason.clone(),
            other => other.to_string(),
        }
    }

    /// True for failures detected locally, before any write was attempted
    pub fn is_precondition(&self) -> bool {
        matches!(
            self,
            CaseflowError::Forbidden { .. }
                | CaseflowError::BlockedByPendingWork { .. }
                | CaseflowError::LastAdminViolation(_)
                | CaseflowError::ValidationFailure(_)
        )
    }

    /// Shorthand for a validation failure
    pub fn validation(reason: impl Into<String>) -> Self {
        CaseflowError::ValidationFailure(reason.into())
    }

    /// Wrap an error with additional context
    pub fn wrap<E: std::fmt::Display>(error: E, context: impl Into<String>) -> Self {
        CaseflowError::Wrapped {
            context: context.into(),
            message: error.to_string(),
        }
    }
}

/// Convert an error to an appropriate exit code
pub fn to_exit_code(error: &CaseflowError) -> i32 {
    match error {
        CaseflowError::Forbidden { .. } => 3,
        CaseflowError::BlockedByPendingWork { .. } => 4,
        CaseflowError::LastAdminViolation(_) => 5,
        CaseflowError::ValidationFailure(_) => 2,
        CaseflowError::TransportFailure(_) => 6,
        _ => 1,
    }
}
