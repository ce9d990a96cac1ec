use thiserror::Error;
use upf_shared::{
    CAUSE_NO_RESOURCES_AVAILABLE, CAUSE_REQUEST_REJECTED, CAUSE_SESSION_CONTEXT_NOT_FOUND,
};

/// Main error type for the PFCP agent
#[derive(Error, Debug)]
pub enum PfcpError {
    // ========================================
    // Session Errors
    // ========================================
    #[error("Failed to generate session id: {0}")]
    FseidGeneration(String),

    #[error("No free session id after {0} attempts")]
    FseidExhausted(u32),

    #[error("Session id {0} already in use")]
    DuplicateSeid(u64),

    #[error("Session not found: {0}")]
    SessionNotFound(u64),

    // ========================================
    // System Errors
    // ========================================
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl PfcpError {
    /// Convert error to the PFCP Cause carried in the rejection response
    pub fn to_cause(&self) -> u8 {
        match self {
            Self::FseidExhausted(_) => CAUSE_NO_RESOURCES_AVAILABLE,
            Self::SessionNotFound(_) => CAUSE_SESSION_CONTEXT_NOT_FOUND,
            _ => CAUSE_REQUEST_REJECTED,
        }
    }

    /// Get error severity level
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            Self::SessionNotFound(_) => ErrorSeverity::Info,
            Self::FseidGeneration(_) | Self::FseidExhausted(_) => ErrorSeverity::Error,
            Self::DuplicateSeid(_) | Self::InternalError(_) => ErrorSeverity::Critical,
            _ => ErrorSeverity::Warning,
        }
    }

    /// Check if the peer may retry the request as-is
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::FseidGeneration(_) | Self::FseidExhausted(_))
    }
}

/// Error severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    Info,
    Warning,
    Error,
    Critical,
}

impl std::fmt::Display for ErrorSeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Info => write!(f, "info"),
            Self::Warning => write!(f, "warning"),
            Self::Error => write!(f, "error"),
            Self::Critical => write!(f, "critical"),
        }
    }
}

/// Result type alias for PFCP operations
pub type Result<T> = std::result::Result<T, PfcpError>;
