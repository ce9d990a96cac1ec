// Error types module
pub mod error;

// Re-export commonly used types
pub use error::{ErrorSeverity, PfcpError, Result};
