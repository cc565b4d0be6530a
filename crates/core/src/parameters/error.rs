//! Parameter error types

/// Errors from parameter store operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParameterError {
    /// No parameter is registered under the name
    UnknownParameter,
    /// Name exceeds the maximum parameter name length
    NameTooLong,
    /// Store is full
    StoreFull,
    /// Read-only parameter cannot be modified
    ReadOnly,
    /// Value variant differs from the registered default
    TypeMismatch,
}

impl core::fmt::Display for ParameterError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            ParameterError::UnknownParameter => write!(f, "unknown parameter"),
            ParameterError::NameTooLong => write!(f, "parameter name too long"),
            ParameterError::StoreFull => write!(f, "parameter store full"),
            ParameterError::ReadOnly => write!(f, "parameter is read-only"),
            ParameterError::TypeMismatch => write!(f, "parameter type mismatch"),
        }
    }
}

impl core::error::Error for ParameterError {}
