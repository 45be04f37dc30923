//! Error types and error handling

use thiserror::Error;

/// View engine error type
///
/// A view that simply does not exist is never an error: it surfaces as
/// [`ViewEngineResult::NotFound`](crate::view::ViewEngineResult::NotFound).
/// These variants cover caller mistakes and genuine collaborator faults.
#[derive(Debug, Error)]
pub enum ViewEngineError {
    /// The requested view name was empty
    #[error("view name must not be empty")]
    EmptyViewName,

    /// A location format contains a placeholder other than `{0}`, `{1}` or `{2}`
    #[error("invalid view location format '{format}': {reason}")]
    InvalidLocationFormat {
        /// The offending format string
        format: String,
        /// What is wrong with it
        reason: String,
    },

    /// A page exists but could not be read
    #[error("failed to read view '{path}': {source}")]
    Io {
        /// Application-relative view path
        path: String,
        /// The underlying IO error
        source: std::io::Error,
    },

    /// A page exists but failed to compile
    #[error("failed to compile view '{path}': {source}")]
    Compile {
        /// Application-relative view path
        path: String,
        /// The underlying template error
        source: minijinja::Error,
    },

    /// Rendering a compiled page failed
    #[error("view render error: {0}")]
    Render(#[from] minijinja::Error),

    /// The owning request was aborted while resolution was in flight
    #[error("view resolution cancelled")]
    Cancelled,

    /// Configuration could not be loaded
    #[error("configuration error: {0}")]
    Config(#[from] Box<figment::Error>),
}

impl ViewEngineError {
    /// Create an invalid location format error
    #[must_use]
    pub fn invalid_format(format: &str, reason: impl Into<String>) -> Self {
        Self::InvalidLocationFormat {
            format: format.to_string(),
            reason: reason.into(),
        }
    }

    /// Whether this error reflects an aborted request rather than a fault
    #[must_use]
    pub const fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }
}

impl From<figment::Error> for ViewEngineError {
    fn from(err: figment::Error) -> Self {
        Self::Config(Box::new(err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_view_name_message() {
        assert_eq!(
            ViewEngineError::EmptyViewName.to_string(),
            "view name must not be empty"
        );
    }

    #[test]
    fn test_invalid_format_message() {
        let err = ViewEngineError::invalid_format("/Views/{3}.cshtml", "unknown placeholder {3}");
        assert!(err.to_string().contains("/Views/{3}.cshtml"));
        assert!(err.to_string().contains("unknown placeholder"));
    }

    #[test]
    fn test_is_cancelled() {
        assert!(ViewEngineError::Cancelled.is_cancelled());
        assert!(!ViewEngineError::EmptyViewName.is_cancelled());
    }
}
