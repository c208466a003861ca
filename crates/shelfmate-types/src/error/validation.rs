//! Validation failures, raised locally before a request or mapped from
//! 4xx responses.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Input rejected by local checks or by the server.
#[derive(Debug, Clone, Error, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", content = "details", rename_all = "snake_case")]
pub enum ValidationFailure {
    /// A single field failed validation
    #[error("Invalid {field}: {message}")]
    Field {
        /// Name of the offending field
        field: String,
        /// What is wrong with it
        message: String,
        /// Server error code, if the server rejected it
        #[serde(default, skip_serializing_if = "Option::is_none")]
        code: Option<String>,
    },

    /// Action not allowed in the current reading-session state
    #[error("Cannot {action} a session that is {from}")]
    InvalidTransition {
        /// Current state name
        from: String,
        /// Attempted action
        action: String,
    },

    /// Referenced resource does not exist
    #[error("{resource} '{id}' was not found")]
    NotFound {
        /// Resource kind (`book`, `quote`, ...)
        resource: String,
        /// Identifier that was looked up
        id: String,
    },

    /// Server reported a conflicting state
    #[error("Conflict: {message}")]
    Conflict {
        /// Server message
        message: String,
        /// Server error code
        #[serde(default, skip_serializing_if = "Option::is_none")]
        code: Option<String>,
    },
}

impl ValidationFailure {
    /// Field failure without a server code.
    pub fn field(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Field { field: field.into(), message: message.into(), code: None }
    }

    /// Stable category tag.
    pub const fn tag(&self) -> &'static str {
        match self {
            Self::Field { .. } => "validation.field",
            Self::InvalidTransition { .. } => "validation.invalid_transition",
            Self::NotFound { .. } => "validation.not_found",
            Self::Conflict { .. } => "validation.conflict",
        }
    }

    /// Server-supplied error code.
    pub fn code(&self) -> Option<&str> {
        match self {
            Self::Field { code, .. } | Self::Conflict { code, .. } => code.as_deref(),
            Self::InvalidTransition { .. } | Self::NotFound { .. } => None,
        }
    }
}

impl From<validator::ValidationErrors> for ValidationFailure {
    /// Reports the alphabetically first failing field so the message is stable.
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut fields: Vec<_> = errors.field_errors().into_iter().collect();
        fields.sort_by(|a, b| a.0.cmp(&b.0));

        let Some((field, errs)) = fields.first() else {
            return Self::field("input", "is invalid");
        };
        let message = errs
            .first()
            .map(|e| e.message.as_ref().map_or_else(|| e.code.to_string(), ToString::to_string))
            .unwrap_or_else(|| "is invalid".to_string());
        Self::field(field.to_string(), message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transition_display() {
        let err = ValidationFailure::InvalidTransition {
            from: "idle".to_string(),
            action: "pause".to_string(),
        };
        assert_eq!(err.to_string(), "Cannot pause a session that is idle");
    }
}
