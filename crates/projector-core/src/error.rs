use thiserror::Error;

/// Core error types for Projector operations
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("template {0} not found")]
    TemplateNotFound(String),

    #[error("Invalid project name '{name}': {reason}")]
    InvalidProjectName { name: String, reason: String },

    #[error("Invalid project spec: {message}")]
    InvalidSpec { message: String },

    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Invalid timestamp: {0}")]
    InvalidTimestamp(String),

    #[error("JSON serialization error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("YAML serialization error: {0}")]
    YamlError(#[from] serde_yaml::Error),
}

impl CoreError {
    /// Create a new TemplateNotFound error
    pub fn template_not_found(name: impl Into<String>) -> Self {
        Self::TemplateNotFound(name.into())
    }

    /// Create a new InvalidProjectName error
    pub fn invalid_project_name(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidProjectName {
            name: name.into(),
            reason: reason.into(),
        }
    }

    /// Create a new InvalidSpec error
    pub fn invalid_spec(message: impl Into<String>) -> Self {
        Self::InvalidSpec {
            message: message.into(),
        }
    }

    /// Create a new MissingField error
    pub fn missing_field(field: impl Into<String>) -> Self {
        Self::MissingField(field.into())
    }

    /// Create a new InvalidTimestamp error
    pub fn invalid_timestamp(value: impl Into<String>) -> Self {
        Self::InvalidTimestamp(value.into())
    }

    /// Check if this error means the requested template is not in the catalog
    pub fn is_template_not_found(&self) -> bool {
        matches!(self, Self::TemplateNotFound(_))
    }

    /// Check if this error was caused by malformed input data
    pub fn is_invalid_input(&self) -> bool {
        matches!(
            self,
            Self::InvalidProjectName { .. } | Self::InvalidSpec { .. } | Self::MissingField(_)
        )
    }

    /// Get error category for logging/monitoring
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::TemplateNotFound(_) => ErrorCategory::NotFound,
            Self::InvalidProjectName { .. } | Self::InvalidSpec { .. } | Self::MissingField(_) => {
                ErrorCategory::Validation
            }
            Self::InvalidTimestamp(_) => ErrorCategory::Validation,
            Self::JsonError(_) | Self::YamlError(_) => ErrorCategory::Serialization,
        }
    }
}

/// Error categories for monitoring and classification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    NotFound,
    Serialization,
}

impl std::fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation => write!(f, "validation"),
            Self::NotFound => write!(f, "not_found"),
            Self::Serialization => write!(f, "serialization"),
        }
    }
}

/// Convenience result type for core operations
pub type Result<T> = std::result::Result<T, CoreError>;
