use thiserror::Error;

#[derive(Error, Debug)]
pub enum EtlError {
    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Invalid value for '{field}': {value:?}")]
    InvalidValue { field: String, value: String },

    #[error("Missing required field: {field}")]
    MissingField { field: String },

    #[error("Geocoding failed: {message}")]
    GeocodingError { query: String, message: String },

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Configuration validation failed for '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid configuration value for '{field}' ({value:?}): {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing configuration: {field}")]
    MissingConfigError { field: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    Input,
    Data,
    Output,
    Configuration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl EtlError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            EtlError::ApiError(_) | EtlError::GeocodingError { .. } => ErrorCategory::Network,
            EtlError::CsvError(_) | EtlError::IoError(_) => ErrorCategory::Input,
            EtlError::InvalidValue { .. } | EtlError::MissingField { .. } => ErrorCategory::Data,
            EtlError::SerializationError(_) => ErrorCategory::Output,
            EtlError::ConfigError { .. }
            | EtlError::ConfigValidationError { .. }
            | EtlError::InvalidConfigValueError { .. }
            | EtlError::MissingConfigError { .. } => ErrorCategory::Configuration,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            // Recovered per row; only reaches main if a caller chose to propagate it.
            EtlError::GeocodingError { .. } => ErrorSeverity::Low,
            EtlError::ApiError(_) => ErrorSeverity::Medium,
            EtlError::CsvError(_)
            | EtlError::InvalidValue { .. }
            | EtlError::MissingField { .. }
            | EtlError::SerializationError(_) => ErrorSeverity::High,
            EtlError::IoError(_)
            | EtlError::ConfigError { .. }
            | EtlError::ConfigValidationError { .. }
            | EtlError::InvalidConfigValueError { .. }
            | EtlError::MissingConfigError { .. } => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            EtlError::ApiError(_) => {
                "Check network connectivity and the geocoding endpoint, then rerun".to_string()
            }
            EtlError::GeocodingError { .. } => {
                "Verify the address columns and the geocoding API key".to_string()
            }
            EtlError::CsvError(_) => {
                "Make sure the input is a CSV file with a header row".to_string()
            }
            EtlError::IoError(_) => {
                "Check that the input file exists and the output path is writable".to_string()
            }
            EtlError::SerializationError(_) => "Report this as a bug".to_string(),
            EtlError::InvalidValue { field, .. } => format!(
                "Set '{}' to one of yes/true/1, no/false/0, null or leave it empty",
                field
            ),
            EtlError::MissingField { field } => {
                format!("Add a '{}' column to the input CSV", field)
            }
            EtlError::ConfigError { .. } | EtlError::ConfigValidationError { .. } => {
                "Check the TOML configuration file syntax".to_string()
            }
            EtlError::InvalidConfigValueError { field, .. } => {
                format!("Fix the value of '{}'", field)
            }
            EtlError::MissingConfigError { field } => format!("Provide a value for '{}'", field),
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Network => format!("Network problem: {}", self),
            ErrorCategory::Input => format!("Could not read input: {}", self),
            ErrorCategory::Data => format!("Bad facility data: {}", self),
            ErrorCategory::Output => format!("Could not write output: {}", self),
            ErrorCategory::Configuration => format!("Invalid configuration: {}", self),
        }
    }

    /// Process exit status for a run that ended with this error.
    pub fn exit_code(&self) -> i32 {
        match self.severity() {
            ErrorSeverity::Low | ErrorSeverity::High => 1,
            ErrorSeverity::Medium => 2,
            ErrorSeverity::Critical => 3,
        }
    }
}

pub type Result<T> = std::result::Result<T, EtlError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_data_errors_are_fatal() {
        let err = EtlError::InvalidValue {
            field: "display".to_string(),
            value: "maybe".to_string(),
        };
        assert_eq!(err.category(), ErrorCategory::Data);
        assert_eq!(err.severity(), ErrorSeverity::High);
        assert_ne!(err.exit_code(), 0);
        assert!(err.to_string().contains("\"maybe\""));
    }

    #[test]
    fn test_geocoding_error_does_not_repeat_query() {
        let err = EtlError::GeocodingError {
            query: "1 Main St, Springfield, IL 62701".to_string(),
            message: "status ZERO_RESULTS".to_string(),
        };
        assert_eq!(err.to_string(), "Geocoding failed: status ZERO_RESULTS");
        assert_eq!(err.severity(), ErrorSeverity::Low);
    }

    #[test]
    fn test_missing_field_suggestion_names_column() {
        let err = EtlError::MissingField {
            field: "tuesday_end".to_string(),
        };
        assert!(err.recovery_suggestion().contains("tuesday_end"));
        assert!(err.user_friendly_message().starts_with("Bad facility data"));
    }
}
