use thiserror::Error;

#[derive(Error, Debug)]
pub enum CalcError {
    #[error("Calculator requires an allowance API but none was provided")]
    MissingCollaborator,

    #[error("Allowance lookup failed for ({group}, {category}): {message}")]
    LookupError {
        group: String,
        category: String,
        message: String,
    },

    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error in '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Validation error: {message}")]
    ValidationError { message: String },
}

impl CalcError {
    pub fn lookup(group: &str, category: &str, message: impl Into<String>) -> Self {
        CalcError::LookupError {
            group: group.to_string(),
            category: category.to_string(),
            message: message.into(),
        }
    }

    /// 是否為設定或輸入資料問題（而非查詢失敗）
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            CalcError::MissingCollaborator
                | CalcError::ConfigValidationError { .. }
                | CalcError::InvalidConfigValueError { .. }
                | CalcError::MissingConfigError { .. }
                | CalcError::ValidationError { .. }
                | CalcError::CsvError(_)
                | CalcError::IoError(_)
        )
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            CalcError::LookupError { group, category, .. } => format!(
                "Could not fetch the allowance for group '{}' / category '{}'; no results were produced",
                group, category
            ),
            CalcError::ApiError(_) => {
                "The allowance service could not be reached; no results were produced".to_string()
            }
            CalcError::CsvError(_) => "An input CSV file could not be parsed".to_string(),
            other => other.to_string(),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            CalcError::MissingCollaborator => {
                "Configure --api-endpoint or --lookup-files so allowances can be looked up"
            }
            CalcError::LookupError { .. } | CalcError::ApiError(_) => {
                "Check that the allowance service is available and knows every group/category in the input"
            }
            CalcError::CsvError(_) | CalcError::ValidationError { .. } => {
                "Check the CSV headers and that every weight is a non-negative number"
            }
            CalcError::IoError(_) => {
                "Check that the input and output paths exist and are accessible"
            }
            CalcError::SerializationError(_) => {
                "The allowance service returned an unexpected payload; expected {\"maxWeight\": <number>}"
            }
            CalcError::ConfigValidationError { .. }
            | CalcError::InvalidConfigValueError { .. }
            | CalcError::MissingConfigError { .. } => {
                "Review the command line options and the TOML config file"
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, CalcError>;
