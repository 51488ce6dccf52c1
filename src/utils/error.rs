use thiserror::Error;

#[derive(Error, Debug)]
pub enum EtlError {
    #[error("Data format error: {message}")]
    DataFormatError { message: String },

    #[error("Source unavailable: {location}: {source}")]
    SourceUnavailableError {
        location: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Cannot build a season table: no matches and no explicit team list")]
    EmptySeasonError,

    #[error("Expected a single season label, found: {labels:?}")]
    MixedSeasonError { labels: Vec<String> },

    #[error("Zip operation failed: {0}")]
    ZipError(#[from] zip::result::ZipError),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value for '{field}': '{value}' ({reason})")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration field: {field}")]
    MissingConfigError { field: String },

    #[error("Validation error: {message}")]
    ValidationError { message: String },

    #[error("Worker task failed: {message}")]
    TaskFailedError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Data,
    Source,
    Configuration,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl ErrorSeverity {
    /// 程式結束碼
    pub fn exit_code(self) -> i32 {
        match self {
            ErrorSeverity::Low => 0,
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        }
    }
}

impl EtlError {
    pub fn data_format(message: impl Into<String>) -> Self {
        EtlError::DataFormatError {
            message: message.into(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            EtlError::DataFormatError { .. }
            | EtlError::EmptySeasonError
            | EtlError::MixedSeasonError { .. }
            | EtlError::CsvError(_)
            | EtlError::ValidationError { .. } => ErrorCategory::Data,
            EtlError::SourceUnavailableError { .. } => ErrorCategory::Source,
            EtlError::ConfigError { .. }
            | EtlError::InvalidConfigValueError { .. }
            | EtlError::MissingConfigError { .. } => ErrorCategory::Configuration,
            EtlError::ZipError(_)
            | EtlError::IoError(_)
            | EtlError::SerializationError(_)
            | EtlError::TaskFailedError { .. } => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Source => ErrorSeverity::Medium,
            ErrorCategory::Data | ErrorCategory::Configuration => ErrorSeverity::High,
            ErrorCategory::System => ErrorSeverity::Critical,
        }
    }

    /// 只有來源讀取失敗可以由呼叫端重試，核心本身不重試
    pub fn is_retryable(&self) -> bool {
        matches!(self, EtlError::SourceUnavailableError { .. })
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            EtlError::DataFormatError { .. } | EtlError::CsvError(_) => {
                "Check that the raw season file is a football-data.co.uk CSV with Date, HomeTeam, AwayTeam, FTHG and FTAG columns"
            }
            EtlError::SourceUnavailableError { .. } => {
                "Make sure the raw season file has been downloaded into the raw data directory, then retry"
            }
            EtlError::EmptySeasonError => {
                "Provide an explicit team list or a season file that contains matches"
            }
            EtlError::MixedSeasonError { .. } => {
                "Build one table per season; do not concatenate several season files"
            }
            EtlError::ConfigError { .. }
            | EtlError::InvalidConfigValueError { .. }
            | EtlError::MissingConfigError { .. } => {
                "Review the command line flags or the TOML configuration file"
            }
            EtlError::ValidationError { .. } => "Fix the reported value and run again",
            EtlError::ZipError(_) | EtlError::IoError(_) => {
                "Check that the output directory exists and is writable"
            }
            EtlError::SerializationError(_) => "Report this as a bug",
            EtlError::TaskFailedError { .. } => "Run again with --verbose to see which unit failed",
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            EtlError::SourceUnavailableError { location, .. } => {
                format!("Could not read raw data at '{}'", location)
            }
            EtlError::EmptySeasonError => "The season has no matches to build a table from".to_string(),
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, EtlError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_errors_are_retryable() {
        let err = EtlError::SourceUnavailableError {
            location: "spain/spain_18_19.csv".to_string(),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "missing"),
        };
        assert!(err.is_retryable());
        assert_eq!(err.category(), ErrorCategory::Source);
        assert_eq!(err.severity(), ErrorSeverity::Medium);
        assert!(err.user_friendly_message().contains("spain/spain_18_19.csv"));
    }

    #[test]
    fn test_data_errors_are_fatal() {
        let err = EtlError::data_format("date format unknown: '1/1/1'");
        assert!(!err.is_retryable());
        assert_eq!(err.severity(), ErrorSeverity::High);
        assert!(!EtlError::EmptySeasonError.is_retryable());
    }

    #[test]
    fn test_severity_exit_codes() {
        assert_eq!(ErrorSeverity::Low.exit_code(), 0);
        assert_eq!(ErrorSeverity::High.exit_code(), 1);
        assert_eq!(ErrorSeverity::Medium.exit_code(), 2);
        assert_eq!(ErrorSeverity::Critical.exit_code(), 3);
        assert_eq!(EtlError::data_format("bad").severity().exit_code(), 1);
    }
}
