use thiserror::Error;

#[derive(Error, Debug)]
pub enum EticError {
    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Configuration file not found: {path}")]
    MissingConfigError { path: String },

    #[error("Invalid value for {field}: '{value}' ({reason})")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Network error: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("Failed to fetch entry: HTTP {status} from {url}")]
    HttpStatusError { status: u16, url: String },

    #[error("Request timed out: {url}")]
    TimeoutError { url: String },

    #[error("Failed to download abbreviations: {message}")]
    DownloadError { message: String },

    #[error("Malformed abbreviation file: {message}")]
    AbbreviationParseError { message: String },

    #[error("Error parsing BibTeX data: {message}")]
    BibtexParseError { message: String },

    #[error("Error parsing BibTeX data: no entries found")]
    NoEntriesError,

    #[error("Could not generate ID: {message}")]
    KeyGenerationError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Configuration,
    Network,
    Parse,
    Data,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl EticError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            EticError::ConfigError { .. }
            | EticError::MissingConfigError { .. }
            | EticError::InvalidConfigValueError { .. } => ErrorCategory::Configuration,
            EticError::HttpError(_)
            | EticError::HttpStatusError { .. }
            | EticError::TimeoutError { .. }
            | EticError::DownloadError { .. } => ErrorCategory::Network,
            EticError::AbbreviationParseError { .. }
            | EticError::BibtexParseError { .. }
            | EticError::NoEntriesError => ErrorCategory::Parse,
            EticError::IoError(_) | EticError::KeyGenerationError { .. } => ErrorCategory::Data,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Configuration => ErrorSeverity::Critical,
            ErrorCategory::Network => ErrorSeverity::Medium,
            ErrorCategory::Parse | ErrorCategory::Data => ErrorSeverity::High,
        }
    }

    /// Process exit status for this failure. Configuration problems get their
    /// own code so scripts can tell them apart from a bad DOI.
    pub fn exit_code(&self) -> i32 {
        match self.severity() {
            ErrorSeverity::Critical => 2,
            _ => 1,
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            EticError::MissingConfigError { path } => format!("No file was found: {}", path),
            EticError::TimeoutError { .. } => "Request timed out.".to_string(),
            other => other.to_string(),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.category() {
            ErrorCategory::Configuration => {
                "Check the configuration file (MONTH_REGEX, LATEST_ISSN, ISSN_UPD)"
            }
            ErrorCategory::Network => "Check the network connection and the DOI, then try again",
            ErrorCategory::Parse => "The resolver returned data that is not valid BibTeX",
            ErrorCategory::Data => "Check the data directory permissions and the fetched record",
        }
    }
}

pub type Result<T> = std::result::Result<T, EticError>;
