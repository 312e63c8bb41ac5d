use std::fmt;
use thiserror::Error;

/// Which step of the credential handshake failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthErrorKind {
    /// The landing page no longer embeds the client id element.
    ClientIdMissing,
    /// The element exists but carries no `value` attribute.
    ClientIdMalformed,
    /// The authorization endpoint answered with a non-200 status.
    AuthEndpointUnreachable,
    /// The authorization endpoint answered 200 with an unexpected body.
    AuthEndpointMalformed,
    /// The login endpoint did not hand out an access token.
    TokenExchangeFailed,
}

impl fmt::Display for AuthErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AuthErrorKind::ClientIdMissing => "client id missing",
            AuthErrorKind::ClientIdMalformed => "client id malformed",
            AuthErrorKind::AuthEndpointUnreachable => "authorization endpoint unreachable",
            AuthErrorKind::AuthEndpointMalformed => "authorization endpoint malformed",
            AuthErrorKind::TokenExchangeFailed => "token exchange failed",
        };
        f.write_str(name)
    }
}

#[derive(Error, Debug)]
pub enum EtlError {
    #[error("Authentication failed ({kind}): {message}")]
    Auth { kind: AuthErrorKind, message: String },

    #[error("Locale directory unavailable: {message}")]
    Directory { message: String },

    #[error("Locale '{city}' not found in the operator directory")]
    LocaleNotFound { city: String },

    #[error("Locale directory is corrupt: {message}")]
    DirectoryCorrupt { message: String },

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

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

    #[error("Missing required configuration '{field}'")]
    MissingConfigError { field: String },

    #[error("Data processing error: {message}")]
    ProcessingError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Authentication,
    Resolution,
    Network,
    Storage,
    Configuration,
    Processing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl EtlError {
    pub fn auth(kind: AuthErrorKind, message: impl Into<String>) -> Self {
        EtlError::Auth {
            kind,
            message: message.into(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            EtlError::Auth { .. } => ErrorCategory::Authentication,
            EtlError::Directory { .. }
            | EtlError::LocaleNotFound { .. }
            | EtlError::DirectoryCorrupt { .. } => ErrorCategory::Resolution,
            EtlError::Http(_) => ErrorCategory::Network,
            EtlError::IoError(_) | EtlError::SerializationError(_) => ErrorCategory::Storage,
            EtlError::ConfigValidationError { .. }
            | EtlError::InvalidConfigValueError { .. }
            | EtlError::MissingConfigError { .. } => ErrorCategory::Configuration,
            EtlError::ProcessingError { .. } => ErrorCategory::Processing,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Network => ErrorSeverity::Medium,
            ErrorCategory::Configuration | ErrorCategory::Resolution => ErrorSeverity::High,
            ErrorCategory::Processing => ErrorSeverity::High,
            ErrorCategory::Authentication | ErrorCategory::Storage => ErrorSeverity::Critical,
        }
    }

    /// Only transport failures are worth another attempt; everything else
    /// needs a human to look at the operator site or the configuration.
    pub fn is_retryable(&self) -> bool {
        matches!(self, EtlError::Http(_))
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            EtlError::Auth {
                kind: AuthErrorKind::ClientIdMissing | AuthErrorKind::ClientIdMalformed,
                ..
            } => "The operator landing page changed; update the client id discovery",
            EtlError::Auth { .. } => {
                "The operator authorization flow changed; inspect the handshake responses"
            }
            EtlError::Directory { .. } => "Check that the operator place directory is reachable",
            EtlError::LocaleNotFound { .. } => {
                "Trip city names must match the operator directory exactly (case-sensitive)"
            }
            EtlError::DirectoryCorrupt { .. } => {
                "The operator directory format changed; inspect the searchOrigin payload"
            }
            EtlError::Http(_) => "Check network connectivity and retry the run",
            EtlError::IoError(_) => "Check that the output directory exists and is writable",
            EtlError::SerializationError(_) => "Inspect the records that failed to serialize",
            EtlError::ConfigValidationError { .. }
            | EtlError::InvalidConfigValueError { .. }
            | EtlError::MissingConfigError { .. } => "Fix the configuration file and rerun",
            EtlError::ProcessingError { .. } => "Rerun with --verbose and report the log",
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Authentication => format!("Could not log in to the operator API: {self}"),
            ErrorCategory::Resolution => format!("Could not resolve trip locations: {self}"),
            ErrorCategory::Network => format!("Network problem while talking to the operator: {self}"),
            ErrorCategory::Storage => format!("Could not save results: {self}"),
            ErrorCategory::Configuration => format!("Invalid configuration: {self}"),
            ErrorCategory::Processing => format!("Processing failed: {self}"),
        }
    }
}

pub type Result<T> = std::result::Result<T, EtlError>;
