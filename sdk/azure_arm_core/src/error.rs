use thiserror::Error;

/// Errors that can occur when calling the Azure Resource Manager API.
///
/// The first three variants follow the request lifecycle: a request is
/// prepared, sent, and its response is checked and decoded. Each of them
/// names the operation that failed.
#[derive(Error, Debug)]
pub enum ArmError {
    /// The request could not be built (template substitution, missing
    /// parameter, body serialization).
    #[error("{operation}: failure preparing request: {message}")]
    Preparation { operation: String, message: String },

    /// The request could not be sent or the response could not be read.
    #[error("{operation}: failure sending request: {source}")]
    Transport {
        operation: String,
        #[source]
        source: reqwest::Error,
    },

    /// The service answered with a status outside the accepted set, or the
    /// body did not match the expected shape.
    #[error("{operation}: unexpected response (HTTP {status}): {message}")]
    Response {
        operation: String,
        status: u16,
        /// ARM error code, when the body carried an error envelope.
        code: Option<String>,
        message: String,
    },

    /// A caller-supplied argument was rejected before any request was made.
    #[error("The value passed for '{parameter}' {message}")]
    Validation { parameter: String, message: String },

    /// Authentication failed.
    #[error("Authentication failed: {0}")]
    Auth(String),

    /// The endpoint URL is invalid.
    #[error("Invalid endpoint URL: {message}")]
    InvalidEndpoint {
        message: String,
        #[source]
        source: Option<url::ParseError>,
    },

    /// A required configuration value is missing.
    #[error("Missing configuration: {0}")]
    MissingConfig(String),
}

impl ArmError {
    pub fn preparation(operation: &str, message: impl Into<String>) -> Self {
        Self::Preparation {
            operation: operation.to_string(),
            message: message.into(),
        }
    }

    pub fn transport(operation: &str, source: reqwest::Error) -> Self {
        Self::Transport {
            operation: operation.to_string(),
            source,
        }
    }

    pub fn response(
        operation: &str,
        status: u16,
        code: Option<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::Response {
            operation: operation.to_string(),
            status,
            code,
            message: message.into(),
        }
    }

    /// Reject a required string argument that is empty.
    pub fn empty_parameter(parameter: &str) -> Self {
        Self::Validation {
            parameter: parameter.to_string(),
            message: "cannot be empty".into(),
        }
    }

    pub fn invalid_endpoint_with_source(message: &str, source: url::ParseError) -> Self {
        Self::InvalidEndpoint {
            message: message.to_string(),
            source: Some(source),
        }
    }

    /// HTTP status attached to this error, if the service answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Response { status, .. } => Some(*status),
            Self::Transport { source, .. } => source.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

/// Result type alias for Resource Manager operations.
pub type ArmResult<T> = std::result::Result<T, ArmError>;
