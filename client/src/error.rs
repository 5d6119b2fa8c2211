//! Client Error Types

use skillswap_common::envelope::GENERIC_ERROR;
use skillswap_common::forms::FormErrors;
use skillswap_common::ApiResponse;
use thiserror::Error;

/// Shown when the service cannot be reached at all.
pub const OFFLINE_MESSAGE: &str = "Unable to connect to server. Please check your connection.";

/// Errors surfaced by client operations.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Input rejected before any request was sent.
    #[error("Validation failed: {}", summarize(.0))]
    Validation(FormErrors),

    /// Login or registration refused, already mapped to user-facing copy.
    #[error("{message}")]
    Auth {
        /// HTTP status, if the server answered.
        status: Option<u16>,
        /// Text to show the user.
        message: String,
    },

    /// The server answered with a non-2xx status.
    #[error("{detail}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Text taken from the body's `detail` field.
        detail: String,
        /// Optional `message` field of the body.
        message: Option<String>,
    },

    /// The request never got a response.
    #[error("Network error: {0}")]
    Network(String),

    /// A 2xx body did not match the expected shape.
    #[error("Invalid response from server: {0}")]
    Decode(String),

    /// The operation needs a logged-in user.
    #[error("Not logged in")]
    NotAuthenticated,

    /// The operation needs an administrator.
    #[error("Admin access required")]
    NotAdmin,

    /// The local state does not allow the operation.
    #[error("{0}")]
    NotEligible(String),

    /// Reading or writing the persisted token failed.
    #[error("Session storage error: {0}")]
    TokenStore(#[from] std::io::Error),

    /// A model-level rule was violated.
    #[error(transparent)]
    Model(#[from] skillswap_common::Error),
}

/// Result alias for client operations.
pub type ClientResult<T> = Result<T, ClientError>;

fn summarize(errors: &FormErrors) -> String {
    errors
        .iter()
        .map(|(field, msg)| format!("{field}: {msg}"))
        .collect::<Vec<_>>()
        .join(", ")
}

impl ClientError {
    /// Single-field validation failure.
    pub fn invalid_field(field: &str, message: impl Into<String>) -> Self {
        let mut errors = FormErrors::new();
        errors.insert(field.to_string(), message.into());
        Self::Validation(errors)
    }

    pub(crate) fn network(err: &reqwest::Error) -> Self {
        Self::Network(err.to_string())
    }

    /// HTTP status, if the server produced one.
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            Self::Auth { status, .. } => *status,
            _ => None,
        }
    }

    pub const fn is_unauthorized(&self) -> bool {
        matches!(self.status(), Some(401))
    }

    /// Rewrite a failed login call into the copy shown on the login form.
    ///
    /// Statuses without dedicated copy keep the server's detail.
    #[must_use]
    pub fn into_login_error(self) -> Self {
        let message = match &self {
            Self::Network(_) => Some(OFFLINE_MESSAGE.to_string()),
            Self::Api { status, detail, .. } => Some(match status {
                401 => "Invalid email or password".to_string(),
                403 => "Your account has been banned. Please contact support.".to_string(),
                422 => "Please check your input and try again".to_string(),
                500..=599 => "Server error. Please try again later.".to_string(),
                _ => detail.clone(),
            }),
            _ => None,
        };
        match message {
            Some(message) => Self::Auth {
                status: self.status(),
                message,
            },
            None => self,
        }
    }

    /// Text suitable for a blocking alert.
    pub fn user_message(&self) -> String {
        match self {
            Self::Validation(errors) => errors
                .values()
                .next()
                .cloned()
                .unwrap_or_else(|| GENERIC_ERROR.to_string()),
            Self::Network(_) => OFFLINE_MESSAGE.to_string(),
            other => other.to_string(),
        }
    }
}

/// Fold a result into the `{ data?, error?, message? }` envelope.
pub fn envelope<T>(result: ClientResult<T>) -> ApiResponse<T> {
    match result {
        Ok(data) => ApiResponse::ok(data),
        Err(ClientError::Api {
            detail, message, ..
        }) => ApiResponse::failed(detail, message),
        Err(err) => ApiResponse::failed(err.user_message(), None),
    }
}
