use thiserror::Error;

use crate::{
    client::{ApiErrorKind, ClientError},
    exit_codes::ExitCode,
};

pub mod alarms;
pub mod auth;
pub mod config;
pub mod meters;
pub mod servers;
pub mod tenants;
pub mod users;
pub mod utils;
pub mod volumes;

#[derive(Debug, Error)]
pub enum CliActionError {
    #[error("{0}")]
    ClientError(#[from] ClientError),

    #[error("{0}")]
    ConfigurationError(#[from] crate::configuration::ConfigurationError),

    #[error("{0}")]
    FormattingError(#[from] crate::format::FormattingError),

    #[error("{0}")]
    KeyringError(#[from] crate::keyring::KeyringError),

    #[error("Missing required argument: {0}")]
    MissingRequiredArgument(String),

    #[error("Invalid value for {name}: {reason}")]
    InvalidArgument { name: String, reason: String },

    #[error("Password prompt failed: {0}")]
    PromptError(#[from] inquire::InquireError),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl CliActionError {
    pub fn exit_code(&self) -> ExitCode {
        match self {
            CliActionError::ClientError(e) => client_exit_code(e),
            CliActionError::ConfigurationError(_) => ExitCode::ConfigError,
            CliActionError::FormattingError(_) => ExitCode::DataError,
            CliActionError::KeyringError(_) => ExitCode::AuthError,
            CliActionError::MissingRequiredArgument(_) => ExitCode::UsageError,
            CliActionError::InvalidArgument { .. } => ExitCode::UsageError,
            CliActionError::PromptError(_) => ExitCode::AuthError,
            CliActionError::IoError(_) => ExitCode::IoError,
        }
    }
}

fn client_exit_code(error: &ClientError) -> ExitCode {
    match error {
        ClientError::Api(e) => match e.kind {
            ApiErrorKind::NotFound => ExitCode::NotFound,
            ApiErrorKind::Unauthorized | ApiErrorKind::Forbidden => ExitCode::AuthError,
            _ => ExitCode::ApiError,
        },
        ClientError::ConnectionFailed { .. } | ClientError::HttpError(_) => ExitCode::NetworkError,
        ClientError::AuthorizationFailure(_) => ExitCode::AuthError,
        ClientError::AmbiguousEndpoints { .. } | ClientError::EndpointNotFound { .. } => {
            ExitCode::Unavailable
        }
        ClientError::JsonError(_) | ClientError::UnexpectedResponse { .. } => ExitCode::DataError,
        ClientError::InvalidUrl(_) | ClientError::InvalidRequest(_) => ExitCode::UsageError,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::ApiError;
    use reqwest::StatusCode;

    #[test]
    fn test_exit_codes_for_api_errors() {
        let not_found = CliActionError::from(ClientError::from(ApiError::from_status(
            StatusCode::NOT_FOUND,
        )));
        assert_eq!(not_found.exit_code(), ExitCode::NotFound);

        let conflict = CliActionError::from(ClientError::from(ApiError::from_status(
            StatusCode::CONFLICT,
        )));
        assert_eq!(conflict.exit_code(), ExitCode::ApiError);

        let unauthorized = CliActionError::from(ClientError::from(ApiError::from_status(
            StatusCode::UNAUTHORIZED,
        )));
        assert_eq!(unauthorized.exit_code(), ExitCode::AuthError);
    }

    #[test]
    fn test_exit_codes_for_local_errors() {
        let missing = CliActionError::MissingRequiredArgument("os-auth-url".to_string());
        assert_eq!(missing.exit_code(), ExitCode::UsageError);

        let endpoint = CliActionError::from(ClientError::EndpointNotFound {
            service_type: "volume".to_string(),
        });
        assert_eq!(endpoint.exit_code(), ExitCode::Unavailable);
    }
}
