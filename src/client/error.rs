//! Error types for the cloud API client.
//!
//! HTTP failures are translated into an [`ApiError`] whose [`ApiErrorKind`] is
//! picked from a fixed status-code table. Everything else the client can run
//! into (transport, catalog lookups, authentication) is a [`ClientError`].

use reqwest::StatusCode;
use serde_json::Value;
use strum::{Display, EnumIter};
use thiserror::Error;

/// Longest non-JSON error body that is echoed back to the user
const MAX_PLAIN_BODY_LENGTH: usize = 512;

/// The kind of failure reported by a remote service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumIter)]
pub enum ApiErrorKind {
    #[strum(serialize = "Bad request")]
    BadRequest,
    #[strum(serialize = "Unauthorized")]
    Unauthorized,
    #[strum(serialize = "Forbidden")]
    Forbidden,
    #[strum(serialize = "Not found")]
    NotFound,
    #[strum(serialize = "Method not allowed")]
    MethodNotAllowed,
    #[strum(serialize = "Conflict")]
    Conflict,
    #[strum(serialize = "Over limit")]
    OverLimit,
    #[strum(serialize = "Internal server error")]
    InternalServerError,
    #[strum(serialize = "Not implemented")]
    NotImplemented,
    #[strum(serialize = "Service unavailable")]
    ServiceUnavailable,
    /// Fallback for any status without a dedicated kind
    #[strum(serialize = "Client exception")]
    ClientException,
}

impl ApiErrorKind {
    /// Map an HTTP status code to its error kind.
    pub fn from_status(status: StatusCode) -> ApiErrorKind {
        match status.as_u16() {
            400 => ApiErrorKind::BadRequest,
            401 => ApiErrorKind::Unauthorized,
            403 => ApiErrorKind::Forbidden,
            404 => ApiErrorKind::NotFound,
            405 => ApiErrorKind::MethodNotAllowed,
            409 => ApiErrorKind::Conflict,
            413 => ApiErrorKind::OverLimit,
            500 => ApiErrorKind::InternalServerError,
            501 => ApiErrorKind::NotImplemented,
            503 => ApiErrorKind::ServiceUnavailable,
            _ => ApiErrorKind::ClientException,
        }
    }
}

/// An error response returned by a remote service
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{message} (HTTP {}){}", .status.as_u16(), .details.as_ref().map(|d| format!(": {}", d)).unwrap_or_default())]
pub struct ApiError {
    pub kind: ApiErrorKind,
    pub status: StatusCode,
    pub message: String,
    pub details: Option<String>,
    pub error_type: Option<String>,
}

impl ApiError {
    /// Build an error carrying only the generic message for the status.
    pub fn from_status(status: StatusCode) -> ApiError {
        let kind = ApiErrorKind::from_status(status);
        ApiError {
            kind,
            status,
            message: kind.to_string(),
            details: None,
            error_type: None,
        }
    }

    /// Build an error from a failed response, letting a structured error body
    /// override the generic message.
    pub fn from_response(status: StatusCode, body: &str) -> ApiError {
        let mut error = ApiError::from_status(status);
        let body = body.trim();
        if body.is_empty() {
            return error;
        }

        match serde_json::from_str::<Value>(body) {
            Ok(json) => error.apply_body(&json),
            Err(_) => {
                let plain: String = body.chars().take(MAX_PLAIN_BODY_LENGTH).collect();
                error.details = Some(plain);
            }
        }
        error
    }

    fn apply_body(&mut self, json: &Value) {
        // {"error": {"message": ..., "type": ..., "detail": ...}}
        if let Some(error) = json.get("error").and_then(Value::as_object) {
            if let Some(message) = error.get("message").and_then(Value::as_str) {
                self.message = message.to_string();
            }
            self.error_type = error.get("type").and_then(Value::as_str).map(str::to_string);
            self.details = error
                .get("detail")
                .or_else(|| error.get("details"))
                .and_then(scalar_text);
            return;
        }

        // {"error_message": "{\"faultstring\": ..., \"debuginfo\": ...}"}
        if let Some(error_message) = json.get("error_message") {
            let inner = match error_message {
                Value::String(text) => {
                    serde_json::from_str::<Value>(text).unwrap_or_else(|_| error_message.clone())
                }
                other => other.clone(),
            };
            match &inner {
                Value::String(text) => self.message = text.clone(),
                Value::Object(fault) => {
                    if let Some(message) = fault.get("faultstring").and_then(Value::as_str) {
                        self.message = message.to_string();
                    }
                    self.details = fault.get("debuginfo").and_then(scalar_text);
                }
                _ => {}
            }
            return;
        }

        // {"itemNotFound": {"message": ..., "details": ..., "code": 404}}
        if let Some(fault) = json.as_object().filter(|object| object.len() == 1) {
            if let Some((fault_type, Value::Object(fault))) = fault.iter().next() {
                if let Some(message) = fault.get("message").and_then(Value::as_str) {
                    self.message = message.to_string();
                    self.error_type = Some(fault_type.clone());
                    self.details = fault.get("details").and_then(scalar_text);
                }
            }
        }
    }
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(text) if text.is_empty() => None,
        Value::String(text) => Some(text.clone()),
        other => Some(other.to_string()),
    }
}

/// Errors emitted by the cloud API client
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("{0}")]
    Api(#[from] ApiError),
    #[error("Unable to establish connection to {url}: {source}")]
    ConnectionFailed {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("Found more than one endpoint for service type '{service_type}': {}. Use a region or service name to disambiguate.", .endpoints.join(", "))]
    AmbiguousEndpoints {
        service_type: String,
        endpoints: Vec<String>,
    },
    #[error("Could not find an endpoint for service type '{service_type}'")]
    EndpointNotFound { service_type: String },
    #[error("Authorization failure: {0}")]
    AuthorizationFailure(String),
    #[error("HTTP error: {0}")]
    HttpError(#[from] reqwest::Error),
    #[error("JSON parsing error: {0}")]
    JsonError(#[from] serde_json::Error),
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
    #[error("Unexpected response from the {service_type} service: {reason}")]
    UnexpectedResponse {
        service_type: String,
        reason: String,
    },
}

impl ClientError {
    /// The API error kind, when the failure came from an HTTP error status.
    pub fn kind(&self) -> Option<ApiErrorKind> {
        match self {
            ClientError::Api(error) => Some(error.kind),
            _ => None,
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        self.kind() == Some(ApiErrorKind::Unauthorized)
    }

    pub fn is_not_found(&self) -> bool {
        self.kind() == Some(ApiErrorKind::NotFound)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn test_status_table() {
        assert_eq!(ApiErrorKind::from_status(StatusCode::BAD_REQUEST), ApiErrorKind::BadRequest);
        assert_eq!(ApiErrorKind::from_status(StatusCode::UNAUTHORIZED), ApiErrorKind::Unauthorized);
        assert_eq!(ApiErrorKind::from_status(StatusCode::FORBIDDEN), ApiErrorKind::Forbidden);
        assert_eq!(ApiErrorKind::from_status(StatusCode::NOT_FOUND), ApiErrorKind::NotFound);
        assert_eq!(ApiErrorKind::from_status(StatusCode::CONFLICT), ApiErrorKind::Conflict);
        assert_eq!(
            ApiErrorKind::from_status(StatusCode::INTERNAL_SERVER_ERROR),
            ApiErrorKind::InternalServerError
        );
        assert_eq!(
            ApiErrorKind::from_status(StatusCode::SERVICE_UNAVAILABLE),
            ApiErrorKind::ServiceUnavailable
        );
        assert_eq!(ApiErrorKind::from_status(StatusCode::IM_A_TEAPOT), ApiErrorKind::ClientException);
        assert_eq!(ApiErrorKind::from_status(StatusCode::BAD_GATEWAY), ApiErrorKind::ClientException);
    }

    #[test]
    fn test_every_kind_has_a_message() {
        for kind in ApiErrorKind::iter() {
            assert!(!kind.to_string().is_empty());
        }
    }

    #[test]
    fn test_generic_message_without_body() {
        let error = ApiError::from_response(StatusCode::NOT_FOUND, "");
        assert_eq!(error.kind, ApiErrorKind::NotFound);
        assert_eq!(error.to_string(), "Not found (HTTP 404)");
    }

    #[test]
    fn test_error_object_body() {
        let body = r#"{"error": {"message": "Volume is busy", "type": "VolumeIsBusy", "detail": "attached to vm-1"}}"#;
        let error = ApiError::from_response(StatusCode::CONFLICT, body);
        assert_eq!(error.kind, ApiErrorKind::Conflict);
        assert_eq!(error.message, "Volume is busy");
        assert_eq!(error.error_type.as_deref(), Some("VolumeIsBusy"));
        assert_eq!(error.to_string(), "Volume is busy (HTTP 409): attached to vm-1");
    }

    #[test]
    fn test_error_message_body_with_embedded_json() {
        let body = r#"{"error_message": "{\"faultstring\": \"Alarm a1 not found\", \"debuginfo\": null}"}"#;
        let error = ApiError::from_response(StatusCode::NOT_FOUND, body);
        assert_eq!(error.message, "Alarm a1 not found");
        assert_eq!(error.details, None);
    }

    #[test]
    fn test_fault_envelope_body() {
        let body = r#"{"itemNotFound": {"message": "Server abc could not be found", "code": 404}}"#;
        let error = ApiError::from_response(StatusCode::NOT_FOUND, body);
        assert_eq!(error.message, "Server abc could not be found");
        assert_eq!(error.error_type.as_deref(), Some("itemNotFound"));
    }

    #[test]
    fn test_plain_text_body_becomes_details() {
        let error = ApiError::from_response(StatusCode::BAD_GATEWAY, "upstream timed out");
        assert_eq!(error.kind, ApiErrorKind::ClientException);
        assert_eq!(error.details.as_deref(), Some("upstream timed out"));
    }

    #[test]
    fn test_client_error_helpers() {
        let error = ClientError::from(ApiError::from_status(StatusCode::UNAUTHORIZED));
        assert!(error.is_unauthorized());
        assert!(!error.is_not_found());
        let error = ClientError::EndpointNotFound {
            service_type: "volume".to_string(),
        };
        assert_eq!(error.kind(), None);
    }
}
