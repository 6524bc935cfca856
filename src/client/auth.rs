//! Authentication against the identity service.
//!
//! A token is obtained by POSTing either password credentials or an existing
//! token to `<auth_url>/tokens`. The response carries the token, the tenant it
//! is scoped to and the service catalog.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::client::{catalog::ServiceCatalog, error::ClientError};

/// Credentials used to obtain a token
#[derive(Clone, PartialEq)]
pub enum Credentials {
    Password { username: String, password: String },
    Token(String),
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Credentials::Password { username, .. } => f
                .debug_struct("Password")
                .field("username", username)
                .field("password", &"***")
                .finish(),
            Credentials::Token(_) => f.debug_tuple("Token").field(&"***").finish(),
        }
    }
}

/// Which tenant (project) the token should be scoped to
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TenantScope {
    pub tenant_id: Option<String>,
    pub tenant_name: Option<String>,
}

/// Build the JSON body of a token request.
pub fn token_request_body(credentials: &Credentials, scope: &TenantScope) -> Value {
    let mut auth = match credentials {
        Credentials::Password { username, password } => json!({
            "passwordCredentials": {"username": username, "password": password}
        }),
        Credentials::Token(token) => json!({"token": {"id": token}}),
    };

    if let Some(auth) = auth.as_object_mut() {
        if let Some(tenant_id) = &scope.tenant_id {
            auth.insert("tenantId".to_string(), json!(tenant_id));
        } else if let Some(tenant_name) = &scope.tenant_name {
            auth.insert("tenantName".to_string(), json!(tenant_name));
        }
    }

    json!({ "auth": auth })
}

#[derive(Debug, Deserialize)]
struct AuthResponse {
    access: Access,
}

#[derive(Debug, Deserialize)]
struct Access {
    token: Token,
    #[serde(rename = "serviceCatalog", default)]
    service_catalog: Option<Value>,
}

#[derive(Debug, Deserialize)]
struct Token {
    id: String,
    #[serde(default)]
    expires: Option<String>,
    #[serde(default)]
    tenant: Option<TokenTenant>,
}

#[derive(Debug, Deserialize)]
struct TokenTenant {
    id: String,
    #[serde(default)]
    name: Option<String>,
}

/// An authenticated session: the token and what came with it
#[derive(Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub token: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tenant_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tenant_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub catalog: Option<ServiceCatalog>,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("token", &"***")
            .field("expires", &self.expires)
            .field("tenant_id", &self.tenant_id)
            .field("tenant_name", &self.tenant_name)
            .field("catalog", &self.catalog.as_ref().map(|_| "..."))
            .finish()
    }
}

impl Session {
    /// A session for a token used directly against a fixed endpoint.
    pub fn from_token(token: &str, tenant_id: Option<String>) -> Session {
        Session {
            token: token.to_string(),
            expires: None,
            tenant_id,
            tenant_name: None,
            catalog: None,
        }
    }

    /// Token expiry; identity services send RFC 3339 timestamps, sometimes
    /// without a zone, which then means UTC.
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        let expires = self.expires.as_deref()?;
        DateTime::parse_from_rfc3339(expires)
            .map(|expires| expires.with_timezone(&Utc))
            .or_else(|_| {
                NaiveDateTime::parse_from_str(expires, "%Y-%m-%dT%H:%M:%S%.f")
                    .map(|expires| expires.and_utc())
            })
            .ok()
    }

    /// Whether the token had expired at `now`. A token without a readable
    /// expiry is assumed valid.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        matches!(self.expires_at(), Some(expires) if expires <= now)
    }

    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }

    /// Parse the body of a successful token response.
    pub fn from_auth_response(body: &str) -> Result<Session, ClientError> {
        let response: AuthResponse = serde_json::from_str(body).map_err(|e| {
            ClientError::AuthorizationFailure(format!("unexpected authentication response: {}", e))
        })?;

        let catalog = match response.access.service_catalog {
            Some(catalog) => Some(ServiceCatalog::new(catalog)?),
            None => None,
        };
        let (tenant_id, tenant_name) = match response.access.token.tenant {
            Some(tenant) => (Some(tenant.id), tenant.name),
            None => (None, None),
        };

        Ok(Session {
            token: response.access.token.id,
            expires: response.access.token.expires,
            tenant_id,
            tenant_name,
            catalog,
        })
    }
}
