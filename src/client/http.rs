//! HTTP client for the cloud service APIs.
//!
//! Wraps a pooled `reqwest::Client` and adds what every service call needs:
//! authentication, endpoint resolution through the service catalog, a single
//! re-authentication on `401`, retries on connection failure for idempotent
//! verbs, error translation and an optional timing log.

use std::collections::{BTreeMap, HashMap};
use std::time::{Duration, Instant};

use reqwest::header::ACCEPT;
use reqwest::{Client, Method, Response};
use serde_json::Value;
use tracing::{debug, error, trace, warn};
use url::Url;

use crate::client::{
    auth::{token_request_body, Credentials, Session, TenantScope},
    catalog::{EndpointFilter, Interface},
    error::{ApiError, ClientError},
};

pub const AUTH_TOKEN_HEADER: &str = "X-Auth-Token";
pub const API_VERSION_HEADER: &str = "OpenStack-API-Version";
pub const DEFAULT_USER_AGENT: &str = concat!("oscli/", env!("CARGO_PKG_VERSION"));

/// Settings for an [`HttpClient`]
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Identity service URL used to obtain tokens
    pub auth_url: Option<Url>,
    pub credentials: Option<Credentials>,
    pub scope: TenantScope,
    pub region_name: Option<String>,
    pub service_name: Option<String>,
    pub interface: Interface,
    /// Fixed service URL bypassing the catalog
    pub endpoint_override: Option<Url>,
    /// Requested API microversion, sent with every service request
    pub api_version: Option<String>,
    /// Per-request timeout
    pub timeout: Duration,
    /// Extra attempts for idempotent requests when the connection fails
    pub retries: u32,
    pub retry_interval: Duration,
    pub insecure: bool,
    /// Whether to keep a log of request timings
    pub timings: bool,
    pub user_agent: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            auth_url: None,
            credentials: None,
            scope: TenantScope::default(),
            region_name: None,
            service_name: None,
            interface: Interface::Public,
            endpoint_override: None,
            api_version: None,
            timeout: Duration::from_secs(600),
            retries: 0,
            retry_interval: Duration::from_secs(2),
            insecure: false,
            timings: false,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

/// Authentication state of the client
#[derive(Debug, Clone, Default)]
pub enum AuthState {
    #[default]
    Unauthenticated,
    Authenticated(Session),
}

/// Timing of one HTTP exchange
#[derive(Debug, Clone, PartialEq)]
pub struct RequestTiming {
    pub method: String,
    pub url: String,
    /// `None` when no response was received
    pub status: Option<u16>,
    pub elapsed: Duration,
}

#[derive(Debug, Clone)]
enum RequestTarget {
    Path(Vec<String>),
    Url(Url),
}

/// A request against one of the cloud services
#[derive(Debug, Clone)]
pub struct ApiRequest {
    method: Method,
    service_type: String,
    target: RequestTarget,
    query: BTreeMap<String, String>,
    body: Option<Value>,
}

impl ApiRequest {
    /// A request to `path` below the endpoint of `service_type`.
    pub fn new<I, S>(method: Method, service_type: &str, path: I) -> ApiRequest
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        ApiRequest {
            method,
            service_type: service_type.to_string(),
            target: RequestTarget::Path(path.into_iter().map(Into::into).collect()),
            query: BTreeMap::new(),
            body: None,
        }
    }

    /// A request to an absolute URL handed out by the service (e.g. a `next` link).
    pub fn absolute(method: Method, service_type: &str, url: Url) -> ApiRequest {
        ApiRequest {
            method,
            service_type: service_type.to_string(),
            target: RequestTarget::Url(url),
            query: BTreeMap::new(),
            body: None,
        }
    }

    pub fn get<I, S>(service_type: &str, path: I) -> ApiRequest
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(Method::GET, service_type, path)
    }

    pub fn post<I, S>(service_type: &str, path: I) -> ApiRequest
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(Method::POST, service_type, path)
    }

    pub fn put<I, S>(service_type: &str, path: I) -> ApiRequest
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(Method::PUT, service_type, path)
    }

    pub fn delete<I, S>(service_type: &str, path: I) -> ApiRequest
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(Method::DELETE, service_type, path)
    }

    /// Query parameters; encoded sorted by key.
    pub fn with_query(mut self, query: BTreeMap<String, String>) -> Self {
        self.query = query;
        self
    }

    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn service_type(&self) -> &str {
        &self.service_type
    }

    pub fn query(&self) -> &BTreeMap<String, String> {
        &self.query
    }

    pub fn body(&self) -> Option<&Value> {
        self.body.as_ref()
    }

    /// Idempotent requests may be retried when the connection fails.
    pub fn is_idempotent(&self) -> bool {
        matches!(
            self.method,
            Method::GET | Method::HEAD | Method::PUT | Method::DELETE | Method::OPTIONS
        )
    }
}

/// HTTP client holding the authentication session for a sequence of requests
pub struct HttpClient {
    client: Client,
    config: ClientConfig,
    state: AuthState,
    endpoints: HashMap<EndpointFilter, Url>,
    timings: Vec<RequestTiming>,
}

impl HttpClient {
    /// Create a new HTTP client with the given configuration
    pub fn new(config: ClientConfig) -> Result<Self, ClientError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent.as_str())
            .danger_accept_invalid_certs(config.insecure)
            .build()?;

        Ok(Self {
            client,
            config,
            state: AuthState::Unauthenticated,
            endpoints: HashMap::new(),
            timings: Vec::new(),
        })
    }

    /// Get a reference to the HTTP client configuration
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn state(&self) -> &AuthState {
        &self.state
    }

    pub fn session(&self) -> Option<&Session> {
        match &self.state {
            AuthState::Authenticated(session) => Some(session),
            AuthState::Unauthenticated => None,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.session().is_some()
    }

    /// Resume a previously obtained session (e.g. from the token cache).
    pub fn restore_session(&mut self, session: Session) {
        debug!("Restoring cached session");
        self.endpoints.clear();
        self.state = AuthState::Authenticated(session);
    }

    /// Drop the session, the endpoint cache and the timing log.
    pub fn close(&mut self) {
        debug!("Closing session");
        self.state = AuthState::Unauthenticated;
        self.endpoints.clear();
        self.timings.clear();
    }

    pub fn timings(&self) -> &[RequestTiming] {
        &self.timings
    }

    pub fn reset_timings(&mut self) {
        self.timings.clear();
    }

    /// A token supplied together with a fixed endpoint is used as-is and
    /// cannot be refreshed.
    fn uses_token_bypass(&self) -> bool {
        matches!(self.config.credentials, Some(Credentials::Token(_)))
            && self.config.endpoint_override.is_some()
    }

    fn can_reauthenticate(&self) -> bool {
        !self.uses_token_bypass() && self.config.credentials.is_some()
    }

    /// Obtain a new token, replacing the current session and endpoint cache.
    pub async fn authenticate(&mut self) -> Result<(), ClientError> {
        self.state = AuthState::Unauthenticated;
        self.endpoints.clear();

        if self.uses_token_bypass() {
            if let Some(Credentials::Token(token)) = &self.config.credentials {
                debug!("Using the supplied token against a fixed endpoint");
                let session = Session::from_token(token, self.config.scope.tenant_id.clone());
                self.state = AuthState::Authenticated(session);
            }
            return Ok(());
        }

        let auth_url = self.config.auth_url.clone().ok_or_else(|| {
            ClientError::AuthorizationFailure("no authentication URL configured".to_string())
        })?;
        let credentials = self.config.credentials.as_ref().ok_or_else(|| {
            ClientError::AuthorizationFailure("no credentials configured".to_string())
        })?;
        if let Credentials::Password { username, password } = credentials {
            if password.is_empty() {
                return Err(ClientError::AuthorizationFailure(format!(
                    "no password given for user {}",
                    username
                )));
            }
        }

        let mut url = auth_url;
        append_path(&mut url, &["tokens".to_string()])?;
        let body = token_request_body(credentials, &self.config.scope);

        debug!("Authenticating against {}", url);
        let started = Instant::now();
        let response = self
            .client
            .post(url.clone())
            .header(ACCEPT, mime::APPLICATION_JSON.as_ref())
            .json(&body)
            .send()
            .await;
        let response = match response {
            Ok(response) => response,
            Err(e) => {
                self.record(&Method::POST, &url, None, started.elapsed());
                return Err(transport_error(&url, e));
            }
        };
        let status = response.status();
        self.record(&Method::POST, &url, Some(status.as_u16()), started.elapsed());

        let text = response.text().await?;
        if !status.is_success() {
            debug!("Authentication failed with status {}", status);
            return Err(ApiError::from_response(status, &text).into());
        }

        let session = Session::from_auth_response(&text)?;
        debug!(
            "Authenticated; token scoped to tenant {}",
            session.tenant_id.as_deref().unwrap_or("<none>")
        );
        self.state = AuthState::Authenticated(session);
        Ok(())
    }

    /// Authenticate unless a session is already held.
    pub async fn ensure_authenticated(&mut self) -> Result<(), ClientError> {
        if !self.is_authenticated() {
            self.authenticate().await?;
        }
        Ok(())
    }

    fn filter_for(&self, service_type: &str) -> EndpointFilter {
        EndpointFilter::new(service_type)
            .with_service_name(self.config.service_name.clone())
            .with_region(self.config.region_name.clone())
            .with_interface(self.config.interface)
    }

    fn endpoint_for(&mut self, service_type: &str) -> Result<Url, ClientError> {
        if let Some(url) = &self.config.endpoint_override {
            return Ok(url.clone());
        }

        let filter = self.filter_for(service_type);
        if let Some(url) = self.endpoints.get(&filter) {
            return Ok(url.clone());
        }

        let catalog = match &self.state {
            AuthState::Authenticated(session) => session.catalog.as_ref(),
            AuthState::Unauthenticated => {
                return Err(ClientError::AuthorizationFailure(
                    "not authenticated".to_string(),
                ))
            }
        };
        let url = catalog
            .ok_or_else(|| ClientError::EndpointNotFound {
                service_type: service_type.to_string(),
            })?
            .url_for(&filter)?;
        let url = Url::parse(&url)?;
        trace!("Resolved {} endpoint to {}", service_type, url);

        self.endpoints.insert(filter, url.clone());
        Ok(url)
    }

    /// Resolve the endpoint URL of a service, authenticating first if needed.
    pub async fn endpoint(&mut self, service_type: &str) -> Result<Url, ClientError> {
        self.ensure_authenticated().await?;
        self.endpoint_for(service_type)
    }

    fn build_url(&mut self, request: &ApiRequest) -> Result<Url, ClientError> {
        let mut url = match &request.target {
            RequestTarget::Url(url) => url.clone(),
            RequestTarget::Path(path) => {
                let mut url = self.endpoint_for(&request.service_type)?;
                append_path(&mut url, path)?;
                url
            }
        };
        if !request.query.is_empty() {
            url.query_pairs_mut().extend_pairs(request.query.iter());
        }
        Ok(url)
    }

    /// Execute a request, returning the decoded JSON body (`null` when empty).
    ///
    /// A `401` from an authenticated request triggers exactly one
    /// re-authentication followed by exactly one replay. When the replay is
    /// rejected as well, the original error is returned.
    pub async fn request(&mut self, request: &ApiRequest) -> Result<Value, ClientError> {
        self.ensure_authenticated().await?;

        match self.send_authenticated(request).await {
            Err(error) if error.is_unauthorized() && self.can_reauthenticate() => {
                warn!("Request was rejected as unauthorized, re-authenticating");
                if let Err(auth_error) = self.authenticate().await {
                    return Err(if auth_error.is_unauthorized() {
                        error
                    } else {
                        auth_error
                    });
                }
                match self.send_authenticated(request).await {
                    Err(retry_error) if retry_error.is_unauthorized() => Err(error),
                    result => result,
                }
            }
            result => result,
        }
    }

    async fn send_authenticated(&mut self, request: &ApiRequest) -> Result<Value, ClientError> {
        let token = self.session().map(|session| session.token.clone());
        let url = self.build_url(request)?;
        self.send(request, &url, token.as_deref()).await
    }

    async fn send(
        &mut self,
        request: &ApiRequest,
        url: &Url,
        token: Option<&str>,
    ) -> Result<Value, ClientError> {
        let attempts = if request.is_idempotent() {
            self.config.retries + 1
        } else {
            1
        };

        let mut attempt = 0;
        loop {
            attempt += 1;
            debug!("{} {}", request.method, url);

            let started = Instant::now();
            match self.prepare(request, url, token).send().await {
                Ok(response) => {
                    let status = response.status().as_u16();
                    self.record(&request.method, url, Some(status), started.elapsed());
                    return read_response(response).await;
                }
                Err(e) if e.is_connect() && attempt < attempts => {
                    self.record(&request.method, url, None, started.elapsed());
                    warn!(
                        "Connection to {} failed (attempt {} of {}), retrying in {:?}",
                        url, attempt, attempts, self.config.retry_interval
                    );
                    tokio::time::sleep(self.config.retry_interval).await;
                }
                Err(e) => {
                    self.record(&request.method, url, None, started.elapsed());
                    return Err(transport_error(url, e));
                }
            }
        }
    }

    fn prepare(&self, request: &ApiRequest, url: &Url, token: Option<&str>) -> reqwest::RequestBuilder {
        let mut builder = self
            .client
            .request(request.method.clone(), url.clone())
            .header(ACCEPT, mime::APPLICATION_JSON.as_ref());

        if let Some(token) = token {
            builder = builder.header(AUTH_TOKEN_HEADER, token);
        }
        if let Some(version) = &self.config.api_version {
            builder = builder.header(
                API_VERSION_HEADER,
                format!("{} {}", request.service_type, version),
            );
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }
        builder
    }

    fn record(&mut self, method: &Method, url: &Url, status: Option<u16>, elapsed: Duration) {
        if self.config.timings {
            self.timings.push(RequestTiming {
                method: method.to_string(),
                url: url.to_string(),
                status,
                elapsed,
            });
        }
    }
}

fn transport_error(url: &Url, error: reqwest::Error) -> ClientError {
    if error.is_connect() {
        ClientError::ConnectionFailed {
            url: url.to_string(),
            source: error,
        }
    } else {
        ClientError::HttpError(error)
    }
}

async fn read_response(response: Response) -> Result<Value, ClientError> {
    let status = response.status();
    let text = response.text().await?;

    if !status.is_success() {
        debug!("Request failed with status {}", status);
        return Err(ApiError::from_response(status, &text).into());
    }
    if text.trim().is_empty() {
        return Ok(Value::Null);
    }

    trace!("Raw response text for deserialization: {}", text);
    serde_json::from_str(&text).map_err(|e| {
        error!("Failed to deserialize response: {}", e);
        ClientError::JsonError(e)
    })
}

fn append_path(url: &mut Url, path: &[String]) -> Result<(), ClientError> {
    url.path_segments_mut()
        .map_err(|_| ClientError::InvalidUrl(url::ParseError::RelativeUrlWithCannotBeABaseBase))?
        .pop_if_empty()
        .extend(path);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_config_default() {
        let config = ClientConfig::default();
        assert_eq!(config.retries, 0);
        assert_eq!(config.interface, Interface::Public);
        assert!(!config.timings);
        assert!(config.user_agent.starts_with("oscli/"));
    }

    #[test]
    fn test_idempotent_verbs() {
        assert!(ApiRequest::get("volume", ["volumes"]).is_idempotent());
        assert!(ApiRequest::put("volume", ["volumes", "v1"]).is_idempotent());
        assert!(ApiRequest::delete("volume", ["volumes", "v1"]).is_idempotent());
        assert!(!ApiRequest::post("volume", ["volumes"]).is_idempotent());
    }

    #[test]
    fn test_append_path_escapes_segments() {
        let mut url = Url::parse("http://cloud.example/v2/").unwrap();
        append_path(&mut url, &["volumes".to_string(), "a b/c".to_string()]).unwrap();
        assert_eq!(url.as_str(), "http://cloud.example/v2/volumes/a%20b%2Fc");
    }

    #[test]
    fn test_new_client_is_unauthenticated() {
        let client = HttpClient::new(ClientConfig::default()).unwrap();
        assert!(!client.is_authenticated());
        assert!(client.timings().is_empty());
    }

    #[test]
    fn test_restore_and_close_session() {
        let mut client = HttpClient::new(ClientConfig::default()).unwrap();
        client.restore_session(Session::from_token("abc", None));
        assert!(client.is_authenticated());
        client.close();
        assert!(client.session().is_none());
    }

    #[tokio::test]
    async fn test_authenticate_without_auth_url_fails() {
        let config = ClientConfig {
            credentials: Some(Credentials::Password {
                username: "alice".to_string(),
                password: "secret".to_string(),
            }),
            ..ClientConfig::default()
        };
        let mut client = HttpClient::new(config).unwrap();
        let error = client.authenticate().await.unwrap_err();
        assert!(matches!(error, ClientError::AuthorizationFailure(_)));
    }
}
