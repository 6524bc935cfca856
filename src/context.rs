//! Execution context for commands that talk to the cloud.
//!
//! Merges the configuration file with the command line, builds the
//! [`HttpClient`] and takes care of the keyring token cache around it.

use std::io::IsTerminal;
use std::str::FromStr;
use std::time::Duration;

use clap::ArgMatches;
use tracing::{debug, warn};
use url::Url;

use crate::{
    actions::CliActionError,
    client::{ClientConfig, Credentials, HttpClient, Interface, Session, TenantScope},
    commands::params::{
        PARAMETER_INSECURE, PARAMETER_OS_API_VERSION, PARAMETER_OS_AUTH_URL, PARAMETER_OS_CACHE,
        PARAMETER_OS_ENDPOINT_TYPE, PARAMETER_OS_PASSWORD, PARAMETER_OS_REGION_NAME,
        PARAMETER_OS_SERVICE_NAME, PARAMETER_OS_TENANT_ID, PARAMETER_OS_TENANT_NAME,
        PARAMETER_OS_TOKEN, PARAMETER_OS_URL, PARAMETER_OS_USERNAME, PARAMETER_RETRIES,
        PARAMETER_TIMEOUT, PARAMETER_TIMINGS,
    },
    configuration::Configuration,
    keyring::Keyring,
};

/// Execution context containing common resources needed by CLI commands.
pub struct ExecutionContext {
    pub configuration: Configuration,
    pub client: HttpClient,
    cache_key: Option<String>,
    use_cache: bool,
    restored: bool,
}

fn string_arg(matches: &ArgMatches, name: &str) -> Option<String> {
    matches.get_one::<String>(name).cloned()
}

fn flag_arg(matches: &ArgMatches, name: &str) -> bool {
    matches.get_one::<bool>(name).copied().unwrap_or(false)
}

fn session_cache_key(config: &ClientConfig) -> Option<String> {
    config.auth_url.as_ref().map(|auth_url| {
        let username = match &config.credentials {
            Some(Credentials::Password { username, .. }) => Some(username.as_str()),
            _ => None,
        };
        let tenant = config
            .scope
            .tenant_id
            .as_deref()
            .or(config.scope.tenant_name.as_deref());
        Keyring::session_key(auth_url.as_str(), username, tenant)
    })
}

/// A cached session is only reused while its token is still valid.
fn usable_session(cached: Option<Session>) -> Option<Session> {
    match cached {
        Some(session) if session.is_expired() => {
            debug!("Cached token has expired");
            None
        }
        other => other,
    }
}

impl ExecutionContext {
    /// Create a new execution context from command-line arguments.
    ///
    /// Command line values (including their `OS_*` environment fallbacks) take
    /// precedence over the configuration file.
    pub fn from_args(
        matches: &ArgMatches,
        configuration: Configuration,
    ) -> Result<Self, CliActionError> {
        let mut config = client_config(matches, &configuration)?;
        let use_cache = flag_arg(matches, PARAMETER_OS_CACHE) || configuration.cache.unwrap_or(false);
        let cache_key = session_cache_key(&config);

        let cached = match (&cache_key, use_cache) {
            (Some(key), true) => {
                let cached = Keyring::default().load_session(key).unwrap_or_else(|e| {
                    warn!("Cannot read the token cache: {}", e);
                    None
                });
                usable_session(cached)
            }
            _ => None,
        };

        if cached.is_none() {
            prompt_for_password(&mut config)?;
        }

        let mut client = HttpClient::new(config)?;
        let restored = cached.is_some();
        if let Some(session) = cached {
            client.restore_session(session);
        }

        Ok(ExecutionContext {
            configuration,
            client,
            cache_key,
            use_cache,
            restored,
        })
    }

    /// A context for managing the token cache only; it never prompts and
    /// never restores a session.
    pub fn without_credentials(
        matches: &ArgMatches,
        configuration: Configuration,
    ) -> Result<Self, CliActionError> {
        let config = client_config(matches, &configuration)?;
        let cache_key = session_cache_key(&config);
        Ok(ExecutionContext {
            configuration,
            client: HttpClient::new(config)?,
            cache_key,
            use_cache: false,
            restored: false,
        })
    }

    /// Get a mutable reference to the API client.
    pub fn client(&mut self) -> &mut HttpClient {
        &mut self.client
    }

    pub fn cache_key(&self) -> Option<&str> {
        self.cache_key.as_deref()
    }

    /// Whether the session was taken from the token cache.
    pub fn is_restored(&self) -> bool {
        self.restored
    }

    /// Store the current session in the keyring, when caching is enabled or
    /// `force` is set.
    pub fn save_session(&self, force: bool) -> Result<(), CliActionError> {
        if !(self.use_cache || force) {
            return Ok(());
        }
        if let (Some(key), Some(session)) = (&self.cache_key, self.client.session()) {
            debug!("Caching session token");
            Keyring::default().store_session(key, session)?;
        }
        Ok(())
    }

    /// Remove the cached session and drop the in-memory one.
    pub fn forget_session(&mut self) -> Result<(), CliActionError> {
        if let Some(key) = &self.cache_key {
            Keyring::default().delete(key)?;
        }
        self.client.close();
        self.restored = false;
        Ok(())
    }
}

/// Build the client settings from the command line and the configuration.
pub fn client_config(
    matches: &ArgMatches,
    configuration: &Configuration,
) -> Result<ClientConfig, CliActionError> {
    let defaults = ClientConfig::default();

    let auth_url = match string_arg(matches, PARAMETER_OS_AUTH_URL).or(configuration.auth_url.clone()) {
        Some(auth_url) => Some(Url::parse(&auth_url).map_err(|e| CliActionError::InvalidArgument {
            name: PARAMETER_OS_AUTH_URL.to_string(),
            reason: e.to_string(),
        })?),
        None => None,
    };

    let username = string_arg(matches, PARAMETER_OS_USERNAME).or(configuration.username.clone());
    let credentials = match (string_arg(matches, PARAMETER_OS_TOKEN), username) {
        (Some(token), _) => Some(Credentials::Token(token)),
        (None, Some(username)) => Some(Credentials::Password {
            username,
            password: string_arg(matches, PARAMETER_OS_PASSWORD).unwrap_or_default(),
        }),
        (None, None) => None,
    };

    let interface = match string_arg(matches, PARAMETER_OS_ENDPOINT_TYPE)
        .or(configuration.endpoint_type.clone())
    {
        Some(name) => Interface::from_str(&name).map_err(|reason| {
            CliActionError::InvalidArgument {
                name: PARAMETER_OS_ENDPOINT_TYPE.to_string(),
                reason,
            }
        })?,
        None => defaults.interface,
    };

    let timeout = matches
        .get_one::<u64>(PARAMETER_TIMEOUT)
        .copied()
        .or(configuration.timeout)
        .map(Duration::from_secs)
        .unwrap_or(defaults.timeout);
    let retries = matches
        .get_one::<u32>(PARAMETER_RETRIES)
        .copied()
        .or(configuration.retries)
        .unwrap_or(defaults.retries);

    Ok(ClientConfig {
        auth_url,
        credentials,
        scope: TenantScope {
            tenant_id: string_arg(matches, PARAMETER_OS_TENANT_ID).or(configuration.tenant_id.clone()),
            tenant_name: string_arg(matches, PARAMETER_OS_TENANT_NAME)
                .or(configuration.tenant_name.clone()),
        },
        region_name: string_arg(matches, PARAMETER_OS_REGION_NAME)
            .or(configuration.region_name.clone()),
        service_name: string_arg(matches, PARAMETER_OS_SERVICE_NAME),
        interface,
        endpoint_override: matches.get_one::<Url>(PARAMETER_OS_URL).cloned(),
        api_version: string_arg(matches, PARAMETER_OS_API_VERSION),
        timeout,
        retries,
        insecure: flag_arg(matches, PARAMETER_INSECURE) || configuration.insecure.unwrap_or(false),
        timings: flag_arg(matches, PARAMETER_TIMINGS),
        ..defaults
    })
}

/// Ask for the password when a user name was given without one.
fn prompt_for_password(config: &mut ClientConfig) -> Result<(), CliActionError> {
    if let Some(Credentials::Password { username, password }) = &mut config.credentials {
        if password.is_empty() {
            if !std::io::stdin().is_terminal() {
                return Err(CliActionError::MissingRequiredArgument(
                    PARAMETER_OS_PASSWORD.to_string(),
                ));
            }
            *password = inquire::Password::new(&format!("Password for {}:", username))
                .without_confirmation()
                .prompt()?;
        }
    }
    Ok(())
}
