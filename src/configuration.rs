use crate::format::{to_csv, to_json, to_table, Formattable, FormattingError, OutputFormat};
use dirs::config_dir;
use serde::{Deserialize, Serialize};
use std::{
    fs::{self, File},
    io::{ErrorKind, Write},
    path::{Path, PathBuf},
};
use tracing::debug;

pub const DEFAULT_APPLICATION_ID: &str = "oscli";
pub const DEFAULT_CONFIGURATION_FILE_NAME: &str = "config.yml";
pub const CONFIGURATION_DIRECTORY_ENV: &str = "OSCLI_CONFIG_DIR";

type Cause = Box<dyn std::error::Error + Send + Sync>;

#[derive(Debug, thiserror::Error)]
pub enum ConfigurationError {
    #[error("failed to resolve the configuration directory")]
    FailedToFindConfigurationDirectory,
    #[error("failed to load configuration data from {path:?}, because of: {cause}")]
    FailedToLoadData { path: PathBuf, cause: Cause },
    #[error("failed to write configuration data, because of: {cause}")]
    FailedToWriteData { cause: Cause },
    #[error("{cause}")]
    FormattingError {
        #[from]
        cause: FormattingError,
    },
}

/// Defaults for the connection options, overridden by command line flags and
/// `OS_*` environment variables.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Configuration {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auth_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tenant_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tenant_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub region_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub endpoint_type: Option<String>,
    /// Request timeout in seconds
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub retries: Option<u32>,
    /// Cache the session token in the OS keyring
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cache: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub insecure: Option<bool>,
}

impl Configuration {
    pub fn get_default_configuration_file_path() -> Result<PathBuf, ConfigurationError> {
        if let Ok(config_dir_str) = std::env::var(CONFIGURATION_DIRECTORY_ENV) {
            let mut config_path = PathBuf::from(config_dir_str);
            config_path.push(DEFAULT_CONFIGURATION_FILE_NAME);
            return Ok(config_path);
        }

        match config_dir() {
            Some(mut path) => {
                path.push(DEFAULT_APPLICATION_ID);
                path.push(DEFAULT_CONFIGURATION_FILE_NAME);
                Ok(path)
            }
            None => Err(ConfigurationError::FailedToFindConfigurationDirectory),
        }
    }

    /// Load the default configuration file; a missing file yields the defaults.
    pub fn load_default() -> Result<Configuration, ConfigurationError> {
        let path = Configuration::get_default_configuration_file_path()?;
        debug!("Loading configuration from {}...", path.display());
        Configuration::load_or_default(&path)
    }

    pub fn load_or_default(path: &Path) -> Result<Configuration, ConfigurationError> {
        match fs::read_to_string(path) {
            Ok(text) => Configuration::parse(path, &text),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("Configuration file not found, using defaults");
                Ok(Configuration::default())
            }
            Err(cause) => Err(ConfigurationError::FailedToLoadData {
                path: path.to_path_buf(),
                cause: Box::new(cause),
            }),
        }
    }

    /// Load a configuration file that must exist.
    pub fn load_from_file(path: &Path) -> Result<Configuration, ConfigurationError> {
        let text = fs::read_to_string(path).map_err(|cause| ConfigurationError::FailedToLoadData {
            path: path.to_path_buf(),
            cause: Box::new(cause),
        })?;
        Configuration::parse(path, &text)
    }

    fn parse(path: &Path, text: &str) -> Result<Configuration, ConfigurationError> {
        if text.trim().is_empty() {
            return Ok(Configuration::default());
        }
        serde_yaml::from_str(text).map_err(|cause| ConfigurationError::FailedToLoadData {
            path: path.to_path_buf(),
            cause: Box::new(cause),
        })
    }

    pub fn write<W: Write>(&self, writer: W) -> Result<(), ConfigurationError> {
        serde_yaml::to_writer(writer, self)
            .map_err(|e| ConfigurationError::FailedToWriteData { cause: Box::new(e) })
    }

    pub fn save(&self, path: &Path) -> Result<(), ConfigurationError> {
        let directory = path
            .parent()
            .ok_or(ConfigurationError::FailedToFindConfigurationDirectory)?;
        fs::create_dir_all(directory)
            .map_err(|_| ConfigurationError::FailedToFindConfigurationDirectory)?;

        let file = File::create(path)
            .map_err(|e| ConfigurationError::FailedToWriteData { cause: Box::new(e) })?;
        self.write(file)
    }

    pub fn save_to_default(&self) -> Result<(), ConfigurationError> {
        self.save(&Self::get_default_configuration_file_path()?)
    }

    fn properties(&self) -> Vec<(&'static str, String)> {
        let text = |value: &Option<String>| value.clone().unwrap_or_default();
        let number = |value: Option<u64>| value.map(|v| v.to_string()).unwrap_or_default();
        let flag = |value: Option<bool>| value.map(|v| v.to_string()).unwrap_or_default();
        vec![
            ("auth_url", text(&self.auth_url)),
            ("username", text(&self.username)),
            ("tenant_name", text(&self.tenant_name)),
            ("tenant_id", text(&self.tenant_id)),
            ("region_name", text(&self.region_name)),
            ("endpoint_type", text(&self.endpoint_type)),
            ("timeout", number(self.timeout)),
            ("retries", number(self.retries.map(u64::from))),
            ("cache", flag(self.cache)),
            ("insecure", flag(self.insecure)),
        ]
    }
}

impl Formattable for Configuration {
    fn format(&self, f: &OutputFormat) -> Result<String, FormattingError> {
        let properties = self.properties();
        match f {
            OutputFormat::Table(_) => {
                let rows = properties
                    .into_iter()
                    .map(|(name, value)| vec![name.to_string(), value])
                    .collect();
                Ok(to_table(&["Property", "Value"], rows))
            }
            OutputFormat::Json(options) => to_json(self, options),
            OutputFormat::Csv(options) => {
                let (header, row): (Vec<&str>, Vec<String>) = properties.into_iter().unzip();
                to_csv(&header, vec![row], options)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::OutputFormatOptions;
    use tempfile::TempDir;

    fn sample() -> Configuration {
        Configuration {
            auth_url: Some("https://identity.example.com/v2.0".to_string()),
            username: Some("alice".to_string()),
            tenant_name: Some("demo".to_string()),
            retries: Some(2),
            cache: Some(true),
            ..Configuration::default()
        }
    }

    #[test]
    fn test_save_and_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join(DEFAULT_CONFIGURATION_FILE_NAME);
        sample().save(&path).unwrap();
        assert_eq!(Configuration::load_from_file(&path).unwrap(), sample());
    }

    #[test]
    fn test_missing_file_yields_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(DEFAULT_CONFIGURATION_FILE_NAME);
        assert_eq!(Configuration::load_or_default(&path).unwrap(), Configuration::default());
        assert!(Configuration::load_from_file(&path).is_err());
    }

    #[test]
    fn test_partial_yaml() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(DEFAULT_CONFIGURATION_FILE_NAME);
        fs::write(&path, "region_name: RegionTwo\ntimeout: 30\n").unwrap();
        let configuration = Configuration::load_or_default(&path).unwrap();
        assert_eq!(configuration.region_name.as_deref(), Some("RegionTwo"));
        assert_eq!(configuration.timeout, Some(30));
        assert!(configuration.auth_url.is_none());
    }

    #[test]
    fn test_invalid_yaml_is_reported() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(DEFAULT_CONFIGURATION_FILE_NAME);
        fs::write(&path, "retries: [not, a, number]\n").unwrap();
        let error = Configuration::load_or_default(&path).unwrap_err();
        assert!(matches!(error, ConfigurationError::FailedToLoadData { .. }));
    }

    #[test]
    fn test_unset_values_are_not_written() {
        let mut buffer = Vec::new();
        Configuration {
            username: Some("alice".to_string()),
            ..Configuration::default()
        }
        .write(&mut buffer)
        .unwrap();
        assert_eq!(String::from_utf8(buffer).unwrap(), "username: alice\n");
    }

    #[test]
    fn test_csv_output() {
        let options = OutputFormatOptions {
            with_headers: true,
            pretty: false,
        };
        let csv = sample().format(&OutputFormat::Csv(options)).unwrap();
        let mut lines = csv.lines();
        assert!(lines.next().unwrap().starts_with("AUTH_URL,USERNAME"));
        assert!(lines.next().unwrap().contains("alice"));
    }
}
