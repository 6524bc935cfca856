//! Shared command parameters for all CLI commands.
//!
//! Parameter names and the factories for arguments used by more than one
//! command group live here.

use crate::client::Interface;
use crate::format::OutputFormat;
use clap::builder::BoolishValueParser;
use clap::{Arg, ArgAction};
use std::path::PathBuf;

// Command groups
pub const COMMAND_SERVER: &str = "server";
pub const COMMAND_VOLUME: &str = "volume";
pub const COMMAND_ALARM: &str = "alarm";
pub const COMMAND_METER: &str = "meter";
pub const COMMAND_USER: &str = "user";
pub const COMMAND_TENANT: &str = "tenant";
pub const COMMAND_AUTH: &str = "auth";
pub const COMMAND_CONFIG: &str = "config";

// CRUD operations
pub const COMMAND_LIST: &str = "list";
pub const COMMAND_SHOW: &str = "show";
pub const COMMAND_CREATE: &str = "create";
pub const COMMAND_UPDATE: &str = "update";
pub const COMMAND_DELETE: &str = "delete";

// Resource actions
pub const COMMAND_START: &str = "start";
pub const COMMAND_STOP: &str = "stop";
pub const COMMAND_REBOOT: &str = "reboot";
pub const COMMAND_EXTEND: &str = "extend";
pub const COMMAND_STATE: &str = "state";
pub const COMMAND_SAMPLES: &str = "samples";
pub const COMMAND_STATISTICS: &str = "statistics";

// Auth commands
pub const COMMAND_LOGIN: &str = "login";
pub const COMMAND_TOKEN: &str = "token";
pub const COMMAND_LOGOUT: &str = "logout";
pub const COMMAND_CATALOG: &str = "catalog";
pub const COMMAND_ENDPOINT: &str = "endpoint";

// Config commands
pub const COMMAND_PATH: &str = "path";
pub const COMMAND_EXPORT: &str = "export";
pub const COMMAND_IMPORT: &str = "import";

// Connection parameters, global to every command
pub const PARAMETER_VERBOSE: &str = "verbose";
pub const PARAMETER_OS_AUTH_URL: &str = "os-auth-url";
pub const PARAMETER_OS_USERNAME: &str = "os-username";
pub const PARAMETER_OS_PASSWORD: &str = "os-password";
pub const PARAMETER_OS_TENANT_NAME: &str = "os-tenant-name";
pub const PARAMETER_OS_TENANT_ID: &str = "os-tenant-id";
pub const PARAMETER_OS_TOKEN: &str = "os-token";
pub const PARAMETER_OS_URL: &str = "os-url";
pub const PARAMETER_OS_REGION_NAME: &str = "os-region-name";
pub const PARAMETER_OS_ENDPOINT_TYPE: &str = "os-endpoint-type";
pub const PARAMETER_OS_SERVICE_NAME: &str = "os-service-name";
pub const PARAMETER_OS_API_VERSION: &str = "os-api-version";
pub const PARAMETER_OS_CACHE: &str = "os-cache";
pub const PARAMETER_TIMEOUT: &str = "timeout";
pub const PARAMETER_RETRIES: &str = "retries";
pub const PARAMETER_TIMINGS: &str = "timings";
pub const PARAMETER_INSECURE: &str = "insecure";

// Output parameters
pub const PARAMETER_FORMAT: &str = "format";
pub const PARAMETER_PRETTY: &str = "pretty";
pub const PARAMETER_HEADERS: &str = "headers";

// Parameter names
pub const PARAMETER_ID: &str = "id";
pub const PARAMETER_NAME: &str = "name";
pub const PARAMETER_STATUS: &str = "status";
pub const PARAMETER_HOST: &str = "host";
pub const PARAMETER_ALL_PAGES: &str = "all-pages";
pub const PARAMETER_PROPERTY: &str = "property";
pub const PARAMETER_DESCRIPTION: &str = "description";
pub const PARAMETER_ENABLED: &str = "enabled";
pub const PARAMETER_IMAGE: &str = "image";
pub const PARAMETER_FLAVOR: &str = "flavor";
pub const PARAMETER_HARD: &str = "hard";
pub const PARAMETER_SIZE: &str = "size";
pub const PARAMETER_NEW_SIZE: &str = "new-size";
pub const PARAMETER_VOLUME_TYPE: &str = "volume-type";
pub const PARAMETER_AVAILABILITY_ZONE: &str = "availability-zone";
pub const PARAMETER_ALL_TENANTS: &str = "all-tenants";
pub const PARAMETER_STATE: &str = "state";
pub const PARAMETER_METER: &str = "meter";
pub const PARAMETER_METER_NAME: &str = "meter-name";
pub const PARAMETER_THRESHOLD: &str = "threshold";
pub const PARAMETER_COMPARISON_OPERATOR: &str = "comparison-operator";
pub const PARAMETER_STATISTIC: &str = "statistic";
pub const PARAMETER_PERIOD: &str = "period";
pub const PARAMETER_EVALUATION_PERIODS: &str = "evaluation-periods";
pub const PARAMETER_ALARM_ACTION: &str = "alarm-action";
pub const PARAMETER_RESOURCE_ID: &str = "resource-id";
pub const PARAMETER_PROJECT_ID: &str = "project-id";
pub const PARAMETER_LIMIT: &str = "limit";
pub const PARAMETER_TENANT_ID: &str = "tenant-id";
pub const PARAMETER_EMAIL: &str = "email";
pub const PARAMETER_PASSWORD: &str = "password";
pub const PARAMETER_WITH_TENANT: &str = "with-tenant";
pub const PARAMETER_SERVICE_TYPE: &str = "service-type";
pub const PARAMETER_OUTPUT: &str = "output";
pub const PARAMETER_FILE: &str = "file";

/// A global string option with an `OS_*` environment fallback.
fn connection_parameter(id: &'static str, env: &'static str, help: &'static str) -> Arg {
    Arg::new(id)
        .long(id)
        .num_args(1)
        .required(false)
        .global(true)
        .env(env)
        .help_heading("Connection")
        .help(help)
}

fn connection_flag(id: &'static str, env: &'static str, help: &'static str) -> Arg {
    Arg::new(id)
        .long(id)
        .action(ArgAction::SetTrue)
        .value_parser(BoolishValueParser::new())
        .global(true)
        .env(env)
        .help_heading("Connection")
        .help(help)
}

/// Options every command accepts for reaching the cloud.
pub fn connection_parameters() -> Vec<Arg> {
    vec![
        connection_parameter(
            PARAMETER_OS_AUTH_URL,
            "OS_AUTH_URL",
            "Identity service URL used to obtain a token",
        ),
        connection_parameter(PARAMETER_OS_USERNAME, "OS_USERNAME", "User name"),
        connection_parameter(PARAMETER_OS_PASSWORD, "OS_PASSWORD", "Password (prompted when missing)")
            .hide_env_values(true),
        connection_parameter(PARAMETER_OS_TENANT_NAME, "OS_TENANT_NAME", "Tenant to scope the token to"),
        connection_parameter(PARAMETER_OS_TENANT_ID, "OS_TENANT_ID", "Tenant ID to scope the token to"),
        connection_parameter(PARAMETER_OS_TOKEN, "OS_TOKEN", "Existing token to authenticate with")
            .hide_env_values(true),
        connection_parameter(
            PARAMETER_OS_URL,
            "OS_URL",
            "Service URL used instead of the catalog (requires --os-token to skip authentication)",
        )
        .value_parser(clap::value_parser!(url::Url)),
        connection_parameter(PARAMETER_OS_REGION_NAME, "OS_REGION_NAME", "Region of the endpoints"),
        connection_parameter(
            PARAMETER_OS_ENDPOINT_TYPE,
            "OS_ENDPOINT_TYPE",
            "Endpoint interface to use",
        )
        .value_parser(Interface::names()),
        connection_parameter(
            PARAMETER_OS_SERVICE_NAME,
            "OS_SERVICE_NAME",
            "Service name, when a service type has several entries",
        ),
        connection_parameter(
            PARAMETER_OS_API_VERSION,
            "OS_API_VERSION",
            "API microversion sent with every request",
        ),
        connection_parameter(PARAMETER_TIMEOUT, "OS_TIMEOUT", "Request timeout in seconds")
            .value_parser(clap::value_parser!(u64).range(1..)),
        connection_parameter(
            PARAMETER_RETRIES,
            "OS_RETRIES",
            "Retries of idempotent requests when the connection fails",
        )
        .value_parser(clap::value_parser!(u32)),
        connection_flag(PARAMETER_OS_CACHE, "OS_CACHE", "Cache the token in the OS keyring"),
        connection_flag(PARAMETER_INSECURE, "OS_INSECURE", "Do not verify TLS certificates"),
        Arg::new(PARAMETER_TIMINGS)
            .long(PARAMETER_TIMINGS)
            .action(ArgAction::SetTrue)
            .global(true)
            .help_heading("Connection")
            .help("Print the timing of every request"),
    ]
}

/// Create the format parameter.
pub fn format_parameter() -> Arg {
    Arg::new(PARAMETER_FORMAT)
        .short('f')
        .long(PARAMETER_FORMAT)
        .num_args(1)
        .required(false)
        .env("OSCLI_FORMAT")
        .default_value("table")
        .help("Output data format")
        .value_parser(OutputFormat::names())
}

pub fn format_pretty_parameter() -> Arg {
    Arg::new(PARAMETER_PRETTY)
        .long(PARAMETER_PRETTY)
        .action(ArgAction::SetTrue)
        .required(false)
        .help("Pretty-print JSON output")
}

pub fn format_with_headers_parameter() -> Arg {
    Arg::new(PARAMETER_HEADERS)
        .long(PARAMETER_HEADERS)
        .action(ArgAction::SetTrue)
        .required(false)
        .help("Include a header row in CSV output")
}

/// The three output arguments, added to every command that prints resources.
pub fn output_parameters() -> [Arg; 3] {
    [
        format_parameter(),
        format_pretty_parameter(),
        format_with_headers_parameter(),
    ]
}

/// Create the positional resource ID parameter.
pub fn id_parameter(help: &'static str) -> Arg {
    Arg::new(PARAMETER_ID).required(true).num_args(1).help(help)
}

/// Create an optional `--<id>` string option.
pub fn option_parameter(id: &'static str, help: &'static str) -> Arg {
    Arg::new(id).long(id).num_args(1).required(false).help(help)
}

pub fn name_parameter() -> Arg {
    option_parameter(PARAMETER_NAME, "Resource name").short('n')
}

pub fn description_parameter() -> Arg {
    option_parameter(PARAMETER_DESCRIPTION, "Description")
}

pub fn enabled_parameter() -> Arg {
    Arg::new(PARAMETER_ENABLED)
        .long(PARAMETER_ENABLED)
        .num_args(1)
        .required(false)
        .value_parser(clap::value_parser!(bool))
        .help("Enabled state (true or false)")
}

pub fn all_pages_parameter() -> Arg {
    Arg::new(PARAMETER_ALL_PAGES)
        .long(PARAMETER_ALL_PAGES)
        .action(ArgAction::SetTrue)
        .help("Follow pagination links and list every page")
}

pub fn property_parameter() -> Arg {
    Arg::new(PARAMETER_PROPERTY)
        .long(PARAMETER_PROPERTY)
        .action(ArgAction::Append)
        .value_parser(parse_property)
        .help("Metadata property as key=value (repeatable)")
}

pub fn output_file_parameter() -> Arg {
    Arg::new(PARAMETER_OUTPUT)
        .short('o')
        .long(PARAMETER_OUTPUT)
        .num_args(1)
        .required(false)
        .help("Output file path (default: standard output)")
        .value_parser(clap::value_parser!(PathBuf))
}

pub fn file_parameter() -> Arg {
    Arg::new(PARAMETER_FILE)
        .long(PARAMETER_FILE)
        .num_args(1)
        .required(true)
        .help("Input file path")
        .value_parser(clap::value_parser!(PathBuf))
}

/// Parse a `key=value` metadata property.
pub fn parse_property(value: &str) -> Result<(String, String), String> {
    match value.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() => {
            Ok((key.trim().to_string(), value.to_string()))
        }
        _ => Err(format!("expected key=value, got '{}'", value)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_property() {
        assert_eq!(
            parse_property("rack=r12").unwrap(),
            ("rack".to_string(), "r12".to_string())
        );
        assert_eq!(
            parse_property("note=a=b").unwrap(),
            ("note".to_string(), "a=b".to_string())
        );
        assert!(parse_property("novalue").is_err());
        assert!(parse_property("=x").is_err());
    }
}
