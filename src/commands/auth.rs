//! Authentication command definitions.
//!
//! This module defines CLI commands related to authentication and session management.

use crate::commands::params::{
    output_parameters, COMMAND_AUTH, COMMAND_CATALOG, COMMAND_ENDPOINT, COMMAND_LOGIN,
    COMMAND_LOGOUT, COMMAND_TOKEN, PARAMETER_SERVICE_TYPE,
};
use clap::{Arg, Command};

/// Create the authentication command with all its subcommands.
pub fn auth_command() -> Command {
    Command::new(COMMAND_AUTH)
        .about("Authentication operations")
        .subcommand_required(true)
        .subcommand(
            Command::new(COMMAND_LOGIN)
                .about("Authenticate and cache the token in the OS keyring"),
        )
        .subcommand(
            Command::new(COMMAND_LOGOUT).about("Forget the cached token"),
        )
        .subcommand(
            Command::new(COMMAND_TOKEN)
                .about("Show the current token")
                .args(output_parameters()),
        )
        .subcommand(
            Command::new(COMMAND_CATALOG)
                .about("List the endpoints in the service catalog")
                .args(output_parameters()),
        )
        .subcommand(
            Command::new(COMMAND_ENDPOINT)
                .about("Resolve the endpoint URL of a service type")
                .arg(
                    Arg::new(PARAMETER_SERVICE_TYPE)
                        .required(true)
                        .help("Service type (e.g. volume, identity)"),
                ),
        )
}
