//! Configuration command definitions.
//!
//! This module defines CLI commands related to configuration management.

use crate::commands::params::{
    file_parameter, output_file_parameter, output_parameters, COMMAND_CONFIG, COMMAND_EXPORT,
    COMMAND_IMPORT, COMMAND_PATH, COMMAND_SHOW,
};
use clap::Command;

/// Create the config command with all its subcommands.
pub fn config_command() -> Command {
    Command::new(COMMAND_CONFIG)
        .about("Configuration management")
        .subcommand_required(true)
        .subcommand(Command::new(COMMAND_PATH).about("Show configuration file path"))
        .subcommand(
            Command::new(COMMAND_SHOW)
                .about("Show the configured defaults")
                .args(output_parameters()),
        )
        .subcommand(
            Command::new(COMMAND_EXPORT)
                .about("Export configuration as YAML")
                .arg(output_file_parameter()),
        )
        .subcommand(
            Command::new(COMMAND_IMPORT)
                .about("Import configuration from a YAML file")
                .arg(file_parameter()),
        )
}
