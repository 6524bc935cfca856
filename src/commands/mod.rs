//! CLI command definitions and argument parsing.
//!
//! Every command group lives in its own module and is assembled here, along
//! with the connection options shared by all of them.

use clap::{Arg, ArgAction, ArgMatches, Command};

pub mod alarm;
pub mod auth;
pub mod config;
pub mod meter;
pub mod params;
pub mod server;
pub mod tenant;
pub mod user;
pub mod volume;

pub use params::{
    COMMAND_ALARM, COMMAND_AUTH, COMMAND_CONFIG, COMMAND_METER, COMMAND_SERVER, COMMAND_TENANT,
    COMMAND_USER, COMMAND_VOLUME, PARAMETER_VERBOSE,
};

/// Build the full command tree.
pub fn cli() -> Command {
    Command::new(env!("CARGO_PKG_NAME"))
        .version(env!("CARGO_PKG_VERSION"))
        .about(env!("CARGO_PKG_DESCRIPTION"))
        .propagate_version(true)
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new(PARAMETER_VERBOSE)
                .short('v')
                .long(PARAMETER_VERBOSE)
                .action(ArgAction::SetTrue)
                .global(true)
                .help("Enable verbose output for debugging"),
        )
        .args(params::connection_parameters())
        .subcommand(server::server_command())
        .subcommand(volume::volume_command())
        .subcommand(alarm::alarm_command())
        .subcommand(meter::meter_command())
        .subcommand(user::user_command())
        .subcommand(tenant::tenant_command())
        .subcommand(auth::auth_command())
        .subcommand(config::config_command())
}

/// Parse the process arguments, exiting with usage information on error.
pub fn create_cli_commands() -> ArgMatches {
    cli().get_matches()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_tree_is_consistent() {
        cli().debug_assert();
    }

    #[test]
    fn test_global_options_reach_subcommands() {
        let matches = cli()
            .try_get_matches_from([
                "oscli",
                "server",
                "list",
                "--os-region-name",
                "RegionTwo",
                "--status",
                "ACTIVE",
            ])
            .unwrap();
        let (_, group) = matches.subcommand().unwrap();
        let (_, list) = group.subcommand().unwrap();
        assert_eq!(
            list.get_one::<String>(params::PARAMETER_OS_REGION_NAME).map(String::as_str),
            Some("RegionTwo")
        );
        assert_eq!(
            list.get_one::<String>(params::PARAMETER_FORMAT).map(String::as_str),
            Some("table")
        );
    }

    #[test]
    fn test_unknown_format_is_rejected() {
        let result = cli().try_get_matches_from(["oscli", "volume", "list", "--format", "tree"]);
        assert!(result.is_err());
    }
}
