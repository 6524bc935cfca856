//! Bare-metal server command definitions.

use crate::commands::params::{
    all_pages_parameter, id_parameter, name_parameter, option_parameter, output_parameters,
    property_parameter, COMMAND_CREATE, COMMAND_DELETE, COMMAND_LIST, COMMAND_REBOOT,
    COMMAND_SERVER, COMMAND_SHOW, COMMAND_START, COMMAND_STOP, COMMAND_UPDATE, PARAMETER_FLAVOR,
    PARAMETER_HARD, PARAMETER_HOST, PARAMETER_IMAGE, PARAMETER_STATUS,
};
use clap::{Arg, ArgAction, Command};

/// Create the server command with all its subcommands.
pub fn server_command() -> Command {
    Command::new(COMMAND_SERVER)
        .about("Manage bare-metal servers")
        .subcommand_required(true)
        .subcommand(
            Command::new(COMMAND_LIST)
                .about("List servers")
                .visible_alias("ls")
                .arg(name_parameter())
                .arg(option_parameter(PARAMETER_STATUS, "Only servers in this status"))
                .arg(option_parameter(PARAMETER_HOST, "Only servers on this host"))
                .arg(all_pages_parameter())
                .args(output_parameters()),
        )
        .subcommand(
            Command::new(COMMAND_SHOW)
                .about("Show server details")
                .arg(id_parameter("Server ID"))
                .args(output_parameters()),
        )
        .subcommand(
            Command::new(COMMAND_CREATE)
                .about("Provision a server")
                .arg(name_parameter().required(true))
                .arg(option_parameter(PARAMETER_IMAGE, "Image to deploy"))
                .arg(option_parameter(PARAMETER_FLAVOR, "Hardware flavor"))
                .arg(option_parameter(PARAMETER_HOST, "Target host"))
                .arg(property_parameter())
                .args(output_parameters()),
        )
        .subcommand(
            Command::new(COMMAND_UPDATE)
                .about("Update server attributes")
                .arg(id_parameter("Server ID"))
                .arg(name_parameter())
                .arg(option_parameter(PARAMETER_HOST, "New host"))
                .args(output_parameters()),
        )
        .subcommand(
            Command::new(COMMAND_DELETE)
                .about("Delete a server")
                .arg(id_parameter("Server ID")),
        )
        .subcommand(
            Command::new(COMMAND_START)
                .about("Power a server on")
                .arg(id_parameter("Server ID")),
        )
        .subcommand(
            Command::new(COMMAND_STOP)
                .about("Power a server off")
                .arg(id_parameter("Server ID")),
        )
        .subcommand(
            Command::new(COMMAND_REBOOT)
                .about("Reboot a server")
                .arg(id_parameter("Server ID"))
                .arg(
                    Arg::new(PARAMETER_HARD)
                        .long(PARAMETER_HARD)
                        .action(ArgAction::SetTrue)
                        .help("Perform a hard reboot"),
                ),
        )
}
