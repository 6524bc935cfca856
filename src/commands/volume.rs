//! Block storage volume command definitions.

use crate::commands::params::{
    all_pages_parameter, description_parameter, id_parameter, name_parameter, option_parameter,
    output_parameters, property_parameter, COMMAND_CREATE, COMMAND_DELETE, COMMAND_EXTEND,
    COMMAND_LIST, COMMAND_SHOW, COMMAND_UPDATE, COMMAND_VOLUME, PARAMETER_ALL_TENANTS,
    PARAMETER_AVAILABILITY_ZONE, PARAMETER_NEW_SIZE, PARAMETER_SIZE, PARAMETER_STATUS,
    PARAMETER_VOLUME_TYPE,
};
use clap::{Arg, ArgAction, Command};

/// Create the volume command with all its subcommands.
pub fn volume_command() -> Command {
    Command::new(COMMAND_VOLUME)
        .about("Manage block storage volumes")
        .subcommand_required(true)
        .subcommand(
            Command::new(COMMAND_LIST)
                .about("List volumes")
                .visible_alias("ls")
                .arg(name_parameter())
                .arg(option_parameter(PARAMETER_STATUS, "Only volumes in this status"))
                .arg(
                    Arg::new(PARAMETER_ALL_TENANTS)
                        .long(PARAMETER_ALL_TENANTS)
                        .action(ArgAction::SetTrue)
                        .help("List volumes of all tenants (admin only)"),
                )
                .arg(all_pages_parameter())
                .args(output_parameters()),
        )
        .subcommand(
            Command::new(COMMAND_SHOW)
                .about("Show volume details")
                .arg(id_parameter("Volume ID"))
                .args(output_parameters()),
        )
        .subcommand(
            Command::new(COMMAND_CREATE)
                .about("Create a volume")
                .arg(
                    Arg::new(PARAMETER_SIZE)
                        .long(PARAMETER_SIZE)
                        .num_args(1)
                        .required(true)
                        .value_parser(clap::value_parser!(u64).range(1..))
                        .help("Size in GiB"),
                )
                .arg(name_parameter())
                .arg(description_parameter())
                .arg(option_parameter(PARAMETER_VOLUME_TYPE, "Volume type"))
                .arg(option_parameter(PARAMETER_AVAILABILITY_ZONE, "Availability zone"))
                .arg(property_parameter())
                .args(output_parameters()),
        )
        .subcommand(
            Command::new(COMMAND_UPDATE)
                .about("Rename or describe a volume")
                .arg(id_parameter("Volume ID"))
                .arg(name_parameter())
                .arg(description_parameter())
                .args(output_parameters()),
        )
        .subcommand(
            Command::new(COMMAND_DELETE)
                .about("Delete a volume")
                .arg(id_parameter("Volume ID")),
        )
        .subcommand(
            Command::new(COMMAND_EXTEND)
                .about("Grow a volume")
                .arg(id_parameter("Volume ID"))
                .arg(
                    Arg::new(PARAMETER_NEW_SIZE)
                        .required(true)
                        .value_parser(clap::value_parser!(u64).range(1..))
                        .help("New size in GiB"),
                ),
        )
}
