//! User command definitions.

use crate::commands::params::{
    all_pages_parameter, enabled_parameter, id_parameter, name_parameter, option_parameter,
    output_parameters, COMMAND_CREATE, COMMAND_DELETE, COMMAND_LIST, COMMAND_SHOW,
    COMMAND_UPDATE, COMMAND_USER, PARAMETER_EMAIL, PARAMETER_PASSWORD, PARAMETER_TENANT_ID,
    PARAMETER_WITH_TENANT,
};
use clap::{Arg, ArgAction, Command};

/// Create the user command with all its subcommands.
pub fn user_command() -> Command {
    Command::new(COMMAND_USER)
        .about("Manage identity users")
        .subcommand_required(true)
        .subcommand(
            Command::new(COMMAND_LIST)
                .about("List users")
                .visible_alias("ls")
                .arg(option_parameter(PARAMETER_TENANT_ID, "Only users of this tenant"))
                .arg(name_parameter())
                .arg(all_pages_parameter())
                .args(output_parameters()),
        )
        .subcommand(
            Command::new(COMMAND_SHOW)
                .about("Show user details")
                .arg(id_parameter("User ID"))
                .arg(
                    Arg::new(PARAMETER_WITH_TENANT)
                        .long(PARAMETER_WITH_TENANT)
                        .action(ArgAction::SetTrue)
                        .help("Also fetch and show the user's tenant"),
                )
                .args(output_parameters()),
        )
        .subcommand(
            Command::new(COMMAND_CREATE)
                .about("Create a user")
                .arg(name_parameter().required(true))
                .arg(option_parameter(PARAMETER_PASSWORD, "Initial password"))
                .arg(option_parameter(PARAMETER_EMAIL, "Email address"))
                .arg(option_parameter(PARAMETER_TENANT_ID, "Default tenant"))
                .arg(enabled_parameter())
                .args(output_parameters()),
        )
        .subcommand(
            Command::new(COMMAND_UPDATE)
                .about("Update a user")
                .arg(id_parameter("User ID"))
                .arg(name_parameter())
                .arg(option_parameter(PARAMETER_EMAIL, "Email address"))
                .arg(enabled_parameter())
                .args(output_parameters()),
        )
        .subcommand(
            Command::new(COMMAND_DELETE)
                .about("Delete a user")
                .arg(id_parameter("User ID")),
        )
}
