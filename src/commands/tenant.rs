//! Tenant command definitions.
//!
//! This module defines CLI commands related to tenant management.

use crate::commands::params::{
    all_pages_parameter, description_parameter, enabled_parameter, id_parameter, name_parameter,
    output_parameters, COMMAND_CREATE, COMMAND_DELETE, COMMAND_LIST, COMMAND_SHOW,
    COMMAND_TENANT, COMMAND_UPDATE,
};
use clap::Command;

/// Create the tenant command with all its subcommands.
pub fn tenant_command() -> Command {
    Command::new(COMMAND_TENANT)
        .about("Manage tenants")
        .subcommand_required(true)
        .subcommand(
            Command::new(COMMAND_LIST)
                .about("List all tenants")
                .visible_alias("ls")
                .arg(name_parameter())
                .arg(all_pages_parameter())
                .args(output_parameters()),
        )
        .subcommand(
            Command::new(COMMAND_SHOW)
                .about("Show tenant details")
                .arg(id_parameter("Tenant ID"))
                .args(output_parameters()),
        )
        .subcommand(
            Command::new(COMMAND_CREATE)
                .about("Create a tenant")
                .arg(name_parameter().required(true))
                .arg(description_parameter())
                .arg(enabled_parameter())
                .args(output_parameters()),
        )
        .subcommand(
            Command::new(COMMAND_UPDATE)
                .about("Update a tenant")
                .arg(id_parameter("Tenant ID"))
                .arg(name_parameter())
                .arg(description_parameter())
                .arg(enabled_parameter())
                .args(output_parameters()),
        )
        .subcommand(
            Command::new(COMMAND_DELETE)
                .about("Delete a tenant")
                .arg(id_parameter("Tenant ID")),
        )
}
