//! Bare-metal server actions.

use clap::ArgMatches;

use crate::{
    actions::{
        utils::{
            optional_string, paginate, print_formatted, print_updated, properties,
            required_string, resource_id,
        },
        CliActionError,
    },
    commands::params::{
        PARAMETER_FLAVOR, PARAMETER_HARD, PARAMETER_HOST, PARAMETER_IMAGE, PARAMETER_NAME,
        PARAMETER_STATUS,
    },
    context::ExecutionContext,
    services::baremetal::{RebootType, ServerCreate, ServerFilters, ServerManager, ServerUpdate},
};

pub async fn list_servers(
    ctx: &mut ExecutionContext,
    matches: &ArgMatches,
) -> Result<(), CliActionError> {
    let filters = ServerFilters {
        name: optional_string(matches, PARAMETER_NAME),
        status: optional_string(matches, PARAMETER_STATUS),
        host: optional_string(matches, PARAMETER_HOST),
    };
    let servers = ServerManager::default()
        .list(ctx.client(), &filters, paginate(matches))
        .await?;
    print_formatted(&servers, matches)
}

pub async fn show_server(
    ctx: &mut ExecutionContext,
    matches: &ArgMatches,
) -> Result<(), CliActionError> {
    let id = resource_id(matches)?;
    let server = ServerManager::default().get(ctx.client(), &id).await?;
    print_formatted(&server, matches)
}

pub async fn create_server(
    ctx: &mut ExecutionContext,
    matches: &ArgMatches,
) -> Result<(), CliActionError> {
    let server = ServerCreate {
        name: required_string(matches, PARAMETER_NAME)?,
        image: optional_string(matches, PARAMETER_IMAGE),
        flavor: optional_string(matches, PARAMETER_FLAVOR),
        host: optional_string(matches, PARAMETER_HOST),
        metadata: properties(matches),
    };
    let server = ServerManager::default().create(ctx.client(), &server).await?;
    print_formatted(&server, matches)
}

pub async fn update_server(
    ctx: &mut ExecutionContext,
    matches: &ArgMatches,
) -> Result<(), CliActionError> {
    let id = resource_id(matches)?;
    let update = ServerUpdate {
        name: optional_string(matches, PARAMETER_NAME),
        host: optional_string(matches, PARAMETER_HOST),
    };
    let updated = ServerManager::default()
        .update(ctx.client(), &id, &update)
        .await?;
    print_updated(updated, "server", &id, matches)
}

pub async fn delete_server(
    ctx: &mut ExecutionContext,
    matches: &ArgMatches,
) -> Result<(), CliActionError> {
    let id = resource_id(matches)?;
    ServerManager::default().delete(ctx.client(), &id).await?;
    println!("Server {} deleted", id);
    Ok(())
}

pub async fn start_server(
    ctx: &mut ExecutionContext,
    matches: &ArgMatches,
) -> Result<(), CliActionError> {
    let id = resource_id(matches)?;
    ServerManager::default().start(ctx.client(), &id).await?;
    println!("Start of server {} requested", id);
    Ok(())
}

pub async fn stop_server(
    ctx: &mut ExecutionContext,
    matches: &ArgMatches,
) -> Result<(), CliActionError> {
    let id = resource_id(matches)?;
    ServerManager::default().stop(ctx.client(), &id).await?;
    println!("Stop of server {} requested", id);
    Ok(())
}

pub async fn reboot_server(
    ctx: &mut ExecutionContext,
    matches: &ArgMatches,
) -> Result<(), CliActionError> {
    let id = resource_id(matches)?;
    let reboot_type = if matches.get_flag(PARAMETER_HARD) {
        RebootType::Hard
    } else {
        RebootType::Soft
    };
    ServerManager::default()
        .reboot(ctx.client(), &id, reboot_type)
        .await?;
    println!("{} reboot of server {} requested", reboot_type, id);
    Ok(())
}
