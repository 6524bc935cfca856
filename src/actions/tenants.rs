//! Tenant action implementations.

use clap::ArgMatches;

use crate::{
    actions::{
        utils::{optional_string, paginate, print_formatted, print_updated, resource_id},
        CliActionError,
    },
    commands::params::{PARAMETER_DESCRIPTION, PARAMETER_ENABLED, PARAMETER_NAME},
    context::ExecutionContext,
    services::identity::{TenantFields, TenantManager},
};

fn tenant_fields(matches: &ArgMatches) -> TenantFields {
    TenantFields {
        name: optional_string(matches, PARAMETER_NAME),
        description: optional_string(matches, PARAMETER_DESCRIPTION),
        enabled: matches.get_one::<bool>(PARAMETER_ENABLED).copied(),
    }
}

pub async fn list_tenants(
    ctx: &mut ExecutionContext,
    matches: &ArgMatches,
) -> Result<(), CliActionError> {
    let tenants = TenantManager::default()
        .list(
            ctx.client(),
            optional_string(matches, PARAMETER_NAME),
            paginate(matches),
        )
        .await?;
    print_formatted(&tenants, matches)
}

pub async fn show_tenant(
    ctx: &mut ExecutionContext,
    matches: &ArgMatches,
) -> Result<(), CliActionError> {
    let id = resource_id(matches)?;
    let tenant = TenantManager::default().get(ctx.client(), &id).await?;
    print_formatted(&tenant, matches)
}

pub async fn create_tenant(
    ctx: &mut ExecutionContext,
    matches: &ArgMatches,
) -> Result<(), CliActionError> {
    let tenant = TenantManager::default()
        .create(ctx.client(), &tenant_fields(matches))
        .await?;
    print_formatted(&tenant, matches)
}

pub async fn update_tenant(
    ctx: &mut ExecutionContext,
    matches: &ArgMatches,
) -> Result<(), CliActionError> {
    let id = resource_id(matches)?;
    let updated = TenantManager::default()
        .update(ctx.client(), &id, &tenant_fields(matches))
        .await?;
    print_updated(updated, "tenant", &id, matches)
}

pub async fn delete_tenant(
    ctx: &mut ExecutionContext,
    matches: &ArgMatches,
) -> Result<(), CliActionError> {
    let id = resource_id(matches)?;
    TenantManager::default().delete(ctx.client(), &id).await?;
    println!("Tenant {} deleted", id);
    Ok(())
}
