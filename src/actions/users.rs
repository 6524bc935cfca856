//! User action implementations.

use clap::ArgMatches;

use crate::{
    actions::{
        utils::{
            optional_string, paginate, print_formatted, print_updated, required_string,
            resource_id,
        },
        CliActionError,
    },
    commands::params::{
        PARAMETER_EMAIL, PARAMETER_ENABLED, PARAMETER_NAME, PARAMETER_PASSWORD,
        PARAMETER_TENANT_ID, PARAMETER_WITH_TENANT,
    },
    context::ExecutionContext,
    services::identity::{UserCreate, UserFilters, UserManager, UserUpdate},
};

pub async fn list_users(
    ctx: &mut ExecutionContext,
    matches: &ArgMatches,
) -> Result<(), CliActionError> {
    let filters = UserFilters {
        tenant_id: optional_string(matches, PARAMETER_TENANT_ID),
        name: optional_string(matches, PARAMETER_NAME),
    };
    let users = UserManager::default()
        .list(ctx.client(), &filters, paginate(matches))
        .await?;
    print_formatted(&users, matches)
}

pub async fn show_user(
    ctx: &mut ExecutionContext,
    matches: &ArgMatches,
) -> Result<(), CliActionError> {
    let id = resource_id(matches)?;
    let manager = UserManager::default();
    let user = if matches.get_flag(PARAMETER_WITH_TENANT) {
        manager.get_with_tenant(ctx.client(), &id).await?
    } else {
        manager.get(ctx.client(), &id).await?
    };
    print_formatted(&user, matches)
}

pub async fn create_user(
    ctx: &mut ExecutionContext,
    matches: &ArgMatches,
) -> Result<(), CliActionError> {
    let user = UserCreate {
        name: required_string(matches, PARAMETER_NAME)?,
        password: optional_string(matches, PARAMETER_PASSWORD),
        email: optional_string(matches, PARAMETER_EMAIL),
        tenant_id: optional_string(matches, PARAMETER_TENANT_ID),
        enabled: matches.get_one::<bool>(PARAMETER_ENABLED).copied(),
    };
    let user = UserManager::default().create(ctx.client(), &user).await?;
    print_formatted(&user, matches)
}

pub async fn update_user(
    ctx: &mut ExecutionContext,
    matches: &ArgMatches,
) -> Result<(), CliActionError> {
    let id = resource_id(matches)?;
    let update = UserUpdate {
        name: optional_string(matches, PARAMETER_NAME),
        email: optional_string(matches, PARAMETER_EMAIL),
        enabled: matches.get_one::<bool>(PARAMETER_ENABLED).copied(),
    };
    let updated = UserManager::default()
        .update(ctx.client(), &id, &update)
        .await?;
    print_updated(updated, "user", &id, matches)
}

pub async fn delete_user(
    ctx: &mut ExecutionContext,
    matches: &ArgMatches,
) -> Result<(), CliActionError> {
    let id = resource_id(matches)?;
    UserManager::default().delete(ctx.client(), &id).await?;
    println!("User {} deleted", id);
    Ok(())
}
