//! Block storage volume actions.

use clap::ArgMatches;

use crate::{
    actions::{
        utils::{
            flag, optional_string, paginate, print_formatted, print_updated, properties,
            resource_id,
        },
        CliActionError,
    },
    commands::params::{
        PARAMETER_ALL_TENANTS, PARAMETER_AVAILABILITY_ZONE, PARAMETER_DESCRIPTION,
        PARAMETER_NAME, PARAMETER_NEW_SIZE, PARAMETER_SIZE, PARAMETER_STATUS,
        PARAMETER_VOLUME_TYPE,
    },
    context::ExecutionContext,
    services::block_storage::{VolumeCreate, VolumeFilters, VolumeManager, VolumeUpdate},
};

fn size(matches: &ArgMatches, name: &str) -> Result<u64, CliActionError> {
    matches
        .get_one::<u64>(name)
        .copied()
        .ok_or_else(|| CliActionError::MissingRequiredArgument(name.to_string()))
}

pub async fn list_volumes(
    ctx: &mut ExecutionContext,
    matches: &ArgMatches,
) -> Result<(), CliActionError> {
    let filters = VolumeFilters {
        name: optional_string(matches, PARAMETER_NAME),
        status: optional_string(matches, PARAMETER_STATUS),
        all_tenants: flag(matches, PARAMETER_ALL_TENANTS),
    };
    let volumes = VolumeManager::default()
        .list(ctx.client(), &filters, paginate(matches))
        .await?;
    print_formatted(&volumes, matches)
}

pub async fn show_volume(
    ctx: &mut ExecutionContext,
    matches: &ArgMatches,
) -> Result<(), CliActionError> {
    let id = resource_id(matches)?;
    let volume = VolumeManager::default().get(ctx.client(), &id).await?;
    print_formatted(&volume, matches)
}

pub async fn create_volume(
    ctx: &mut ExecutionContext,
    matches: &ArgMatches,
) -> Result<(), CliActionError> {
    let volume = VolumeCreate {
        size: size(matches, PARAMETER_SIZE)?,
        name: optional_string(matches, PARAMETER_NAME),
        description: optional_string(matches, PARAMETER_DESCRIPTION),
        volume_type: optional_string(matches, PARAMETER_VOLUME_TYPE),
        availability_zone: optional_string(matches, PARAMETER_AVAILABILITY_ZONE),
        metadata: properties(matches),
    };
    let volume = VolumeManager::default().create(ctx.client(), &volume).await?;
    print_formatted(&volume, matches)
}

pub async fn update_volume(
    ctx: &mut ExecutionContext,
    matches: &ArgMatches,
) -> Result<(), CliActionError> {
    let id = resource_id(matches)?;
    let update = VolumeUpdate {
        name: optional_string(matches, PARAMETER_NAME),
        description: optional_string(matches, PARAMETER_DESCRIPTION),
    };
    let updated = VolumeManager::default()
        .update(ctx.client(), &id, &update)
        .await?;
    print_updated(updated, "volume", &id, matches)
}

pub async fn delete_volume(
    ctx: &mut ExecutionContext,
    matches: &ArgMatches,
) -> Result<(), CliActionError> {
    let id = resource_id(matches)?;
    VolumeManager::default().delete(ctx.client(), &id).await?;
    println!("Volume {} deleted", id);
    Ok(())
}

pub async fn extend_volume(
    ctx: &mut ExecutionContext,
    matches: &ArgMatches,
) -> Result<(), CliActionError> {
    let id = resource_id(matches)?;
    let new_size = size(matches, PARAMETER_NEW_SIZE)?;
    VolumeManager::default()
        .extend(ctx.client(), &id, new_size)
        .await?;
    println!("Extension of volume {} to {} GiB requested", id, new_size);
    Ok(())
}
