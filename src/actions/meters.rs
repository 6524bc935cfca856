//! Meter queries.

use clap::ArgMatches;

use crate::{
    actions::{
        utils::{optional_string, paginate, print_formatted, required_string},
        CliActionError,
    },
    commands::params::{
        PARAMETER_LIMIT, PARAMETER_METER, PARAMETER_NAME, PARAMETER_PERIOD, PARAMETER_PROJECT_ID,
        PARAMETER_RESOURCE_ID,
    },
    context::ExecutionContext,
    services::monitoring::{MeterFilters, MeterManager},
};

pub async fn list_meters(
    ctx: &mut ExecutionContext,
    matches: &ArgMatches,
) -> Result<(), CliActionError> {
    let filters = MeterFilters {
        resource_id: optional_string(matches, PARAMETER_RESOURCE_ID),
        project_id: optional_string(matches, PARAMETER_PROJECT_ID),
        name: optional_string(matches, PARAMETER_NAME),
    };
    let meters = MeterManager::default()
        .list(ctx.client(), &filters, paginate(matches))
        .await?;
    print_formatted(&meters, matches)
}

pub async fn meter_samples(
    ctx: &mut ExecutionContext,
    matches: &ArgMatches,
) -> Result<(), CliActionError> {
    let meter = required_string(matches, PARAMETER_METER)?;
    let limit = matches.get_one::<u32>(PARAMETER_LIMIT).copied();
    let samples = MeterManager::default()
        .samples(ctx.client(), &meter, limit)
        .await?;
    print_formatted(&samples, matches)
}

pub async fn meter_statistics(
    ctx: &mut ExecutionContext,
    matches: &ArgMatches,
) -> Result<(), CliActionError> {
    let meter = required_string(matches, PARAMETER_METER)?;
    let period = matches.get_one::<u32>(PARAMETER_PERIOD).copied();
    let statistics = MeterManager::default()
        .statistics(ctx.client(), &meter, period)
        .await?;
    print_formatted(&statistics, matches)
}
