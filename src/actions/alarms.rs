//! Alarm actions.

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
        PARAMETER_ALARM_ACTION, PARAMETER_COMPARISON_OPERATOR, PARAMETER_DESCRIPTION,
        PARAMETER_ENABLED, PARAMETER_EVALUATION_PERIODS, PARAMETER_METER_NAME, PARAMETER_NAME,
        PARAMETER_PERIOD, PARAMETER_STATE, PARAMETER_STATISTIC, PARAMETER_THRESHOLD,
    },
    context::ExecutionContext,
    services::monitoring::{AlarmCreate, AlarmFilters, AlarmManager, AlarmUpdate},
};

pub async fn list_alarms(
    ctx: &mut ExecutionContext,
    matches: &ArgMatches,
) -> Result<(), CliActionError> {
    let filters = AlarmFilters {
        name: optional_string(matches, PARAMETER_NAME),
        state: optional_string(matches, PARAMETER_STATE),
        enabled: matches.get_one::<bool>(PARAMETER_ENABLED).copied(),
    };
    let alarms = AlarmManager::default()
        .list(ctx.client(), &filters, paginate(matches))
        .await?;
    print_formatted(&alarms, matches)
}

pub async fn show_alarm(
    ctx: &mut ExecutionContext,
    matches: &ArgMatches,
) -> Result<(), CliActionError> {
    let id = resource_id(matches)?;
    let alarm = AlarmManager::default().get(ctx.client(), &id).await?;
    print_formatted(&alarm, matches)
}

pub async fn create_alarm(
    ctx: &mut ExecutionContext,
    matches: &ArgMatches,
) -> Result<(), CliActionError> {
    let alarm = AlarmCreate {
        name: required_string(matches, PARAMETER_NAME)?,
        meter_name: required_string(matches, PARAMETER_METER_NAME)?,
        threshold: matches
            .get_one::<f64>(PARAMETER_THRESHOLD)
            .copied()
            .ok_or_else(|| CliActionError::MissingRequiredArgument(PARAMETER_THRESHOLD.to_string()))?,
        description: optional_string(matches, PARAMETER_DESCRIPTION),
        comparison_operator: optional_string(matches, PARAMETER_COMPARISON_OPERATOR),
        statistic: optional_string(matches, PARAMETER_STATISTIC),
        period: matches.get_one::<u32>(PARAMETER_PERIOD).copied(),
        evaluation_periods: matches.get_one::<u32>(PARAMETER_EVALUATION_PERIODS).copied(),
        enabled: matches.get_one::<bool>(PARAMETER_ENABLED).copied(),
        alarm_actions: matches
            .get_many::<String>(PARAMETER_ALARM_ACTION)
            .map(|actions| actions.cloned().collect())
            .unwrap_or_default(),
    };
    let alarm = AlarmManager::default().create(ctx.client(), &alarm).await?;
    print_formatted(&alarm, matches)
}

pub async fn update_alarm(
    ctx: &mut ExecutionContext,
    matches: &ArgMatches,
) -> Result<(), CliActionError> {
    let id = resource_id(matches)?;
    let update = AlarmUpdate {
        name: optional_string(matches, PARAMETER_NAME),
        description: optional_string(matches, PARAMETER_DESCRIPTION),
        threshold: matches.get_one::<f64>(PARAMETER_THRESHOLD).copied(),
        enabled: matches.get_one::<bool>(PARAMETER_ENABLED).copied(),
    };
    let updated = AlarmManager::default()
        .update(ctx.client(), &id, &update)
        .await?;
    print_updated(updated, "alarm", &id, matches)
}

pub async fn delete_alarm(
    ctx: &mut ExecutionContext,
    matches: &ArgMatches,
) -> Result<(), CliActionError> {
    let id = resource_id(matches)?;
    AlarmManager::default().delete(ctx.client(), &id).await?;
    println!("Alarm {} deleted", id);
    Ok(())
}

pub async fn alarm_state(
    ctx: &mut ExecutionContext,
    matches: &ArgMatches,
) -> Result<(), CliActionError> {
    let id = resource_id(matches)?;
    let state = AlarmManager::default().state(ctx.client(), &id).await?;
    println!("{}", state);
    Ok(())
}
