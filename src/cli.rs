//! Command dispatch.

use clap::ArgMatches;
use tracing::{debug, warn};

use crate::{
    actions::{alarms, auth, config, meters, servers, tenants, users, volumes, CliActionError},
    commands::params::{
        COMMAND_ALARM, COMMAND_AUTH, COMMAND_CATALOG, COMMAND_CONFIG, COMMAND_CREATE,
        COMMAND_DELETE, COMMAND_ENDPOINT, COMMAND_EXPORT, COMMAND_EXTEND, COMMAND_IMPORT,
        COMMAND_LIST, COMMAND_LOGIN, COMMAND_LOGOUT, COMMAND_METER, COMMAND_PATH, COMMAND_REBOOT,
        COMMAND_SAMPLES, COMMAND_SERVER, COMMAND_SHOW, COMMAND_START, COMMAND_STATE,
        COMMAND_STATISTICS, COMMAND_STOP, COMMAND_TENANT, COMMAND_TOKEN, COMMAND_UPDATE,
        COMMAND_USER, COMMAND_VOLUME,
    },
    configuration::Configuration,
    context::ExecutionContext,
    error::CliError,
    exit_codes::ExitCode,
    format::to_table,
};

fn unsupported(group: &str, name: &str) -> CliError {
    CliError::UnsupportedSubcommand(format!("{} {}", group, name))
}

/// Run the command selected on the command line.
pub async fn execute_command(matches: &ArgMatches) -> Result<(), CliError> {
    let (group, group_matches) = matches
        .subcommand()
        .ok_or_else(|| CliError::UnsupportedSubcommand(String::new()))?;
    let (name, leaf) = group_matches
        .subcommand()
        .ok_or_else(|| CliError::UnsupportedSubcommand(group.to_string()))?;
    debug!("Executing '{} {}'", group, name);

    if group == COMMAND_CONFIG {
        let result = execute_config_command(name, leaf).ok_or_else(|| unsupported(group, name))?;
        return Ok(result?);
    }

    let configuration = Configuration::load_default()?;
    let mut ctx = if (group, name) == (COMMAND_AUTH, COMMAND_LOGOUT) {
        ExecutionContext::without_credentials(leaf, configuration)?
    } else {
        ExecutionContext::from_args(leaf, configuration)?
    };
    let result = execute_service_command(&mut ctx, group, name, leaf)
        .await
        .ok_or_else(|| unsupported(group, name))?;

    if ctx.client.config().timings {
        print_timings(&ctx);
    }
    if let Err(e) = &result {
        if e.exit_code() == ExitCode::AuthError && ctx.is_restored() {
            // The cached token was rejected and could not be renewed
            if let Err(e) = ctx.forget_session() {
                warn!("Failed to remove the cached session: {}", e);
            }
        }
    }
    result?;

    if group != COMMAND_AUTH {
        if let Err(e) = ctx.save_session(false) {
            warn!("Failed to cache the session token: {}", e);
        }
    }
    Ok(())
}

/// Config commands run without credentials; only `show` and `export` read the
/// current file.
fn execute_config_command(name: &str, matches: &ArgMatches) -> Option<Result<(), CliActionError>> {
    let loaded = || Configuration::load_default().map_err(CliActionError::from);
    let result = match name {
        COMMAND_PATH => config::print_configuration_path(),
        COMMAND_SHOW => loaded().and_then(|c| config::show_configuration(&c, matches)),
        COMMAND_EXPORT => loaded().and_then(|c| config::export_configuration(&c, matches)),
        COMMAND_IMPORT => config::import_configuration(matches),
        _ => return None,
    };
    Some(result)
}

async fn execute_service_command(
    ctx: &mut ExecutionContext,
    group: &str,
    name: &str,
    matches: &ArgMatches,
) -> Option<Result<(), CliActionError>> {
    let result = match (group, name) {
        (COMMAND_SERVER, COMMAND_LIST) => servers::list_servers(ctx, matches).await,
        (COMMAND_SERVER, COMMAND_SHOW) => servers::show_server(ctx, matches).await,
        (COMMAND_SERVER, COMMAND_CREATE) => servers::create_server(ctx, matches).await,
        (COMMAND_SERVER, COMMAND_UPDATE) => servers::update_server(ctx, matches).await,
        (COMMAND_SERVER, COMMAND_DELETE) => servers::delete_server(ctx, matches).await,
        (COMMAND_SERVER, COMMAND_START) => servers::start_server(ctx, matches).await,
        (COMMAND_SERVER, COMMAND_STOP) => servers::stop_server(ctx, matches).await,
        (COMMAND_SERVER, COMMAND_REBOOT) => servers::reboot_server(ctx, matches).await,

        (COMMAND_VOLUME, COMMAND_LIST) => volumes::list_volumes(ctx, matches).await,
        (COMMAND_VOLUME, COMMAND_SHOW) => volumes::show_volume(ctx, matches).await,
        (COMMAND_VOLUME, COMMAND_CREATE) => volumes::create_volume(ctx, matches).await,
        (COMMAND_VOLUME, COMMAND_UPDATE) => volumes::update_volume(ctx, matches).await,
        (COMMAND_VOLUME, COMMAND_DELETE) => volumes::delete_volume(ctx, matches).await,
        (COMMAND_VOLUME, COMMAND_EXTEND) => volumes::extend_volume(ctx, matches).await,

        (COMMAND_ALARM, COMMAND_LIST) => alarms::list_alarms(ctx, matches).await,
        (COMMAND_ALARM, COMMAND_SHOW) => alarms::show_alarm(ctx, matches).await,
        (COMMAND_ALARM, COMMAND_CREATE) => alarms::create_alarm(ctx, matches).await,
        (COMMAND_ALARM, COMMAND_UPDATE) => alarms::update_alarm(ctx, matches).await,
        (COMMAND_ALARM, COMMAND_DELETE) => alarms::delete_alarm(ctx, matches).await,
        (COMMAND_ALARM, COMMAND_STATE) => alarms::alarm_state(ctx, matches).await,

        (COMMAND_METER, COMMAND_LIST) => meters::list_meters(ctx, matches).await,
        (COMMAND_METER, COMMAND_SAMPLES) => meters::meter_samples(ctx, matches).await,
        (COMMAND_METER, COMMAND_STATISTICS) => meters::meter_statistics(ctx, matches).await,

        (COMMAND_USER, COMMAND_LIST) => users::list_users(ctx, matches).await,
        (COMMAND_USER, COMMAND_SHOW) => users::show_user(ctx, matches).await,
        (COMMAND_USER, COMMAND_CREATE) => users::create_user(ctx, matches).await,
        (COMMAND_USER, COMMAND_UPDATE) => users::update_user(ctx, matches).await,
        (COMMAND_USER, COMMAND_DELETE) => users::delete_user(ctx, matches).await,

        (COMMAND_TENANT, COMMAND_LIST) => tenants::list_tenants(ctx, matches).await,
        (COMMAND_TENANT, COMMAND_SHOW) => tenants::show_tenant(ctx, matches).await,
        (COMMAND_TENANT, COMMAND_CREATE) => tenants::create_tenant(ctx, matches).await,
        (COMMAND_TENANT, COMMAND_UPDATE) => tenants::update_tenant(ctx, matches).await,
        (COMMAND_TENANT, COMMAND_DELETE) => tenants::delete_tenant(ctx, matches).await,

        (COMMAND_AUTH, COMMAND_LOGIN) => auth::login(ctx, matches).await,
        (COMMAND_AUTH, COMMAND_LOGOUT) => auth::logout(ctx, matches).await,
        (COMMAND_AUTH, COMMAND_TOKEN) => auth::token(ctx, matches).await,
        (COMMAND_AUTH, COMMAND_CATALOG) => auth::catalog(ctx, matches).await,
        (COMMAND_AUTH, COMMAND_ENDPOINT) => auth::endpoint(ctx, matches).await,

        _ => return None,
    };
    Some(result)
}

/// Print the request timings to standard error.
fn print_timings(ctx: &ExecutionContext) {
    let timings = ctx.client.timings();
    if timings.is_empty() {
        return;
    }
    let rows = timings
        .iter()
        .map(|timing| {
            vec![
                timing.method.clone(),
                timing.url.clone(),
                timing
                    .status
                    .map(|status| status.to_string())
                    .unwrap_or_else(|| "-".to_string()),
                format!("{:.3}", timing.elapsed.as_secs_f64()),
            ]
        })
        .collect();
    eprintln!("{}", to_table(&["Method", "URL", "Status", "Seconds"], rows));
}
