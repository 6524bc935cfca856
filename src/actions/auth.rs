//! Authentication actions: login, logout and inspecting the session.

use clap::ArgMatches;
use color_print::cprintln;
use serde_json::Value;
use tracing::debug;

use crate::{
    actions::{
        utils::{print_formatted, required_string},
        CliActionError,
    },
    client::ClientError,
    commands::params::PARAMETER_SERVICE_TYPE,
    context::ExecutionContext,
    resource::{Resource, ResourceList},
};

const CATALOG_COLUMNS: [&str; 5] = ["service_type", "service_name", "region", "interface", "url"];

pub async fn login(ctx: &mut ExecutionContext, _matches: &ArgMatches) -> Result<(), CliActionError> {
    ctx.client().authenticate().await?;
    ctx.save_session(true)?;

    let tenant = ctx
        .client
        .session()
        .and_then(|session| session.tenant_name.clone().or(session.tenant_id.clone()));
    match tenant {
        Some(tenant) => cprintln!("<g>Logged in</>, token scoped to tenant {}", tenant),
        None => cprintln!("<g>Logged in</>"),
    }
    Ok(())
}

pub async fn logout(ctx: &mut ExecutionContext, _matches: &ArgMatches) -> Result<(), CliActionError> {
    ctx.forget_session()?;
    debug!("Cached session removed");
    cprintln!("<g>Logged out</>");
    Ok(())
}

/// Print the session without its service catalog.
pub async fn token(ctx: &mut ExecutionContext, matches: &ArgMatches) -> Result<(), CliActionError> {
    ctx.client().ensure_authenticated().await?;
    let session = ctx
        .client
        .session()
        .ok_or_else(|| ClientError::AuthorizationFailure("not authenticated".to_string()))?;

    let mut value = serde_json::to_value(session).map_err(ClientError::from)?;
    if let Value::Object(map) = &mut value {
        map.remove("catalog");
    }
    let resource = Resource::from_value(value).ok_or_else(|| ClientError::UnexpectedResponse {
        service_type: "identity".to_string(),
        reason: "session is not an object".to_string(),
    })?;
    print_formatted(&resource, matches)
}

pub async fn catalog(ctx: &mut ExecutionContext, matches: &ArgMatches) -> Result<(), CliActionError> {
    ctx.client().ensure_authenticated().await?;
    let entries = ctx
        .client
        .session()
        .and_then(|session| session.catalog.as_ref())
        .map(|catalog| catalog.entries())
        .unwrap_or_default();

    let value = serde_json::to_value(entries).map_err(ClientError::from)?;
    let list = ResourceList::from_value(value, &CATALOG_COLUMNS)
        .unwrap_or_else(|| ResourceList::new(Vec::new(), &CATALOG_COLUMNS));
    print_formatted(&list, matches)
}

pub async fn endpoint(ctx: &mut ExecutionContext, matches: &ArgMatches) -> Result<(), CliActionError> {
    let service_type = required_string(matches, PARAMETER_SERVICE_TYPE)?;
    let url = ctx.client().endpoint(&service_type).await?;
    println!("{}", url);
    Ok(())
}
