//! Alarm command definitions.

use crate::commands::params::{
    all_pages_parameter, description_parameter, enabled_parameter, id_parameter, name_parameter,
    option_parameter, output_parameters, COMMAND_ALARM, COMMAND_CREATE, COMMAND_DELETE,
    COMMAND_LIST, COMMAND_SHOW, COMMAND_STATE, COMMAND_UPDATE, PARAMETER_ALARM_ACTION,
    PARAMETER_COMPARISON_OPERATOR, PARAMETER_EVALUATION_PERIODS, PARAMETER_METER_NAME,
    PARAMETER_PERIOD, PARAMETER_STATE, PARAMETER_STATISTIC, PARAMETER_THRESHOLD,
};
use clap::{Arg, ArgAction, Command};

fn threshold_parameter() -> Arg {
    Arg::new(PARAMETER_THRESHOLD)
        .long(PARAMETER_THRESHOLD)
        .num_args(1)
        .value_parser(clap::value_parser!(f64))
        .help("Threshold the statistic is compared against")
}

fn seconds_parameter(id: &'static str, help: &'static str) -> Arg {
    Arg::new(id)
        .long(id)
        .num_args(1)
        .value_parser(clap::value_parser!(u32))
        .help(help)
}

/// Create the alarm command with all its subcommands.
pub fn alarm_command() -> Command {
    Command::new(COMMAND_ALARM)
        .about("Manage monitoring alarms")
        .subcommand_required(true)
        .subcommand(
            Command::new(COMMAND_LIST)
                .about("List alarms")
                .visible_alias("ls")
                .arg(name_parameter())
                .arg(
                    option_parameter(PARAMETER_STATE, "Only alarms in this state")
                        .value_parser(["ok", "alarm", "insufficient data"]),
                )
                .arg(enabled_parameter())
                .arg(all_pages_parameter())
                .args(output_parameters()),
        )
        .subcommand(
            Command::new(COMMAND_SHOW)
                .about("Show alarm details")
                .arg(id_parameter("Alarm ID"))
                .args(output_parameters()),
        )
        .subcommand(
            Command::new(COMMAND_CREATE)
                .about("Create a threshold alarm")
                .arg(name_parameter().required(true))
                .arg(option_parameter(PARAMETER_METER_NAME, "Meter to evaluate").required(true))
                .arg(threshold_parameter().required(true))
                .arg(description_parameter())
                .arg(
                    option_parameter(PARAMETER_COMPARISON_OPERATOR, "Comparison operator")
                        .value_parser(["lt", "le", "eq", "ne", "ge", "gt"]),
                )
                .arg(
                    option_parameter(PARAMETER_STATISTIC, "Statistic to compare")
                        .value_parser(["max", "min", "avg", "sum", "count"]),
                )
                .arg(seconds_parameter(PARAMETER_PERIOD, "Evaluation period in seconds"))
                .arg(seconds_parameter(
                    PARAMETER_EVALUATION_PERIODS,
                    "Number of periods to evaluate",
                ))
                .arg(enabled_parameter())
                .arg(
                    Arg::new(PARAMETER_ALARM_ACTION)
                        .long(PARAMETER_ALARM_ACTION)
                        .action(ArgAction::Append)
                        .help("URL to notify when the alarm fires (repeatable)"),
                )
                .args(output_parameters()),
        )
        .subcommand(
            Command::new(COMMAND_UPDATE)
                .about("Update an alarm")
                .arg(id_parameter("Alarm ID"))
                .arg(name_parameter())
                .arg(description_parameter())
                .arg(threshold_parameter())
                .arg(enabled_parameter())
                .args(output_parameters()),
        )
        .subcommand(
            Command::new(COMMAND_DELETE)
                .about("Delete an alarm")
                .arg(id_parameter("Alarm ID")),
        )
        .subcommand(
            Command::new(COMMAND_STATE)
                .about("Show the current state of an alarm")
                .arg(id_parameter("Alarm ID")),
        )
}
