//! Meter command definitions.

use crate::commands::params::{
    all_pages_parameter, name_parameter, option_parameter, output_parameters, COMMAND_LIST,
    COMMAND_METER, COMMAND_SAMPLES, COMMAND_STATISTICS, PARAMETER_LIMIT, PARAMETER_METER,
    PARAMETER_PERIOD, PARAMETER_PROJECT_ID, PARAMETER_RESOURCE_ID,
};
use clap::{Arg, Command};

fn meter_parameter() -> Arg {
    Arg::new(PARAMETER_METER).required(true).help("Meter name")
}

/// Create the meter command with all its subcommands.
pub fn meter_command() -> Command {
    Command::new(COMMAND_METER)
        .about("Query monitoring meters")
        .subcommand_required(true)
        .subcommand(
            Command::new(COMMAND_LIST)
                .about("List meters")
                .visible_alias("ls")
                .arg(option_parameter(PARAMETER_RESOURCE_ID, "Only meters of this resource"))
                .arg(option_parameter(PARAMETER_PROJECT_ID, "Only meters of this project"))
                .arg(name_parameter())
                .arg(all_pages_parameter())
                .args(output_parameters()),
        )
        .subcommand(
            Command::new(COMMAND_SAMPLES)
                .about("List samples of a meter")
                .arg(meter_parameter())
                .arg(
                    Arg::new(PARAMETER_LIMIT)
                        .long(PARAMETER_LIMIT)
                        .short('l')
                        .num_args(1)
                        .value_parser(clap::value_parser!(u32).range(1..))
                        .help("Maximum number of samples"),
                )
                .args(output_parameters()),
        )
        .subcommand(
            Command::new(COMMAND_STATISTICS)
                .about("Show statistics of a meter")
                .arg(meter_parameter())
                .arg(
                    Arg::new(PARAMETER_PERIOD)
                        .long(PARAMETER_PERIOD)
                        .short('p')
                        .num_args(1)
                        .value_parser(clap::value_parser!(u32).range(1..))
                        .help("Bucket size in seconds"),
                )
                .args(output_parameters()),
        )
}
