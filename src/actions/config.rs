use std::{fs::File, path::PathBuf};

use clap::ArgMatches;
use color_print::cprintln;

use crate::{
    actions::{utils::print_formatted, CliActionError},
    commands::params::{PARAMETER_FILE, PARAMETER_OUTPUT},
    configuration::Configuration,
};

pub fn print_configuration_path() -> Result<(), CliActionError> {
    let path = Configuration::get_default_configuration_file_path()?;
    println!("{}", path.display());
    Ok(())
}

pub fn show_configuration(
    configuration: &Configuration,
    matches: &ArgMatches,
) -> Result<(), CliActionError> {
    print_formatted(configuration, matches)
}

/// Write the configuration as YAML to the output file or standard output.
pub fn export_configuration(
    configuration: &Configuration,
    matches: &ArgMatches,
) -> Result<(), CliActionError> {
    match matches.get_one::<PathBuf>(PARAMETER_OUTPUT) {
        Some(path) => {
            let file = File::create(path)?;
            configuration.write(file)?;
            cprintln!("Configuration exported to <b>{}</>", path.display());
        }
        None => configuration.write(std::io::stdout())?,
    }
    Ok(())
}

/// Replace the default configuration file with the contents of another one.
pub fn import_configuration(matches: &ArgMatches) -> Result<(), CliActionError> {
    let path = matches
        .get_one::<PathBuf>(PARAMETER_FILE)
        .ok_or_else(|| CliActionError::MissingRequiredArgument(PARAMETER_FILE.to_string()))?;
    let configuration = Configuration::load_from_file(path)?;
    configuration.save_to_default()?;
    cprintln!("Configuration imported from <b>{}</>", path.display());
    Ok(())
}
