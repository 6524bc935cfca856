use std::collections::BTreeMap;

use clap::ArgMatches;

use crate::{
    actions::CliActionError,
    commands::params::{
        PARAMETER_ALL_PAGES, PARAMETER_FORMAT, PARAMETER_HEADERS, PARAMETER_ID, PARAMETER_PRETTY,
        PARAMETER_PROPERTY,
    },
    format::{Formattable, OutputFormat, OutputFormatOptions},
    resource::Resource,
};

/// Output format requested on the command line; table when not given.
pub fn output_format(matches: &ArgMatches) -> Result<OutputFormat, CliActionError> {
    let format_str = match matches.try_get_one::<String>(PARAMETER_FORMAT) {
        Ok(Some(format_str)) => format_str.clone(),
        _ => return Ok(OutputFormat::default()),
    };
    let options = OutputFormatOptions {
        with_headers: flag(matches, PARAMETER_HEADERS),
        pretty: flag(matches, PARAMETER_PRETTY),
    };
    Ok(OutputFormat::from_string_with_options(&format_str, options)?)
}

/// Print anything formattable in the requested output format.
pub fn print_formatted<T: Formattable>(
    item: &T,
    matches: &ArgMatches,
) -> Result<(), CliActionError> {
    let format = output_format(matches)?;
    println!("{}", item.format(&format)?);
    Ok(())
}

/// Print the outcome of an update that may have been skipped.
pub fn print_updated(
    updated: Option<Resource>,
    kind: &str,
    id: &str,
    matches: &ArgMatches,
) -> Result<(), CliActionError> {
    match updated {
        Some(resource) => print_formatted(&resource, matches),
        None => {
            println!("No attributes given; {} {} left unchanged", kind, id);
            Ok(())
        }
    }
}

/// A flag that may not be defined on every command.
pub fn flag(matches: &ArgMatches, name: &str) -> bool {
    matches!(matches.try_get_one::<bool>(name), Ok(Some(true)))
}

pub fn paginate(matches: &ArgMatches) -> bool {
    flag(matches, PARAMETER_ALL_PAGES)
}

pub fn optional_string(matches: &ArgMatches, name: &str) -> Option<String> {
    matches.get_one::<String>(name).cloned()
}

pub fn required_string(matches: &ArgMatches, name: &str) -> Result<String, CliActionError> {
    optional_string(matches, name)
        .ok_or_else(|| CliActionError::MissingRequiredArgument(name.to_string()))
}

/// The positional resource ID.
pub fn resource_id(matches: &ArgMatches) -> Result<String, CliActionError> {
    required_string(matches, PARAMETER_ID)
}

/// `--property key=value` pairs collected into a map.
pub fn properties(matches: &ArgMatches) -> BTreeMap<String, String> {
    matches
        .get_many::<(String, String)>(PARAMETER_PROPERTY)
        .map(|pairs| pairs.cloned().collect())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::cli;

    fn leaf(args: &[&str]) -> ArgMatches {
        let matches = cli().try_get_matches_from(args).unwrap();
        let (_, group) = matches.subcommand().unwrap();
        let (_, leaf) = group.subcommand().unwrap();
        leaf.clone()
    }

    #[test]
    fn test_output_format_from_arguments() {
        let matches = leaf(&["oscli", "server", "list", "-f", "csv", "--headers"]);
        assert_eq!(
            output_format(&matches).unwrap(),
            OutputFormat::Csv(OutputFormatOptions {
                with_headers: true,
                pretty: false
            })
        );
    }

    #[test]
    fn test_output_format_defaults_to_table_without_argument() {
        let matches = leaf(&["oscli", "server", "delete", "s-1"]);
        assert_eq!(output_format(&matches).unwrap(), OutputFormat::default());
        assert_eq!(resource_id(&matches).unwrap(), "s-1");
    }

    #[test]
    fn test_properties() {
        let matches = leaf(&[
            "oscli", "volume", "create", "--size", "1", "--property", "a=1", "--property", "b=2",
        ]);
        let properties = properties(&matches);
        assert_eq!(properties.len(), 2);
        assert_eq!(properties.get("b").map(String::as_str), Some("2"));
    }
}
