use color_print::ceprintln;
use oscli::{
    cli::execute_command,
    commands::{create_cli_commands, PARAMETER_VERBOSE},
};
use tracing_subscriber::EnvFilter;

/// Main entry point for the program
#[tokio::main]
async fn main() {
    let matches = create_cli_commands();

    // RUST_LOG wins over -v
    let filter = if matches.get_flag(PARAMETER_VERBOSE) && std::env::var_os("RUST_LOG").is_none() {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env()
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = execute_command(&matches).await {
        ceprintln!("<r>ERROR:</> {}", e);
        ::std::process::exit(e.exit_code().code());
    }
}
