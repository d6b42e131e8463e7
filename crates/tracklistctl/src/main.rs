//! Tracklist Control - export music library metadata to CSV
//!
//! Exit codes: 0 success, 1 usage, 2 application unavailable,
//! 3 permission denied, 4 automation error, 5 file write error.

use clap::Parser;
use tracklist_common::error::{EXIT_SUCCESS, EXIT_USAGE};
use tracklist_common::ExportError;

use tracklistctl::cli::{Cli, Commands};
use tracklistctl::{commands, logging, output};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let config_path = cli.config.as_deref();
    let result = match &cli.command {
        Commands::Doctor => commands::handle_doctor(config_path),
        Commands::Config => commands::handle_config(config_path).map(|()| EXIT_SUCCESS),
        command => match command.export() {
            Some((listing, args)) => commands::handle_export(listing, args, config_path)
                .await
                .map(|()| EXIT_SUCCESS),
            None => Ok(EXIT_SUCCESS),
        },
    };

    let code = match result {
        Ok(code) => code,
        Err(err) => match err.downcast_ref::<ExportError>() {
            Some(export_err) => {
                output::display_error(export_err);
                export_err.exit_code()
            }
            None => {
                output::display_message_error(&format!("{:#}", err));
                EXIT_USAGE
            }
        },
    };

    std::process::exit(code);
}
