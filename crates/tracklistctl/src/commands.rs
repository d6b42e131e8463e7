//! Command handlers for tracklistctl.

use anyhow::Result;
use std::path::{Path, PathBuf};
use tracklist_common::serialize::{render_terminal, write_atomic};
use tracklist_common::{
    export, AlbumFormat, ExportError, ExtractionRunner, Listing, ListingOptions, NormalizerConfig,
};

use crate::cli::ExportArgs;
use crate::config::Config;
use crate::output;
use crate::preflight;
use crate::progress::ProgressIndicator;

/// Where the rendered listing goes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Destination {
    Terminal { colored: bool },
    File(PathBuf),
}

/// Config file merged with command-line flags
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportSettings {
    pub options: ListingOptions,
    pub destination: Destination,
}

/// Merge flags over config; a flag only ever turns a behavior on
pub fn resolve_config(mut config: Config, args: &ExportArgs) -> Config {
    if let Some(app) = &args.app {
        config.app = app.clone();
    }
    config.sort |= args.sort;
    config.no_trim |= args.no_trim;
    config.fallback |= args.fallback;
    if args.composite {
        config.album_format = AlbumFormat::Composite;
    }
    if args.no_color {
        config.color = false;
    }
    config
}

pub fn resolve_settings(
    listing: Listing,
    config: &Config,
    args: &ExportArgs,
    stdout_is_tty: bool,
) -> ExportSettings {
    let options = ListingOptions {
        normalizer: NormalizerConfig {
            no_trim: config.no_trim,
            sort: config.sort,
        },
        fallback: config.fallback,
        album_format: config.album_format,
        limit: args.limit.map(|n| n as usize),
    };

    let destination = if args.stdout {
        Destination::Terminal {
            colored: config.color && stdout_is_tty && std::env::var_os("NO_COLOR").is_none(),
        }
    } else {
        Destination::File(
            args.output
                .clone()
                .unwrap_or_else(|| PathBuf::from(listing.file_name())),
        )
    };

    ExportSettings {
        options,
        destination,
    }
}

/// Handle an export subcommand
pub async fn handle_export(
    listing: Listing,
    args: &ExportArgs,
    explicit: Option<&Path>,
) -> Result<()> {
    let path = Config::discover_path(explicit);
    let config = resolve_config(Config::load(path.as_deref())?, args);
    let settings = resolve_settings(listing, &config, args, atty::is(atty::Stream::Stdout));
    let runner = ExtractionRunner::new(config.engine.clone(), config.registry()?);

    tracing::info!("Exporting {} from {}", listing, config.app);

    let mut progress = ProgressIndicator::new(listing);
    let result = export(listing, &runner, &settings.options, |_| progress.tick()).await;
    progress.finish();
    let table = result?;

    if table.is_empty() {
        output::display_warning(&format!("No {} found in the library", listing));
    }

    match settings.destination {
        Destination::Terminal { colored } => {
            let rendered = render_terminal(&table, colored);
            output::write_data(&mut std::io::stdout().lock(), &rendered)?;
        }
        Destination::File(path) => {
            let csv = table.to_csv()?;
            write_atomic(&path, &csv)?;
            output::display_success(&format!(
                "wrote {} rows to {}",
                table.len(),
                path.display()
            ));
        }
    }

    Ok(())
}

/// Handle `doctor`; returns the exit code
pub fn handle_doctor(explicit: Option<&Path>) -> Result<i32> {
    let path = Config::discover_path(explicit);
    let config = Config::load(path.as_deref())?;
    Ok(preflight::report(&config, path))
}

/// Handle `config`: print the effective configuration
pub fn handle_config(explicit: Option<&Path>) -> Result<()> {
    let path = Config::discover_path(explicit);
    let config = Config::load(path.as_deref())?;

    let header = match &path {
        Some(path) => format!("# {}\n", path.display()),
        None => "# (no config directory, using defaults)\n".to_string(),
    };
    let text = config
        .to_toml()
        .map_err(|e| ExportError::Config(e.to_string()))?;
    output::write_data(&mut std::io::stdout().lock(), &(header + &text))?;
    Ok(())
}
