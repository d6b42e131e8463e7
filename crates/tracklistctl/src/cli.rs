//! CLI - Command-line argument parsing
//!
//! Defines the CLI structure using clap.
//! Keeps argument parsing separate from execution logic.

use clap::{ArgAction, Args, Parser, Subcommand};
use std::path::PathBuf;
use tracklist_common::Listing;

/// Tracklist CLI
#[derive(Parser, Debug)]
#[command(name = "tracklistctl")]
#[command(about = "Export artists, albums, tracks and playlists from your music library", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Path to config file (overrides $TRACKLIST_CONFIG and defaults)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Export every distinct artist
    Artists(ExportArgs),

    /// Export every distinct album with its album artist
    Albums(ExportArgs),

    /// Export every distinct track
    Tracks(ExportArgs),

    /// Export user playlist names
    Playlists(ExportArgs),

    /// Export the tracks of every user playlist
    PlaylistTracks(ExportArgs),

    /// Check that the automation engine and configuration are usable
    Doctor,

    /// Show the effective configuration
    Config,
}

impl Commands {
    /// Listing and its arguments, for export commands
    pub fn export(&self) -> Option<(Listing, &ExportArgs)> {
        match self {
            Commands::Artists(args) => Some((Listing::Artists, args)),
            Commands::Albums(args) => Some((Listing::Albums, args)),
            Commands::Tracks(args) => Some((Listing::Tracks, args)),
            Commands::Playlists(args) => Some((Listing::Playlists, args)),
            Commands::PlaylistTracks(args) => Some((Listing::PlaylistTracks, args)),
            Commands::Doctor | Commands::Config => None,
        }
    }
}

/// Options shared by all export commands
#[derive(Args, Debug, Clone, Default)]
pub struct ExportArgs {
    /// Write CSV to this file (default: <listing>.csv)
    #[arg(short, long, conflicts_with = "stdout")]
    pub output: Option<PathBuf>,

    /// Print to the terminal instead of writing a file
    #[arg(long)]
    pub stdout: bool,

    /// Stop after this many lines of library output
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
    pub limit: Option<u64>,

    /// Sort values alphabetically
    #[arg(long)]
    pub sort: bool,

    /// Keep leading and trailing whitespace
    #[arg(long)]
    pub no_trim: bool,

    /// Use the album artist when a track has no artist
    #[arg(long)]
    pub fallback: bool,

    /// Combine qualifier and value into one "Artist - Title" column
    #[arg(long)]
    pub composite: bool,

    /// Disable colors in terminal output
    #[arg(long)]
    pub no_color: bool,

    /// Media application to query (default: Music)
    #[arg(long)]
    pub app: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_export() {
        let cli = Cli::try_parse_from([
            "tracklistctl",
            "-vv",
            "playlist-tracks",
            "--stdout",
            "--limit",
            "5",
            "--sort",
        ])
        .unwrap();
        assert_eq!(cli.verbose, 2);
        let (listing, args) = cli.command.export().unwrap();
        assert_eq!(listing, Listing::PlaylistTracks);
        assert!(args.stdout);
        assert!(args.sort);
        assert_eq!(args.limit, Some(5));
    }

    #[test]
    fn test_output_conflicts_with_stdout() {
        let result = Cli::try_parse_from(["tracklistctl", "artists", "--stdout", "-o", "a.csv"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_zero_limit_rejected() {
        let result = Cli::try_parse_from(["tracklistctl", "albums", "--limit", "0"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_doctor_has_no_listing() {
        let cli = Cli::try_parse_from(["tracklistctl", "doctor"]).unwrap();
        assert!(cli.command.export().is_none());
    }
}
