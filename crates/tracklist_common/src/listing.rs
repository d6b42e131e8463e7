//! Listings: what the user asks to export
//!
//! A listing picks the query to run, then turns the raw lines into a
//! deduplicated, ordered [`Table`] according to [`ListingOptions`].

use crate::error::Result;
use crate::extract::{ExtractOptions, ExtractionRunner};
use crate::normalize::{composite_key, AlbumFormat, Normalizer, NormalizerConfig, RowSet};
use crate::query::QueryKind;
use crate::record::{parse_lines, AlbumRecord, PlaylistTrackRecord, Record, SongRecord, TrackRecord};
use crate::serialize::Table;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Listing {
    Artists,
    Albums,
    Tracks,
    Playlists,
    PlaylistTracks,
}

impl Listing {
    pub const ALL: [Listing; 5] = [
        Listing::Artists,
        Listing::Albums,
        Listing::Tracks,
        Listing::Playlists,
        Listing::PlaylistTracks,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Listing::Artists => "artists",
            Listing::Albums => "albums",
            Listing::Tracks => "tracks",
            Listing::Playlists => "playlists",
            Listing::PlaylistTracks => "playlist-tracks",
        }
    }

    /// Query that feeds this listing
    ///
    /// Artists with fallback need per-track album artists, so they read the
    /// detailed query instead of the plain artist list.
    pub fn query_kind(&self, options: &ListingOptions) -> QueryKind {
        match self {
            Listing::Artists if options.fallback => QueryKind::Detailed,
            Listing::Artists => QueryKind::Artists,
            Listing::Albums => QueryKind::Albums,
            Listing::Tracks => QueryKind::Tracks,
            Listing::Playlists => QueryKind::Playlists,
            Listing::PlaylistTracks => QueryKind::PlaylistTracks,
        }
    }

    /// Default export file name
    pub fn file_name(&self) -> String {
        format!("{}.csv", self.as_str())
    }
}

impl std::fmt::Display for Listing {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Listing {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Listing::ALL
            .iter()
            .copied()
            .find(|l| l.as_str() == s.to_ascii_lowercase())
            .ok_or_else(|| format!("unknown listing '{}'", s))
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ListingOptions {
    pub normalizer: NormalizerConfig,
    /// Use the album artist when a track has no artist
    pub fallback: bool,
    pub album_format: AlbumFormat,
    pub limit: Option<usize>,
}

/// Turn raw query lines into the table for `listing`
pub fn build_table(listing: Listing, lines: &[String], options: &ListingOptions) -> Table {
    let config = options.normalizer;

    match (listing, listing.query_kind(options)) {
        (Listing::Artists, QueryKind::Detailed) => {
            let tracks: Vec<TrackRecord> = parse_lines(lines);
            let mut normalizer = Normalizer::new(config);
            for track in &tracks {
                normalizer.add_with_fallback(track, "artist", Some("album_artist"));
            }
            Table::single("artist", normalizer.values())
        }
        (Listing::Artists, _) => scalar_table("artist", lines, config),
        (Listing::Playlists, _) => scalar_table("playlist", lines, config),
        (Listing::Albums, _) => {
            let albums: Vec<AlbumRecord> = parse_lines(lines);
            match options.album_format {
                AlbumFormat::Flat => row_table(&albums, config),
                AlbumFormat::Composite => composite_table(
                    "album",
                    albums.iter().map(|a| composite_key(&a.album_artist, &a.album)),
                    config,
                ),
            }
        }
        (Listing::Tracks, _) => {
            let songs: Vec<SongRecord> = parse_lines(lines);
            match options.album_format {
                AlbumFormat::Flat => row_table(&songs, config),
                AlbumFormat::Composite => composite_table(
                    "track",
                    songs.iter().map(|s| composite_key(&s.artist, &s.title)),
                    config,
                ),
            }
        }
        (Listing::PlaylistTracks, _) => {
            let entries: Vec<PlaylistTrackRecord> = parse_lines(lines);
            row_table(&entries, config)
        }
    }
}

fn scalar_table(column: &str, lines: &[String], config: NormalizerConfig) -> Table {
    let mut normalizer = Normalizer::new(config);
    normalizer.extend(lines);
    Table::single(column, normalizer.values())
}

fn composite_table(
    column: &str,
    keys: impl Iterator<Item = String>,
    config: NormalizerConfig,
) -> Table {
    let mut normalizer = Normalizer::new(config);
    normalizer.extend(keys);
    Table::single(column, normalizer.values())
}

fn row_table<R: Record>(records: &[R], config: NormalizerConfig) -> Table {
    let mut rows = RowSet::new(config);
    for record in records {
        rows.add(&record.values());
    }
    Table::new(R::COLUMNS.iter().copied()).with_rows(rows.rows())
}

/// Run the query behind `listing` and build its table
///
/// `on_line` sees every raw line as it arrives.
pub async fn export<F>(
    listing: Listing,
    runner: &ExtractionRunner,
    options: &ListingOptions,
    on_line: F,
) -> Result<Table>
where
    F: FnMut(&str),
{
    let kind = listing.query_kind(options);
    let extract_options = ExtractOptions::with_limit(options.limit.unwrap_or(0));

    let lines = runner
        .run_with(kind, extract_options, on_line)
        .await
        .into_lines()?;

    let table = build_table(listing, &lines, options);
    tracing::info!(
        "{} listing: {} raw lines -> {} rows",
        listing,
        lines.len(),
        table.len()
    );
    Ok(table)
}
