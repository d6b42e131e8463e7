//! End-to-end listing exports and CSV round-trips.

use tracklist_common::normalize::Normalizer;
use tracklist_common::serialize::{multi_column_csv, render_terminal, write_atomic};
use tracklist_common::{build_table, Listing, ListingOptions, NormalizerConfig, Table};

fn strings(raw: &[&str]) -> Vec<String> {
    raw.iter().map(|s| s.to_string()).collect()
}

/// Parse CSV text back into records, skipping the header
fn read_back(csv_text: &str) -> Vec<Vec<String>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(csv_text.as_bytes());
    reader
        .records()
        .map(|r| r.unwrap().iter().map(str::to_string).collect())
        .collect()
}

#[test]
fn test_multi_column_round_trip() {
    let rows = vec![
        strings(&["Arrival", "ABBA"]),
        strings(&["He said \"hi\", twice", "Crosby, Stills & Nash"]),
        strings(&["Line\nBreak", ""]),
    ];
    let text = multi_column_csv(&["album", "album_artist"], &rows).unwrap();

    assert!(text.starts_with("Album,Album Artist\n"));
    assert!(text.contains("\"He said \"\"hi\"\", twice\""));
    assert!(text.ends_with('\n'));
    assert_eq!(read_back(&text), rows);
}

#[test]
fn test_plain_fields_split_on_comma() {
    let rows = vec![strings(&["Africa", "Toto", "Toto IV"])];
    let text = multi_column_csv(&["title", "artist", "album"], &rows).unwrap();
    let data_line = text.lines().nth(1).unwrap();
    assert_eq!(data_line.split(',').collect::<Vec<_>>(), vec!["Africa", "Toto", "Toto IV"]);
}

#[test]
fn test_artists_listing_to_csv() {
    let options = ListingOptions {
        normalizer: NormalizerConfig {
            no_trim: false,
            sort: true,
        },
        ..Default::default()
    };
    let table = build_table(
        Listing::Artists,
        &strings(&["Taylor Swift", "the beatles", "Taylor Swift", "  Beyoncé  "]),
        &options,
    );
    assert_eq!(
        table.to_csv().unwrap(),
        "Artist\nBeyoncé\nTaylor Swift\nthe beatles\n"
    );
}

#[test]
fn test_playlist_tracks_listing_terminal_and_file() {
    let table = build_table(
        Listing::PlaylistTracks,
        &strings(&["Road Trip|||Africa|||Toto|||Toto IV", "Gym|||Eye of the Tiger|||Survivor"]),
        &ListingOptions::default(),
    );

    assert_eq!(
        render_terminal(&table, false),
        "Road Trip • Africa • Toto • Toto IV\nGym • Eye of the Tiger • Survivor • \n"
    );

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(Listing::PlaylistTracks.file_name());
    write_atomic(&path, &table.to_csv().unwrap()).unwrap();
    assert_eq!(
        std::fs::read_to_string(&path).unwrap(),
        "Playlist,Track,Artist,Album\nRoad Trip,Africa,Toto,Toto IV\nGym,Eye of the Tiger,Survivor,\n"
    );
}

#[test]
fn test_normalizing_normalized_output_is_stable() {
    let table = build_table(
        Listing::Playlists,
        &strings(&["Chill", "chill", "Focus ", "CHILL"]),
        &ListingOptions::default(),
    );
    let values: Vec<String> = table.rows.iter().map(|r| r[0].clone()).collect();

    let mut again = Normalizer::new(NormalizerConfig::default());
    again.extend(&values);
    assert_eq!(again.values(), values);
    assert_eq!(Table::single("playlist", again.values()), table);
}

#[cfg(unix)]
mod pipeline {
    use super::*;
    use tracklist_common::{
        export, AutomationEngine, ErrorKind, ExtractionRunner, QueryKind, ScriptRegistry,
    };

    fn runner(kind: QueryKind, script: &str) -> ExtractionRunner {
        ExtractionRunner::new(
            AutomationEngine {
                program: "sh".to_string(),
                args: vec!["-c".to_string()],
            },
            ScriptRegistry::empty().with_script(kind, script),
        )
    }

    #[tokio::test]
    async fn test_export_albums() {
        let runner = runner(
            QueryKind::Albums,
            "echo 'Arrival|||ABBA'; echo 'ARRIVAL|||abba'; echo 'Toto IV|||Toto'",
        );
        let table = export(Listing::Albums, &runner, &ListingOptions::default(), |_| {})
            .await
            .unwrap();
        assert_eq!(
            table.to_csv().unwrap(),
            "Album,Album Artist\nArrival,ABBA\nToto IV,Toto\n"
        );
    }

    #[tokio::test]
    async fn test_export_artists_with_fallback_uses_detailed_query() {
        let runner = runner(
            QueryKind::Detailed,
            "echo 'Song||||||Various Artists|||Hits'",
        );
        let options = ListingOptions {
            fallback: true,
            ..Default::default()
        };
        let table = export(Listing::Artists, &runner, &options, |_| {})
            .await
            .unwrap();
        assert_eq!(table.rows, vec![vec!["Various Artists".to_string()]]);
    }

    #[tokio::test]
    async fn test_export_with_limit_counts_lines() {
        let runner = runner(
            QueryKind::Playlists,
            "i=0; while [ $i -lt 20 ]; do echo list$i; i=$((i+1)); done; exit 1",
        );
        let options = ListingOptions {
            limit: Some(5),
            ..Default::default()
        };
        let mut progress = 0;
        let table = export(Listing::Playlists, &runner, &options, |_| progress += 1)
            .await
            .unwrap();
        assert_eq!(table.len(), 5);
        assert_eq!(progress, 5);
    }

    #[tokio::test]
    async fn test_export_failure_propagates_kind() {
        let runner = runner(QueryKind::Tracks, "echo 'User canceled.' >&2; exit 1");
        let err = export(Listing::Tracks, &runner, &ListingOptions::default(), |_| {})
            .await
            .unwrap_err();
        assert_eq!(err.kind(), Some(ErrorKind::PermissionDenied));
        assert_eq!(err.exit_code(), 3);
    }
}
