//! Command handlers driven through a config file and a shell engine.

#![cfg(unix)]

use std::path::Path;
use tracklist_common::ExportError;
use tracklistctl::cli::ExportArgs;
use tracklistctl::commands::{handle_doctor, handle_export};
use tracklistctl::config::Config;

/// Config using `sh -c` as the engine with scripts from `scripts_dir`
fn write_config(dir: &Path) -> std::path::PathBuf {
    let scripts = dir.join("scripts");
    std::fs::create_dir_all(&scripts).unwrap();
    std::fs::write(
        scripts.join("playlists.applescript"),
        "echo Chill; echo 'Focus '; echo chill; echo Beyoncé",
    )
    .unwrap();
    std::fs::write(
        scripts.join("tracks.applescript"),
        "echo 'Not authorized to send Apple events to {{APP}}.' >&2; exit 1",
    )
    .unwrap();

    let path = dir.join("config.toml");
    std::fs::write(
        &path,
        format!(
            "sort = true\nscripts_dir = \"{}\"\n\n[engine]\nprogram = \"sh\"\nargs = [\"-c\"]\n",
            scripts.display()
        ),
    )
    .unwrap();
    path
}

#[tokio::test]
async fn test_export_playlists_to_file() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_config(dir.path());
    let output = dir.path().join("out.csv");

    let args = ExportArgs {
        output: Some(output.clone()),
        ..Default::default()
    };
    handle_export(tracklist_common::Listing::Playlists, &args, Some(&config))
        .await
        .unwrap();

    assert_eq!(
        std::fs::read_to_string(&output).unwrap(),
        "Playlist\nBeyoncé\nChill\nFocus\n"
    );
    assert!(!dir.path().join("out.csv.tmp").exists());
}

#[tokio::test]
async fn test_permission_failure_maps_to_exit_code() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_config(dir.path());
    let output = dir.path().join("tracks.csv");

    let args = ExportArgs {
        output: Some(output.clone()),
        ..Default::default()
    };
    let err = handle_export(tracklist_common::Listing::Tracks, &args, Some(&config))
        .await
        .unwrap_err();
    let export_err = err.downcast_ref::<ExportError>().unwrap();
    assert_eq!(export_err.exit_code(), 3);
    assert!(!output.exists());
}

#[tokio::test]
async fn test_unwritable_destination_is_file_write_error() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_config(dir.path());

    let args = ExportArgs {
        output: Some(dir.path().join("missing").join("playlists.csv")),
        ..Default::default()
    };
    let err = handle_export(tracklist_common::Listing::Playlists, &args, Some(&config))
        .await
        .unwrap_err();
    assert_eq!(err.downcast_ref::<ExportError>().unwrap().exit_code(), 5);
}

#[tokio::test]
async fn test_malformed_config_is_usage_error() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("config.toml");
    std::fs::write(&config, "sort = [").unwrap();

    let err = handle_export(
        tracklist_common::Listing::Artists,
        &ExportArgs::default(),
        Some(&config),
    )
    .await
    .unwrap_err();
    assert_eq!(err.downcast_ref::<ExportError>().unwrap().exit_code(), 1);
}

#[test]
fn test_doctor_with_shell_engine_passes() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_config(dir.path());
    assert_eq!(handle_doctor(Some(&config)).unwrap(), 0);
    assert!(Config::load(Some(&config)).unwrap().sort);
}
