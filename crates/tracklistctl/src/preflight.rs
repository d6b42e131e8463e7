//! Preflight checks behind `tracklistctl doctor`
//!
//! Offline and deterministic: nothing here talks to the media application.

use owo_colors::OwoColorize;
use std::path::{Path, PathBuf};
use tracklist_common::error::{EXIT_AUTOMATION_ERROR, EXIT_SUCCESS};
use tracklist_common::QueryKind;

use crate::config::Config;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckStatus {
    Ok,
    Warn,
    Fail,
}

impl CheckStatus {
    fn label(&self) -> &'static str {
        match self {
            CheckStatus::Ok => "[OK]",
            CheckStatus::Warn => "[WARN]",
            CheckStatus::Fail => "[FAIL]",
        }
    }
}

#[derive(Debug, Clone)]
pub struct CheckResult {
    pub name: &'static str,
    pub status: CheckStatus,
    pub details: String,
}

impl CheckResult {
    fn new(name: &'static str, status: CheckStatus, details: impl Into<String>) -> Self {
        Self {
            name,
            status,
            details: details.into(),
        }
    }
}

fn check_platform() -> CheckResult {
    if cfg!(target_os = "macos") {
        CheckResult::new("platform", CheckStatus::Ok, "macOS")
    } else {
        CheckResult::new(
            "platform",
            CheckStatus::Warn,
            format!(
                "{} (library automation needs macOS unless a custom engine is configured)",
                std::env::consts::OS
            ),
        )
    }
}

fn check_engine(program: &str) -> CheckResult {
    match which::which(program) {
        Ok(path) => CheckResult::new("engine", CheckStatus::Ok, path.display().to_string()),
        Err(e) => CheckResult::new("engine", CheckStatus::Fail, format!("{}: {}", program, e)),
    }
}

fn check_config_file(path: Option<&Path>) -> CheckResult {
    match path {
        Some(path) if path.exists() => {
            CheckResult::new("config", CheckStatus::Ok, path.display().to_string())
        }
        Some(path) => CheckResult::new(
            "config",
            CheckStatus::Ok,
            format!("{} (not present, using defaults)", path.display()),
        ),
        None => CheckResult::new("config", CheckStatus::Warn, "no config directory found"),
    }
}

fn check_scripts(config: &Config) -> CheckResult {
    match config.registry() {
        Ok(registry) => {
            let missing: Vec<&str> = QueryKind::ALL
                .iter()
                .filter(|kind| !registry.exists(**kind))
                .map(|kind| kind.as_str())
                .collect();
            if missing.is_empty() {
                let source = match &config.scripts_dir {
                    Some(dir) => format!("overrides from {}", dir.display()),
                    None => "embedded".to_string(),
                };
                CheckResult::new("scripts", CheckStatus::Ok, source)
            } else {
                CheckResult::new(
                    "scripts",
                    CheckStatus::Fail,
                    format!("missing: {}", missing.join(", ")),
                )
            }
        }
        Err(e) => CheckResult::new("scripts", CheckStatus::Fail, e.to_string()),
    }
}

/// Run every check against an already-loaded configuration
pub fn run_checks(config: &Config, config_path: Option<&Path>) -> Vec<CheckResult> {
    vec![
        check_platform(),
        check_engine(&config.engine.program),
        check_config_file(config_path),
        check_scripts(config),
    ]
}

/// Exit code for a set of results: any failure is an automation error
pub fn exit_code(results: &[CheckResult]) -> i32 {
    if results.iter().any(|r| r.status == CheckStatus::Fail) {
        EXIT_AUTOMATION_ERROR
    } else {
        EXIT_SUCCESS
    }
}

/// Print results and return the exit code
pub fn report(config: &Config, config_path: Option<PathBuf>) -> i32 {
    let results = run_checks(config, config_path.as_deref());

    for result in &results {
        let label = result.status.label();
        let label = match result.status {
            CheckStatus::Ok => label.green().to_string(),
            CheckStatus::Warn => label.yellow().to_string(),
            CheckStatus::Fail => label.red().to_string(),
        };
        println!("{:7} {:8} {}", label, result.name, result.details.dimmed());
    }

    exit_code(&results)
}
