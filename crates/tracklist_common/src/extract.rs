//! Extraction runner
//!
//! Runs one automation script per call as a child process and:
//! - streams stdout line by line into an accumulator
//! - hands each line to an observer before reading the next one
//! - stops early and kills the child once a line limit is reached
//! - drains stderr into one buffer for classification
//!
//! A run is never retried. Reaching the limit is a success even if the
//! killed child reports a failing status.

use crate::classify::{classify, ErrorKind};
use crate::error::ExportError;
use crate::query::{QueryKind, ScriptRegistry};
use serde::{Deserialize, Serialize};
use std::num::NonZeroUsize;
use std::process::Stdio;
use std::time::Instant;
use tokio::io::{AsyncBufReadExt, AsyncReadExt, BufReader};
use tokio::process::Command;
use tracing::{debug, info, warn};

/// Default automation binary
pub const DEFAULT_PROGRAM: &str = "osascript";

/// How the automation engine is invoked; the script body is appended last
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AutomationEngine {
    pub program: String,
    pub args: Vec<String>,
}

impl Default for AutomationEngine {
    fn default() -> Self {
        Self {
            program: DEFAULT_PROGRAM.to_string(),
            args: vec!["-e".to_string()],
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExtractOptions {
    /// Stop after this many non-empty lines
    pub limit: Option<NonZeroUsize>,
}

impl ExtractOptions {
    pub fn with_limit(limit: usize) -> Self {
        Self {
            limit: NonZeroUsize::new(limit),
        }
    }
}

/// Outcome of one extraction run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExtractionResult {
    Success {
        lines: Vec<String>,
        /// The line limit was reached and the child was stopped early
        truncated: bool,
    },
    Failure {
        kind: ErrorKind,
        detail: String,
        /// Lines captured before the failure; never exported
        partial: Vec<String>,
    },
}

impl ExtractionResult {
    pub fn is_success(&self) -> bool {
        matches!(self, ExtractionResult::Success { .. })
    }

    /// Number of lines captured, including partial output of a failed run
    pub fn line_count(&self) -> usize {
        match self {
            ExtractionResult::Success { lines, .. } => lines.len(),
            ExtractionResult::Failure { partial, .. } => partial.len(),
        }
    }

    pub fn into_lines(self) -> Result<Vec<String>, ExportError> {
        match self {
            ExtractionResult::Success { lines, .. } => Ok(lines),
            ExtractionResult::Failure { kind, detail, .. } => {
                Err(ExportError::Extraction { kind, detail })
            }
        }
    }

    fn spawn_failure(detail: String) -> Self {
        ExtractionResult::Failure {
            kind: ErrorKind::AutomationError,
            detail,
            partial: Vec::new(),
        }
    }
}

/// Executes query scripts through the automation engine
#[derive(Debug, Clone, Default)]
pub struct ExtractionRunner {
    engine: AutomationEngine,
    registry: ScriptRegistry,
}

impl ExtractionRunner {
    pub fn new(engine: AutomationEngine, registry: ScriptRegistry) -> Self {
        Self { engine, registry }
    }

    pub fn engine(&self) -> &AutomationEngine {
        &self.engine
    }

    pub fn registry(&self) -> &ScriptRegistry {
        &self.registry
    }

    /// Run `kind` without observing individual lines
    pub async fn run(&self, kind: QueryKind, options: ExtractOptions) -> ExtractionResult {
        self.run_with(kind, options, |_| {}).await
    }

    /// Run `kind`, calling `on_line` for every collected line in order
    ///
    /// The observer runs to completion before the next line is read.
    pub async fn run_with<F>(
        &self,
        kind: QueryKind,
        options: ExtractOptions,
        mut on_line: F,
    ) -> ExtractionResult
    where
        F: FnMut(&str),
    {
        let start = Instant::now();

        let Some(script) = self.registry.get(kind) else {
            return ExtractionResult::spawn_failure(format!(
                "no automation script registered for {}",
                kind
            ));
        };

        let mut child = match Command::new(&self.engine.program)
            .args(&self.engine.args)
            .arg(script)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
        {
            Ok(child) => child,
            Err(e) => {
                warn!("Failed to start {} for {}: {}", self.engine.program, kind, e);
                return ExtractionResult::spawn_failure(format!(
                    "failed to start {}: {}",
                    self.engine.program, e
                ));
            }
        };
        debug!("Started {} for {} query", self.engine.program, kind);

        let stderr = child.stderr.take();
        let stderr_task = tokio::spawn(async move {
            let mut buf = Vec::new();
            if let Some(mut stderr) = stderr {
                if let Err(e) = stderr.read_to_end(&mut buf).await {
                    debug!("stderr read ended early: {}", e);
                }
            }
            buf
        });

        let mut lines = Vec::new();
        let mut truncated = false;

        if let Some(stdout) = child.stdout.take() {
            let mut segments = BufReader::new(stdout).split(b'\n');
            loop {
                let segment = match segments.next_segment().await {
                    Ok(Some(segment)) => segment,
                    Ok(None) => break,
                    Err(e) => {
                        warn!("Error reading {} output: {}", kind, e);
                        break;
                    }
                };

                let raw = String::from_utf8_lossy(&segment);
                let line = raw.strip_suffix('\r').unwrap_or(&*raw);
                if line.is_empty() {
                    continue;
                }

                lines.push(line.to_string());
                on_line(line);

                if options.limit.is_some_and(|limit| lines.len() >= limit.get()) {
                    truncated = true;
                    if let Err(e) = child.start_kill() {
                        debug!("Kill after limit failed: {}", e);
                    }
                    break;
                }
            }
        }

        if truncated {
            // The child may leave stderr open through descendants; not needed for a success.
            stderr_task.abort();
            let _ = child.wait().await;
            info!(
                "{} query stopped at limit of {} lines ({}ms)",
                kind,
                lines.len(),
                start.elapsed().as_millis()
            );
            return ExtractionResult::Success {
                lines,
                truncated: true,
            };
        }

        let status = child.wait().await;
        let diagnostic = stderr_task.await.unwrap_or_default();
        let diagnostic = String::from_utf8_lossy(&diagnostic).trim().to_string();

        match status {
            Ok(status) if status.success() => {
                if !diagnostic.is_empty() {
                    debug!("{} query wrote to stderr: {}", kind, diagnostic);
                }
                info!(
                    "{} query returned {} lines ({}ms)",
                    kind,
                    lines.len(),
                    start.elapsed().as_millis()
                );
                ExtractionResult::Success {
                    lines,
                    truncated: false,
                }
            }
            Ok(status) => {
                let kind_of_error = classify(&diagnostic);
                let detail = if diagnostic.is_empty() {
                    format!("{} exited with {}", self.engine.program, status)
                } else {
                    diagnostic
                };
                warn!(
                    "{} query failed ({}) after {} lines: {}",
                    kind,
                    kind_of_error,
                    lines.len(),
                    detail
                );
                ExtractionResult::Failure {
                    kind: kind_of_error,
                    detail,
                    partial: lines,
                }
            }
            Err(e) => {
                warn!("Failed waiting for {} query: {}", kind, e);
                ExtractionResult::Failure {
                    kind: ErrorKind::AutomationError,
                    detail: e.to_string(),
                    partial: lines,
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_engine_is_osascript() {
        let engine = AutomationEngine::default();
        assert_eq!(engine.program, "osascript");
        assert_eq!(engine.args, vec!["-e"]);
    }

    #[test]
    fn test_with_limit_zero_means_unlimited() {
        assert_eq!(ExtractOptions::with_limit(0).limit, None);
        assert_eq!(ExtractOptions::with_limit(5).limit.map(|l| l.get()), Some(5));
    }

    #[test]
    fn test_into_lines() {
        let ok = ExtractionResult::Success {
            lines: vec!["a".to_string()],
            truncated: false,
        };
        assert_eq!(ok.line_count(), 1);
        assert_eq!(ok.into_lines().unwrap(), vec!["a"]);

        let failed = ExtractionResult::Failure {
            kind: ErrorKind::TargetUnavailable,
            detail: "Application isn't running".to_string(),
            partial: vec!["a".to_string(), "b".to_string()],
        };
        assert!(!failed.is_success());
        assert_eq!(failed.line_count(), 2);
        let err = failed.into_lines().unwrap_err();
        assert_eq!(err.kind(), Some(ErrorKind::TargetUnavailable));
    }
}
