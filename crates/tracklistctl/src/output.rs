//! Output formatting - status lines on stderr, data on stdout

use owo_colors::{AnsiColors, OwoColorize};
use std::io::{self, Write};
use std::path::PathBuf;
use tracklist_common::ExportError;

/// Whether ANSI colors may be used on the given stream
pub fn colors_enabled(configured: bool, stream: atty::Stream) -> bool {
    configured && std::env::var_os("NO_COLOR").is_none() && atty::is(stream)
}

/// Human-readable report for a failed run
pub fn format_error(err: &ExportError) -> String {
    let mut out = String::new();
    match err {
        ExportError::Extraction { kind, detail } => {
            out.push_str(&format!("[ERROR] {}\n", kind.explanation()));
            if let Some(remediation) = kind.remediation() {
                out.push_str(&format!("\n{}\n", remediation));
            }
            if !detail.is_empty() {
                out.push_str(&format!("\n  detail: {}\n", detail));
            }
        }
        other => out.push_str(&format!("[ERROR] {}\n", other)),
    }
    out
}

/// Display an error
pub fn display_error(err: &ExportError) {
    let report = format_error(err);
    if colors_enabled(true, atty::Stream::Stderr) {
        let mut lines = report.lines();
        if let Some(first) = lines.next() {
            eprintln!("{}", first.red());
        }
        for line in lines {
            eprintln!("{}", line);
        }
    } else {
        eprint!("{}", report);
    }
}

/// `[LABEL] message`, with the message colored when enabled
pub fn status_line(label: &str, message: &str, color: AnsiColors, colored: bool) -> String {
    if colored {
        format!("[{}] {}", label, message.color(color))
    } else {
        format!("[{}] {}", label, message)
    }
}

fn display_status(label: &str, message: &str, color: AnsiColors) {
    let colored = colors_enabled(true, atty::Stream::Stderr);
    eprintln!("{}", status_line(label, message, color, colored));
}

/// Display a plain error message
pub fn display_message_error(message: &str) {
    display_status("ERROR", message, AnsiColors::Red);
}

/// Display a success message
pub fn display_success(message: &str) {
    display_status("OK", message, AnsiColors::Green);
}

/// Display a warning
pub fn display_warning(message: &str) {
    display_status("WARNING", message, AnsiColors::Yellow);
}

/// Write exported data to `out`
///
/// A closed reader (`| head`) ends output quietly. Any other failure is a
/// file write error against stdout.
pub fn write_data<W: Write>(out: &mut W, data: &str) -> Result<(), ExportError> {
    let result = out.write_all(data.as_bytes()).and_then(|()| out.flush());
    match result {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::BrokenPipe => {
            tracing::debug!("stdout closed early, stopping output");
            Ok(())
        }
        Err(e) => Err(ExportError::FileWrite {
            path: PathBuf::from("<stdout>"),
            detail: e.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracklist_common::ErrorKind;

    /// Writer that fails every write with the given error kind
    struct FailingWriter(io::ErrorKind);

    impl Write for FailingWriter {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(self.0, "write failed"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_write_data_to_closed_pipe_is_ok() {
        let mut out = FailingWriter(io::ErrorKind::BrokenPipe);
        assert!(write_data(&mut out, "Africa • Toto\n").is_ok());
    }

    #[test]
    fn test_write_data_other_failure_is_file_write_error() {
        let mut out = FailingWriter(io::ErrorKind::PermissionDenied);
        let err = write_data(&mut out, "Africa • Toto\n").unwrap_err();
        assert_eq!(err.exit_code(), tracklist_common::error::EXIT_FILE_WRITE_ERROR);
    }

    #[test]
    fn test_write_data_writes_everything() {
        let mut out = Vec::new();
        write_data(&mut out, "ABBA, Toto\n").unwrap();
        assert_eq!(out, b"ABBA, Toto\n");
    }

    #[test]
    fn test_status_line_plain_has_no_ansi() {
        let line = status_line("OK", "wrote 3 rows to artists.csv", AnsiColors::Green, false);
        assert_eq!(line, "[OK] wrote 3 rows to artists.csv");
    }

    #[test]
    fn test_status_line_colored() {
        let line = status_line("WARNING", "No tracks found", AnsiColors::Yellow, true);
        assert!(line.starts_with("[WARNING] \u{1b}["));
        assert!(line.contains("No tracks found"));
    }

    #[test]
    fn test_permission_report_has_remediation() {
        let err = ExportError::Extraction {
            kind: ErrorKind::PermissionDenied,
            detail: "Not authorized to send Apple events to Music. (-1743)".to_string(),
        };
        let report = format_error(&err);
        assert!(report.starts_with("[ERROR] Not allowed to control"));
        assert!(report.contains("Privacy & Security > Automation"));
        assert!(report.contains("detail: Not authorized"));
    }

    #[test]
    fn test_unavailable_report_has_no_remediation() {
        let err = ExportError::Extraction {
            kind: ErrorKind::TargetUnavailable,
            detail: String::new(),
        };
        let report = format_error(&err);
        assert_eq!(
            report,
            "[ERROR] The media application is not installed or could not be launched.\n"
        );
    }

    #[test]
    fn test_file_write_report() {
        let err = ExportError::FileWrite {
            path: PathBuf::from("/readonly/artists.csv"),
            detail: "Permission denied (os error 13)".to_string(),
        };
        assert_eq!(
            format_error(&err),
            "[ERROR] Could not write /readonly/artists.csv: Permission denied (os error 13)\n"
        );
    }
}
