//! Progress Indicator - spinner while the library is being read
//!
//! Only shown when stderr is a TTY and NO_COLOR is unset, so piped
//! output never carries spinner artifacts. Spinner failures never block
//! the export.

use indicatif::{ProgressBar, ProgressStyle};
use std::time::{Duration, Instant};
use tracklist_common::Listing;

pub struct ProgressIndicator {
    spinner: Option<ProgressBar>,
    start_time: Instant,
    noun: &'static str,
    count: usize,
}

impl ProgressIndicator {
    pub fn new(listing: Listing) -> Self {
        let enabled = atty::is(atty::Stream::Stderr) && std::env::var_os("NO_COLOR").is_none();
        Self::with_enabled(listing, enabled)
    }

    /// Indicator that counts lines but never draws
    pub fn hidden(listing: Listing) -> Self {
        Self::with_enabled(listing, false)
    }

    fn with_enabled(listing: Listing, enabled: bool) -> Self {
        let spinner = enabled.then(|| {
            let pb = ProgressBar::new_spinner();
            if let Ok(style) = ProgressStyle::default_spinner()
                .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "✓"])
                .template("{spinner} {msg}")
            {
                pb.set_style(style);
            }
            pb.set_message(format!("Reading {} from library...", listing));
            pb.enable_steady_tick(Duration::from_millis(80));
            pb
        });

        Self {
            spinner,
            start_time: Instant::now(),
            noun: noun_for(listing),
            count: 0,
        }
    }

    /// Record one raw line of library output
    pub fn tick(&mut self) {
        self.count += 1;
        if let Some(pb) = &self.spinner {
            pb.set_message(self.message());
        }
    }

    pub fn count(&self) -> usize {
        self.count
    }

    pub fn message(&self) -> String {
        format!("{} {} found", self.count, self.noun)
    }

    /// Stop the spinner and clear its line
    pub fn finish(self) {
        tracing::debug!(
            "Read {} in {:.1}s",
            self.message(),
            self.start_time.elapsed().as_secs_f64()
        );
        if let Some(pb) = self.spinner {
            pb.finish_and_clear();
        }
    }
}

fn noun_for(listing: Listing) -> &'static str {
    match listing {
        Listing::Playlists => "playlists",
        _ => "lines",
    }
}
