//! Progress rendering for a running scan.
//!
//! Responsibilities:
//! - Turn scanner progress events into a stderr progress bar with one
//!   "done" line per finished service.
//! - Stay silent entirely under `--quiet`.
//!
//! Non-responsibilities:
//! - Deciding when events fire (the scanner's run context does) and
//!   printing report content (stdout is reserved for results).

use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};

use awsmap_scanner::{ProgressCallback, ScanEvent};

/// A unit-count progress bar over all planned work units.
///
/// Always draws to stderr; a disabled reporter is a no-op.
pub struct ScanReporter {
    bar: Option<ProgressBar>,
}

impl ScanReporter {
    /// `enabled` should be `!quiet`.
    pub fn new(enabled: bool, total_units: usize) -> Self {
        if !enabled {
            return Self { bar: None };
        }

        let bar = ProgressBar::new(total_units as u64);
        bar.set_draw_target(ProgressDrawTarget::stderr());
        bar.set_style(
            ProgressStyle::with_template("{spinner} scanning [{bar:40.cyan/blue}] {pos}/{len} units")
                .expect("template is a compile-time constant with valid syntax")
                .progress_chars("=>-"),
        );
        Self { bar: Some(bar) }
    }

    /// Build the callback handed to the scanner.
    pub fn callback(&self) -> Option<ProgressCallback> {
        let bar = self.bar.clone()?;
        Some(std::sync::Arc::new(move |event: ScanEvent| match event {
            ScanEvent::UnitFinished { .. } => bar.inc(1),
            ScanEvent::ServiceFinished { service, resources } => {
                bar.println(format!(
                    "  {:<20} Done: {} resources",
                    service.to_uppercase(),
                    resources
                ));
            }
        }))
    }

    /// Remove the bar from the terminal.
    pub fn finish(&self) {
        if let Some(bar) = &self.bar {
            bar.finish_and_clear();
        }
    }
}

impl Drop for ScanReporter {
    fn drop(&mut self) {
        // Clear a leftover bar so error output is not interleaved with it.
        if let Some(bar) = &self.bar
            && !bar.is_finished()
        {
            bar.finish_and_clear();
        }
    }
}
