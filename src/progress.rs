use std::io;
use std::time::{Duration, Instant};

use crossterm::{
    execute,
    style::{Color, Print, ResetColor, SetForegroundColor},
};

use crate::driver::BatchSummary;
use crate::utils::format_hms;

/// Prints one progress line per processed vehicle ID, with a linear ETA over
/// the remainder of the range.
pub struct ProgressPrinter {
    total: u64,
    processed: u64,
    started: Instant,
}

impl ProgressPrinter {
    pub fn new(total: u64) -> Self {
        Self {
            total,
            processed: 0,
            started: Instant::now(),
        }
    }

    /// Marks one more ID as processed and reports where the run stands.
    pub fn tick(&mut self) -> io::Result<()> {
        self.processed += 1;
        let remaining = self.total - self.processed;

        execute!(
            io::stdout(),
            SetForegroundColor(Color::DarkGrey),
            Print(format!(
                "Processed: {}/{} | Remaining: {} | Estimated Time Left: {}\n",
                self.processed,
                self.total,
                remaining,
                format_hms(self.estimate_remaining(remaining))
            )),
            ResetColor
        )
    }

    /// Average wall-clock time per processed ID, extrapolated over what is
    /// left of the range.
    fn estimate_remaining(&self, remaining: u64) -> Duration {
        if self.processed == 0 {
            return Duration::ZERO;
        }

        let per_item = self.started.elapsed().as_secs_f64() / self.processed as f64;
        Duration::from_secs_f64(per_item * remaining as f64)
    }

    pub fn finish(&self, summary: &BatchSummary, output_file: &str) -> io::Result<()> {
        execute!(
            io::stdout(),
            SetForegroundColor(Color::Green),
            Print(format!(
                "✅ Scraping completed: {} listings written",
                summary.written
            )),
            ResetColor
        )?;

        if summary.parse_errors > 0 {
            execute!(
                io::stdout(),
                SetForegroundColor(Color::Red),
                Print(format!(", {} failed to parse", summary.parse_errors)),
                ResetColor
            )?;
        }

        execute!(
            io::stdout(),
            SetForegroundColor(Color::DarkGrey),
            Print(format!(
                " | {} not found | saved to {}\n",
                summary.not_found, output_file
            )),
            ResetColor
        )
    }
}
