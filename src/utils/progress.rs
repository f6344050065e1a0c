//! Progress indicators for long-running operations
//!
//! Thin wrapper over `indicatif` giving batch generation a consistent look
//! and a single switch for automation environments: setting the
//! `PAGEGEN_NO_PROGRESS` environment variable to any value replaces every
//! indicator with a hidden bar that silently ignores all operations. The
//! CLI sets it for `--no-progress` and `--quiet`.
//!
//! # Examples
//!
//! ```rust
//! use pagegen_cli::utils::progress::ProgressBar;
//!
//! let progress = ProgressBar::new(120);
//! progress.set_message("Generating pages");
//! for _ in 0..120 {
//!     progress.inc(1);
//! }
//! progress.finish_with_message("Done");
//! ```

use indicatif::{ProgressBar as IndicatifBar, ProgressStyle as IndicatifStyle};
use std::time::Duration;

/// Checks if progress bars should be disabled.
fn is_progress_disabled() -> bool {
    std::env::var("PAGEGEN_NO_PROGRESS").is_ok()
}

/// A progress bar with consistent styling.
///
/// Wraps `indicatif` with pagegen styling; respects the
/// `PAGEGEN_NO_PROGRESS` environment variable. The underlying bar is
/// thread-safe and can be shared across tasks.
#[derive(Clone)]
pub struct ProgressBar {
    inner: IndicatifBar,
}

impl ProgressBar {
    /// Create a progress bar tracking `len` units of work.
    #[must_use]
    pub fn new(len: u64) -> Self {
        let bar = if is_progress_disabled() {
            IndicatifBar::hidden()
        } else {
            let bar = IndicatifBar::new(len);
            bar.set_style(default_style());
            bar
        };
        Self { inner: bar }
    }

    /// Create a spinner for indeterminate work.
    #[must_use]
    pub fn new_spinner() -> Self {
        let bar = if is_progress_disabled() {
            IndicatifBar::hidden()
        } else {
            let bar = IndicatifBar::new_spinner();
            bar.set_style(spinner_style());
            bar.enable_steady_tick(Duration::from_millis(100));
            bar
        };
        Self { inner: bar }
    }

    /// Set the message shown next to the indicator.
    pub fn set_message(&self, msg: impl Into<String>) {
        self.inner.set_message(msg.into());
    }

    /// Advance the bar by `delta` units.
    pub fn inc(&self, delta: u64) {
        self.inner.inc(delta);
    }

    /// Finish and leave `msg` on screen.
    pub fn finish_with_message(&self, msg: impl Into<String>) {
        self.inner.finish_with_message(msg.into());
    }

    /// Finish and clear the indicator line.
    pub fn finish_and_clear(&self) {
        self.inner.finish_and_clear();
    }
}

fn default_style() -> IndicatifStyle {
    IndicatifStyle::default_bar()
        .template("{prefix:.bold} [{bar:40.cyan/blue}] {pos}/{len} ({eta})")
        .unwrap_or_else(|_| IndicatifStyle::default_bar())
        .progress_chars("━╸━")
}

fn spinner_style() -> IndicatifStyle {
    IndicatifStyle::default_spinner()
        .template("{prefix:.bold} {spinner:.cyan} {msg}")
        .unwrap_or_else(|_| IndicatifStyle::default_spinner())
        .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"])
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn hidden_bar_ignores_operations() {
        unsafe { std::env::set_var("PAGEGEN_NO_PROGRESS", "1") };
        let bar = ProgressBar::new(10);
        bar.set_message("working");
        bar.inc(5);
        bar.finish_and_clear();
        unsafe { std::env::remove_var("PAGEGEN_NO_PROGRESS") };
    }
}
