//! Spinner display for long-running external operations

use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

/// Spinner shown while a child process (compose down, backup) blocks
///
/// Disabled in automation mode, where output must stay line-structured.
pub struct StepSpinner {
    bar: Option<ProgressBar>,
}

impl StepSpinner {
    pub fn start(message: &str, enabled: bool) -> Self {
        if !enabled {
            return Self { bar: None };
        }

        let style = ProgressStyle::default_spinner()
            .template("{spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner());

        let bar = ProgressBar::new_spinner();
        bar.set_style(style);
        bar.set_message(message.to_string());
        bar.enable_steady_tick(Duration::from_millis(120));

        Self { bar: Some(bar) }
    }

    /// Clear the spinner; the caller prints the outcome line
    pub fn finish(self) {
        if let Some(bar) = self.bar {
            bar.finish_and_clear();
        }
    }
}
