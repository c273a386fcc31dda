use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

use crate::ui;

/// A stderr spinner that is a no-op when progress output is disabled.
pub struct Progress {
    bar: Option<ProgressBar>,
}

impl Progress {
    #[must_use]
    pub fn spinner(message: &str) -> Self {
        if !ui::prefs().progress {
            return Self { bar: None };
        }

        let bar = ProgressBar::new_spinner();
        bar.enable_steady_tick(Duration::from_millis(100));
        bar.set_style(
            ProgressStyle::with_template("{spinner:.cyan} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        bar.set_message(message.to_string());
        Self { bar: Some(bar) }
    }

    pub fn set_message(&self, message: &str) {
        if let Some(bar) = &self.bar {
            bar.set_message(message.to_string());
        }
    }

    pub fn finish_clear(&self) {
        if let Some(bar) = &self.bar {
            bar.finish_and_clear();
        }
    }

    pub fn finish_err(&self, message: &str) {
        if let Some(bar) = &self.bar {
            bar.abandon_with_message(message.to_string());
        }
    }

    /// Clear on success, leave the message on failure.
    pub fn settle<T, E>(&self, result: &Result<T, E>, failure: &str) {
        if result.is_ok() {
            self.finish_clear();
        } else {
            self.finish_err(failure);
        }
    }
}
