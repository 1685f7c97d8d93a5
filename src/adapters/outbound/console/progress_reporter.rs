use crate::ports::outbound::ProgressReporter;
use indicatif::{ProgressBar, ProgressStyle};
use std::sync::Mutex;

/// StderrProgressReporter adapter for reporting scan progress to stderr
///
/// Writes to stderr so it never mixes with machine-readable stdout.
/// indicatif hides the bar automatically when stderr is not a terminal.
pub struct StderrProgressReporter {
    progress_bar: Mutex<Option<ProgressBar>>,
}

impl StderrProgressReporter {
    pub fn new() -> Self {
        Self {
            progress_bar: Mutex::new(None),
        }
    }

    fn style() -> ProgressStyle {
        ProgressStyle::default_bar()
            .template("   {spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} ({percent}%) - {msg}")
            .map(|style| style.progress_chars("=>-"))
            .unwrap_or_else(|_| ProgressStyle::default_bar())
    }

    fn with_bar(&self, f: impl FnOnce(&ProgressBar)) {
        if let Ok(guard) = self.progress_bar.lock() {
            if let Some(pb) = guard.as_ref() {
                f(pb);
            }
        }
    }

    fn finish(&self) {
        if let Ok(mut guard) = self.progress_bar.lock() {
            if let Some(pb) = guard.take() {
                pb.finish_and_clear();
            }
        }
    }
}

impl Default for StderrProgressReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressReporter for StderrProgressReporter {
    fn start(&self, total: usize, message: &str) {
        let pb = ProgressBar::new(total as u64);
        pb.set_style(Self::style());
        pb.set_message(message.to_string());
        if let Ok(mut guard) = self.progress_bar.lock() {
            if let Some(previous) = guard.replace(pb) {
                previous.finish_and_clear();
            }
        }
    }

    fn advance(&self, label: &str) {
        self.with_bar(|pb| {
            pb.set_message(label.to_string());
            pb.inc(1);
        });
    }

    fn report_error(&self, message: &str) {
        let mut printed = false;
        self.with_bar(|pb| {
            pb.suspend(|| eprintln!("{}", message));
            printed = true;
        });
        if !printed {
            eprintln!("{}", message);
        }
    }

    fn report_completion(&self, message: &str) {
        self.finish();
        eprintln!("{}", message);
    }
}

/// Reporter that discards everything; used for `--quiet`-style runs and tests
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentProgressReporter;

impl ProgressReporter for SilentProgressReporter {
    fn start(&self, _total: usize, _message: &str) {}
    fn advance(&self, _label: &str) {}
    fn report_error(&self, _message: &str) {}
    fn report_completion(&self, _message: &str) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_progress_cycle() {
        let reporter = StderrProgressReporter::new();
        // Can't easily test stderr output, but verify it doesn't panic
        reporter.start(3, "Resolving components");
        reporter.advance("kubernetes-sigs/cluster-api");
        reporter.report_error("no qualifying release");
        reporter.advance("openshift/assisted-service");
        reporter.report_completion("done");
    }

    #[test]
    fn test_calls_without_start() {
        let reporter = StderrProgressReporter::default();
        reporter.advance("nothing started");
        reporter.report_error("still fine");
        reporter.report_completion("done");
    }

    #[test]
    fn test_restart_replaces_bar() {
        let reporter = StderrProgressReporter::new();
        reporter.start(1, "first");
        reporter.start(2, "second");
        reporter.advance("a");
        reporter.report_completion("done");
        assert!(reporter.progress_bar.lock().unwrap().is_none());
    }
}
