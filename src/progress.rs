//! Progress reporting infrastructure

use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use std::borrow::Cow;

/// CLI progress report of ongoing operations
///
/// To avoid corrupted terminal output, you should not write anything to stdout
/// or stderr yourself as long as a report is being displayed. Please use logs
/// for debug messages.
#[derive(Clone, Debug, Default)]
pub struct ProgressReport(MultiProgress);
//
impl ProgressReport {
    /// Prepare to report progress on the cli
    pub fn new() -> Self {
        Self::default()
    }

    /// Prepare to report on an operation whose total amount of work is not
    /// known upfront, like streaming records out of a compressed file
    pub fn add_counter(
        &self,
        what: impl Into<Cow<'static, str>>,
        unit: &str,
    ) -> ProgressTracker {
        let bar = ProgressBar::new_spinner()
            .with_prefix(what.into())
            .with_style(
                ProgressStyle::with_template(&format!("{{spinner}} {{prefix}}: {{pos}} {unit}"))
                    .expect("the template above should be a valid indicatif style"),
            );
        self.0.add(bar.clone());
        ProgressTracker {
            bar,
            report: self.0.clone(),
        }
    }
}

/// Mechanism to track progress
#[derive(Clone, Debug)]
pub struct ProgressTracker {
    /// Progress bar for this specific operation
    bar: ProgressBar,

    /// Underlying process report
    report: MultiProgress,
}
//
impl ProgressTracker {
    /// Show that a certain amount of progress has been made
    pub fn make_progress(&self, progress: u64) {
        self.bar.inc(progress);
    }

    /// Hide the progress bar once the operation is complete
    pub fn finish(&self) {
        self.bar.finish_and_clear();
        self.report.remove(&self.bar);
    }
}
