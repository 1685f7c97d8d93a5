/// ProgressReporter port for user-facing progress during a scan
///
/// Separate from logging: this is what a person watching the terminal
/// sees. Implementations must tolerate calls from the scan's aggregation
/// loop only; they are never called from worker tasks.
pub trait ProgressReporter: Send + Sync {
    /// Starts a progress display for `total` units of work
    fn start(&self, total: usize, message: &str);

    /// Marks one unit of work (identified by `label`) as done
    fn advance(&self, label: &str);

    /// Reports a non-fatal problem without tearing down the display
    fn report_error(&self, message: &str);

    /// Ends the display and prints a completion line
    fn report_completion(&self, message: &str);
}
