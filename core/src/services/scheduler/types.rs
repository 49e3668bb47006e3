//! Types for scheduler run results

/// Summary of one scheduler run
///
/// `total = processed + skipped`; `processed = sent + failed`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Reminders that were due this run
    pub total: usize,
    /// Reminders that went through dispatch
    pub processed: usize,
    /// Reminders with at least one successful channel
    pub sent: usize,
    /// Processed reminders on which every channel attempt failed
    pub failed: usize,
    /// Reminders skipped without dispatch (opt-out, schedule repair)
    pub skipped: usize,
}
