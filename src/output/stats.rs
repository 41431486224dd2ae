//! Run statistics
//!
//! [`RunStats`] is owned by the orchestrator and updated as URLs are
//! processed. [`RunStats::summarize`] takes an immutable snapshot for
//! reporting.

use std::fmt;
use std::time::{Duration, Instant};

/// Counters for one run
#[derive(Debug, Clone)]
pub struct RunStats {
    total: usize,
    succeeded: usize,
    failed: usize,
    discovered: usize,
    start: Instant,
}

impl RunStats {
    /// Starts the clock
    pub fn new() -> Self {
        Self {
            total: 0,
            succeeded: 0,
            failed: 0,
            discovered: 0,
            start: Instant::now(),
        }
    }

    pub fn set_discovered(&mut self, discovered: usize) {
        self.discovered = discovered;
    }

    pub fn record_success(&mut self) {
        self.total += 1;
        self.succeeded += 1;
    }

    pub fn record_failure(&mut self) {
        self.total += 1;
        self.failed += 1;
    }

    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    pub fn summarize(&self) -> RunSummary {
        RunSummary {
            total: self.total,
            succeeded: self.succeeded,
            failed: self.failed,
            discovered: self.discovered,
            elapsed: self.elapsed(),
        }
    }
}

impl Default for RunStats {
    fn default() -> Self {
        Self::new()
    }
}

/// Snapshot of a finished (or aborted) run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    /// URLs attempted in the processing phase
    pub total: usize,

    /// Artifacts written
    pub succeeded: usize,

    /// Fetch, parse or write failures
    pub failed: usize,

    /// URLs known after discovery (or given as input)
    pub discovered: usize,

    pub elapsed: Duration,
}

impl RunSummary {
    /// Share of attempted URLs that produced an artifact, as a percentage
    pub fn success_rate(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        (self.succeeded as f64 / self.total as f64) * 100.0
    }
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{} succeeded, {} failed, {} discovered in {:.1}s",
            self.succeeded,
            self.total,
            self.failed,
            self.discovered,
            self.elapsed.as_secs_f64()
        )
    }
}

/// Prints the summary block shown at the end of a run
pub fn print_summary(summary: &RunSummary) {
    println!("=== Run Summary ===\n");
    println!("  Discovered: {}", summary.discovered);
    println!("  Succeeded:  {}/{}", summary.succeeded, summary.total);
    println!("  Failed:     {}/{}", summary.failed, summary.total);
    println!("  Duration:   {:.1}s", summary.elapsed.as_secs_f64());
    println!();
    println!("Success Rate: {:.1}%", summary.success_rate());
}
