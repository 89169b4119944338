use std::{
    fmt::{self, Display},
    time::Instant,
};

use bulkfetch::FetchResult;

/// Aggregate counters for a batch, plus the wall clock for the whole run.
pub(crate) struct FetchStats {
    total: usize,
    successful: usize,
    http_failures: usize,
    transport_errors: usize,
    start: Instant,
}

impl FetchStats {
    pub(crate) fn new() -> Self {
        FetchStats {
            total: 0,
            successful: 0,
            http_failures: 0,
            transport_errors: 0,
            start: Instant::now(),
        }
    }

    pub(crate) fn add(&mut self, result: &FetchResult) {
        self.total += 1;
        if result.is_success() {
            self.successful += 1;
        } else if result.is_transport_failure() {
            self.transport_errors += 1;
        } else {
            self.http_failures += 1;
        }
    }

    pub(crate) fn is_success(&self) -> bool {
        self.total == self.successful
    }
}

impl Display for FetchStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "📝 Summary")?;
        writeln!(f, "-------------------")?;
        writeln!(f, "🔍 Total: {}", self.total)?;
        writeln!(f, "✅ Successful: {}", self.successful)?;
        writeln!(f, "🚫 Failed: {}", self.http_failures)?;
        writeln!(f, "⚡ Errors: {}", self.transport_errors)?;
        writeln!(f, "⌛ Duration: {:.2}s", self.start.elapsed().as_secs_f64())
    }
}
