use std::io::Write;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Receives progress updates from the experiment driver
///
/// Called from worker threads on parallel runs, hence `Sync`
pub trait Progress: Sync {
    /// Called once for every finished experiment
    ///
    /// # Arguments
    ///
    /// * `done`: Experiments finished so far, including this one
    /// * `total`: Experiments in the run
    ///
    /// returns: ()
    fn experiment_finished(&self, done: usize, total: usize);

    /// Called once after the last experiment
    fn finish(&self) {}
}

/// Discards all progress updates
#[derive(Default)]
pub struct NoProgress;

impl Progress for NoProgress {
    fn experiment_finished(&self, _done: usize, _total: usize) {}
}

/// A bar on stderr, redrawn in place whenever another segment fills up
///
/// Writes to stderr so the result table on stdout can still be piped
pub struct ConsoleProgress {
    segments: usize,
    // Segments already drawn plus one, zero before the first draw
    drawn: AtomicUsize,
}

impl ConsoleProgress {
    pub const DEFAULT_SEGMENTS: usize = 20;

    pub fn new(segments: usize) -> Self {
        Self {
            segments: segments.max(1),
            drawn: AtomicUsize::new(0),
        }
    }

    fn render(&self, filled: usize) -> String {
        format!(
            "Running experiments [{}{}]",
            "#".repeat(filled),
            "-".repeat(self.segments - filled)
        )
    }
}

impl Default for ConsoleProgress {
    fn default() -> Self {
        Self::new(Self::DEFAULT_SEGMENTS)
    }
}

impl Progress for ConsoleProgress {
    fn experiment_finished(&self, done: usize, total: usize) {
        let filled = (done * self.segments / total.max(1)).min(self.segments);
        // Only the thread that moves the bar forward redraws it
        if self.drawn.fetch_max(filled + 1, Ordering::Relaxed) > filled {
            return;
        }
        let mut stderr = std::io::stderr().lock();
        // Progress output is best effort, a closed stderr shouldn't stop the run
        let _ = write!(stderr, "\x1b[2K\r{}", self.render(filled));
        let _ = stderr.flush();
    }

    fn finish(&self) {
        let _ = writeln!(std::io::stderr());
    }
}
