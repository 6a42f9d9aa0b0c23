use std::time::Instant;

/// Observer for the wait-for-completion loop.
///
/// Keeps the poller independent of where progress ends up (log output,
/// nowhere in tests).
pub trait ProgressLogger: Send {
    /// Report the completion percentage from one status poll.
    fn progress(&mut self, percent: u32);

    /// Log a human-readable status message.
    fn info(&mut self, message: &str);

    /// Emit an end-of-wait summary. Default: no-op.
    fn summary(&self) {}
}

/// Discards all events.
pub struct NullProgressLogger;

impl ProgressLogger for NullProgressLogger {
    fn progress(&mut self, _percent: u32) {}
    fn info(&mut self, _message: &str) {}
}

/// Forwards progress to the `log` crate and keeps enough history for a
/// one-line summary once waiting is over.
pub struct LogProgressLogger {
    start_time: Instant,
    polls: usize,
    last_percent: Option<u32>,
}

impl LogProgressLogger {
    pub fn new() -> Self {
        Self {
            start_time: Instant::now(),
            polls: 0,
            last_percent: None,
        }
    }

    /// Returns the formatted summary, or `None` if nothing was polled.
    pub fn summary_string(&self) -> Option<String> {
        let last = self.last_percent?;
        let elapsed = self.start_time.elapsed().as_secs_f64();
        Some(format!(
            "Polled {} time(s) over {elapsed:.1}s, last progress {last}%",
            self.polls
        ))
    }
}

impl Default for LogProgressLogger {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressLogger for LogProgressLogger {
    fn progress(&mut self, percent: u32) {
        self.polls += 1;
        self.last_percent = Some(percent);
        log::info!("Progress: {percent}%");
    }

    fn info(&mut self, message: &str) {
        log::info!("{message}");
    }

    fn summary(&self) {
        if let Some(text) = self.summary_string() {
            log::info!("{text}");
        }
    }
}
