use std::time::Duration;

use crate::pipeline::convert_error::ConvertError;
use crate::pipeline::progress_logger::ProgressLogger;
use crate::recognition::domain::recognition_client::RecognitionClient;
use crate::recognition::domain::recognition_job::{JobStatus, RecognitionJob};
use crate::recognition::domain::transcript::RecognitionResult;

/// Blocks the calling thread between status polls.
pub trait Sleeper: Send {
    fn sleep(&self, duration: Duration);
}

pub struct ThreadSleeper;

impl Sleeper for ThreadSleeper {
    fn sleep(&self, duration: Duration) {
        std::thread::sleep(duration);
    }
}

/// Waits for a long-running recognition job with a bounded number of polls.
///
/// A budget `W` with interval `I` allows `floor(W / I) + 1` sleep-then-poll
/// rounds, so even `W = 0` sleeps once before the only check.
pub struct OperationPoller {
    interval: Duration,
    sleeper: Box<dyn Sleeper>,
}

impl OperationPoller {
    pub fn new(interval: Duration, sleeper: Box<dyn Sleeper>) -> Result<Self, &'static str> {
        if interval.is_zero() {
            return Err("poll interval must be greater than zero");
        }
        Ok(Self { interval, sleeper })
    }

    /// Number of poll attempts allowed for a wait budget.
    pub fn attempts_for(&self, max_wait: Duration) -> u128 {
        max_wait.as_nanos() / self.interval.as_nanos() + 1
    }

    pub fn wait_for_completion(
        &self,
        client: &dyn RecognitionClient,
        job: &RecognitionJob,
        max_wait: Duration,
        logger: &mut dyn ProgressLogger,
    ) -> Result<RecognitionResult, ConvertError> {
        let mut retries = self.attempts_for(max_wait);
        let mut status = JobStatus::default();

        while retries > 0 && !status.done {
            retries -= 1;
            self.sleeper.sleep(self.interval);
            status = client.poll(job)?;
            logger.progress(status.progress_percent);
        }
        logger.summary();

        if !status.done {
            return Err(ConvertError::Timeout {
                job: job.clone(),
                waited: max_wait,
            });
        }

        Ok(client.fetch_result(job)?)
    }
}
