use std::fmt;

/// Handle to a long-running recognition operation on the remote service.
///
/// Dropping the handle does not cancel anything; the operation keeps
/// running server-side.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct RecognitionJob {
    name: String,
}

impl RecognitionJob {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for RecognitionJob {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// One status observation of a running job.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct JobStatus {
    pub done: bool,
    pub progress_percent: u32,
}

#[cfg(test)]
impl JobStatus {
    pub fn running(progress_percent: u32) -> Self {
        Self {
            done: false,
            progress_percent,
        }
    }

    pub fn completed() -> Self {
        Self {
            done: true,
            progress_percent: 100,
        }
    }
}
