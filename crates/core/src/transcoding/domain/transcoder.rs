use std::path::{Path, PathBuf};

use tempfile::TempPath;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TranscodeError {
    #[error("failed to create temporary output file: {0}")]
    TempFile(#[source] std::io::Error),
    #[error("failed to start encoder {program}: {source}")]
    Spawn {
        program: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("encoder failed converting {input} (exit status {})", exit_status(.code))]
    Failed { input: PathBuf, code: Option<i32> },
}

fn exit_status(code: &Option<i32>) -> String {
    match code {
        Some(c) => c.to_string(),
        None => "killed by signal".to_string(),
    }
}

/// Domain interface for normalizing audio into the recognizer's codec.
///
/// The returned `TempPath` owns the converted file: it is removed when
/// dropped, whichever way the caller exits.
pub trait Transcoder: Send {
    fn transcode(&self, input: &Path) -> Result<TempPath, TranscodeError>;
}
