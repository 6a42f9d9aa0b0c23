use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use tempfile::TempPath;

use crate::shared::constants::{DEFAULT_FFMPEG_PATH, TARGET_EXTENSION};
use crate::transcoding::domain::transcoder::{TranscodeError, Transcoder};

/// Converts any input ffmpeg can read into single-channel FLAC by running
/// the `ffmpeg` executable.
///
/// Output goes to a fresh temporary file whose handle is closed before
/// ffmpeg starts, so the encoder can overwrite it on every platform.
#[derive(Debug, Clone)]
pub struct FfmpegTranscoder {
    program: PathBuf,
}

impl FfmpegTranscoder {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    fn temp_output() -> Result<TempPath, TranscodeError> {
        tempfile::Builder::new()
            .prefix("convert2text-")
            .suffix(&format!(".{TARGET_EXTENSION}"))
            .tempfile()
            .map(|f| f.into_temp_path())
            .map_err(TranscodeError::TempFile)
    }
}

impl Default for FfmpegTranscoder {
    fn default() -> Self {
        Self::new(DEFAULT_FFMPEG_PATH)
    }
}

impl Transcoder for FfmpegTranscoder {
    fn transcode(&self, input: &Path) -> Result<TempPath, TranscodeError> {
        let output = Self::temp_output()?;
        log::info!(
            "Converting {} to mono {TARGET_EXTENSION}",
            input.display()
        );

        let status = Command::new(&self.program)
            .arg("-hide_banner")
            .args(["-loglevel", "error"])
            .arg("-i")
            .arg(input)
            .arg("-y")
            .args(["-ac", "1"])
            .arg(&*output)
            .stdin(Stdio::null())
            .status()
            .map_err(|e| TranscodeError::Spawn {
                program: self.program.clone(),
                source: e,
            })?;

        if !status.success() {
            return Err(TranscodeError::Failed {
                input: input.to_path_buf(),
                code: status.code(),
            });
        }

        log::debug!("Transcoded {} -> {}", input.display(), output.display());
        Ok(output)
    }
}
