use crate::shared::constants::DEFAULT_LANGUAGE;
use crate::storage::domain::blob_ref::RemoteBlobRef;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum AudioEncoding {
    #[default]
    Flac,
}

impl AudioEncoding {
    /// Name used on the wire by the speech API.
    pub fn as_api_str(self) -> &'static str {
        match self {
            AudioEncoding::Flac => "FLAC",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RecognitionConfig {
    pub encoding: AudioEncoding,
    /// BCP-47 language tag, e.g. `en-US`.
    pub language_code: String,
}

impl RecognitionConfig {
    pub fn new(language_code: impl Into<String>) -> Self {
        Self {
            encoding: AudioEncoding::Flac,
            language_code: language_code.into(),
        }
    }
}

impl Default for RecognitionConfig {
    fn default() -> Self {
        Self::new(DEFAULT_LANGUAGE)
    }
}

/// Where the recognizer reads audio from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RecognitionAudio {
    Uri(RemoteBlobRef),
    Content(Vec<u8>),
}
