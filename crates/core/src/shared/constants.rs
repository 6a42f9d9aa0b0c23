/// Extension (lowercase, without dot) of the lossless codec the recognizer accepts.
pub const TARGET_EXTENSION: &str = "flac";
pub const TARGET_CONTENT_TYPE: &str = "audio/flac";

pub const DEFAULT_LANGUAGE: &str = "en-US";

/// Wait budget used by the CLI unless `--nowait` or `--wait` says otherwise.
pub const DEFAULT_WAIT_SECS: u64 = 1200;
pub const DEFAULT_POLL_INTERVAL_SECS: u64 = 10;

/// Files at or below this size are sent inline instead of uploaded.
/// Zero means every non-empty file is uploaded.
pub const DEFAULT_MIN_UPLOAD_BYTES: u64 = 0;

pub const DEFAULT_FFMPEG_PATH: &str = "ffmpeg";

pub const GOOGLE_SCOPE: &str = "https://www.googleapis.com/auth/cloud-platform";
pub const GOOGLE_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";
pub const SPEECH_BASE_URL: &str = "https://speech.googleapis.com";
pub const STORAGE_BASE_URL: &str = "https://storage.googleapis.com";

pub const DEFAULT_BUCKET: &str = "podcasting";

/// Refresh access tokens this many seconds before they expire.
pub const TOKEN_EXPIRY_MARGIN_SECS: u64 = 60;
pub const TOKEN_LIFETIME_SECS: u64 = 3600;
