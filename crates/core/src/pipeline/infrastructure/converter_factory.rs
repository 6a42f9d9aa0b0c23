use std::sync::Arc;
use std::time::Duration;

use crate::credentials::domain::token_provider::{CredentialError, TokenProvider};
use crate::credentials::infrastructure::service_account::ServiceAccountTokenProvider;
use crate::credentials::infrastructure::static_token::StaticTokenProvider;
use crate::pipeline::convert_audio_use_case::{ConvertAudioUseCase, UploadPolicy};
use crate::pipeline::convert_error::ConvertError;
use crate::pipeline::operation_poller::{OperationPoller, ThreadSleeper};
use crate::pipeline::progress_logger::LogProgressLogger;
use crate::recognition::infrastructure::google_speech_client::GoogleSpeechClient;
use crate::shared::settings::Settings;
use crate::storage::infrastructure::gcs_object_store::GcsObjectStore;
use crate::transcoding::infrastructure::ffmpeg_transcoder::FfmpegTranscoder;

/// Builds the single token provider shared by the storage and speech adapters.
///
/// An explicit access token wins over a key file.
pub fn create_token_provider(settings: &Settings) -> Result<Arc<dyn TokenProvider>, ConvertError> {
    if let Some(ref token) = settings.access_token {
        log::info!("Using access token from environment");
        return Ok(Arc::new(StaticTokenProvider::new(token.clone())));
    }

    let key_file = settings.key_file.as_ref().ok_or(CredentialError::Missing)?;
    let mut provider = ServiceAccountTokenProvider::from_file(key_file, &settings.scope)?;
    if let Some(ref uri) = settings.token_uri {
        provider = provider.with_token_uri(uri.clone());
    }
    log::info!("Using service account {}", provider.client_email());
    Ok(Arc::new(provider))
}

/// Wires the Google-backed converter from settings.
pub fn create_convert_use_case(
    settings: &Settings,
    tokens: Arc<dyn TokenProvider>,
) -> Result<ConvertAudioUseCase, &'static str> {
    let poller = OperationPoller::new(
        Duration::from_secs(settings.poll_interval_secs),
        Box::new(ThreadSleeper),
    )?;
    let store = GcsObjectStore::new(tokens.clone(), settings.bucket.clone())
        .with_base_url(settings.storage_base_url.clone())
        .with_naming(settings.blob_naming);
    let recognizer =
        GoogleSpeechClient::new(tokens).with_base_url(settings.speech_base_url.clone());

    log::debug!(
        "Converter: bucket={}, ffmpeg={}, poll every {}s",
        settings.bucket,
        settings.ffmpeg_path.display(),
        settings.poll_interval_secs
    );

    Ok(ConvertAudioUseCase::new(
        Box::new(FfmpegTranscoder::new(settings.ffmpeg_path.clone())),
        Box::new(store),
        Box::new(recognizer),
        poller,
        UploadPolicy {
            min_upload_bytes: settings.min_upload_bytes,
        },
        Box::new(LogProgressLogger::new()),
    ))
}
