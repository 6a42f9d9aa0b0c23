use std::sync::Arc;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use reqwest::blocking::Client;
use reqwest::Url;
use serde::{Deserialize, Serialize};

use crate::credentials::domain::token_provider::TokenProvider;
use crate::recognition::domain::recognition_client::{RecognitionClient, RecognitionError};
use crate::recognition::domain::recognition_config::{RecognitionAudio, RecognitionConfig};
use crate::recognition::domain::recognition_job::{JobStatus, RecognitionJob};
use crate::recognition::domain::transcript::{
    RecognitionResult, TranscriptAlternative, TranscriptSegment,
};
use crate::shared::constants::SPEECH_BASE_URL;

// ─── Wire types (speech v1 REST) ───

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ConfigDto<'a> {
    encoding: &'static str,
    language_code: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
enum AudioDto {
    Uri(String),
    Content(String),
}

#[derive(Debug, Serialize)]
struct LongRunningRecognizeRequest<'a> {
    config: ConfigDto<'a>,
    audio: AudioDto,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MetadataDto {
    #[serde(default)]
    progress_percent: u32,
}

#[derive(Debug, Deserialize)]
struct StatusDto {
    #[serde(default)]
    code: i32,
    #[serde(default)]
    message: String,
}

#[derive(Debug, Deserialize)]
struct AlternativeDto {
    #[serde(default)]
    transcript: String,
    confidence: Option<f32>,
}

#[derive(Debug, Deserialize)]
struct ResultDto {
    #[serde(default)]
    alternatives: Vec<AlternativeDto>,
}

#[derive(Debug, Default, Deserialize)]
struct ResponseDto {
    #[serde(default)]
    results: Vec<ResultDto>,
}

#[derive(Debug, Deserialize)]
struct OperationDto {
    name: String,
    #[serde(default)]
    done: bool,
    #[serde(default)]
    metadata: Option<MetadataDto>,
    #[serde(default)]
    error: Option<StatusDto>,
    #[serde(default)]
    response: Option<ResponseDto>,
}

fn request_body<'a>(
    config: &'a RecognitionConfig,
    audio: &RecognitionAudio,
) -> LongRunningRecognizeRequest<'a> {
    let audio = match audio {
        RecognitionAudio::Uri(blob) => AudioDto::Uri(blob.uri()),
        RecognitionAudio::Content(bytes) => AudioDto::Content(STANDARD.encode(bytes)),
    };
    LongRunningRecognizeRequest {
        config: ConfigDto {
            encoding: config.encoding.as_api_str(),
            language_code: &config.language_code,
        },
        audio,
    }
}

fn status_of(op: &OperationDto) -> JobStatus {
    JobStatus {
        done: op.done,
        progress_percent: op.metadata.as_ref().map_or(0, |m| m.progress_percent),
    }
}

fn result_of(op: OperationDto) -> Result<RecognitionResult, RecognitionError> {
    if let Some(err) = op.error {
        return Err(RecognitionError::Operation {
            job: op.name,
            code: err.code,
            message: err.message,
        });
    }
    if !op.done {
        return Err(RecognitionError::NotReady(op.name));
    }
    let segments = op
        .response
        .unwrap_or_default()
        .results
        .into_iter()
        .map(|r| {
            TranscriptSegment::new(
                r.alternatives
                    .into_iter()
                    .map(|a| TranscriptAlternative {
                        transcript: a.transcript,
                        confidence: a.confidence,
                    })
                    .collect(),
            )
        })
        .collect();
    Ok(RecognitionResult::new(segments))
}

/// Google Cloud Speech-to-Text v1 over REST.
pub struct GoogleSpeechClient {
    http: Client,
    tokens: Arc<dyn TokenProvider>,
    base_url: String,
}

impl GoogleSpeechClient {
    pub fn new(tokens: Arc<dyn TokenProvider>) -> Self {
        Self {
            http: Client::new(),
            tokens,
            base_url: SPEECH_BASE_URL.to_string(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    fn url(&self, segments: &[&str]) -> Result<Url, RecognitionError> {
        let mut url = Url::parse(&self.base_url)
            .map_err(|e| RecognitionError::Url(format!("{}: {e}", self.base_url)))?;
        url.path_segments_mut()
            .map_err(|_| RecognitionError::Url(self.base_url.clone()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn read_json<T: serde::de::DeserializeOwned>(
        response: reqwest::blocking::Response,
    ) -> Result<T, RecognitionError> {
        let status = response.status();
        if !status.is_success() {
            return Err(RecognitionError::Rejected {
                status: status.as_u16(),
                body: response.text().unwrap_or_default(),
            });
        }
        let text = response.text().map_err(RecognitionError::Request)?;
        serde_json::from_str(&text).map_err(|e| RecognitionError::Decode(e.to_string()))
    }

    fn get_operation(&self, job: &RecognitionJob) -> Result<OperationDto, RecognitionError> {
        let url = self.url(&["v1", "operations", job.name()])?;
        let token = self.tokens.access_token()?;
        let response = self
            .http
            .get(url)
            .bearer_auth(token)
            .send()
            .map_err(RecognitionError::Request)?;
        Self::read_json(response)
    }
}

impl RecognitionClient for GoogleSpeechClient {
    fn submit(
        &self,
        config: &RecognitionConfig,
        audio: &RecognitionAudio,
    ) -> Result<RecognitionJob, RecognitionError> {
        let url = self.url(&["v1", "speech:longrunningrecognize"])?;
        let token = self.tokens.access_token()?;
        let response = self
            .http
            .post(url)
            .bearer_auth(token)
            .json(&request_body(config, audio))
            .send()
            .map_err(RecognitionError::Request)?;
        let op: OperationDto = Self::read_json(response)?;
        Ok(RecognitionJob::new(op.name))
    }

    fn poll(&self, job: &RecognitionJob) -> Result<JobStatus, RecognitionError> {
        self.get_operation(job).map(|op| status_of(&op))
    }

    fn fetch_result(&self, job: &RecognitionJob) -> Result<RecognitionResult, RecognitionError> {
        result_of(self.get_operation(job)?)
    }
}
