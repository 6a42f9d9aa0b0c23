use std::fs;
use std::path::Path;
use std::time::Duration;

use crate::pipeline::convert_error::ConvertError;
use crate::pipeline::operation_poller::OperationPoller;
use crate::pipeline::progress_logger::ProgressLogger;
use crate::pipeline::transcript_assembler::assemble;
use crate::recognition::domain::recognition_client::RecognitionClient;
use crate::recognition::domain::recognition_config::{RecognitionAudio, RecognitionConfig};
use crate::recognition::domain::recognition_job::RecognitionJob;
use crate::shared::audio_source::AudioSource;
use crate::shared::constants::{DEFAULT_LANGUAGE, DEFAULT_MIN_UPLOAD_BYTES, DEFAULT_WAIT_SECS};
use crate::storage::domain::blob_ref::RemoteBlobRef;
use crate::storage::domain::object_store::ObjectStore;
use crate::transcoding::domain::transcoder::Transcoder;

/// Decides between staging audio in the object store and sending it inline.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct UploadPolicy {
    /// Files strictly larger than this are uploaded.
    pub min_upload_bytes: u64,
}

impl UploadPolicy {
    pub fn should_upload(&self, size: u64) -> bool {
        size > self.min_upload_bytes
    }
}

impl Default for UploadPolicy {
    fn default() -> Self {
        Self {
            min_upload_bytes: DEFAULT_MIN_UPLOAD_BYTES,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConvertRequest {
    pub language: String,
    /// Zero returns the job handle without waiting.
    pub wait: Duration,
    pub keep_remote_copy: bool,
}

impl Default for ConvertRequest {
    fn default() -> Self {
        Self {
            language: DEFAULT_LANGUAGE.to_string(),
            wait: Duration::from_secs(DEFAULT_WAIT_SECS),
            keep_remote_copy: false,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ConvertOutcome {
    Transcript(String),
    Pending(RecognitionJob),
}

/// Audio file to transcript: normalize → stage → submit → wait → assemble → clean up.
pub struct ConvertAudioUseCase {
    transcoder: Box<dyn Transcoder>,
    store: Box<dyn ObjectStore>,
    recognizer: Box<dyn RecognitionClient>,
    poller: OperationPoller,
    upload_policy: UploadPolicy,
    logger: Box<dyn ProgressLogger>,
}

impl ConvertAudioUseCase {
    pub fn new(
        transcoder: Box<dyn Transcoder>,
        store: Box<dyn ObjectStore>,
        recognizer: Box<dyn RecognitionClient>,
        poller: OperationPoller,
        upload_policy: UploadPolicy,
        logger: Box<dyn ProgressLogger>,
    ) -> Self {
        Self {
            transcoder,
            store,
            recognizer,
            poller,
            upload_policy,
            logger,
        }
    }

    pub fn execute(
        &mut self,
        source: &AudioSource,
        request: &ConvertRequest,
    ) -> Result<ConvertOutcome, ConvertError> {
        if !source.exists() {
            return Err(ConvertError::InputNotFound(source.path().to_path_buf()));
        }

        // 1. Normalize. The temp copy is removed on drop, on every exit path.
        let transcoded = if source.needs_transcode() {
            Some(self.transcoder.transcode(source.path())?)
        } else {
            None
        };
        let working: &Path = match &transcoded {
            Some(temp) => &**temp,
            None => source.path(),
        };

        // 2. Stage
        let (audio, uploaded) = self.stage(working)?;
        if let Some(temp) = transcoded {
            if let Err(e) = temp.close() {
                log::warn!("Failed to remove temporary file: {e}");
            }
        }

        // 3. Submit
        let config = RecognitionConfig::new(&request.language);
        let job = self.recognizer.submit(&config, &audio)?;
        self.logger.info(&format!("Operation: {job}"));

        // 4. Wait or hand back the job
        if request.wait.is_zero() {
            return Ok(ConvertOutcome::Pending(job));
        }

        let result = match self.poller.wait_for_completion(
            self.recognizer.as_ref(),
            &job,
            request.wait,
            self.logger.as_mut(),
        ) {
            Ok(result) => result,
            Err(e) => {
                if let Some(ref blob) = uploaded {
                    log::warn!("Leaving {blob} in place; operation {job} may still complete");
                }
                return Err(e);
            }
        };
        let transcript = assemble(&result);

        if let Some(blob) = uploaded {
            if request.keep_remote_copy {
                self.logger.info(&format!("Keeping {blob}"));
            } else {
                self.store.delete(&blob)?;
            }
        }

        Ok(ConvertOutcome::Transcript(transcript))
    }

    fn stage(
        &self,
        working: &Path,
    ) -> Result<(RecognitionAudio, Option<RemoteBlobRef>), ConvertError> {
        let io_err = |e| ConvertError::Io {
            path: working.to_path_buf(),
            source: e,
        };
        let size = fs::metadata(working).map_err(io_err)?.len();

        if self.upload_policy.should_upload(size) {
            let blob = self.store.put(working)?;
            log::info!("URI: {blob}");
            Ok((RecognitionAudio::Uri(blob.clone()), Some(blob)))
        } else {
            let bytes = fs::read(working).map_err(io_err)?;
            log::info!("Sending {size} bytes inline");
            Ok((RecognitionAudio::Content(bytes), None))
        }
    }
}

/// Fetching a transcript for a job submitted by an earlier run.
///
/// Not supported: operation state is not kept between runs.
pub fn retrieve_transcript(operation_name: &str) -> Result<String, ConvertError> {
    Err(ConvertError::UnsupportedOperation(format!(
        "retrieving results of operation '{operation_name}' is not implemented"
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::operation_poller::Sleeper;
    use crate::pipeline::progress_logger::NullProgressLogger;
    use crate::recognition::domain::recognition_client::RecognitionError;
    use crate::recognition::domain::recognition_job::JobStatus;
    use crate::recognition::domain::transcript::{
        RecognitionResult, TranscriptAlternative, TranscriptSegment,
    };
    use crate::storage::domain::object_store::StorageError;
    use crate::transcoding::domain::transcoder::TranscodeError;
    use std::path::PathBuf;
    use std::sync::{Arc, Mutex};
    use tempfile::{TempDir, TempPath};

    // ─── Call log shared by all stubs ───

    #[derive(Clone, Debug, PartialEq)]
    enum Call {
        Transcode(PathBuf),
        Put(PathBuf),
        Delete(String),
        Submit(RecognitionAudio, String),
        Poll,
        Fetch,
    }

    type CallLog = Arc<Mutex<Vec<Call>>>;

    fn count(log: &CallLog, pred: impl Fn(&Call) -> bool) -> usize {
        log.lock().unwrap().iter().filter(|c| pred(c)).count()
    }

    // ─── Stubs ───

    struct StubTranscoder {
        log: CallLog,
        fail: bool,
        produced: Arc<Mutex<Option<PathBuf>>>,
    }

    impl Transcoder for StubTranscoder {
        fn transcode(&self, input: &Path) -> Result<TempPath, TranscodeError> {
            self.log.lock().unwrap().push(Call::Transcode(input.to_path_buf()));
            if self.fail {
                return Err(TranscodeError::Failed {
                    input: input.to_path_buf(),
                    code: Some(1),
                });
            }
            let file = tempfile::Builder::new().suffix(".flac").tempfile().unwrap();
            std::fs::write(file.path(), b"fLaC-transcoded").unwrap();
            let temp = file.into_temp_path();
            *self.produced.lock().unwrap() = Some(temp.to_path_buf());
            Ok(temp)
        }
    }

    struct StubStore {
        log: CallLog,
        fail_put: bool,
    }

    impl ObjectStore for StubStore {
        fn put(&self, local_path: &Path) -> Result<RemoteBlobRef, StorageError> {
            self.log.lock().unwrap().push(Call::Put(local_path.to_path_buf()));
            if self.fail_put {
                return Err(StorageError::Rejected {
                    blob: "gs://bucket/x".to_string(),
                    status: 403,
                    body: "forbidden".to_string(),
                });
            }
            let name = local_path.file_name().unwrap().to_str().unwrap();
            Ok(RemoteBlobRef::new("bucket", name))
        }

        fn delete(&self, blob: &RemoteBlobRef) -> Result<(), StorageError> {
            self.log.lock().unwrap().push(Call::Delete(blob.uri()));
            Ok(())
        }
    }

    struct StubRecognizer {
        log: CallLog,
        done_on: Option<usize>,
        fail_submit: bool,
    }

    impl RecognitionClient for StubRecognizer {
        fn submit(
            &self,
            config: &RecognitionConfig,
            audio: &RecognitionAudio,
        ) -> Result<RecognitionJob, RecognitionError> {
            self.log
                .lock()
                .unwrap()
                .push(Call::Submit(audio.clone(), config.language_code.clone()));
            if self.fail_submit {
                return Err(RecognitionError::Rejected {
                    status: 400,
                    body: "bad audio".to_string(),
                });
            }
            Ok(RecognitionJob::new("op-123"))
        }

        fn poll(&self, _: &RecognitionJob) -> Result<JobStatus, RecognitionError> {
            let mut log = self.log.lock().unwrap();
            log.push(Call::Poll);
            let polls = log.iter().filter(|c| **c == Call::Poll).count();
            match self.done_on {
                Some(n) if polls >= n => Ok(JobStatus::completed()),
                _ => Ok(JobStatus::running(polls as u32)),
            }
        }

        fn fetch_result(&self, _: &RecognitionJob) -> Result<RecognitionResult, RecognitionError> {
            self.log.lock().unwrap().push(Call::Fetch);
            Ok(RecognitionResult::new(vec![
                TranscriptSegment::new(vec![TranscriptAlternative::new("hello")]),
                TranscriptSegment::new(vec![TranscriptAlternative::new("world")]),
            ]))
        }
    }

    struct NoSleep;

    impl Sleeper for NoSleep {
        fn sleep(&self, _: Duration) {}
    }

    struct Harness {
        log: CallLog,
        produced: Arc<Mutex<Option<PathBuf>>>,
        use_case: ConvertAudioUseCase,
    }

    struct Options {
        done_on: Option<usize>,
        transcode_fails: bool,
        put_fails: bool,
        submit_fails: bool,
        min_upload_bytes: u64,
    }

    impl Default for Options {
        fn default() -> Self {
            Self {
                done_on: Some(1),
                transcode_fails: false,
                put_fails: false,
                submit_fails: false,
                min_upload_bytes: 0,
            }
        }
    }

    fn harness(opts: Options) -> Harness {
        let log: CallLog = Arc::new(Mutex::new(Vec::new()));
        let produced = Arc::new(Mutex::new(None));
        let use_case = ConvertAudioUseCase::new(
            Box::new(StubTranscoder {
                log: log.clone(),
                fail: opts.transcode_fails,
                produced: produced.clone(),
            }),
            Box::new(StubStore {
                log: log.clone(),
                fail_put: opts.put_fails,
            }),
            Box::new(StubRecognizer {
                log: log.clone(),
                done_on: opts.done_on,
                fail_submit: opts.submit_fails,
            }),
            OperationPoller::new(Duration::from_secs(10), Box::new(NoSleep)).unwrap(),
            UploadPolicy {
                min_upload_bytes: opts.min_upload_bytes,
            },
            Box::new(NullProgressLogger),
        );
        Harness {
            log,
            produced,
            use_case,
        }
    }

    fn audio_file(dir: &TempDir, name: &str, contents: &[u8]) -> AudioSource {
        let path = dir.path().join(name);
        std::fs::write(&path, contents).unwrap();
        AudioSource::new(path)
    }

    fn request(wait_secs: u64, keep: bool) -> ConvertRequest {
        ConvertRequest {
            language: "en-US".to_string(),
            wait: Duration::from_secs(wait_secs),
            keep_remote_copy: keep,
        }
    }

    fn is_poll(c: &Call) -> bool {
        *c == Call::Poll
    }

    fn is_delete(c: &Call) -> bool {
        matches!(c, Call::Delete(_))
    }

    // ─── End to end ───

    #[test]
    fn test_flac_without_wait_returns_handle() {
        let tmp = TempDir::new().unwrap();
        let source = audio_file(&tmp, "episode.flac", b"fLaC-data");
        let mut h = harness(Options::default());

        let outcome = h.use_case.execute(&source, &request(0, false)).unwrap();

        assert_eq!(outcome, ConvertOutcome::Pending(RecognitionJob::new("op-123")));
        assert_eq!(
            *h.log.lock().unwrap(),
            vec![
                Call::Put(source.path().to_path_buf()),
                Call::Submit(
                    RecognitionAudio::Uri(RemoteBlobRef::new("bucket", "episode.flac")),
                    "en-US".to_string()
                ),
            ]
        );
        assert!(source.exists(), "input file must never be deleted");
    }

    #[test]
    fn test_mp3_waits_until_fifth_poll() {
        let tmp = TempDir::new().unwrap();
        let source = audio_file(&tmp, "episode.mp3", b"ID3-data");
        let mut h = harness(Options {
            done_on: Some(5),
            ..Options::default()
        });

        let outcome = h.use_case.execute(&source, &request(120, false)).unwrap();

        assert_eq!(outcome, ConvertOutcome::Transcript("hello\nworld\n".to_string()));
        assert_eq!(count(&h.log, |c| matches!(c, Call::Transcode(_))), 1);
        assert_eq!(count(&h.log, is_poll), 5);
        assert_eq!(count(&h.log, |c| *c == Call::Fetch), 1);
        assert_eq!(count(&h.log, is_delete), 1);
        assert!(source.exists());
    }

    #[test]
    fn test_timeout_skips_assembly_and_cleanup() {
        let tmp = TempDir::new().unwrap();
        let source = audio_file(&tmp, "episode.flac", b"fLaC-data");
        let mut h = harness(Options {
            done_on: None,
            ..Options::default()
        });

        let err = h.use_case.execute(&source, &request(20, false)).unwrap_err();

        assert!(matches!(err, ConvertError::Timeout { .. }));
        assert_eq!(count(&h.log, is_poll), 3);
        assert_eq!(count(&h.log, |c| *c == Call::Fetch), 0);
        assert_eq!(count(&h.log, is_delete), 0);
    }

    #[test]
    fn test_remote_copy_deleted_once_after_fetch() {
        let tmp = TempDir::new().unwrap();
        let source = audio_file(&tmp, "episode.flac", b"fLaC-data");
        let mut h = harness(Options::default());

        h.use_case.execute(&source, &request(60, false)).unwrap();

        let log = h.log.lock().unwrap();
        let fetch_at = log.iter().position(|c| *c == Call::Fetch).unwrap();
        let deletes: Vec<_> = log.iter().enumerate().filter(|(_, c)| is_delete(c)).collect();
        assert_eq!(deletes.len(), 1);
        assert!(deletes[0].0 > fetch_at);
        assert_eq!(*deletes[0].1, Call::Delete("gs://bucket/episode.flac".to_string()));
    }

    #[test]
    fn test_keep_remote_copy() {
        let tmp = TempDir::new().unwrap();
        let source = audio_file(&tmp, "episode.flac", b"fLaC-data");
        let mut h = harness(Options::default());

        let outcome = h.use_case.execute(&source, &request(60, true)).unwrap();

        assert!(matches!(outcome, ConvertOutcome::Transcript(_)));
        assert_eq!(count(&h.log, is_delete), 0);
    }

    #[test]
    fn test_small_file_sent_inline() {
        let tmp = TempDir::new().unwrap();
        let source = audio_file(&tmp, "clip.flac", b"fLaC");
        let mut h = harness(Options {
            min_upload_bytes: 1024,
            ..Options::default()
        });

        h.use_case.execute(&source, &request(60, false)).unwrap();

        let log = h.log.lock().unwrap();
        assert!(!log.iter().any(|c| matches!(c, Call::Put(_))));
        assert!(!log.iter().any(is_delete));
        assert!(log.contains(&Call::Submit(
            RecognitionAudio::Content(b"fLaC".to_vec()),
            "en-US".to_string()
        )));
    }

    #[test]
    fn test_empty_file_sent_inline_by_default() {
        let tmp = TempDir::new().unwrap();
        let source = audio_file(&tmp, "empty.flac", b"");
        let mut h = harness(Options::default());

        h.use_case.execute(&source, &request(0, false)).unwrap();

        assert_eq!(count(&h.log, |c| matches!(c, Call::Put(_))), 0);
        assert_eq!(
            count(&h.log, |c| matches!(c, Call::Submit(RecognitionAudio::Content(_), _))),
            1
        );
    }

    #[test]
    fn test_language_passed_to_recognizer() {
        let tmp = TempDir::new().unwrap();
        let source = audio_file(&tmp, "episode.flac", b"fLaC-data");
        let mut h = harness(Options::default());
        let req = ConvertRequest {
            language: "fr-FR".to_string(),
            ..request(0, false)
        };

        h.use_case.execute(&source, &req).unwrap();

        assert_eq!(
            count(&h.log, |c| matches!(c, Call::Submit(_, lang) if lang == "fr-FR")),
            1
        );
    }

    #[test]
    fn test_transcoded_copy_uploaded_then_removed() {
        let tmp = TempDir::new().unwrap();
        let source = audio_file(&tmp, "episode.wav", b"RIFF-data");
        let mut h = harness(Options::default());

        h.use_case.execute(&source, &request(0, false)).unwrap();

        let produced = h.produced.lock().unwrap().clone().unwrap();
        assert!(h.log.lock().unwrap().contains(&Call::Put(produced.clone())));
        assert!(!produced.exists(), "transcoded copy should be removed");
        assert!(source.exists());
    }

    #[test]
    fn test_transcoded_copy_removed_when_upload_fails() {
        let tmp = TempDir::new().unwrap();
        let source = audio_file(&tmp, "episode.wav", b"RIFF-data");
        let mut h = harness(Options {
            put_fails: true,
            ..Options::default()
        });

        let err = h.use_case.execute(&source, &request(60, false)).unwrap_err();

        assert!(matches!(err, ConvertError::Storage(_)));
        let produced = h.produced.lock().unwrap().clone().unwrap();
        assert!(!produced.exists());
        assert_eq!(count(&h.log, |c| matches!(c, Call::Submit(..))), 0);
    }

    #[test]
    fn test_transcoded_copy_removed_when_submit_fails() {
        let tmp = TempDir::new().unwrap();
        let source = audio_file(&tmp, "episode.wav", b"RIFF-data");
        let mut h = harness(Options {
            submit_fails: true,
            ..Options::default()
        });

        let err = h.use_case.execute(&source, &request(60, false)).unwrap_err();

        assert!(matches!(err, ConvertError::Recognition(_)));
        let produced = h.produced.lock().unwrap().clone().unwrap();
        assert!(!produced.exists());
        assert_eq!(count(&h.log, is_poll), 0);
        assert!(source.exists());
    }

    #[test]
    fn test_transcoded_copy_removed_on_timeout() {
        let tmp = TempDir::new().unwrap();
        let source = audio_file(&tmp, "episode.wav", b"RIFF-data");
        let mut h = harness(Options {
            done_on: None,
            ..Options::default()
        });

        let err = h.use_case.execute(&source, &request(20, false)).unwrap_err();

        assert!(matches!(err, ConvertError::Timeout { .. }));
        let produced = h.produced.lock().unwrap().clone().unwrap();
        assert!(!produced.exists());
        assert_eq!(count(&h.log, is_delete), 0);
        assert!(source.exists());
    }

    #[test]
    fn test_transcode_failure_stops_everything() {
        let tmp = TempDir::new().unwrap();
        let source = audio_file(&tmp, "episode.mp3", b"ID3-data");
        let mut h = harness(Options {
            transcode_fails: true,
            ..Options::default()
        });

        let err = h.use_case.execute(&source, &request(60, false)).unwrap_err();

        assert!(matches!(err, ConvertError::Transcode(TranscodeError::Failed { .. })));
        assert_eq!(h.log.lock().unwrap().len(), 1);
    }

    #[test]
    fn test_missing_input() {
        let mut h = harness(Options::default());
        let err = h
            .use_case
            .execute(&AudioSource::new("/nonexistent/episode.mp3"), &request(60, false))
            .unwrap_err();
        assert!(matches!(err, ConvertError::InputNotFound(_)));
        assert!(h.log.lock().unwrap().is_empty());
    }

    #[test]
    fn test_retrieve_transcript_is_unsupported() {
        let err = retrieve_transcript("op-123").unwrap_err();
        assert!(matches!(err, ConvertError::UnsupportedOperation(_)));
        assert!(err.to_string().contains("op-123"));
    }

    #[test]
    fn test_upload_policy_threshold() {
        let policy = UploadPolicy::default();
        assert!(!policy.should_upload(0));
        assert!(policy.should_upload(1));

        let policy = UploadPolicy {
            min_upload_bytes: 100,
        };
        assert!(!policy.should_upload(100));
        assert!(policy.should_upload(101));
    }
}
