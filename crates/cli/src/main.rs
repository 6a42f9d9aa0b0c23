use std::path::PathBuf;
use std::process;
use std::time::Duration;

use clap::Parser;

use transcribe_core::pipeline::convert_audio_use_case::{
    retrieve_transcript, ConvertOutcome, ConvertRequest,
};
use transcribe_core::pipeline::convert_error::ConvertError;
use transcribe_core::pipeline::infrastructure::converter_factory::{
    create_convert_use_case, create_token_provider,
};
use transcribe_core::shared::audio_source::AudioSource;
use transcribe_core::shared::constants::{DEFAULT_LANGUAGE, DEFAULT_WAIT_SECS};
use transcribe_core::shared::settings::Settings;

/// Convert a sound file to text with Google Cloud Speech.
///
/// Non-FLAC input is converted to mono FLAC with ffmpeg, uploaded to a
/// Cloud Storage bucket, and transcribed with a long-running recognition.
#[derive(Parser, Debug)]
#[command(name = "convert", version)]
struct Cli {
    /// Sound file to transcribe.
    #[arg(required_unless_present = "operation_name")]
    soundfile: Option<PathBuf>,

    /// Language of the voices in the file (BCP-47).
    #[arg(short, long, default_value = DEFAULT_LANGUAGE)]
    language: String,

    /// Do not wait for results; print the operation name instead.
    #[arg(long)]
    nowait: bool,

    /// Keep the uploaded file in the bucket.
    #[arg(long)]
    keep: bool,

    /// Get results of a previously submitted operation (not supported yet).
    #[arg(long = "get", value_name = "OPERATION_NAME")]
    operation_name: Option<String>,

    /// Seconds to wait for the operation before giving up.
    #[arg(long, value_name = "SECONDS", default_value_t = DEFAULT_WAIT_SECS, conflicts_with = "nowait")]
    wait: u64,

    /// Bucket used to stage audio.
    #[arg(long)]
    bucket: Option<String>,

    /// Service-account key file (JSON).
    #[arg(long)]
    key_file: Option<PathBuf>,

    /// ffmpeg executable.
    #[arg(long)]
    ffmpeg: Option<PathBuf>,

    /// Send files up to this size inline instead of uploading them.
    #[arg(long, value_name = "BYTES")]
    min_upload_bytes: Option<u64>,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    if let Err(e) = run(Cli::parse()) {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    if let Some(ref name) = cli.operation_name {
        let transcript = retrieve_transcript(name)?;
        print!("{transcript}");
        return Ok(());
    }

    let source = validate(&cli)?;
    let settings = resolve_settings(&cli)?;
    let request = ConvertRequest {
        language: cli.language.clone(),
        wait: wait_budget(&cli),
        keep_remote_copy: cli.keep,
    };

    log::info!(
        "Transcribing {} ({})",
        source.path().display(),
        request.language
    );
    let tokens = create_token_provider(&settings)?;
    let mut use_case = create_convert_use_case(&settings, tokens)?;

    match use_case.execute(&source, &request)? {
        ConvertOutcome::Transcript(text) => print!("{text}"),
        ConvertOutcome::Pending(job) => println!("{job}"),
    }
    Ok(())
}

fn validate(cli: &Cli) -> Result<AudioSource, ConvertError> {
    let path = cli.soundfile.clone().unwrap_or_default();
    let source = AudioSource::new(path);
    if !source.exists() {
        return Err(ConvertError::InputNotFound(source.path().to_path_buf()));
    }
    Ok(source)
}

fn resolve_settings(cli: &Cli) -> Result<Settings, Box<dyn std::error::Error>> {
    let mut settings = Settings::load()?;
    if let Some(ref bucket) = cli.bucket {
        settings.bucket = bucket.clone();
    }
    if let Some(ref key_file) = cli.key_file {
        settings.key_file = Some(key_file.clone());
        settings.access_token = None;
    }
    if let Some(ref ffmpeg) = cli.ffmpeg {
        settings.ffmpeg_path = ffmpeg.clone();
    }
    if let Some(bytes) = cli.min_upload_bytes {
        settings.min_upload_bytes = bytes;
    }
    Ok(settings)
}

fn wait_budget(cli: &Cli) -> Duration {
    if cli.nowait {
        Duration::ZERO
    } else {
        Duration::from_secs(cli.wait)
    }
}
