//! Audio-file transcription through Google Cloud Speech long-running recognition.
//!
//! Layout follows one bounded context per directory: `domain` holds the
//! traits and value types, `infrastructure` the adapters that talk to
//! ffmpeg and the Google APIs. `pipeline` orchestrates them.

pub mod credentials {
    pub mod domain {
        pub mod token_provider;
    }
    pub mod infrastructure;
}

pub mod transcoding {
    pub mod domain {
        pub mod transcoder;
    }
    pub mod infrastructure;
}

pub mod storage {
    pub mod domain {
        pub mod blob_ref;
        pub mod object_store;
    }
    pub mod infrastructure;
}

pub mod recognition {
    pub mod domain {
        pub mod recognition_client;
        pub mod recognition_config;
        pub mod recognition_job;
        pub mod transcript;
    }
    pub mod infrastructure;
}

pub mod pipeline {
    pub mod convert_audio_use_case;
    pub mod convert_error;
    pub mod operation_poller;
    pub mod progress_logger;
    pub mod transcript_assembler;

    pub mod infrastructure {
        pub mod converter_factory;
    }
}

pub mod shared {
    pub mod audio_source;
    pub mod constants;
    pub mod settings;
}
