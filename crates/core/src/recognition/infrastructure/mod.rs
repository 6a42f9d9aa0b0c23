pub mod google_speech_client;
