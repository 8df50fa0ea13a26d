//! Speech Capabilities
//!
//! Transcription and speech synthesis as two narrow traits, so the turn
//! pipeline can run against fakes without a network dependency. The
//! `OpenAISpeechClient` implements both on top of the provider's audio API.

use anyhow::{Context, Result};
use async_openai::{
    Client,
    config::OpenAIConfig,
    types::{
        AudioInput, CreateSpeechRequestArgs, CreateTranscriptionRequestArgs, SpeechModel,
        SpeechResponseFormat, Voice,
    },
};
use async_trait::async_trait;

/// The file name the recorded audio is uploaded under. Browsers record WebM.
pub const RECORDING_FILE_NAME: &str = "audio.webm";

/// The names accepted for the synthesis voice.
pub const SUPPORTED_VOICES: &[&str] = &["alloy", "echo", "fable", "onyx", "nova", "shimmer"];

/// Parses a voice name, ignoring case.
pub fn parse_voice(name: &str) -> Option<Voice> {
    match name.trim().to_lowercase().as_str() {
        "alloy" => Some(Voice::Alloy),
        "echo" => Some(Voice::Echo),
        "fable" => Some(Voice::Fable),
        "onyx" => Some(Voice::Onyx),
        "nova" => Some(Voice::Nova),
        "shimmer" => Some(Voice::Shimmer),
        _ => None,
    }
}

/// Turns recorded audio into text.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Transcriber: Send + Sync {
    /// Transcribes a named audio blob and returns the recognized text.
    async fn transcribe(&self, file_name: String, audio: Vec<u8>) -> Result<String>;
}

/// Turns text into encoded MP3 audio.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Synthesizer: Send + Sync {
    /// Synthesizes `text` and returns the raw MP3 bytes.
    async fn synthesize(&self, text: String) -> Result<Vec<u8>>;
}

/// Settings for the audio half of the provider.
#[derive(Debug, Clone)]
pub struct SpeechSettings {
    pub transcription_model: String,
    /// ISO-639-1 hint for the transcriber; `None` lets the provider detect it.
    pub transcription_language: Option<String>,
    pub speech_model: String,
    pub voice: String,
}

/// Transcription and synthesis against an OpenAI-compatible audio API.
pub struct OpenAISpeechClient {
    client: Client<OpenAIConfig>,
    settings: SpeechSettings,
    voice: Voice,
}

impl OpenAISpeechClient {
    /// Creates a new speech client.
    ///
    /// Fails if `settings.voice` is not one of [`SUPPORTED_VOICES`].
    pub fn new(config: OpenAIConfig, settings: SpeechSettings) -> Result<Self> {
        let voice = parse_voice(&settings.voice)
            .with_context(|| format!("Unsupported voice '{}'", settings.voice))?;
        Ok(Self {
            client: Client::with_config(config),
            settings,
            voice,
        })
    }

    fn speech_model(&self) -> SpeechModel {
        match self.settings.speech_model.as_str() {
            "tts-1" => SpeechModel::Tts1,
            "tts-1-hd" => SpeechModel::Tts1Hd,
            other => SpeechModel::Other(other.to_string()),
        }
    }
}

#[async_trait]
impl Transcriber for OpenAISpeechClient {
    async fn transcribe(&self, file_name: String, audio: Vec<u8>) -> Result<String> {
        tracing::debug!(
            model = %self.settings.transcription_model,
            audio_bytes = audio.len(),
            "Requesting transcription"
        );

        let mut args = CreateTranscriptionRequestArgs::default();
        args.file(AudioInput::from_vec_u8(file_name, audio))
            .model(&self.settings.transcription_model);
        if let Some(language) = &self.settings.transcription_language {
            args.language(language);
        }
        let request = args.build()?;

        let response = self
            .client
            .audio()
            .transcribe(request)
            .await
            .context("Transcription request failed")?;
        Ok(response.text)
    }
}

#[async_trait]
impl Synthesizer for OpenAISpeechClient {
    async fn synthesize(&self, text: String) -> Result<Vec<u8>> {
        tracing::debug!(
            model = %self.settings.speech_model,
            text_chars = text.len(),
            "Requesting speech synthesis"
        );

        let request = CreateSpeechRequestArgs::default()
            .input(text)
            .model(self.speech_model())
            .voice(self.voice.clone())
            .response_format(SpeechResponseFormat::Mp3)
            .build()?;

        let response = self
            .client
            .audio()
            .speech(request)
            .await
            .context("Speech synthesis request failed")?;
        Ok(response.bytes.to_vec())
    }
}
