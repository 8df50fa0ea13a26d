//! Turn Orchestration
//!
//! Drives one request through the staged pipeline
//! `Idle -> Transcribing -> Assembling -> Generating -> Synthesizing -> Done`.
//! Stages run strictly in sequence; the first failure moves the turn to
//! `Failed` and aborts it. There are no retries and no partial replies.

use crate::{
    assembler::{AssemblyInput, assemble, flatten},
    conversation::ConversationTurn,
    llm_client::LLMClient,
    profile::{Difficulty, Mode, Scenario},
    speech::{RECORDING_FILE_NAME, Synthesizer, Transcriber},
};
use base64::{Engine, engine::general_purpose::STANDARD};
use std::{fmt, sync::Arc};
use tracing::{error, info};

/// The MIME type of synthesized replies.
pub const REPLY_AUDIO_MIME: &str = "audio/mpeg";

/// The stages of a single turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnStage {
    Idle,
    Transcribing,
    Assembling,
    Generating,
    Synthesizing,
    Done,
    Failed,
}

impl fmt::Display for TurnStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TurnStage::Idle => "idle",
            TurnStage::Transcribing => "transcribing",
            TurnStage::Assembling => "assembling",
            TurnStage::Generating => "generating",
            TurnStage::Synthesizing => "synthesizing",
            TurnStage::Done => "done",
            TurnStage::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// Why a turn failed.
#[derive(Debug, thiserror::Error)]
pub enum TurnError {
    /// The request lacks the input its mode requires.
    #[error("Invalid request: {0}")]
    Validation(String),
    /// The audio payload is not valid base64.
    #[error("Malformed audio payload: {0}")]
    ClientDecode(#[from] base64::DecodeError),
    /// A remote provider call failed.
    #[error("Provider call failed while {stage}: {source:#}")]
    Upstream {
        stage: TurnStage,
        source: anyhow::Error,
    },
}

impl TurnError {
    /// The stage the turn was in when it failed.
    pub fn stage(&self) -> TurnStage {
        match self {
            TurnError::Validation(_) => TurnStage::Assembling,
            TurnError::ClientDecode(_) => TurnStage::Transcribing,
            TurnError::Upstream { stage, .. } => *stage,
        }
    }
}

/// A fully resolved request for one turn.
#[derive(Debug, Clone, Default)]
pub struct TurnRequest {
    pub message: Option<String>,
    /// Base64 audio, optionally wrapped in a `data:` URL.
    pub audio_base64: Option<String>,
    pub mode: Mode,
    pub scenario: Scenario,
    pub difficulty: Difficulty,
    pub start: bool,
    pub history: Vec<ConversationTurn>,
}

/// The result of a successful turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TurnReply {
    pub text: String,
    /// `data:audio/mpeg;base64,...`, or empty when there was nothing to speak.
    pub audio_data_url: String,
    /// The trimmed transcription, when the turn carried audio.
    pub transcript: Option<String>,
}

/// How the orchestrator treats turns without any user input.
#[derive(Debug, Clone, Copy, Default)]
pub struct InputPolicy {
    /// Reject non-start turns that resolve to no user text.
    pub require_user_input: bool,
}

/// Runs turns against the three remote capabilities.
pub struct TurnOrchestrator {
    transcriber: Arc<dyn Transcriber>,
    llm_client: Arc<dyn LLMClient>,
    synthesizer: Arc<dyn Synthesizer>,
    policy: InputPolicy,
}

/// Strips an optional `data:<mime>;base64,` prefix and decodes the rest.
pub fn decode_audio(payload: &str) -> Result<Vec<u8>, base64::DecodeError> {
    let trimmed = payload.trim();
    let encoded = match trimmed.strip_prefix("data:") {
        Some(rest) => rest.split_once(',').map_or(rest, |(_, data)| data),
        None => trimmed,
    };
    STANDARD.decode(encoded)
}

/// Wraps MP3 bytes in a base64 data URL.
pub fn audio_data_url(audio: &[u8]) -> String {
    format!("data:{REPLY_AUDIO_MIME};base64,{}", STANDARD.encode(audio))
}

fn upstream(stage: TurnStage) -> impl FnOnce(anyhow::Error) -> TurnError {
    move |source| TurnError::Upstream { stage, source }
}

impl TurnOrchestrator {
    pub fn new(
        transcriber: Arc<dyn Transcriber>,
        llm_client: Arc<dyn LLMClient>,
        synthesizer: Arc<dyn Synthesizer>,
        policy: InputPolicy,
    ) -> Self {
        Self {
            transcriber,
            llm_client,
            synthesizer,
            policy,
        }
    }

    /// Runs one turn to completion.
    pub async fn run(&self, request: TurnRequest) -> Result<TurnReply, TurnError> {
        info!(
            stage = %TurnStage::Idle,
            mode = request.mode.as_str(),
            scenario = request.scenario.as_str(),
            difficulty = request.difficulty.as_str(),
            start = request.start,
            history_len = request.history.len(),
            has_audio = request.audio_base64.is_some(),
            "Starting turn"
        );
        let result = self.drive(request).await;
        match &result {
            Ok(reply) => info!(
                stage = %TurnStage::Done,
                reply_chars = reply.text.len(),
                "Turn completed"
            ),
            Err(e) => error!(
                stage = %TurnStage::Failed,
                failed_at = %e.stage(),
                error = %e,
                "Turn failed"
            ),
        }
        result
    }

    async fn drive(&self, request: TurnRequest) -> Result<TurnReply, TurnError> {
        let simulation_start = request.mode == Mode::Simulation && request.start;

        // --- Transcribing ---
        let audio = request
            .audio_base64
            .as_deref()
            .filter(|payload| !payload.trim().is_empty() && !simulation_start);
        let transcript = match audio {
            Some(payload) => {
                info!(stage = %TurnStage::Transcribing, "Entering stage");
                let bytes = decode_audio(payload)?;
                let text = self
                    .transcriber
                    .transcribe(RECORDING_FILE_NAME.to_string(), bytes)
                    .await
                    .map_err(upstream(TurnStage::Transcribing))?;
                Some(text.trim().to_string())
            }
            None => None,
        };

        // --- Assembling ---
        info!(stage = %TurnStage::Assembling, "Entering stage");
        let user_text = transcript
            .as_deref()
            .or(request.message.as_deref())
            .map(str::trim)
            .filter(|text| !text.is_empty());

        if self.policy.require_user_input && !simulation_start && user_text.is_none() {
            return Err(TurnError::Validation(
                "either a message or audio is required".to_string(),
            ));
        }

        let turns = assemble(&AssemblyInput {
            mode: request.mode,
            scenario: request.scenario,
            difficulty: request.difficulty,
            start: request.start,
            history: &request.history,
            user_text,
        });

        // --- Generating ---
        info!(stage = %TurnStage::Generating, turns = turns.len(), "Entering stage");
        let text = self
            .llm_client
            .generate(flatten(&turns))
            .await
            .map_err(upstream(TurnStage::Generating))?
            .trim()
            .to_string();

        // --- Synthesizing ---
        let audio_data_url = if text.is_empty() {
            String::new()
        } else {
            info!(stage = %TurnStage::Synthesizing, "Entering stage");
            let audio = self
                .synthesizer
                .synthesize(text.clone())
                .await
                .map_err(upstream(TurnStage::Synthesizing))?;
            audio_data_url(&audio)
        };

        Ok(TurnReply {
            text,
            audio_data_url,
            transcript,
        })
    }
}
