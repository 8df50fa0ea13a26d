//! Client Conversation Session
//!
//! The client side of the conversation: the ordered log of turns shown to the
//! user and sent back with every request, plus the currently selected mode,
//! scenario and difficulty. The owner of a `ConversationSession` is the only
//! thing that mutates it.

use crate::{
    conversation::{ConversationTurn, Role},
    profile::{Difficulty, Mode, Scenario},
};
use serde::{Deserialize, Serialize};

/// Shown when a typed message could not be answered.
pub const TEXT_FAILURE_MESSAGE: &str = "Error al consultar el servidor.";
/// Shown when a simulation could not be started.
pub const SIMULATION_FAILURE_MESSAGE: &str = "No se pudo iniciar la simulación.";
/// Shown when a recorded message could not be transcribed or answered.
pub const AUDIO_FAILURE_MESSAGE: &str = "Error al transcribir o responder.";

/// The JSON body a client posts for one turn.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub audio_base64: Option<String>,
    pub scenario: Scenario,
    pub mode: Mode,
    pub difficulty: Difficulty,
    pub start: bool,
    pub history: Vec<ConversationTurn>,
}

/// The JSON body a server answers a turn with.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionReply {
    pub text: String,
    #[serde(default)]
    pub audio_data_url: String,
    #[serde(default)]
    pub transcript: Option<String>,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("Selecciona el modo Simulación.")]
    NotInSimulationMode,
    #[error("El mensaje está vacío.")]
    EmptyMessage,
}

/// The conversation log and the settings the user has selected.
#[derive(Debug, Clone, Default)]
pub struct ConversationSession {
    pub mode: Mode,
    pub scenario: Scenario,
    pub difficulty: Difficulty,
    turns: Vec<ConversationTurn>,
}

impl ConversationSession {
    pub fn new(mode: Mode, scenario: Scenario, difficulty: Difficulty) -> Self {
        Self {
            mode,
            scenario,
            difficulty,
            turns: Vec::new(),
        }
    }

    /// The turns recorded so far, oldest first.
    pub fn turns(&self) -> &[ConversationTurn] {
        &self.turns
    }

    /// Clears the conversation log. Settings are kept.
    pub fn reset(&mut self) {
        self.turns.clear();
    }

    /// The label a turn is displayed under.
    pub fn speaker_label(&self, role: Role) -> &'static str {
        match (role, self.mode) {
            (Role::User, _) => "Tú",
            (_, Mode::Simulation) => "Ciudadanía",
            (_, Mode::Tutor) => "Asistente",
        }
    }

    fn request(
        &self,
        message: Option<String>,
        audio_base64: Option<String>,
        start: bool,
    ) -> SessionRequest {
        SessionRequest {
            message,
            audio_base64,
            scenario: self.scenario,
            mode: self.mode,
            difficulty: self.difficulty,
            start,
            history: self.turns.clone(),
        }
    }

    /// Builds the request for a typed message and records it as a user turn.
    ///
    /// The request carries the history as it was before this message, so the
    /// message is not sent twice.
    pub fn begin_text_turn(&mut self, text: &str) -> Result<SessionRequest, SessionError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(SessionError::EmptyMessage);
        }
        let request = self.request(Some(text.to_string()), None, false);
        self.turns.push(ConversationTurn::user(text));
        Ok(request)
    }

    /// Builds the request for a recorded message. The user turn is recorded
    /// once the server returns the transcript.
    pub fn begin_audio_turn(&self, audio_base64: String) -> SessionRequest {
        self.request(None, Some(audio_base64), false)
    }

    /// Resets the log and builds the request that lets the simulated citizen
    /// speak first.
    pub fn begin_simulation(&mut self) -> Result<SessionRequest, SessionError> {
        if self.mode != Mode::Simulation {
            return Err(SessionError::NotInSimulationMode);
        }
        self.reset();
        Ok(self.request(None, None, true))
    }

    /// Records a server reply: the transcript of a spoken turn, if any, then
    /// the assistant's answer.
    pub fn record_reply(&mut self, reply: &SessionReply) {
        if let Some(transcript) = reply.transcript.as_deref().filter(|t| !t.is_empty()) {
            self.turns.push(ConversationTurn::user(transcript));
        }
        if !reply.text.is_empty() {
            self.turns.push(ConversationTurn::assistant(reply.text.clone()));
        }
    }
}
