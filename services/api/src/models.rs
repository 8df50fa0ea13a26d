//! API Models
//!
//! The JSON shapes of the assistant endpoint, documented for OpenAPI with
//! `utoipa`. Wire enums arrive as free text and are resolved by the core.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;
use ventanilla_core::{
    conversation::parse_history,
    profile::{Difficulty, Mode, Scenario},
    turn::{TurnReply, TurnRequest},
};

/// One assistant turn as posted by a client.
///
/// `history` entries are kept as raw JSON so that malformed entries can be
/// dropped individually instead of rejecting the request.
#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct AssistantRequest {
    #[schema(example = "Buenos días, vengo a reportar una fuga de agua.")]
    pub message: Option<String>,
    /// Recorded audio, base64 encoded, optionally as a `data:` URL.
    pub audio_base64: Option<String>,
    #[schema(example = "atencion_ciudadana")]
    pub scenario: Option<String>,
    /// `tutor` or `sim`.
    #[schema(example = "tutor")]
    pub mode: Option<String>,
    /// `facil`, `media` or `dificil`.
    #[schema(example = "media")]
    pub difficulty: Option<String>,
    pub start: bool,
    /// Prior turns as `{role, content}` objects, oldest first.
    #[schema(value_type = Vec<Object>)]
    pub history: Vec<Value>,
}

impl From<AssistantRequest> for TurnRequest {
    fn from(payload: AssistantRequest) -> Self {
        TurnRequest {
            history: parse_history(&payload.history),
            mode: Mode::resolve(payload.mode.as_deref()),
            scenario: Scenario::resolve(payload.scenario.as_deref()),
            difficulty: Difficulty::resolve(payload.difficulty.as_deref()),
            start: payload.start,
            message: payload.message,
            audio_base64: payload.audio_base64,
        }
    }
}

/// The assistant's reply to one turn.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AssistantResponse {
    pub text: String,
    /// `data:audio/mpeg;base64,...`; empty when the reply has no text.
    pub audio_data_url: String,
    /// What the transcriber heard, present only for audio turns.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transcript: Option<String>,
}

impl From<TurnReply> for AssistantResponse {
    fn from(reply: TurnReply) -> Self {
        Self {
            text: reply.text,
            audio_data_url: reply.audio_data_url,
            transcript: reply.transcript,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
    pub details: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use ventanilla_core::{
        conversation::ConversationTurn,
        session::ConversationSession,
    };

    #[test]
    fn test_request_defaults() {
        let payload: AssistantRequest = serde_json::from_str("{}").unwrap();
        let request = TurnRequest::from(payload);

        assert_eq!(request.mode, Mode::Tutor);
        assert_eq!(request.scenario, Scenario::CitizenService);
        assert_eq!(request.difficulty, Difficulty::Medium);
        assert!(!request.start);
        assert!(request.history.is_empty());
        assert!(request.message.is_none());
        assert!(request.audio_base64.is_none());
    }

    #[test]
    fn test_request_resolves_wire_values() {
        let json = r#"{
            "message": "C",
            "audioBase64": "AAAA",
            "scenario": "otro",
            "mode": "sim",
            "difficulty": "DIFICIL",
            "start": true,
            "history": [
                {"role": "user", "content": "A"},
                {"role": "user"},
                {"role": "assistant", "content": "B"},
                "basura"
            ]
        }"#;
        let payload: AssistantRequest = serde_json::from_str(json).unwrap();
        let request = TurnRequest::from(payload);

        assert_eq!(request.mode, Mode::Simulation);
        assert_eq!(request.scenario, Scenario::Generic);
        assert_eq!(request.difficulty, Difficulty::Hard);
        assert!(request.start);
        assert_eq!(request.message.as_deref(), Some("C"));
        assert_eq!(request.audio_base64.as_deref(), Some("AAAA"));
        assert_eq!(
            request.history,
            vec![ConversationTurn::user("A"), ConversationTurn::assistant("B")]
        );
    }

    #[test]
    fn test_client_request_is_accepted() {
        let mut session = ConversationSession::default();
        session.record_reply(&ventanilla_core::session::SessionReply {
            text: "Hola".to_string(),
            audio_data_url: String::new(),
            transcript: None,
        });
        let outgoing = session.begin_text_turn("Necesito ayuda").unwrap();

        let json = serde_json::to_string(&outgoing).unwrap();
        let payload: AssistantRequest = serde_json::from_str(&json).unwrap();
        let request = TurnRequest::from(payload);

        assert_eq!(request.message.as_deref(), Some("Necesito ayuda"));
        assert_eq!(request.history, vec![ConversationTurn::assistant("Hola")]);
    }

    #[test]
    fn test_response_serialization() {
        let response = AssistantResponse::from(TurnReply {
            text: "Hola".to_string(),
            audio_data_url: "data:audio/mpeg;base64,AA==".to_string(),
            transcript: None,
        });
        let json = serde_json::to_string(&response).unwrap();
        assert_eq!(
            json,
            r#"{"text":"Hola","audioDataUrl":"data:audio/mpeg;base64,AA=="}"#
        );
    }

    #[test]
    fn test_response_includes_transcript_for_audio_turns() {
        let response = AssistantResponse::from(TurnReply {
            text: "Claro".to_string(),
            audio_data_url: String::new(),
            transcript: Some("una licencia".to_string()),
        });
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["transcript"], "una licencia");
    }

    #[test]
    fn test_error_response_serialization() {
        let error = ErrorResponse {
            error: "Error al procesar la solicitud".to_string(),
            details: "boom".to_string(),
        };
        let json = serde_json::to_string(&error).unwrap();
        assert_eq!(
            json,
            r#"{"error":"Error al procesar la solicitud","details":"boom"}"#
        );
    }
}
