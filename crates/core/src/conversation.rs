//! Conversation Turns
//!
//! A conversation is an ordered list of role-tagged utterances. The server never
//! stores one: the caller owns the log and sends it with every request.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// The speaker of a single turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
    System,
}

impl Role {
    /// Parses a wire role, ignoring case and surrounding whitespace.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_lowercase().as_str() {
            "user" => Some(Role::User),
            "assistant" => Some(Role::Assistant),
            "system" => Some(Role::System),
            _ => None,
        }
    }

    /// The upper-case tag used when a conversation is flattened into text.
    pub fn tag(&self) -> &'static str {
        match self {
            Role::User => "USER",
            Role::Assistant => "ASSISTANT",
            Role::System => "SYSTEM",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::User => write!(f, "user"),
            Role::Assistant => write!(f, "assistant"),
            Role::System => write!(f, "system"),
        }
    }
}

/// One role-tagged utterance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationTurn {
    pub role: Role,
    pub content: String,
}

impl ConversationTurn {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(Role::Assistant, content)
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self::new(Role::System, content)
    }

    /// Reads a turn from an arbitrary JSON history entry.
    ///
    /// Returns `None` unless the entry is an object whose `role` is a known,
    /// non-empty role string and whose `content` is a non-empty string. Callers
    /// drop such entries instead of failing the request.
    pub fn from_value(value: &Value) -> Option<Self> {
        let role = value.get("role")?.as_str().and_then(Role::parse)?;
        let content = value.get("content")?.as_str()?;
        if content.is_empty() {
            return None;
        }
        Some(Self::new(role, content))
    }
}

/// Converts raw history entries into turns, silently dropping malformed ones.
pub fn parse_history(entries: &[Value]) -> Vec<ConversationTurn> {
    let turns: Vec<ConversationTurn> = entries
        .iter()
        .filter_map(ConversationTurn::from_value)
        .collect();
    if turns.len() < entries.len() {
        tracing::debug!(
            dropped = entries.len() - turns.len(),
            "Dropped malformed history entries"
        );
    }
    turns
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_role_parse_is_case_insensitive() {
        assert_eq!(Role::parse("USER"), Some(Role::User));
        assert_eq!(Role::parse(" assistant "), Some(Role::Assistant));
        assert_eq!(Role::parse("System"), Some(Role::System));
        assert_eq!(Role::parse(""), None);
        assert_eq!(Role::parse("bot"), None);
    }

    #[test]
    fn test_role_display_and_tag() {
        assert_eq!(Role::User.to_string(), "user");
        assert_eq!(Role::Assistant.tag(), "ASSISTANT");
    }

    #[test]
    fn test_turn_serialization() {
        let turn = ConversationTurn::user("Hola");
        let json = serde_json::to_string(&turn).unwrap();
        assert_eq!(json, r#"{"role":"user","content":"Hola"}"#);
    }

    #[test]
    fn test_from_value_accepts_valid_entry() {
        let turn = ConversationTurn::from_value(&json!({"role": "assistant", "content": "B"}));
        assert_eq!(turn, Some(ConversationTurn::assistant("B")));
    }

    #[test]
    fn test_from_value_rejects_malformed_entries() {
        let malformed = [
            json!({"role": "user"}),
            json!({"content": "sin rol"}),
            json!({"role": "", "content": "x"}),
            json!({"role": "user", "content": ""}),
            json!({"role": "user", "content": 42}),
            json!({"role": "narrator", "content": "x"}),
            json!("user: hola"),
            json!(null),
        ];
        for value in malformed {
            assert!(
                ConversationTurn::from_value(&value).is_none(),
                "entry should be dropped: {value}"
            );
        }
    }

    #[test]
    fn test_parse_history_keeps_order_of_valid_entries() {
        let entries = vec![
            json!({"role": "user", "content": "A"}),
            json!({"role": "user"}),
            json!({"role": "assistant", "content": "B"}),
            json!({"content": "huérfano"}),
            json!({"role": "user", "content": "C"}),
        ];
        let turns = parse_history(&entries);
        assert_eq!(
            turns,
            vec![
                ConversationTurn::user("A"),
                ConversationTurn::assistant("B"),
                ConversationTurn::user("C"),
            ]
        );
    }
}
