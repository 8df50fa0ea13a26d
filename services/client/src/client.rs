//! HTTP client for the assistant endpoint.

use anyhow::{Context, Result};
use std::path::Path;
use ventanilla_core::{
    session::{SessionReply, SessionRequest},
    turn::decode_audio,
};

pub struct AssistantClient {
    http: reqwest::Client,
    endpoint: String,
}

impl AssistantClient {
    pub fn new(endpoint: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            endpoint,
        }
    }

    /// Posts one turn and returns the server's reply. Non-2xx statuses are errors.
    pub async fn send(&self, request: &SessionRequest) -> Result<SessionReply> {
        tracing::debug!(
            endpoint = %self.endpoint,
            history_len = request.history.len(),
            start = request.start,
            "Posting turn"
        );
        let response = self
            .http
            .post(&self.endpoint)
            .json(request)
            .send()
            .await
            .context("Failed to reach the assistant server")?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("Error HTTP {}: {}", status.as_u16(), body);
        }

        response
            .json::<SessionReply>()
            .await
            .context("Failed to parse the assistant reply")
    }
}

/// Writes the audio of a `data:` URL to `path`. Returns `false` when the URL is empty.
pub async fn save_reply_audio(data_url: &str, path: &Path) -> Result<bool> {
    if data_url.trim().is_empty() {
        return Ok(false);
    }
    let audio = decode_audio(data_url).context("Reply audio is not valid base64")?;
    tokio::fs::write(path, audio)
        .await
        .with_context(|| format!("Failed to write reply audio to {}", path.display()))?;
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_save_reply_audio_writes_decoded_bytes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("respuesta.mp3");

        let saved = save_reply_audio("data:audio/mpeg;base64,bXAz", &path)
            .await
            .unwrap();

        assert!(saved);
        assert_eq!(std::fs::read(&path).unwrap(), b"mp3");
    }

    #[tokio::test]
    async fn test_save_reply_audio_skips_empty_url() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("respuesta.mp3");

        assert!(!save_reply_audio("", &path).await.unwrap());
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn test_save_reply_audio_rejects_garbage() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("respuesta.mp3");

        assert!(save_reply_audio("data:audio/mpeg;base64,???", &path).await.is_err());
    }
}
