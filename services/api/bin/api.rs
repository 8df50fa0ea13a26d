//! Main Entrypoint for the Ventanilla API Service
//!
//! This binary is responsible for:
//! 1. Loading configuration from the environment.
//! 2. Initializing the provider clients for generation, transcription and speech.
//! 3. Constructing the Axum router.
//! 4. Starting the web server and handling graceful shutdown.

use anyhow::Context;
use async_openai::config::OpenAIConfig;
use std::{net::SocketAddr, sync::Arc};
use tracing::{error, info};
use ventanilla_api::{config::Config, router::create_router, state::AppState};
use ventanilla_core::{
    llm_client::OpenAICompatibleClient,
    speech::{OpenAISpeechClient, SpeechSettings},
    turn::{InputPolicy, TurnOrchestrator},
};

/// Listens for the `Ctrl+C` signal to gracefully shut down the server.
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "Failed to listen for Ctrl+C");
        return;
    }
    info!("Received shutdown signal. Shutting down gracefully...");
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // --- 1. Load Configuration ---
    let config = Config::from_env().context("Failed to load configuration")?;

    // --- 2. Initialize Logging ---
    tracing_subscriber::fmt()
        .with_max_level(config.log_level)
        .with_timer(tracing_subscriber::fmt::time::ChronoLocal::rfc_3339())
        .init();
    info!("Configuration loaded. Initializing provider clients...");

    // --- 3. Initialize Provider Clients ---
    let openai_config = OpenAIConfig::new()
        .with_api_key(config.openai_api_key.clone())
        .with_api_base(&config.openai_api_base);

    let llm_client = Arc::new(OpenAICompatibleClient::new(
        openai_config.clone(),
        config.chat_model.clone(),
    ));
    let speech_client = Arc::new(
        OpenAISpeechClient::new(
            openai_config,
            SpeechSettings {
                transcription_model: config.transcription_model.clone(),
                transcription_language: config.transcription_language.clone(),
                speech_model: config.tts_model.clone(),
                voice: config.tts_voice.clone(),
            },
        )
        .context("Failed to initialize speech client")?,
    );

    let turns = TurnOrchestrator::new(
        speech_client.clone(),
        llm_client,
        speech_client,
        InputPolicy {
            require_user_input: config.require_user_input,
        },
    );
    let app_state = Arc::new(AppState {
        turns: Arc::new(turns),
    });

    // --- 4. Create Router ---
    let app = create_router(app_state);

    // --- 5. Start Server ---
    info!(
        chat_model = %config.chat_model,
        transcription_model = %config.transcription_model,
        tts_model = %config.tts_model,
        tts_voice = %config.tts_voice,
        require_user_input = config.require_user_input,
        bind_address = %config.bind_address,
        "Service configured. Starting server..."
    );
    let listener = tokio::net::TcpListener::bind(config.bind_address).await?;

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    info!("Server has shut down.");
    Ok(())
}
