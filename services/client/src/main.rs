//! Terminal client for the Ventanilla assistant.
//!
//! Keeps the conversation log for one practice session, sends typed messages,
//! recorded audio files or a simulation start to the server, prints the replies
//! and saves the returned speech to disk.

mod client;
mod input;

use anyhow::{Context, Result};
use base64::{Engine, engine::general_purpose::STANDARD};
use clap::Parser;
use std::path::PathBuf;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::error;
use tracing_subscriber::EnvFilter;
use ventanilla_core::{
    conversation::Role,
    profile::{Difficulty, Mode, Scenario},
    session::{
        AUDIO_FAILURE_MESSAGE, ConversationSession, SIMULATION_FAILURE_MESSAGE, SessionRequest,
        TEXT_FAILURE_MESSAGE,
    },
};

use crate::{
    client::{AssistantClient, save_reply_audio},
    input::{HELP, Input, parse_input},
};

#[derive(Parser, Debug)]
#[command(version, about = "Practica atención ciudadana con el asistente Ventanilla")]
struct Args {
    /// URL of the assistant endpoint.
    #[arg(long, env = "VENTANILLA_SERVER", default_value = "http://localhost:3000/api/assistant")]
    server: String,
    /// `tutor` or `sim`.
    #[arg(long, default_value = "tutor")]
    mode: String,
    #[arg(long, default_value = "atencion_ciudadana")]
    scenario: String,
    /// `facil`, `media` or `dificil`.
    #[arg(long, default_value = "media")]
    difficulty: String,
    /// Where the audio of each reply is written.
    #[arg(long, default_value = "respuesta.mp3")]
    audio_out: PathBuf,
}

struct App {
    session: ConversationSession,
    client: AssistantClient,
    audio_out: PathBuf,
}

impl App {
    fn print(&self, role: Role, text: &str) {
        println!("{}: {}", self.session.speaker_label(role), text);
    }

    /// Sends a request and records the reply. On failure the user only sees
    /// `fallback`; the cause goes to the log.
    async fn exchange(&mut self, request: SessionRequest, fallback: &str) {
        match self.client.send(&request).await {
            Ok(reply) => {
                self.session.record_reply(&reply);
                if let Some(transcript) = reply.transcript.as_deref() {
                    self.print(Role::User, transcript);
                }
                self.print(Role::Assistant, &reply.text);
                match save_reply_audio(&reply.audio_data_url, &self.audio_out).await {
                    Ok(true) => println!("(audio en {})", self.audio_out.display()),
                    Ok(false) => {}
                    Err(e) => error!(error = ?e, "Could not save reply audio"),
                }
            }
            Err(e) => {
                error!(error = ?e, "Assistant request failed");
                self.print(Role::Assistant, fallback);
            }
        }
    }

    async fn send_audio(&mut self, path: PathBuf) {
        let audio = match tokio::fs::read(&path).await {
            Ok(audio) => audio,
            Err(e) => {
                error!(error = %e, path = %path.display(), "Could not read recording");
                self.print(Role::Assistant, AUDIO_FAILURE_MESSAGE);
                return;
            }
        };
        let request = self.session.begin_audio_turn(STANDARD.encode(audio));
        self.exchange(request, AUDIO_FAILURE_MESSAGE).await;
    }

    /// Handles one typed line. Returns `false` when the user wants to quit.
    async fn handle(&mut self, input: Input) -> bool {
        match input {
            Input::Empty => {}
            Input::Quit => return false,
            Input::Help => println!("{HELP}"),
            Input::Invalid(message) => println!("{message}"),
            Input::Reset => {
                self.session.reset();
                println!("(conversación reiniciada)");
            }
            Input::SetMode(raw) => {
                self.session.mode = Mode::resolve(Some(raw.as_str()));
                println!("(modo: {})", self.session.mode.as_str());
            }
            Input::SetScenario(raw) => {
                self.session.scenario = Scenario::resolve(Some(raw.as_str()));
                println!("(escenario: {})", self.session.scenario.as_str());
            }
            Input::SetDifficulty(raw) => {
                self.session.difficulty = Difficulty::resolve(Some(raw.as_str()));
                println!("(dificultad: {})", self.session.difficulty.as_str());
            }
            Input::StartSimulation => match self.session.begin_simulation() {
                Ok(request) => self.exchange(request, SIMULATION_FAILURE_MESSAGE).await,
                Err(e) => println!("{e}"),
            },
            Input::Audio(path) => self.send_audio(path).await,
            Input::Text(text) => match self.session.begin_text_turn(&text) {
                Ok(request) => self.exchange(request, TEXT_FAILURE_MESSAGE).await,
                Err(e) => println!("{e}"),
            },
        }
        true
    }
}

async fn prompt() -> Result<()> {
    let mut stdout = tokio::io::stdout();
    stdout.write_all(b"> ").await?;
    stdout.flush().await?;
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_timer(tracing_subscriber::fmt::time::ChronoLocal::rfc_3339())
        .with_writer(std::io::stderr)
        .init();

    let mut app = App {
        session: ConversationSession::new(
            Mode::resolve(Some(args.mode.as_str())),
            Scenario::resolve(Some(args.scenario.as_str())),
            Difficulty::resolve(Some(args.difficulty.as_str())),
        ),
        client: AssistantClient::new(args.server),
        audio_out: args.audio_out,
    };

    println!("{HELP}");
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        prompt().await?;
        let Some(line) = lines.next_line().await.context("Failed to read stdin")? else {
            break;
        };
        if !app.handle(parse_input(&line)).await {
            break;
        }
    }
    Ok(())
}
