//! Parsing of the lines typed at the prompt.

use std::path::PathBuf;

/// What a typed line asks the client to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    /// Blank line.
    Empty,
    /// A message for the assistant.
    Text(String),
    /// Send a recorded audio file.
    Audio(PathBuf),
    /// Let the simulated citizen open a new simulation.
    StartSimulation,
    /// Clear the conversation log.
    Reset,
    SetMode(String),
    SetScenario(String),
    SetDifficulty(String),
    Help,
    Quit,
    /// A slash command that is unknown or missing its argument.
    Invalid(String),
}

pub const HELP: &str = "\
Escribe un mensaje y presiona Enter para enviarlo.
Comandos:
  /audio <archivo>      envía una grabación
  /start                inicia una simulación (modo sim)
  /reset                borra la conversación
  /mode <tutor|sim>     cambia el modo
  /scenario <nombre>    cambia el escenario
  /difficulty <nivel>   facil, media o dificil
  /help                 muestra esta ayuda
  /quit                 salir";

/// Parses one line typed at the prompt.
pub fn parse_input(line: &str) -> Input {
    let line = line.trim();
    if line.is_empty() {
        return Input::Empty;
    }
    let Some(command) = line.strip_prefix('/') else {
        return Input::Text(line.to_string());
    };

    let (name, arg) = match command.split_once(char::is_whitespace) {
        Some((name, arg)) => (name, arg.trim()),
        None => (command, ""),
    };
    let with_arg = |make: fn(String) -> Input| {
        if arg.is_empty() {
            Input::Invalid(format!("/{name} necesita un valor"))
        } else {
            make(arg.to_string())
        }
    };

    match name.to_lowercase().as_str() {
        "audio" => with_arg(|path| Input::Audio(PathBuf::from(path))),
        "start" => Input::StartSimulation,
        "reset" => Input::Reset,
        "mode" => with_arg(Input::SetMode),
        "scenario" => with_arg(Input::SetScenario),
        "difficulty" => with_arg(Input::SetDifficulty),
        "help" => Input::Help,
        "quit" | "exit" => Input::Quit,
        _ => Input::Invalid(format!("Comando desconocido: /{name}")),
    }
}
