//! Conversation Assembly
//!
//! Builds the ordered instruction sequence handed to the generation step and
//! flattens it into the single role-tagged text blob the provider receives.

use crate::{
    conversation::ConversationTurn,
    profile::{Difficulty, Mode, Scenario, system_instruction},
};

/// The synthetic user turn that asks the simulated citizen to open the case.
pub const SIMULATION_OPENING_REQUEST: &str = "Inicia la simulación. Como persona ciudadana, \
     describe tu caso y formula una petición concreta a la persona asesora en 2 a 4 oraciones.";

/// Everything the assembler needs from a request, already resolved.
#[derive(Debug, Clone, Copy)]
pub struct AssemblyInput<'a> {
    pub mode: Mode,
    pub scenario: Scenario,
    pub difficulty: Difficulty,
    pub start: bool,
    pub history: &'a [ConversationTurn],
    pub user_text: Option<&'a str>,
}

impl AssemblyInput<'_> {
    /// A simulation start produces the opening turn and ignores all user input.
    pub fn is_simulation_start(&self) -> bool {
        self.mode == Mode::Simulation && self.start
    }
}

/// Assembles the instruction sequence for one turn.
///
/// The system instruction always comes first. A simulation start yields exactly
/// one more turn, the opening request. Otherwise every history turn with
/// non-empty content follows in order, then the user text if it is non-empty.
/// A result holding only the system instruction is returned as is.
pub fn assemble(input: &AssemblyInput<'_>) -> Vec<ConversationTurn> {
    let system = ConversationTurn::system(system_instruction(
        input.mode,
        input.scenario,
        input.difficulty,
    ));

    if input.is_simulation_start() {
        return vec![system, ConversationTurn::user(SIMULATION_OPENING_REQUEST)];
    }

    let mut turns = Vec::with_capacity(input.history.len() + 2);
    turns.push(system);
    turns.extend(
        input
            .history
            .iter()
            .filter(|turn| !turn.content.is_empty())
            .cloned(),
    );
    if let Some(text) = input.user_text.map(str::trim).filter(|t| !t.is_empty()) {
        turns.push(ConversationTurn::user(text));
    }
    turns
}

/// Joins the turns into `ROLE: content` lines separated by newlines.
pub fn flatten(turns: &[ConversationTurn]) -> String {
    turns
        .iter()
        .map(|turn| format!("{}: {}", turn.role.tag(), turn.content))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conversation::{Role, parse_history};
    use serde_json::json;

    fn input<'a>(
        mode: Mode,
        start: bool,
        history: &'a [ConversationTurn],
        user_text: Option<&'a str>,
    ) -> AssemblyInput<'a> {
        AssemblyInput {
            mode,
            scenario: Scenario::CitizenService,
            difficulty: Difficulty::Medium,
            start,
            history,
            user_text,
        }
    }

    #[test]
    fn test_tutor_round_trip_history_then_message() {
        let history = vec![
            ConversationTurn::user("A"),
            ConversationTurn::assistant("B"),
        ];
        let turns = assemble(&input(Mode::Tutor, false, &history, Some("C")));

        assert_eq!(turns.len(), 4);
        assert_eq!(turns[0].role, Role::System);
        assert_eq!(
            turns[0].content,
            system_instruction(Mode::Tutor, Scenario::CitizenService, Difficulty::Medium)
        );
        assert_eq!(turns[1], ConversationTurn::user("A"));
        assert_eq!(turns[2], ConversationTurn::assistant("B"));
        assert_eq!(turns[3], ConversationTurn::user("C"));
    }

    #[test]
    fn test_simulation_start_ignores_history_and_message() {
        let history = vec![
            ConversationTurn::user("A"),
            ConversationTurn::assistant("B"),
        ];
        let turns = assemble(&input(Mode::Simulation, true, &history, Some("C")));

        assert_eq!(turns.len(), 2);
        assert_eq!(turns[0].role, Role::System);
        assert!(turns[0].content.starts_with("Rol: Persona ciudadana"));
        assert_eq!(turns[1], ConversationTurn::user(SIMULATION_OPENING_REQUEST));
    }

    #[test]
    fn test_start_flag_is_ignored_in_tutor_mode() {
        let history = vec![ConversationTurn::user("A")];
        let turns = assemble(&input(Mode::Tutor, true, &history, Some("C")));
        assert_eq!(turns.len(), 3);
        assert_eq!(turns[2], ConversationTurn::user("C"));
    }

    #[test]
    fn test_simulation_without_start_threads_history() {
        let history = vec![ConversationTurn::assistant("Vengo por mi licencia.")];
        let turns = assemble(&input(Mode::Simulation, false, &history, Some("Claro, ¿su folio?")));
        assert_eq!(turns.len(), 3);
        assert_eq!(turns[1], history[0]);
        assert_eq!(turns[2], ConversationTurn::user("Claro, ¿su folio?"));
    }

    #[test]
    fn test_malformed_history_is_dropped_in_order() {
        let raw = vec![
            json!({"role": "user", "content": "uno"}),
            json!({"role": "assistant"}),
            json!({"role": "assistant", "content": "dos"}),
            json!({"role": 7, "content": "x"}),
            json!({"role": "user", "content": "tres"}),
        ];
        let history = parse_history(&raw);
        let turns = assemble(&input(Mode::Tutor, false, &history, None));

        let contents: Vec<&str> = turns[1..].iter().map(|t| t.content.as_str()).collect();
        assert_eq!(contents, vec!["uno", "dos", "tres"]);
    }

    #[test]
    fn test_blank_user_text_is_not_appended() {
        let turns = assemble(&input(Mode::Tutor, false, &[], Some("   ")));
        assert_eq!(turns.len(), 1);
        assert_eq!(turns[0].role, Role::System);
    }

    #[test]
    fn test_user_text_is_trimmed() {
        let turns = assemble(&input(Mode::Tutor, false, &[], Some("  hola \n")));
        assert_eq!(turns[1], ConversationTurn::user("hola"));
    }

    #[test]
    fn test_flatten_tags_each_turn() {
        let turns = vec![
            ConversationTurn::system("S"),
            ConversationTurn::user("A"),
            ConversationTurn::assistant("B"),
        ];
        assert_eq!(flatten(&turns), "SYSTEM: S\nUSER: A\nASSISTANT: B");
    }
}
