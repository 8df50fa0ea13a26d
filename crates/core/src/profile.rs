//! Behavior Profile Selection
//!
//! Maps the `(mode, scenario, difficulty)` triple of a request to the system
//! instruction that frames the model's behavior. Wire values arrive as free
//! text; each is resolved into a closed enum first, so that unrecognized values
//! fall back to a documented default instead of an accidental string match.

use serde::Serialize;

/// Whether the model advises the user or plays the requesting party.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum Mode {
    #[default]
    #[serde(rename = "tutor")]
    Tutor,
    #[serde(rename = "sim")]
    Simulation,
}

/// The context profile that parameterizes the instruction text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum Scenario {
    /// A municipal citizen-service counter.
    #[default]
    #[serde(rename = "atencion_ciudadana")]
    CitizenService,
    #[serde(rename = "generic")]
    Generic,
}

/// How cooperative the simulated counterpart is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum Difficulty {
    #[serde(rename = "facil")]
    Easy,
    #[default]
    #[serde(rename = "media")]
    Medium,
    #[serde(rename = "dificil")]
    Hard,
}

/// Lower-cases, trims and strips the Spanish acute accents so that
/// `"Difícil"`, `"dificil"` and `" DIFICIL "` compare equal.
fn normalize(raw: &str) -> String {
    raw.trim()
        .to_lowercase()
        .chars()
        .map(|c| match c {
            'á' => 'a',
            'é' => 'e',
            'í' => 'i',
            'ó' => 'o',
            'ú' => 'u',
            other => other,
        })
        .collect()
}

impl Mode {
    /// Resolves a wire value; absent or unrecognized values mean `Tutor`.
    pub fn resolve(raw: Option<&str>) -> Self {
        match raw.map(normalize).as_deref() {
            Some("sim" | "simulation" | "simulacion") => Mode::Simulation,
            _ => Mode::Tutor,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Tutor => "tutor",
            Mode::Simulation => "sim",
        }
    }
}

impl Scenario {
    /// Resolves a wire value. Absent means the citizen-service counter; any
    /// other unknown name maps to the generic profile.
    pub fn resolve(raw: Option<&str>) -> Self {
        match raw.map(normalize).as_deref() {
            None | Some("atencion_ciudadana") => Scenario::CitizenService,
            Some(_) => Scenario::Generic,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Scenario::CitizenService => "atencion_ciudadana",
            Scenario::Generic => "generic",
        }
    }
}

impl Difficulty {
    /// Resolves a wire value; absent or unrecognized values mean `Medium`.
    pub fn resolve(raw: Option<&str>) -> Self {
        match raw.map(normalize).as_deref() {
            Some("facil" | "easy") => Difficulty::Easy,
            Some("dificil" | "hard") => Difficulty::Hard,
            _ => Difficulty::Medium,
        }
    }

    /// The label shown to the model in the simulation instruction.
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "facil",
            Difficulty::Medium => "media",
            Difficulty::Hard => "dificil",
        }
    }
}

/// Behavioral hints for the simulated citizen at a given difficulty.
pub fn difficulty_hints(difficulty: Difficulty) -> &'static [&'static str] {
    match difficulty {
        Difficulty::Easy => &[
            "La persona usuaria colabora.",
            "Evita lenguaje agresivo.",
            "Expone el problema en una o dos frases.",
            "Deja espacio para preguntas.",
        ],
        Difficulty::Medium => &[
            "La persona usuaria expresa inconformidad y acepta diálogo.",
            "Pide claridad sobre pasos y tiempos.",
            "Trae un folio o antecedente.",
        ],
        Difficulty::Hard => &[
            "La persona usuaria llega molesta.",
            "Usa expresiones firmes sin insultos.",
            "Exige soluciones inmediatas.",
            "Añade detalles confusos que prueban la escucha activa.",
        ],
    }
}

const TUTOR_CITIZEN_SERVICE: &[&str] = &[
    "Rol: Asesoría de Atención Ciudadana.",
    "Objetivo: contener, escuchar y resolver con lenguaje inclusivo y respetuoso.",
    "Pautas:",
    "- Saluda, valida la emoción y resume el problema antes de proponer.",
    "- Explica pasos concretos, tiempos y límites institucionales.",
    "- Evita tecnicismos innecesarios, ofrece alternativas realistas.",
    "- Cierra con confirmación de entendimiento y próximos pasos.",
    "Tono: empático, claro, profesional. Español de México.",
];

const TUTOR_GENERIC: &str = "Eres una persona asistente clara, inclusiva y profesional en español.";

const SIMULATION_GENERIC: &str =
    "Simula a una persona usuaria de forma verosímil, sin romper personaje.";

fn simulation_citizen_service(difficulty: Difficulty) -> String {
    let mut lines: Vec<String> = [
        "Rol: Persona ciudadana que acude a Atención Ciudadana.",
        "Objetivo: plantear un caso verosímil para que la persona asesora practique.",
        "Sí haces:",
        "- Planteas el problema desde tu perspectiva.",
        "- Mantienes contexto municipal realista.",
        "- Respondes en turnos breves (2 a 4 oraciones).",
        "- Entregas datos razonables si te los piden (folio, fecha, área).",
    ]
    .iter()
    .map(|line| line.to_string())
    .collect();

    lines.push(format!("Dificultad: {}. Pistas:", difficulty.as_str()));
    lines.extend(
        difficulty_hints(difficulty)
            .iter()
            .map(|hint| format!("• {hint}")),
    );
    lines.extend(
        [
            "No haces:",
            "- No das la solución por la asesora.",
            "- No insultas ni usas lenguaje discriminatorio.",
            "Idioma: español de México. No rompas personaje.",
        ]
        .iter()
        .map(|line| line.to_string()),
    );
    lines.join("\n")
}

/// Builds the system instruction for a resolved behavior profile.
///
/// This is a pure function: identical inputs always produce identical text.
/// `difficulty` only affects the simulation profile of a known scenario.
pub fn system_instruction(mode: Mode, scenario: Scenario, difficulty: Difficulty) -> String {
    match (mode, scenario) {
        (Mode::Tutor, Scenario::CitizenService) => TUTOR_CITIZEN_SERVICE.join("\n"),
        (Mode::Tutor, Scenario::Generic) => TUTOR_GENERIC.to_string(),
        (Mode::Simulation, Scenario::CitizenService) => simulation_citizen_service(difficulty),
        (Mode::Simulation, Scenario::Generic) => SIMULATION_GENERIC.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MODES: [Mode; 2] = [Mode::Tutor, Mode::Simulation];
    const SCENARIOS: [Scenario; 2] = [Scenario::CitizenService, Scenario::Generic];
    const DIFFICULTIES: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

    #[test]
    fn test_mode_resolution() {
        assert_eq!(Mode::resolve(None), Mode::Tutor);
        assert_eq!(Mode::resolve(Some("tutor")), Mode::Tutor);
        assert_eq!(Mode::resolve(Some("sim")), Mode::Simulation);
        assert_eq!(Mode::resolve(Some("Simulación")), Mode::Simulation);
        assert_eq!(Mode::resolve(Some(" SIMULATION ")), Mode::Simulation);
        assert_eq!(Mode::resolve(Some("interview")), Mode::Tutor);
    }

    #[test]
    fn test_scenario_resolution() {
        assert_eq!(Scenario::resolve(None), Scenario::CitizenService);
        assert_eq!(
            Scenario::resolve(Some("ATENCION_CIUDADANA")),
            Scenario::CitizenService
        );
        assert_eq!(Scenario::resolve(Some("salud")), Scenario::Generic);
        assert_eq!(Scenario::resolve(Some("")), Scenario::Generic);
    }

    #[test]
    fn test_difficulty_resolution() {
        assert_eq!(Difficulty::resolve(None), Difficulty::Medium);
        assert_eq!(Difficulty::resolve(Some("FACIL")), Difficulty::Easy);
        assert_eq!(Difficulty::resolve(Some("easy")), Difficulty::Easy);
        assert_eq!(Difficulty::resolve(Some("Difícil")), Difficulty::Hard);
        assert_eq!(Difficulty::resolve(Some("hard")), Difficulty::Hard);
        assert_eq!(Difficulty::resolve(Some("extreme")), Difficulty::Medium);
    }

    #[test]
    fn test_system_instruction_is_deterministic() {
        for mode in MODES {
            for scenario in SCENARIOS {
                for difficulty in DIFFICULTIES {
                    assert_eq!(
                        system_instruction(mode, scenario, difficulty),
                        system_instruction(mode, scenario, difficulty)
                    );
                }
            }
        }
    }

    #[test]
    fn test_unrecognized_difficulty_uses_medium_hints() {
        let unknown = Difficulty::resolve(Some("imposible"));
        assert_eq!(difficulty_hints(unknown), difficulty_hints(Difficulty::Medium));
        assert_eq!(
            system_instruction(Mode::Simulation, Scenario::CitizenService, unknown),
            system_instruction(Mode::Simulation, Scenario::CitizenService, Difficulty::Medium)
        );
    }

    #[test]
    fn test_unrecognized_scenario_uses_generic_instruction() {
        let unknown = Scenario::resolve(Some("aduanas"));
        assert_eq!(
            system_instruction(Mode::Tutor, unknown, Difficulty::Medium),
            TUTOR_GENERIC
        );
        assert_eq!(
            system_instruction(Mode::Simulation, unknown, Difficulty::Hard),
            SIMULATION_GENERIC
        );
    }

    #[test]
    fn test_tutor_instruction_ignores_difficulty() {
        let easy = system_instruction(Mode::Tutor, Scenario::CitizenService, Difficulty::Easy);
        let hard = system_instruction(Mode::Tutor, Scenario::CitizenService, Difficulty::Hard);
        assert_eq!(easy, hard);
        assert!(easy.starts_with("Rol: Asesoría de Atención Ciudadana."));
        assert!(easy.contains("Cierra con confirmación"));
    }

    #[test]
    fn test_simulation_instruction_lists_hints_and_prohibitions() {
        let text = system_instruction(Mode::Simulation, Scenario::CitizenService, Difficulty::Hard);
        assert!(text.contains("Dificultad: dificil. Pistas:"));
        for hint in difficulty_hints(Difficulty::Hard) {
            assert!(text.contains(&format!("• {hint}")));
        }
        assert!(!text.contains("La persona usuaria colabora."));
        assert!(text.contains("No das la solución por la asesora."));
        assert!(text.contains("No insultas"));
        assert!(text.ends_with("No rompas personaje."));
    }

    #[test]
    fn test_wire_serialization_uses_canonical_values() {
        assert_eq!(serde_json::to_string(&Mode::Simulation).unwrap(), "\"sim\"");
        assert_eq!(
            serde_json::to_string(&Scenario::CitizenService).unwrap(),
            "\"atencion_ciudadana\""
        );
        assert_eq!(serde_json::to_string(&Difficulty::Hard).unwrap(), "\"dificil\"");
        assert_eq!(Mode::Simulation.as_str(), "sim");
    }
}
