//! KITT persona: local rule-based responder and provider system prompt.
//!
//! When no remote provider is usable, [`LocalResponder`] answers from a fixed
//! table of canned responses keyed by recognized intent. Matching is
//! case-insensitive substring matching over the user text; responses are
//! deterministic and always non-empty.

/// Display name of the onboard persona.
pub const PERSONA_NAME: &str = "KITT";

/// System prompt sent to remote providers so their answers stay in character.
pub const SYSTEM_PROMPT: &str = "Tu es KITT, l'intelligence artificielle embarquée de la série K2000. \
     Tu réponds en français, avec assurance et une pointe d'humour pince-sans-rire. \
     Tes réponses sont brèves (deux ou trois phrases) et tu restes toujours en personnage.";

/// User intent recognized by the local responder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    /// "bonjour", "salut", ...
    Greeting,
    /// Any request mentioning the scanner.
    ActivateScanner,
    /// Turbo boost request.
    TurboBoost,
    /// "qui es-tu", "ton nom", ...
    Identity,
    /// System status question.
    Status,
    /// "merci", ...
    Thanks,
    /// Anything else.
    Unknown,
}

/// Keyword table for intent matching. First matching row wins, so more
/// specific intents (scanner, turbo) sit above the generic greeting row.
const INTENT_KEYWORDS: &[(Intent, &[&str])] = &[
    (Intent::ActivateScanner, &["scanner", "balayage"]),
    (Intent::TurboBoost, &["turbo"]),
    (
        Intent::Identity,
        &["qui es-tu", "qui es tu", "ton nom", "who are you", "présente-toi"],
    ),
    (
        Intent::Status,
        &["statut", "status", "état des systèmes", "systèmes", "diagnostic"],
    ),
    (Intent::Thanks, &["merci", "thank"]),
    (
        Intent::Greeting,
        &["bonjour", "bonsoir", "salut", "hello", "coucou"],
    ),
];

/// Classify user text into an [`Intent`].
pub fn classify(input: &str) -> Intent {
    let lowered = input.to_lowercase();
    for (intent, keywords) in INTENT_KEYWORDS {
        if keywords.iter().any(|k| lowered.contains(k)) {
            return *intent;
        }
    }
    Intent::Unknown
}

/// Deterministic rule-based responder for the KITT persona.
///
/// Pure: no side effects, no state. The same input always yields the same
/// response, which is what lets the router cache fallback answers like any
/// provider answer.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalResponder;

impl LocalResponder {
    /// Answer `input` with the canned response for its intent.
    pub fn respond(&self, input: &str) -> String {
        let text = match classify(input) {
            Intent::Greeting => {
                "Bonjour ! Je suis KITT, votre copilote de bord. Tous mes systèmes \
                 sont opérationnels. Comment puis-je vous aider ?"
            }
            Intent::ActivateScanner => {
                "Scanner activé. Balayage de l'environnement en cours... \
                 Aucune menace détectée, Michael."
            }
            Intent::TurboBoost => {
                "Turbo boost enclenché ! Accrochez-vous, propulsion maximale."
            }
            Intent::Identity => {
                "Je suis KITT, Knight Industries Two Thousand : une intelligence \
                 artificielle embarquée, au service de la Fondation pour la Loi \
                 et le Gouvernement."
            }
            Intent::Status => {
                "Tous les systèmes sont opérationnels. Scanner en veille, turbines \
                 nominales, banque de données en ligne."
            }
            Intent::Thanks => "Je vous en prie. C'est toujours un plaisir de vous assister.",
            Intent::Unknown => {
                "Mes modules d'analyse avancée sont hors ligne pour le moment, mais \
                 mes circuits de base restent à votre entière disposition."
            }
        };
        text.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_greeting() {
        assert_eq!(classify("Bonjour"), Intent::Greeting);
        assert_eq!(classify("salut KITT"), Intent::Greeting);
        assert_eq!(classify("Hello!"), Intent::Greeting);
    }

    #[test]
    fn test_classify_scanner() {
        assert_eq!(classify("Active le scanner"), Intent::ActivateScanner);
        assert_eq!(classify("SCANNER"), Intent::ActivateScanner);
    }

    #[test]
    fn test_classify_turbo() {
        assert_eq!(classify("Turbo boost"), Intent::TurboBoost);
        assert_eq!(classify("passe en mode turbo"), Intent::TurboBoost);
    }

    #[test]
    fn test_classify_identity() {
        assert_eq!(classify("Qui es-tu ?"), Intent::Identity);
        assert_eq!(classify("quel est ton nom"), Intent::Identity);
    }

    #[test]
    fn test_classify_status() {
        assert_eq!(classify("statut"), Intent::Status);
        assert_eq!(classify("état des systèmes ?"), Intent::Status);
    }

    #[test]
    fn test_classify_thanks() {
        assert_eq!(classify("Merci beaucoup"), Intent::Thanks);
    }

    #[test]
    fn test_classify_unknown() {
        assert_eq!(classify("quelle heure est-il"), Intent::Unknown);
        assert_eq!(classify(""), Intent::Unknown);
    }

    #[test]
    fn test_specific_intents_win_over_greeting() {
        // "Bonjour KITT, active le scanner" mentions both; the scanner row
        // sits above greeting in the table and must win.
        assert_eq!(
            classify("Bonjour KITT, active le scanner"),
            Intent::ActivateScanner
        );
    }

    #[test]
    fn test_respond_greeting_names_persona() {
        let responder = LocalResponder;
        let reply = responder.respond("Bonjour");
        assert!(reply.contains(PERSONA_NAME));
    }

    #[test]
    fn test_respond_identity_names_persona() {
        let responder = LocalResponder;
        let reply = responder.respond("Qui es-tu ?");
        assert!(reply.contains("KITT"));
        assert!(reply.contains("Knight Industries"));
    }

    #[test]
    fn test_respond_scanner() {
        let responder = LocalResponder;
        let reply = responder.respond("Active le scanner");
        assert!(reply.contains("Scanner"));
    }

    #[test]
    fn test_respond_turbo_boost() {
        let responder = LocalResponder;
        let reply = responder.respond("Turbo boost");
        assert!(reply.contains("Turbo boost"));
    }

    #[test]
    fn test_respond_always_non_empty() {
        let responder = LocalResponder;
        for input in ["", "xyzzy", "????", "Bonjour", "turbo", "merci"] {
            assert!(!responder.respond(input).is_empty(), "empty for {input:?}");
        }
    }

    #[test]
    fn test_respond_deterministic() {
        let responder = LocalResponder;
        assert_eq!(responder.respond("Bonjour"), responder.respond("Bonjour"));
    }
}
