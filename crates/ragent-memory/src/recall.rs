use ragent_types::MemoryRecord;

/// Header line of the memory block appended to agent system prompts
pub const MEMORY_CONTEXT_HEADER: &str = "## Información recordada sobre el usuario:";

// Self-disclosure phrasings, matched as lowercase substrings
const REMEMBER_PATTERNS: &[&str] = &[
    "me llamo",
    "mi nombre es",
    "soy ",
    "trabajo en",
    "trabajo como",
    "recuerda que",
    "no olvides",
    "prefiero",
    "me gusta",
    "no me gusta",
    "mi email es",
    "mi correo es",
    "vivo en",
    "mi empresa es",
    "mi equipo es",
    "mi departamento es",
    "my name is",
    "i prefer",
    "i work at",
    "i work as",
    "remember that",
    "i live in",
];

pub fn should_remember(message: &str) -> bool {
    let lower = message.to_lowercase();
    REMEMBER_PATTERNS.iter().any(|p| lower.contains(p))
}

/// Text to store for a memorable message: the whole message, trimmed
pub fn extract_memorable(message: &str) -> Option<String> {
    if !should_remember(message) {
        return None;
    }
    let trimmed = message.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// Render memories as a prompt block; empty input renders nothing
pub fn format_memory_context(memories: &[MemoryRecord]) -> String {
    if memories.is_empty() {
        return String::new();
    }

    let mut parts = vec![MEMORY_CONTEXT_HEADER.to_string()];
    parts.extend(
        memories
            .iter()
            .filter(|m| !m.data.is_empty())
            .map(|m| format!("- {}", m.data)),
    );
    parts.join("\n")
}
