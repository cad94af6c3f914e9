use crate::constants::ARTIFACT_PROMPT_CHARS;

fn is_allowed(c: char) -> bool {
    c.is_alphanumeric() || matches!(c, ' ' | '-' | '_')
}

/// Keep alphanumerics, spaces, hyphens and underscores, then trim
pub fn sanitize_name(name: &str) -> String {
    name.chars()
        .filter(|c| is_allowed(*c))
        .collect::<String>()
        .trim()
        .to_string()
}

/// Filename-safe slice of a prompt: first 30 allowed chars, trimmed,
/// spaces turned into underscores
pub fn prompt_slug(prompt: &str) -> String {
    prompt
        .chars()
        .filter(|c| is_allowed(*c))
        .take(ARTIFACT_PROMPT_CHARS)
        .collect::<String>()
        .trim()
        .replace(' ', "_")
}
