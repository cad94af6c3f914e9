use super::language::Language;

/// Short system preamble in the detected language
pub fn preamble(language: Language, assistant_name: &str) -> String {
    match language {
        Language::Hi => format!("आप {} हैं।", assistant_name),
        Language::En => format!("You are {}.", assistant_name),
    }
}

/// Strip instruction-template leftovers and surrounding whitespace
pub fn clean_completion(raw: &str) -> String {
    let mut text = raw.trim();
    if let Some(rest) = text.strip_prefix("[/INST]") {
        text = rest.trim_start();
    }
    while let Some(rest) = text.strip_suffix("</s>") {
        text = rest.trim_end();
    }
    text.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preamble() {
        assert_eq!(preamble(Language::En, "Dayna"), "You are Dayna.");
        assert_eq!(preamble(Language::Hi, "Dayna"), "आप Dayna हैं।");
    }

    #[test]
    fn test_clean_completion() {
        assert_eq!(clean_completion("  Hello!\n"), "Hello!");
        assert_eq!(clean_completion("[/INST] Namaste </s>"), "Namaste");
        assert_eq!(clean_completion("ok</s></s>"), "ok");
        assert_eq!(clean_completion("   "), "");
    }
}
