//! Prompt text for the grounded assistant.

/// Opens every prompt; the grounding context follows directly
pub const PREAMBLE: &str =
    "You are an expert Brawl Stars assistant. These are all the available brawlers: ";

/// Closes every prompt
pub const CLOSING: &str = "Answer clearly and concisely. \
If the question is about brawlers for a specific map, consider:
- The game mode (Gem Grab, Brawl Ball, Bounty, etc.)
- The brawler classes (Tank, Damage Dealer, Support, etc.)
- General strategy

Give specific recommendations that name brawlers.";

/// Canned questions offered alongside free-text input
pub const PRESETS: [&str; 3] = [
    "Which brawlers should I use in Hot Zone?",
    "Who is the best brawler for Brawl Ball?",
    "Which tanks are good for Gem Grab?",
];

/// Full prompt: preamble, grounding context, question, closing instruction
pub fn compose(context: &str, question: &str) -> String {
    format!("{PREAMBLE}{context}.\n\nUser question: {question}\n\n{CLOSING}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compose_order() {
        let prompt = compose("Shelly (Category: Fighter)", "Who tanks best?");
        assert!(prompt.starts_with(PREAMBLE));
        assert!(prompt.ends_with(CLOSING));

        let context_at = prompt.find("Shelly (Category: Fighter).").unwrap();
        let question_at = prompt.find("User question: Who tanks best?").unwrap();
        assert!(context_at < question_at);
    }

    #[test]
    fn test_closing_asks_for_named_entries() {
        assert!(CLOSING.contains("concisely"));
        assert!(CLOSING.contains("name brawlers"));
    }

    #[test]
    fn test_presets_non_empty() {
        for preset in PRESETS {
            assert!(preset.ends_with('?'), "Preset '{}' should be a question", preset);
        }
    }
}
