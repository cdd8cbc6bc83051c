//! Stage 22: residual cleanup. Strips filler words; whatever
//! is left is what triggers LLM fallback.

const FILLER_WORDS: &[&str] = &[
    "the", "a", "an", "that", "which", "with", "cards", "released", "printed", "utility",
    "synergy", "token", "opponent", "please", "show", "me", "find", "some", "any",
];

pub fn cleanup_residual(remaining: &mut String) {
    for word in FILLER_WORDS {
        let padded_word = format!(" {word} ");
        loop {
            let padded_text = format!(" {remaining} ");
            if !padded_text.contains(padded_word.as_str()) {
                break;
            }
            *remaining = padded_text.replacen(padded_word.as_str(), " ", 1).trim().to_string();
        }
    }
    *remaining = remaining.split_whitespace().collect::<Vec<_>>().join(" ");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_filler_words() {
        let mut remaining = "the cards that are utility".to_string();
        cleanup_residual(&mut remaining);
        assert_eq!(remaining, "are");
    }

    #[test]
    fn empty_after_cleanup_stays_empty() {
        let mut remaining = "the a an".to_string();
        cleanup_residual(&mut remaining);
        assert_eq!(remaining, "");
    }
}
