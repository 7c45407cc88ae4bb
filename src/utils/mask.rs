const VISIBLE_PREFIX: usize = 4;

/// Shortens a credential to something safe to put in a log line.
pub fn mask_token(token: &str) -> String {
    let token = sanitize(token);
    if token.chars().count() <= VISIBLE_PREFIX {
        return "…".to_string();
    }
    let prefix: String = token.chars().take(VISIBLE_PREFIX).collect();
    format!("{}…", prefix)
}

fn sanitize(s: &str) -> String {
    s.chars().filter(|c| !c.is_control()).collect()
}

#[cfg(test)]
mod tests {
    use super::mask_token;

    #[test]
    fn test_mask_keeps_prefix_only() {
        assert_eq!(mask_token("abcdefgh"), "abcd…");
    }

    #[test]
    fn test_short_tokens_are_fully_hidden() {
        assert_eq!(mask_token("abc"), "…");
        assert_eq!(mask_token(""), "…");
    }

    #[test]
    fn test_control_characters_are_stripped() {
        assert_eq!(mask_token("a\nb\tcdef"), "abcd…");
    }
}
