//! Text helpers shared by the classification and naming passes

/// Collapse runs of whitespace (including newlines from pretty-printed
/// markup) into single spaces and trim the ends.
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Whether a text fragment looks like a section caption: short, non-empty,
/// and not colon-terminated. Colon-terminated fragments are field labels and
/// are captured as Label controls instead.
pub fn is_caption_shaped(text: &str, max_len: usize) -> bool {
    let trimmed = text.trim();
    !trimmed.is_empty() && trimmed.len() <= max_len && !trimmed.ends_with(':')
}

/// Reduce arbitrary text to an identifier-safe name: alphanumerics kept,
/// runs of anything else become single underscores, leading digits prefixed.
pub fn sanitize_identifier(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut last_was_sep = true;
    for ch in text.trim().chars() {
        if ch.is_ascii_alphanumeric() {
            out.push(ch);
            last_was_sep = false;
        } else if !last_was_sep {
            out.push('_');
            last_was_sep = true;
        }
    }
    while out.ends_with('_') {
        out.pop();
    }
    if out.chars().next().is_some_and(|c| c.is_ascii_digit()) {
        out.insert(0, '_');
    }
    out
}

/// Capitalize the first ASCII letter of a name segment.
pub fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collapse_whitespace() {
        assert_eq!(collapse_whitespace("  a \n\t b  "), "a b");
        assert_eq!(collapse_whitespace(""), "");
    }

    #[test]
    fn test_caption_shape() {
        assert!(is_caption_shaped("Trip Details", 40));
        assert!(!is_caption_shaped("First Name:", 40));
        assert!(!is_caption_shaped("", 40));
        assert!(!is_caption_shaped(&"x".repeat(41), 40));
    }

    #[test]
    fn test_sanitize_identifier() {
        assert_eq!(sanitize_identifier("Trip Details"), "Trip_Details");
        assert_eq!(sanitize_identifier("  a--b  "), "a_b");
        assert_eq!(sanitize_identifier("2nd Line"), "_2nd_Line");
        assert_eq!(sanitize_identifier("trailing! "), "trailing");
    }

    #[test]
    fn test_capitalize() {
        assert_eq!(capitalize("item"), "Item");
        assert_eq!(capitalize(""), "");
    }
}
