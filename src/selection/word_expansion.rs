/// Characters that belong to a word when snapping a selection outward
pub fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Grow `[start, end)` over `chars` until both edges touch a non-word character
/// or the end of the text. Edges already on a boundary stay put.
pub fn expand_to_word_bounds(chars: &[char], start: usize, end: usize) -> (usize, usize) {
    let mut start = start.min(chars.len());
    let mut end = end.clamp(start, chars.len());

    while start > 0 && is_word_char(chars[start - 1]) {
        start -= 1;
    }
    while end < chars.len() && is_word_char(chars[end]) {
        end += 1;
    }

    (start, end)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn expand(text: &str, start: usize, end: usize) -> (usize, usize, String) {
        let chars: Vec<char> = text.chars().collect();
        let (s, e) = expand_to_word_bounds(&chars, start, end);
        (s, e, chars[s..e].iter().collect())
    }

    #[test]
    fn test_is_word_char() {
        assert!(is_word_char('a'));
        assert!(is_word_char('Z'));
        assert!(is_word_char('5'));
        assert!(is_word_char('_'));
        assert!(is_word_char('é'));
        assert!(!is_word_char('\''));
        assert!(!is_word_char('-'));
        assert!(!is_word_char(' '));
        assert!(!is_word_char('.'));
        assert!(!is_word_char(','));
    }

    #[test]
    fn test_partial_selection_snaps_to_whole_word() {
        assert_eq!(expand("transformer", 3, 6).2, "transformer");
        assert_eq!(expand("hello world", 8, 9).2, "world");
        assert_eq!(expand("hello world", 2, 8).2, "hello world");
    }

    #[test]
    fn test_punctuation_adjacent_selection_stops_at_punctuation() {
        // "(attention)," selecting "tent"
        assert_eq!(expand("(attention),", 4, 8), (1, 10, "attention".to_string()));
        assert_eq!(expand("state-of-the-art", 7, 11).2, "of-the");
    }

    #[test]
    fn test_expansion_is_idempotent_on_boundaries() {
        let text = "a (neural) net";
        let chars: Vec<char> = text.chars().collect();
        let once = expand_to_word_bounds(&chars, 4, 8);
        assert_eq!(once, (3, 9));
        assert_eq!(expand_to_word_bounds(&chars, once.0, once.1), once);

        // already on non-word boundaries
        assert_eq!(expand_to_word_bounds(&chars, 2, 10), (2, 10));
    }

    #[test]
    fn test_out_of_range_offsets_are_clamped() {
        assert_eq!(expand("abc", 10, 20), (0, 3, "abc".to_string()));
        assert_eq!(expand("", 0, 0), (0, 0, String::new()));
    }
}
