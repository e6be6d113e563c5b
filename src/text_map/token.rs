/// A word or a whitespace run of the displayed document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    /// Position in the token sequence
    pub index: usize,
    pub text: String,
    pub is_whitespace: bool,
    /// Start character index in the document text
    pub char_start: usize,
    /// End character index (exclusive) in the document text
    pub char_end: usize,
}

impl Token {
    pub fn new(index: usize, text: String, is_whitespace: bool, char_start: usize) -> Self {
        let char_end = char_start + text.chars().count();
        Self {
            index,
            text,
            is_whitespace,
            char_start,
            char_end,
        }
    }
}

/// Inclusive range of token indices, `start_index <= end_index`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectionRange {
    pub start_index: usize,
    pub end_index: usize,
}

impl SelectionRange {
    /// Build a range from two anchors in either order
    pub fn between(a: usize, b: usize) -> Self {
        Self {
            start_index: a.min(b),
            end_index: a.max(b),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_char_bounds_count_chars_not_bytes() {
        let token = Token::new(3, "naïve".to_string(), false, 10);
        assert_eq!(token.char_start, 10);
        assert_eq!(token.char_end, 15);
    }

    #[test]
    fn test_range_normalizes_anchor_order() {
        assert_eq!(SelectionRange::between(5, 2), SelectionRange::between(2, 5));
        let range = SelectionRange::between(5, 2);
        assert_eq!(range.start_index, 2);
        assert_eq!(range.end_index, 5);
    }
}
