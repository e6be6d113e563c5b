use crate::text_map::{SelectionRange, Token, tokenize};

/// All tokens of the displayed document, indexed for offset lookups
#[derive(Debug, Default, Clone)]
pub struct TokenMap {
    tokens: Vec<Token>,
    /// Total length of the document in characters
    char_len: usize,
}

impl TokenMap {
    /// Tokenize the document text
    pub fn from_text(text: &str) -> Self {
        let tokens = tokenize(text);
        let char_len = tokens.last().map(|t| t.char_end).unwrap_or(0);
        Self { tokens, char_len }
    }

    pub fn get(&self, index: usize) -> Option<&Token> {
        self.tokens.get(index)
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    /// Token containing the character at `offset`
    pub fn token_at_char(&self, offset: usize) -> Option<usize> {
        if offset >= self.char_len {
            return None;
        }
        // First token starting after offset, minus one
        let idx = self.tokens.partition_point(|t| t.char_start <= offset);
        let token = self.tokens.get(idx.checked_sub(1)?)?;
        Some(token.index)
    }

    /// Token a selection ending at `offset` (exclusive) ends in.
    /// An end sitting exactly on a boundary belongs to the token before it.
    pub fn token_ending_at(&self, offset: usize) -> Option<usize> {
        if offset == 0 || offset > self.char_len {
            return None;
        }
        self.token_at_char(offset - 1)
    }

    /// Concatenated text of the tokens in the inclusive range
    pub fn text_in_range(&self, range: SelectionRange) -> String {
        if range.start_index >= self.tokens.len() {
            return String::new();
        }
        let end = range.end_index.min(self.tokens.len() - 1);
        self.tokens[range.start_index..=end]
            .iter()
            .map(|t| t.text.as_str())
            .collect()
    }

    /// Character span `[start, end)` covered by the inclusive token range
    pub fn char_span(&self, range: SelectionRange) -> Option<(usize, usize)> {
        let first = self.tokens.get(range.start_index)?;
        let last = self.tokens.get(range.end_index)?;
        Some((first.char_start, last.char_end))
    }

    /// Document text between two character offsets (`start` inclusive, `end` exclusive)
    pub fn slice_chars(&self, start: usize, end: usize) -> String {
        let end = end.min(self.char_len);
        if start >= end {
            return String::new();
        }
        let first = match self.token_at_char(start) {
            Some(i) => i,
            None => return String::new(),
        };

        let mut out = String::new();
        for token in &self.tokens[first..] {
            if token.char_start >= end {
                break;
            }
            let from = start.saturating_sub(token.char_start);
            let to = end.min(token.char_end) - token.char_start;
            out.extend(token.text.chars().skip(from).take(to - from));
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> TokenMap {
        // tokens: 0 "The" 1 " " 2 "quick," 3 " " 4 "brown" 5 "  " 6 "fox."
        TokenMap::from_text("The quick, brown  fox.")
    }

    #[test]
    fn test_token_at_char() {
        let map = sample();
        assert_eq!(map.token_at_char(0), Some(0));
        assert_eq!(map.token_at_char(2), Some(0));
        assert_eq!(map.token_at_char(3), Some(1));
        assert_eq!(map.token_at_char(4), Some(2));
        assert_eq!(map.token_at_char(17), Some(5));
        assert_eq!(map.token_at_char(21), Some(6));
        assert_eq!(map.token_at_char(22), None);
    }

    #[test]
    fn test_token_ending_at_boundary_belongs_to_previous() {
        let map = sample();
        assert_eq!(map.token_ending_at(3), Some(0));
        assert_eq!(map.token_ending_at(10), Some(2));
        assert_eq!(map.token_ending_at(22), Some(6));
        assert_eq!(map.token_ending_at(0), None);
    }

    #[test]
    fn test_text_in_range_includes_interior_whitespace() {
        let map = sample();
        assert_eq!(
            map.text_in_range(SelectionRange::between(2, 4)),
            "quick, brown"
        );
        assert_eq!(
            map.text_in_range(SelectionRange::between(4, 6)),
            "brown  fox."
        );
    }

    #[test]
    fn test_slice_chars_across_tokens() {
        let map = sample();
        assert_eq!(map.slice_chars(1, 7), "he qui");
        assert_eq!(map.slice_chars(4, 10), "quick,");
        assert_eq!(map.slice_chars(5, 5), "");
        assert_eq!(map.slice_chars(18, 100), "fox.");
    }

    #[test]
    fn test_char_span() {
        let map = sample();
        assert_eq!(map.char_span(SelectionRange::between(2, 4)), Some((4, 16)));
        assert_eq!(map.char_span(SelectionRange::between(2, 40)), None);
    }

    #[test]
    fn test_empty_document() {
        let map = TokenMap::from_text("");
        assert_eq!(map.len(), 0);
        assert_eq!(map.token_at_char(0), None);
        assert_eq!(map.text_in_range(SelectionRange::between(0, 0)), "");
    }
}
