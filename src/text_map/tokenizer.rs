use crate::text_map::Token;

/// Characters of upstream framing before the document text
const PREFIX_MARKER_LEN: usize = 3;
/// Characters of upstream framing after the document text
const SUFFIX_MARKER_LEN: usize = 4;

/// Split text into alternating word and whitespace-run tokens.
///
/// Every character lands in exactly one token, so joining the token texts in
/// order gives back the input.
pub fn tokenize(text: &str) -> Vec<Token> {
    let mut tokens: Vec<Token> = Vec::new();
    let mut current = String::new();
    let mut current_is_ws = false;
    let mut current_start = 0;

    for (offset, c) in text.chars().enumerate() {
        let is_ws = c.is_whitespace();
        if !current.is_empty() && is_ws != current_is_ws {
            let index = tokens.len();
            tokens.push(Token::new(
                index,
                std::mem::take(&mut current),
                current_is_ws,
                current_start,
            ));
        }
        if current.is_empty() {
            current_is_ws = is_ws;
            current_start = offset;
        }
        current.push(c);
    }

    if !current.is_empty() {
        let index = tokens.len();
        tokens.push(Token::new(index, current, current_is_ws, current_start));
    }

    tokens
}

/// Drop the fixed framing the document source wraps around paper text.
/// Anything too short to carry both markers has no body.
pub fn strip_document_markers(raw: &str) -> String {
    let len = raw.chars().count();
    if len <= PREFIX_MARKER_LEN + SUFFIX_MARKER_LEN {
        return String::new();
    }
    raw.chars()
        .skip(PREFIX_MARKER_LEN)
        .take(len - PREFIX_MARKER_LEN - SUFFIX_MARKER_LEN)
        .collect()
}
