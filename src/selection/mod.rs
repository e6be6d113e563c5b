pub mod engine;
pub mod touch;
pub mod word_expansion;

pub use engine::SelectionEngine;
pub use touch::TouchTracker;
pub use word_expansion::expand_to_word_bounds;

/// Which input path produced a selection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionSource {
    /// Pointer release over a desktop selection
    Mouse,
    /// Custom drag across tokens on a touch screen
    TouchDrag,
    /// The platform's own selection handles (long-press)
    Native,
}

/// The single event every selection path ends in
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionResolved {
    /// Trimmed, never empty
    pub text: String,
    pub source: SelectionSource,
    /// Character span the view should show as selected, when the engine changed it
    pub span: Option<(usize, usize)>,
}

/// Trim a raw selection; empty means there is no selection
pub fn canonicalize(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonicalize() {
        assert_eq!(canonicalize("  attention \n"), Some("attention".to_string()));
        assert_eq!(canonicalize(" \t\n "), None);
        assert_eq!(canonicalize(""), None);
    }
}
