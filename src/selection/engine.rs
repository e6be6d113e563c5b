use crate::selection::{
    SelectionResolved, SelectionSource, TouchTracker, canonicalize, expand_to_word_bounds,
};
use crate::text_map::{SelectionRange, TokenMap};

/// Turns mouse, touch-drag and native selections over one document into
/// `SelectionResolved` events.
///
/// Each press or touch-start opens a gesture. Within a gesture only a change
/// of text is emitted again, so whichever path fires last decides the outcome
/// without the same lookup being raised twice.
#[derive(Debug, Default)]
pub struct SelectionEngine {
    map: TokenMap,
    touch: TouchTracker,
    gesture: u64,
    last_emitted: Option<(u64, String)>,
    /// Token range shown as highlighted after a touch drag
    highlight: Option<SelectionRange>,
}

impl SelectionEngine {
    /// Replace the document; all transient selection state goes with it
    pub fn set_document(&mut self, map: TokenMap) {
        *self = Self {
            map,
            gesture: self.gesture,
            ..Self::default()
        };
    }

    pub fn token_map(&self) -> &TokenMap {
        &self.map
    }

    /// Start a new user gesture
    pub fn begin_gesture(&mut self) -> u64 {
        self.gesture += 1;
        self.gesture
    }

    /// Desktop protocol: the pointer was released over `[start, end)` (char offsets,
    /// either order). Within a single token the selection snaps to whole words,
    /// across tokens the raw text is used.
    pub fn mouse_released(&mut self, start: usize, end: usize) -> Option<SelectionResolved> {
        if start == end {
            return None;
        }
        let (start, end) = (start.min(end), start.max(end));

        let first = self.map.token_at_char(start);
        let last = self.map.token_ending_at(end);

        let (raw, span) = match (first, last) {
            (Some(a), Some(b)) if a == b => {
                let token = self.map.get(a)?;
                if token.is_whitespace {
                    return None;
                }
                let chars: Vec<char> = token.text.chars().collect();
                let (s, e) = expand_to_word_bounds(
                    &chars,
                    start - token.char_start,
                    end - token.char_start,
                );
                let raw: String = chars[s..e].iter().collect();
                (raw, Some((token.char_start + s, token.char_start + e)))
            }
            _ => (self.map.slice_chars(start, end), None),
        };

        let text = canonicalize(&raw)?;
        self.highlight = None;
        self.emit(SelectionResolved {
            text,
            source: SelectionSource::Mouse,
            span,
        })
    }

    /// Touch protocol, finger down on `token`. Returns false if the gesture is ignored.
    pub fn touch_begin(&mut self, token: Option<usize>) -> bool {
        self.begin_gesture();
        let started = self.touch.begin(token);
        if !started {
            self.highlight = None;
        }
        started
    }

    pub fn touch_move(&mut self, token: Option<usize>) {
        self.touch.update(token);
    }

    pub fn touch_end(&mut self) -> Option<SelectionResolved> {
        let (range, text) = self.touch.finish(&self.map)?;
        self.highlight = Some(range);
        let span = self.map.char_span(range);
        self.emit(SelectionResolved {
            text,
            source: SelectionSource::TouchDrag,
            span,
        })
    }

    pub fn touch_cancel(&mut self) {
        self.touch.cancel();
    }

    pub fn is_touch_active(&self) -> bool {
        self.touch.is_active()
    }

    /// Native protocol: the platform selection changed to `text`.
    /// Ignored while a touch drag is running.
    pub fn native_selection(&mut self, text: Option<&str>) -> Option<SelectionResolved> {
        if self.touch.is_active() {
            return None;
        }
        let text = canonicalize(text?)?;
        self.emit(SelectionResolved {
            text,
            source: SelectionSource::Native,
            span: None,
        })
    }

    /// Tokens to paint as selected: the live drag, else the last finished drag
    pub fn highlight(&self) -> Option<SelectionRange> {
        self.touch.range().or(self.highlight)
    }

    fn emit(&mut self, resolved: SelectionResolved) -> Option<SelectionResolved> {
        if let Some((gesture, text)) = &self.last_emitted
            && *gesture == self.gesture
            && *text == resolved.text
        {
            return None;
        }
        self.last_emitted = Some((self.gesture, resolved.text.clone()));
        Some(resolved)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine() -> SelectionEngine {
        // 0 "We" 1 " " 2 "train" 3 " " 4 "(self-attention)" 5 " " 6 "models."
        let mut engine = SelectionEngine::default();
        engine.set_document(TokenMap::from_text("We train (self-attention) models."));
        engine
    }

    #[test]
    fn test_collapsed_mouse_selection_is_noop() {
        let mut engine = engine();
        engine.begin_gesture();
        assert_eq!(engine.mouse_released(4, 4), None);
        assert_eq!(engine.highlight(), None);
    }

    #[test]
    fn test_mouse_selection_inside_token_expands() {
        let mut engine = engine();
        engine.begin_gesture();
        // "ai" of "train"
        let resolved = engine.mouse_released(5, 7).unwrap();
        assert_eq!(resolved.text, "train");
        assert_eq!(resolved.source, SelectionSource::Mouse);
        assert_eq!(resolved.span, Some((3, 8)));
    }

    #[test]
    fn test_mouse_selection_snaps_inside_punctuation() {
        let mut engine = engine();
        engine.begin_gesture();
        // "lf-att" inside "(self-attention)" starting at char 9
        let resolved = engine.mouse_released(12, 18).unwrap();
        assert_eq!(resolved.text, "self-attention");
        assert_eq!(resolved.span, Some((10, 24)));
    }

    #[test]
    fn test_mouse_selection_across_tokens_is_raw() {
        let mut engine = engine();
        engine.begin_gesture();
        // "ain (se" reversed anchors
        let resolved = engine.mouse_released(12, 5).unwrap();
        assert_eq!(resolved.text, "ain (se");
        assert_eq!(resolved.span, None);
    }

    #[test]
    fn test_mouse_selection_of_whitespace_is_noop() {
        let mut engine = engine();
        engine.begin_gesture();
        assert_eq!(engine.mouse_released(2, 3), None);
    }

    #[test]
    fn test_touch_drag_emits_inclusive_range() {
        let mut engine = engine();
        assert!(engine.touch_begin(Some(6)));
        engine.touch_move(Some(4));
        engine.touch_move(Some(2));
        assert_eq!(engine.highlight(), Some(SelectionRange::between(2, 6)));

        let resolved = engine.touch_end().unwrap();
        assert_eq!(resolved.text, "train (self-attention) models.");
        assert_eq!(resolved.source, SelectionSource::TouchDrag);
        assert_eq!(resolved.span, Some((3, 33)));
        assert_eq!(engine.highlight(), Some(SelectionRange::between(2, 6)));
    }

    #[test]
    fn test_touch_start_on_nothing_clears_highlight() {
        let mut engine = engine();
        engine.touch_begin(Some(2));
        engine.touch_end();
        assert!(engine.highlight().is_some());

        assert!(!engine.touch_begin(None));
        assert_eq!(engine.touch_end(), None);
        assert_eq!(engine.highlight(), None);
    }

    #[test]
    fn test_native_selection_ignored_during_touch_drag() {
        let mut engine = engine();
        engine.touch_begin(Some(2));
        assert_eq!(engine.native_selection(Some("train")), None);
        engine.touch_end().unwrap();
    }

    #[test]
    fn test_same_gesture_does_not_emit_same_text_twice() {
        let mut engine = engine();
        engine.touch_begin(Some(2));
        assert!(engine.touch_end().is_some());
        // long-press handles report the same word for the same gesture
        assert_eq!(engine.native_selection(Some(" train ")), None);
        // a different selection within the gesture still wins
        let later = engine.native_selection(Some("train (self")).unwrap();
        assert_eq!(later.source, SelectionSource::Native);
    }

    #[test]
    fn test_reselecting_in_new_gesture_emits_again() {
        let mut engine = engine();
        engine.begin_gesture();
        assert!(engine.mouse_released(3, 8).is_some());
        engine.begin_gesture();
        assert!(engine.mouse_released(3, 8).is_some());
    }

    #[test]
    fn test_empty_native_selection_is_noop() {
        let mut engine = engine();
        engine.begin_gesture();
        assert_eq!(engine.native_selection(None), None);
        assert_eq!(engine.native_selection(Some("   ")), None);
    }

    #[test]
    fn test_set_document_clears_transient_state() {
        let mut engine = engine();
        engine.touch_begin(Some(2));
        engine.set_document(TokenMap::from_text("fresh text"));
        assert!(!engine.is_touch_active());
        assert_eq!(engine.highlight(), None);
        assert_eq!(engine.token_map().len(), 3);
    }
}
