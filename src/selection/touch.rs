use crate::text_map::{SelectionRange, TokenMap};

/// Running anchors of a touch drag over the tokens
#[derive(Debug, Default, Clone)]
pub struct TouchTracker {
    /// `(start_index, end_index)` as touched, not yet normalized
    anchors: Option<(usize, usize)>,
}

impl TouchTracker {
    /// Start tracking at the touched token. A touch that lands on no token is ignored.
    pub fn begin(&mut self, token: Option<usize>) -> bool {
        self.anchors = token.map(|index| (index, index));
        self.anchors.is_some()
    }

    /// Move the end anchor. Moves over nothing resolvable keep the last good anchor.
    pub fn update(&mut self, token: Option<usize>) {
        if let (Some((_, end)), Some(index)) = (self.anchors.as_mut(), token) {
            *end = index;
        }
    }

    pub fn is_active(&self) -> bool {
        self.anchors.is_some()
    }

    /// Normalized range of the drag so far
    pub fn range(&self) -> Option<SelectionRange> {
        self.anchors
            .map(|(start, end)| SelectionRange::between(start, end))
    }

    /// End the drag and return the trimmed text of the touched tokens
    pub fn finish(&mut self, map: &TokenMap) -> Option<(SelectionRange, String)> {
        let range = self.range()?;
        self.anchors = None;

        let text = map.text_in_range(range).trim().to_string();
        if text.is_empty() {
            None
        } else {
            Some((range, text))
        }
    }

    pub fn cancel(&mut self) {
        self.anchors = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn map() -> TokenMap {
        // 0 "Graph" 1 " " 2 "neural" 3 " " 4 "networks" 5 " " 6 "generalize" 7 "  "
        TokenMap::from_text("Graph neural networks generalize  ")
    }

    #[test]
    fn test_drag_range_is_inclusive_in_both_directions() {
        let map = map();

        let mut forward = TouchTracker::default();
        assert!(forward.begin(Some(2)));
        forward.update(Some(3));
        forward.update(Some(5));
        let (range, text) = forward.finish(&map).unwrap();
        assert_eq!(range, SelectionRange::between(2, 5));
        assert_eq!(text, "neural networks");

        let mut backward = TouchTracker::default();
        assert!(backward.begin(Some(5)));
        backward.update(Some(2));
        assert_eq!(backward.finish(&map).unwrap().1, "neural networks");
    }

    #[test]
    fn test_touch_outside_tokens_is_ignored() {
        let mut tracker = TouchTracker::default();
        assert!(!tracker.begin(None));
        tracker.update(Some(3));
        assert!(!tracker.is_active());
        assert!(tracker.finish(&map()).is_none());
    }

    #[test]
    fn test_unresolvable_moves_keep_last_anchor() {
        let mut tracker = TouchTracker::default();
        tracker.begin(Some(0));
        tracker.update(Some(2));
        tracker.update(None);
        assert_eq!(tracker.range(), Some(SelectionRange::between(0, 2)));
    }

    #[test]
    fn test_whitespace_only_drag_yields_nothing() {
        let mut tracker = TouchTracker::default();
        tracker.begin(Some(7));
        assert!(tracker.finish(&map()).is_none());
        assert!(!tracker.is_active());
    }

    #[test]
    fn test_single_tap_selects_one_token() {
        let mut tracker = TouchTracker::default();
        tracker.begin(Some(6));
        assert_eq!(tracker.finish(&map()).unwrap().1, "generalize");
    }
}
