/// Release delta (px, negative is upward) past which the drawer snaps to full height
pub const EXPAND_THRESHOLD: i32 = -50;
/// Release delta (px, positive is downward) past which the drawer steps down
pub const DISMISS_THRESHOLD: i32 = 120;

/// Resting heights of an open drawer
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Snap {
    #[default]
    Half,
    Full,
}

/// Where the drawer rests
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrawerPosition {
    Closed,
    OpenHalf,
    OpenFull,
}

/// Bottom sheet state on compact screens
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DrawerState {
    is_open: bool,
    /// Only meaningful while open
    snap: Snap,
    /// Live vertical offset of a drag in progress
    drag_delta: Option<i32>,
}

impl DrawerState {
    pub fn position(&self) -> DrawerPosition {
        match (self.is_open, self.snap) {
            (false, _) => DrawerPosition::Closed,
            (true, Snap::Half) => DrawerPosition::OpenHalf,
            (true, Snap::Full) => DrawerPosition::OpenFull,
        }
    }

    pub fn is_open(&self) -> bool {
        self.is_open
    }

    pub fn snap(&self) -> Snap {
        self.snap
    }

    pub fn is_dragging(&self) -> bool {
        self.drag_delta.is_some()
    }

    /// Vertical offset to display right now; zero when not dragging
    pub fn offset(&self) -> i32 {
        self.drag_delta.unwrap_or(0)
    }

    /// Open at half height, whatever the previous state
    pub fn open_half(&mut self) {
        self.is_open = true;
        self.snap = Snap::Half;
        self.drag_delta = None;
    }

    pub fn close(&mut self) {
        self.is_open = false;
        self.drag_delta = None;
    }

    /// Handle tap: half and full swap
    pub fn toggle_snap(&mut self) {
        if !self.is_open {
            return;
        }
        self.snap = match self.snap {
            Snap::Half => Snap::Full,
            Snap::Full => Snap::Half,
        };
    }

    /// Start direct manipulation; ignored while closed
    pub fn begin_drag(&mut self) {
        if self.is_open {
            self.drag_delta = Some(0);
        }
    }

    /// Track the pointer's offset from where the drag started
    pub fn drag_to(&mut self, delta: i32) {
        if let Some(current) = self.drag_delta.as_mut() {
            *current = delta;
        }
    }

    /// Release the drag and settle on a resting position
    pub fn end_drag(&mut self) -> DrawerPosition {
        let Some(delta) = self.drag_delta.take() else {
            return self.position();
        };

        if delta < EXPAND_THRESHOLD {
            self.snap = Snap::Full;
        } else if delta > DISMISS_THRESHOLD {
            match self.snap {
                Snap::Full => self.snap = Snap::Half,
                Snap::Half => self.is_open = false,
            }
        }

        self.position()
    }

    /// Abandon the drag without moving
    pub fn cancel_drag(&mut self) {
        self.drag_delta = None;
    }
}

/// Where a drawer drag started, in a frame that stays put while the drawer resizes.
///
/// The handle moves with the finger, so a point measured inside it has to be
/// shifted by the handle's current top before deltas are comparable.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragAnchor {
    start_y: f64,
}

impl DragAnchor {
    /// `handle_top` is the handle's top edge in the fixed frame, `local_y` the
    /// pointer inside the handle
    pub fn new(handle_top: f64, local_y: f64) -> Self {
        Self {
            start_y: handle_top + local_y,
        }
    }

    /// Travel since the start (px, negative is upward)
    pub fn delta(&self, handle_top: f64, local_y: f64) -> i32 {
        (handle_top + local_y - self.start_y).round() as i32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn half_open() -> DrawerState {
        let mut drawer = DrawerState::default();
        drawer.open_half();
        drawer
    }

    fn release(drawer: &mut DrawerState, delta: i32) -> DrawerPosition {
        drawer.begin_drag();
        drawer.drag_to(delta / 2);
        drawer.drag_to(delta);
        drawer.end_drag()
    }

    #[test]
    fn test_starts_closed() {
        let drawer = DrawerState::default();
        assert_eq!(drawer.position(), DrawerPosition::Closed);
        assert!(!drawer.is_dragging());
    }

    #[test]
    fn test_upward_drag_past_threshold_expands() {
        let mut drawer = half_open();
        assert_eq!(release(&mut drawer, -60), DrawerPosition::OpenFull);
    }

    #[test]
    fn test_small_drag_keeps_position() {
        let mut drawer = half_open();
        assert_eq!(release(&mut drawer, 10), DrawerPosition::OpenHalf);
        assert_eq!(release(&mut drawer, -50), DrawerPosition::OpenHalf);
        assert_eq!(release(&mut drawer, 120), DrawerPosition::OpenHalf);
    }

    #[test]
    fn test_downward_drag_steps_down() {
        let mut drawer = half_open();
        drawer.toggle_snap();
        assert_eq!(drawer.position(), DrawerPosition::OpenFull);

        assert_eq!(release(&mut drawer, 130), DrawerPosition::OpenHalf);
        assert_eq!(release(&mut drawer, 130), DrawerPosition::Closed);
    }

    #[test]
    fn test_upward_drag_from_full_stays_full() {
        let mut drawer = half_open();
        drawer.toggle_snap();
        assert_eq!(release(&mut drawer, -200), DrawerPosition::OpenFull);
    }

    #[test]
    fn test_offset_tracks_drag_and_resets_on_release() {
        let mut drawer = half_open();
        drawer.begin_drag();
        assert_eq!(drawer.offset(), 0);
        drawer.drag_to(-35);
        assert_eq!(drawer.offset(), -35);
        assert!(drawer.is_dragging());
        drawer.end_drag();
        assert_eq!(drawer.offset(), 0);
        assert!(!drawer.is_dragging());
    }

    #[test]
    fn test_closed_drawer_ignores_drag_and_toggle() {
        let mut drawer = DrawerState::default();
        drawer.begin_drag();
        drawer.drag_to(-300);
        assert!(!drawer.is_dragging());
        assert_eq!(drawer.end_drag(), DrawerPosition::Closed);

        drawer.toggle_snap();
        assert_eq!(drawer.position(), DrawerPosition::Closed);
    }

    #[test]
    fn test_handle_tap_toggles() {
        let mut drawer = half_open();
        drawer.toggle_snap();
        assert_eq!(drawer.position(), DrawerPosition::OpenFull);
        drawer.toggle_snap();
        assert_eq!(drawer.position(), DrawerPosition::OpenHalf);
    }

    #[test]
    fn test_close_and_reopen_returns_to_half() {
        let mut drawer = half_open();
        drawer.toggle_snap();
        drawer.close();
        assert_eq!(drawer.position(), DrawerPosition::Closed);
        drawer.open_half();
        assert_eq!(drawer.position(), DrawerPosition::OpenHalf);
    }

    #[test]
    fn test_cancelled_drag_keeps_position() {
        let mut drawer = half_open();
        drawer.begin_drag();
        drawer.drag_to(500);
        drawer.cancel_drag();
        assert_eq!(drawer.position(), DrawerPosition::OpenHalf);
        assert_eq!(drawer.offset(), 0);
    }

    /// Feed a drag whose handle follows the finger, the way the bottom drawer
    /// does while it resizes: the point inside the handle never changes.
    fn follow_finger(drawer: &mut DrawerState, travel: i32) -> DrawerPosition {
        let handle_top = 400.0;
        let grip_y = 12.0;
        let anchor = DragAnchor::new(handle_top, grip_y);
        drawer.begin_drag();

        let steps = 6;
        for step in 1..=steps {
            let moved = f64::from(travel) * f64::from(step) / f64::from(steps);
            drawer.drag_to(anchor.delta(handle_top + moved, grip_y));
        }
        drawer.end_drag()
    }

    #[test]
    fn test_anchor_measures_full_travel_of_moving_handle() {
        let anchor = DragAnchor::new(400.0, 12.0);
        assert_eq!(anchor.delta(400.0, 12.0), 0);
        assert_eq!(anchor.delta(340.0, 12.0), -60);
        assert_eq!(anchor.delta(400.0, -48.0), -60);
        assert_eq!(anchor.delta(370.0, -18.0), -60);
    }

    #[test]
    fn test_moving_handle_drag_crosses_thresholds() {
        let mut drawer = half_open();
        assert_eq!(follow_finger(&mut drawer, -60), DrawerPosition::OpenFull);
        assert_eq!(follow_finger(&mut drawer, 130), DrawerPosition::OpenHalf);
        assert_eq!(follow_finger(&mut drawer, 10), DrawerPosition::OpenHalf);
        assert_eq!(follow_finger(&mut drawer, 130), DrawerPosition::Closed);
    }
}
