pub mod drawer;

pub use drawer::{DragAnchor, DrawerPosition, DrawerState, Snap};

use crate::error::LookupError;
use crate::lookup::{DefinitionFetcher, DefinitionQuery, QueryTicket};

/// Layout the reader is currently shown in
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FormFactor {
    /// Side panel next to the text
    #[default]
    Desktop,
    /// Bottom drawer over the text
    Compact,
}

impl FormFactor {
    pub fn for_width(width: i32, compact_breakpoint: i32) -> Self {
        if width < compact_breakpoint {
            FormFactor::Compact
        } else {
            FormFactor::Desktop
        }
    }
}

/// Interaction state of one open reader: what was selected, the live lookup
/// and the drawer. Only changed through the methods below.
#[derive(Debug, Default)]
pub struct ReaderSession {
    selection: Option<String>,
    fetcher: DefinitionFetcher,
    drawer: DrawerState,
    form_factor: FormFactor,
    /// Sequence number of the newest document load
    load_seq: u64,
}

impl ReaderSession {
    /// A selection path produced text: remember it, start its lookup and
    /// bring up the drawer where there is one.
    pub fn selection_resolved(&mut self, text: &str) -> Option<QueryTicket> {
        let ticket = self.fetcher.begin(text)?;
        self.selection = Some(ticket.text.clone());
        if self.form_factor == FormFactor::Compact {
            self.drawer.open_half();
        }
        Some(ticket)
    }

    /// Report a finished lookup. False if it was superseded.
    pub fn complete(&mut self, seq: u64, outcome: Result<Option<String>, LookupError>) -> bool {
        self.fetcher.complete(seq, outcome)
    }

    pub fn selected_text(&self) -> Option<&str> {
        self.selection.as_deref()
    }

    pub fn live_query(&self) -> Option<&DefinitionQuery> {
        self.fetcher.live()
    }

    /// Anything to show in the panel or drawer
    pub fn has_content(&self) -> bool {
        self.selection.is_some() || self.fetcher.live().is_some()
    }

    pub fn form_factor(&self) -> FormFactor {
        self.form_factor
    }

    /// Returns true if the layout changed
    pub fn set_form_factor(&mut self, form_factor: FormFactor) -> bool {
        let changed = self.form_factor != form_factor;
        self.form_factor = form_factor;
        changed
    }

    pub fn drawer(&self) -> &DrawerState {
        &self.drawer
    }

    pub fn side_panel_visible(&self) -> bool {
        self.form_factor == FormFactor::Desktop && self.has_content()
    }

    pub fn drawer_visible(&self) -> bool {
        self.form_factor == FormFactor::Compact && self.has_content() && self.drawer.is_open()
    }

    /// The floating button that brings the drawer back
    pub fn open_affordance_visible(&self) -> bool {
        self.form_factor == FormFactor::Compact && self.has_content() && !self.drawer.is_open()
    }

    /// Floating button tapped. Does nothing without content.
    pub fn open_drawer(&mut self) -> bool {
        if !self.has_content() {
            return false;
        }
        self.drawer.open_half();
        true
    }

    /// Close button or backdrop
    pub fn close_drawer(&mut self) {
        self.drawer.close();
    }

    pub fn toggle_drawer_snap(&mut self) {
        self.drawer.toggle_snap();
    }

    pub fn begin_drawer_drag(&mut self) {
        self.drawer.begin_drag();
    }

    pub fn drag_drawer(&mut self, delta: i32) {
        self.drawer.drag_to(delta);
    }

    pub fn end_drawer_drag(&mut self) -> DrawerPosition {
        self.drawer.end_drag()
    }

    pub fn cancel_drawer_drag(&mut self) {
        self.drawer.cancel_drag();
    }

    /// A new document is shown: nothing selected, nothing to look up
    pub fn reset(&mut self) {
        self.selection = None;
        self.fetcher.clear();
        self.drawer.close();
    }

    /// A document load starts. Loads still in flight become stale.
    pub fn begin_load(&mut self) -> u64 {
        self.load_seq += 1;
        self.reset();
        self.load_seq
    }

    /// False once a newer load has started
    pub fn is_current_load(&self, seq: u64) -> bool {
        seq == self.load_seq
    }
}
