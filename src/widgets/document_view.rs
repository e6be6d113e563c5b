use glib::subclass::Signal;
use gtk::gdk;
use gtk::glib;
use gtk::prelude::*;
use gtk::subclass::prelude::*;
use gtk::{Box, EventControllerLegacy, GestureDrag, Label, Orientation, TextTag, TextView};
use std::cell::{Cell, RefCell};
use std::sync::OnceLock;
use std::time::Duration;

use crate::selection::{SelectionEngine, SelectionResolved};
use crate::text_map::TokenMap;

const HIGHLIGHT_TAG: &str = "token-highlight";
/// Wait for the platform selection handles to settle before reading them
const NATIVE_SELECTION_SETTLE_MS: u64 = 250;
/// Finger travel (px) before a touch drag takes over from the text view
const TOUCH_CLAIM_DISTANCE: f64 = 6.0;

mod imp {
    use super::*;

    pub struct DocumentView {
        pub text_view: TextView,
        pub placeholder: Label,
        pub highlight_tag: TextTag,
        pub engine: RefCell<SelectionEngine>,
        /// Last press came from a touchscreen
        pub touch_input: Cell<bool>,
        pub native_check_pending: Cell<bool>,
    }

    impl Default for DocumentView {
        fn default() -> Self {
            Self {
                text_view: TextView::new(),
                placeholder: Label::new(None),
                highlight_tag: TextTag::builder()
                    .name(HIGHLIGHT_TAG)
                    .background("#bae6fd")
                    .foreground("#0c4a6e")
                    .build(),
                engine: RefCell::new(SelectionEngine::default()),
                touch_input: Cell::new(false),
                native_check_pending: Cell::new(false),
            }
        }
    }

    #[glib::object_subclass]
    impl ObjectSubclass for DocumentView {
        const NAME: &'static str = "PaperlightDocumentView";
        type Type = super::DocumentView;
        type ParentType = Box;
    }

    impl ObjectImpl for DocumentView {
        fn constructed(&self) {
            self.parent_constructed();
            self.obj().setup_widgets();
        }

        fn signals() -> &'static [Signal] {
            static SIGNALS: OnceLock<Vec<Signal>> = OnceLock::new();
            SIGNALS.get_or_init(|| {
                vec![
                    Signal::builder("selection-resolved")
                        .param_types([String::static_type()])
                        .build(),
                ]
            })
        }
    }

    impl WidgetImpl for DocumentView {}
    impl BoxImpl for DocumentView {}
}

glib::wrapper! {
    /// Read-only text of the paper. Every mouse, touch-drag and native
    /// selection ends in one `selection-resolved` signal carrying the trimmed text.
    pub struct DocumentView(ObjectSubclass<imp::DocumentView>)
        @extends Box, gtk::Widget,
        @implements gtk::Accessible, gtk::Buildable, gtk::ConstraintTarget, gtk::Orientable;
}

impl DocumentView {
    pub fn new() -> Self {
        glib::Object::builder().build()
    }

    fn setup_widgets(&self) {
        let imp = self.imp();

        self.set_orientation(Orientation::Vertical);
        self.set_hexpand(true);
        self.set_vexpand(true);

        imp.placeholder.set_text("Open a paper to start reading.");
        imp.placeholder.set_vexpand(true);
        imp.placeholder.set_wrap(true);
        imp.placeholder.add_css_class("dim-label");
        self.append(&imp.placeholder);

        let text_view = &imp.text_view;
        text_view.set_editable(false);
        text_view.set_cursor_visible(false);
        text_view.set_wrap_mode(gtk::WrapMode::WordChar);
        text_view.set_left_margin(32);
        text_view.set_right_margin(32);
        text_view.set_top_margin(24);
        text_view.set_bottom_margin(24);
        text_view.set_pixels_inside_wrap(6);
        text_view.set_vexpand(true);
        text_view.add_css_class("document-text");
        text_view.set_visible(false);
        text_view.buffer().tag_table().add(&imp.highlight_tag);
        self.append(text_view);

        self.setup_pointer_tracking();
        self.setup_touch_drag();
        self.setup_native_selection();
    }

    /// Show a new document. Selection state of the old one is dropped.
    pub fn load_document(&self, text: &str) {
        let imp = self.imp();
        imp.text_view.buffer().set_text(text);
        imp.engine
            .borrow_mut()
            .set_document(TokenMap::from_text(text));
        self.repaint_highlight();

        imp.placeholder.set_visible(false);
        imp.text_view.set_visible(true);
        log::info!(
            "Loaded document: {} tokens",
            imp.engine.borrow().token_map().len()
        );
    }

    /// Replace the document with a status line ("Loading...", errors)
    pub fn show_message(&self, message: &str) {
        let imp = self.imp();
        imp.text_view.buffer().set_text("");
        imp.engine.borrow_mut().set_document(TokenMap::default());
        imp.text_view.set_visible(false);
        imp.placeholder.set_text(message);
        imp.placeholder.set_visible(true);
    }

    /// Mouse protocol: a non-touch press starts a gesture, the release reads
    /// the text view's selection once it has settled.
    fn setup_pointer_tracking(&self) {
        let controller = EventControllerLegacy::new();
        controller.set_propagation_phase(gtk::PropagationPhase::Capture);

        let view_weak = self.downgrade();
        controller.connect_event(move |_, event| {
            if let Some(view) = view_weak.upgrade() {
                view.handle_pointer_event(event);
            }
            glib::Propagation::Proceed
        });

        self.imp().text_view.add_controller(controller);
    }

    fn handle_pointer_event(&self, event: &gdk::Event) {
        let imp = self.imp();
        let from_touch = event.is_pointer_emulated()
            || event
                .device()
                .is_some_and(|d| d.source() == gdk::InputSource::Touchscreen);

        match event.event_type() {
            gdk::EventType::TouchBegin => imp.touch_input.set(true),
            gdk::EventType::ButtonPress if !from_touch => {
                imp.touch_input.set(false);
                imp.engine.borrow_mut().begin_gesture();
            }
            gdk::EventType::ButtonRelease if !from_touch => {
                let primary = event
                    .downcast_ref::<gdk::ButtonEvent>()
                    .is_some_and(|b| b.button() == gdk::BUTTON_PRIMARY);
                if primary {
                    // The text view updates its selection in its own release handler
                    let view_weak = self.downgrade();
                    glib::idle_add_local_once(move || {
                        if let Some(view) = view_weak.upgrade() {
                            view.resolve_mouse_selection();
                        }
                    });
                }
            }
            _ => {}
        }
    }

    fn resolve_mouse_selection(&self) {
        let imp = self.imp();
        let buffer = imp.text_view.buffer();

        let Some((start, end)) = buffer.selection_bounds() else {
            return;
        };

        let resolved = imp
            .engine
            .borrow_mut()
            .mouse_released(start.offset() as usize, end.offset() as usize);

        if let Some(resolved) = resolved {
            if let Some((s, e)) = resolved.span {
                let start = buffer.iter_at_offset(s as i32);
                let end = buffer.iter_at_offset(e as i32);
                buffer.select_range(&start, &end);
            }
            self.repaint_highlight();
            self.emit_resolved(resolved);
        }
    }

    /// Touch protocol: follow the finger across tokens
    fn setup_touch_drag(&self) {
        let drag = GestureDrag::new();
        drag.set_touch_only(true);
        drag.set_propagation_phase(gtk::PropagationPhase::Capture);

        let view_weak = self.downgrade();
        drag.connect_drag_begin(move |_, x, y| {
            if let Some(view) = view_weak.upgrade() {
                let token = view.token_at_point(x, y);
                view.imp().engine.borrow_mut().touch_begin(token);
                view.repaint_highlight();
            }
        });

        let view_weak = self.downgrade();
        drag.connect_drag_update(move |gesture, offset_x, offset_y| {
            let Some(view) = view_weak.upgrade() else {
                return;
            };
            if !view.imp().engine.borrow().is_touch_active() {
                return;
            }
            if offset_x.hypot(offset_y) >= TOUCH_CLAIM_DISTANCE {
                gesture.set_state(gtk::EventSequenceState::Claimed);
            }
            if let Some((start_x, start_y)) = gesture.start_point() {
                let token = view.token_at_point(start_x + offset_x, start_y + offset_y);
                view.imp().engine.borrow_mut().touch_move(token);
                view.repaint_highlight();
            }
        });

        let view_weak = self.downgrade();
        drag.connect_drag_end(move |_, _, _| {
            if let Some(view) = view_weak.upgrade() {
                let resolved = view.imp().engine.borrow_mut().touch_end();
                view.repaint_highlight();
                if let Some(resolved) = resolved {
                    view.emit_resolved(resolved);
                }
            }
        });

        let view_weak = self.downgrade();
        drag.connect_cancel(move |_, _| {
            if let Some(view) = view_weak.upgrade() {
                view.imp().engine.borrow_mut().touch_cancel();
                view.repaint_highlight();
            }
        });

        self.imp().text_view.add_controller(drag);
    }

    /// Native protocol: selections made with the platform's touch handles
    fn setup_native_selection(&self) {
        let buffer = self.imp().text_view.buffer();
        let view_weak = self.downgrade();

        buffer.connect_mark_set(move |_, _, mark| {
            let is_selection_mark = mark
                .name()
                .is_some_and(|name| name == "insert" || name == "selection_bound");
            if !is_selection_mark {
                return;
            }
            if let Some(view) = view_weak.upgrade()
                && view.imp().touch_input.get()
            {
                view.schedule_native_check();
            }
        });
    }

    fn schedule_native_check(&self) {
        let imp = self.imp();
        if imp.native_check_pending.get() {
            return;
        }
        imp.native_check_pending.set(true);

        let view_weak = self.downgrade();
        glib::timeout_add_local_once(
            Duration::from_millis(NATIVE_SELECTION_SETTLE_MS),
            move || {
                if let Some(view) = view_weak.upgrade() {
                    view.imp().native_check_pending.set(false);
                    view.resolve_native_selection();
                }
            },
        );
    }

    fn resolve_native_selection(&self) {
        let imp = self.imp();
        let buffer = imp.text_view.buffer();

        let selected = buffer
            .selection_bounds()
            .map(|(start, end)| buffer.text(&start, &end, false).to_string());

        let resolved = imp
            .engine
            .borrow_mut()
            .native_selection(selected.as_deref());

        if let Some(resolved) = resolved {
            self.emit_resolved(resolved);
        }
    }

    /// Hit-test widget coordinates to the token drawn there
    fn token_at_point(&self, x: f64, y: f64) -> Option<usize> {
        let text_view = &self.imp().text_view;
        let (bx, by) =
            text_view.window_to_buffer_coords(gtk::TextWindowType::Widget, x as i32, y as i32);
        let iter = text_view.iter_at_location(bx, by)?;

        let rect = text_view.iter_location(&iter);
        let inside_x = bx >= rect.x() && bx < rect.x() + rect.width().max(1);
        let inside_y = by >= rect.y() && by < rect.y() + rect.height();
        if !(inside_x && inside_y) {
            return None;
        }

        self.imp()
            .engine
            .borrow()
            .token_map()
            .token_at_char(iter.offset() as usize)
    }

    fn repaint_highlight(&self) {
        let imp = self.imp();
        let buffer = imp.text_view.buffer();
        let (start, end) = buffer.bounds();
        buffer.remove_tag(&imp.highlight_tag, &start, &end);

        let engine = imp.engine.borrow();
        let span = engine
            .highlight()
            .and_then(|range| engine.token_map().char_span(range));

        if let Some((s, e)) = span {
            let start = buffer.iter_at_offset(s as i32);
            let end = buffer.iter_at_offset(e as i32);
            buffer.apply_tag(&imp.highlight_tag, &start, &end);
        }
    }

    fn emit_resolved(&self, resolved: SelectionResolved) {
        log::debug!("Selection from {:?}: {:?}", resolved.source, resolved.text);
        self.emit_by_name::<()>("selection-resolved", &[&resolved.text]);
    }
}

impl Default for DocumentView {
    fn default() -> Self {
        Self::new()
    }
}
