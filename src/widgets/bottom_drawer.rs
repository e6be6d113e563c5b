use glib::subclass::Signal;
use gtk::glib;
use gtk::graphene;
use gtk::prelude::*;
use gtk::subclass::prelude::*;
use gtk::{Box, Button, GestureClick, GestureDrag, Orientation, PolicyType, ScrolledWindow};
use std::cell::Cell;
use std::sync::OnceLock;

use crate::reader::{DragAnchor, Snap};
use crate::widgets::DefinitionPanel;

/// Share of the available height for each resting position
const HALF_FRACTION: f64 = 0.5;
const FULL_FRACTION: f64 = 0.9;
const HANDLE_HEIGHT: i32 = 28;

mod imp {
    use super::*;

    pub struct BottomDrawer {
        pub handle: Box,
        pub close_button: Button,
        pub panel: DefinitionPanel,
        pub drag_anchor: Cell<Option<DragAnchor>>,
    }

    impl Default for BottomDrawer {
        fn default() -> Self {
            Self {
                handle: Box::new(Orientation::Horizontal, 0),
                close_button: Button::new(),
                panel: DefinitionPanel::new(),
                drag_anchor: Cell::new(None),
            }
        }
    }

    #[glib::object_subclass]
    impl ObjectSubclass for BottomDrawer {
        const NAME: &'static str = "PaperlightBottomDrawer";
        type Type = super::BottomDrawer;
        type ParentType = Box;
    }

    impl ObjectImpl for BottomDrawer {
        fn constructed(&self) {
            self.parent_constructed();
            self.obj().setup_widgets();
        }

        fn signals() -> &'static [Signal] {
            static SIGNALS: OnceLock<Vec<Signal>> = OnceLock::new();
            SIGNALS.get_or_init(|| {
                vec![
                    Signal::builder("handle-tapped").build(),
                    Signal::builder("drag-started").build(),
                    Signal::builder("drag-moved")
                        .param_types([f64::static_type()])
                        .build(),
                    Signal::builder("drag-released").build(),
                    Signal::builder("drag-cancelled").build(),
                    Signal::builder("close-requested").build(),
                ]
            })
        }
    }

    impl WidgetImpl for BottomDrawer {}
    impl BoxImpl for BottomDrawer {}
}

glib::wrapper! {
    /// Bottom sheet for compact windows. Reports handle taps, drags and close
    /// requests as signals; the window decides where it rests.
    pub struct BottomDrawer(ObjectSubclass<imp::BottomDrawer>)
        @extends Box, gtk::Widget,
        @implements gtk::Accessible, gtk::Buildable, gtk::ConstraintTarget, gtk::Orientable;
}

impl BottomDrawer {
    pub fn new() -> Self {
        glib::Object::builder().build()
    }

    fn setup_widgets(&self) {
        let imp = self.imp();

        self.set_orientation(Orientation::Vertical);
        self.set_valign(gtk::Align::End);
        self.set_hexpand(true);
        self.add_css_class("bottom-drawer");

        // Handle row: grab area plus close button
        imp.handle.set_height_request(HANDLE_HEIGHT);
        imp.handle.set_hexpand(true);
        imp.handle.add_css_class("drawer-handle");

        let grip = Box::builder()
            .width_request(48)
            .height_request(5)
            .halign(gtk::Align::Center)
            .valign(gtk::Align::Center)
            .hexpand(true)
            .css_classes(["drawer-grip"])
            .build();
        imp.handle.append(&grip);

        imp.close_button.set_icon_name("window-close-symbolic");
        imp.close_button.set_valign(gtk::Align::Center);
        imp.close_button.add_css_class("flat");
        imp.handle.append(&imp.close_button);

        self.append(&imp.handle);

        let scroller = ScrolledWindow::builder()
            .hscrollbar_policy(PolicyType::Never)
            .vscrollbar_policy(PolicyType::Automatic)
            .vexpand(true)
            .child(&imp.panel)
            .build();
        self.append(&scroller);

        self.setup_handle_gestures();

        let drawer_weak = self.downgrade();
        imp.close_button.connect_clicked(move |_| {
            if let Some(drawer) = drawer_weak.upgrade() {
                drawer.emit_by_name::<()>("close-requested", &[]);
            }
        });
    }

    /// Pointer and touch drive the same drag gesture
    fn setup_handle_gestures(&self) {
        let imp = self.imp();

        let drag = GestureDrag::new();
        let drawer_weak = self.downgrade();
        drag.connect_drag_begin(move |_, _, start_y| {
            if let Some(drawer) = drawer_weak.upgrade() {
                let anchor = drawer
                    .handle_top()
                    .map(|top| DragAnchor::new(top, start_y));
                drawer.imp().drag_anchor.set(anchor);
                drawer.emit_by_name::<()>("drag-started", &[]);
            }
        });

        let drawer_weak = self.downgrade();
        drag.connect_drag_update(move |gesture, _, offset_y| {
            if let Some(drawer) = drawer_weak.upgrade() {
                let delta = drawer.drag_delta(gesture, offset_y);
                drawer.emit_by_name::<()>("drag-moved", &[&delta]);
            }
        });

        let drawer_weak = self.downgrade();
        drag.connect_drag_end(move |gesture, _, offset_y| {
            if let Some(drawer) = drawer_weak.upgrade() {
                let delta = drawer.drag_delta(gesture, offset_y);
                drawer.imp().drag_anchor.set(None);
                drawer.emit_by_name::<()>("drag-moved", &[&delta]);
                drawer.emit_by_name::<()>("drag-released", &[]);
            }
        });

        let drawer_weak = self.downgrade();
        drag.connect_cancel(move |_, _| {
            if let Some(drawer) = drawer_weak.upgrade() {
                drawer.imp().drag_anchor.set(None);
                drawer.emit_by_name::<()>("drag-cancelled", &[]);
            }
        });
        imp.handle.add_controller(drag);

        // A drag past the threshold cancels the click, so this only sees taps
        let tap = GestureClick::new();
        let drawer_weak = self.downgrade();
        tap.connect_released(move |_, n_press, _, _| {
            if n_press == 1
                && let Some(drawer) = drawer_weak.upgrade()
            {
                drawer.emit_by_name::<()>("handle-tapped", &[]);
            }
        });
        imp.handle.add_controller(tap);
    }

    /// Top edge of the handle in window coordinates
    fn handle_top(&self) -> Option<f64> {
        let root = self.root()?;
        let origin = graphene::Point::new(0.0, 0.0);
        let top = self.imp().handle.compute_point(&root, &origin)?;
        Some(f64::from(top.y()))
    }

    /// Finger travel since the drag began. GTK reports `offset_y` relative to
    /// the handle, which moves as the drawer resizes under the finger.
    fn drag_delta(&self, gesture: &GestureDrag, offset_y: f64) -> f64 {
        let anchor = self.imp().drag_anchor.get();
        let start = gesture.start_point();
        match (anchor, start, self.handle_top()) {
            (Some(anchor), Some((_, start_y)), Some(top)) => {
                f64::from(anchor.delta(top, start_y + offset_y))
            }
            _ => offset_y,
        }
    }

    pub fn panel(&self) -> &DefinitionPanel {
        &self.imp().panel
    }

    /// Size the drawer for its resting position, shifted by a live drag offset
    /// (negative grows it)
    pub fn apply_layout(&self, snap: Snap, offset: i32, available_height: i32) {
        let fraction = match snap {
            Snap::Half => HALF_FRACTION,
            Snap::Full => FULL_FRACTION,
        };
        let base = (available_height as f64 * fraction) as i32;
        let height = (base - offset).clamp(HANDLE_HEIGHT, available_height.max(HANDLE_HEIGHT));
        self.set_height_request(height);
    }
}

impl Default for BottomDrawer {
    fn default() -> Self {
        Self::new()
    }
}
