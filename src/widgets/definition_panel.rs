use gtk::glib;
use gtk::prelude::*;
use gtk::subclass::prelude::*;
use gtk::{Box, Label, Orientation, Separator, Spinner};

use crate::lookup::{DefinitionQuery, QueryStatus};

const PANEL_WIDTH: i32 = 320;

mod imp {
    use super::*;

    pub struct DefinitionPanel {
        pub selected_section: Box,
        pub selected_label: Label,
        pub result_section: Box,
        pub result_heading: Label,
        pub spinner: Spinner,
        pub result_label: Label,
    }

    impl Default for DefinitionPanel {
        fn default() -> Self {
            Self {
                selected_section: Box::new(Orientation::Vertical, 8),
                selected_label: Label::new(None),
                result_section: Box::new(Orientation::Vertical, 8),
                result_heading: Label::new(None),
                spinner: Spinner::new(),
                result_label: Label::new(None),
            }
        }
    }

    #[glib::object_subclass]
    impl ObjectSubclass for DefinitionPanel {
        const NAME: &'static str = "PaperlightDefinitionPanel";
        type Type = super::DefinitionPanel;
        type ParentType = Box;
    }

    impl ObjectImpl for DefinitionPanel {
        fn constructed(&self) {
            self.parent_constructed();
            self.obj().setup_widgets();
        }
    }

    impl WidgetImpl for DefinitionPanel {}
    impl BoxImpl for DefinitionPanel {}
}

glib::wrapper! {
    /// Shows the current selection and what the backend said about it.
    /// Used both as the desktop side panel and inside the bottom drawer.
    pub struct DefinitionPanel(ObjectSubclass<imp::DefinitionPanel>)
        @extends Box, gtk::Widget,
        @implements gtk::Accessible, gtk::Buildable, gtk::ConstraintTarget, gtk::Orientable;
}

impl DefinitionPanel {
    pub fn new() -> Self {
        glib::Object::builder().build()
    }

    fn setup_widgets(&self) {
        let imp = self.imp();

        self.set_orientation(Orientation::Vertical);
        self.set_spacing(16);
        self.set_margin_start(16);
        self.set_margin_end(16);
        self.set_margin_top(16);
        self.set_margin_bottom(16);
        self.set_width_request(PANEL_WIDTH);
        self.add_css_class("definition-panel");

        let selected_heading = Label::builder()
            .label("You Selected:")
            .xalign(0.0)
            .css_classes(["heading"])
            .build();

        imp.selected_label.set_wrap(true);
        imp.selected_label.set_xalign(0.0);
        imp.selected_label.set_selectable(true);
        imp.selected_label.add_css_class("selected-text");

        imp.selected_section.append(&selected_heading);
        imp.selected_section.append(&imp.selected_label);
        imp.selected_section.set_visible(false);
        self.append(&imp.selected_section);

        let separator = Separator::new(Orientation::Horizontal);
        imp.result_section.append(&separator);

        imp.result_heading.set_xalign(0.0);
        imp.result_heading.add_css_class("heading");
        imp.result_section.append(&imp.result_heading);

        imp.spinner.set_halign(gtk::Align::Center);
        imp.spinner.set_size_request(48, 48);
        imp.spinner.set_visible(false);
        imp.result_section.append(&imp.spinner);

        imp.result_label.set_wrap(true);
        imp.result_label.set_xalign(0.0);
        imp.result_label.set_yalign(0.0);
        imp.result_label.set_selectable(true);
        imp.result_label.add_css_class("definition-text");
        imp.result_section.append(&imp.result_label);

        imp.result_section.set_visible(false);
        self.append(&imp.result_section);
    }

    /// Redraw from the reader state
    pub fn show_state(&self, selected: Option<&str>, query: Option<&DefinitionQuery>) {
        let imp = self.imp();

        match selected {
            Some(text) => {
                imp.selected_label.set_text(&format!("\u{201c}{text}\u{201d}"));
                imp.selected_section.set_visible(true);
            }
            None => {
                imp.selected_label.set_text("");
                imp.selected_section.set_visible(false);
            }
        }

        let Some(query) = query else {
            imp.result_section.set_visible(false);
            self.set_loading(false);
            return;
        };

        imp.result_section.set_visible(true);
        match query.status {
            QueryStatus::Pending => {
                imp.result_heading.set_text("Analyzing Text...");
                imp.result_label.set_text("");
                imp.result_label.remove_css_class("error");
                self.set_loading(true);
            }
            QueryStatus::Resolved => {
                imp.result_heading.set_text("Definition:");
                imp.result_label
                    .set_text(query.result_text.as_deref().unwrap_or_default());
                imp.result_label.remove_css_class("error");
                self.set_loading(false);
            }
            QueryStatus::Failed => {
                imp.result_heading.set_text("Definition:");
                imp.result_label
                    .set_text(query.result_text.as_deref().unwrap_or_default());
                imp.result_label.add_css_class("error");
                self.set_loading(false);
            }
        }
    }

    fn set_loading(&self, loading: bool) {
        let imp = self.imp();
        imp.spinner.set_visible(loading);
        imp.result_label.set_visible(!loading);
        if loading {
            imp.spinner.start();
        } else {
            imp.spinner.stop();
        }
    }
}

impl Default for DefinitionPanel {
    fn default() -> Self {
        Self::new()
    }
}
