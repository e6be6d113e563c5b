use gtk::glib;
use gtk::prelude::*;
use gtk::subclass::prelude::*;
use gtk::{Button, HeaderBar, Label, LinkButton};

mod imp {
    use super::*;

    pub struct ReaderHeaderBar {
        pub header_bar: HeaderBar,
        pub title: Label,
        pub open_button: Button,
        pub pdf_link: LinkButton,
    }

    impl Default for ReaderHeaderBar {
        fn default() -> Self {
            Self {
                header_bar: HeaderBar::new(),
                title: Label::new(Some("Paperlight")),
                open_button: Button::new(),
                pdf_link: LinkButton::new(""),
            }
        }
    }

    #[glib::object_subclass]
    impl ObjectSubclass for ReaderHeaderBar {
        const NAME: &'static str = "PaperlightHeaderBar";
        type Type = super::ReaderHeaderBar;
        type ParentType = glib::Object;
    }

    impl ObjectImpl for ReaderHeaderBar {
        fn constructed(&self) {
            self.parent_constructed();
            self.obj().setup_widgets();
        }
    }
}

glib::wrapper! {
    pub struct ReaderHeaderBar(ObjectSubclass<imp::ReaderHeaderBar>);
}

impl ReaderHeaderBar {
    pub fn new() -> Self {
        glib::Object::builder().build()
    }

    fn setup_widgets(&self) {
        let imp = self.imp();

        imp.title.add_css_class("title");
        imp.header_bar.set_title_widget(Some(&imp.title));
        imp.header_bar.set_show_title_buttons(true);

        imp.open_button.set_label("Open");
        imp.open_button.set_tooltip_text(Some("Open a paper from disk"));
        imp.header_bar.pack_start(&imp.open_button);

        // Only shown when the paper source knows the PDF
        imp.pdf_link.set_label("Open PDF");
        imp.pdf_link.set_visible(false);
        imp.header_bar.pack_end(&imp.pdf_link);
    }

    /// Returns the HeaderBar widget to be used with set_titlebar()
    pub fn widget(&self) -> &HeaderBar {
        &self.imp().header_bar
    }

    pub fn open_button(&self) -> &Button {
        &self.imp().open_button
    }

    pub fn set_title(&self, title: &str) {
        self.imp().title.set_text(title);
    }

    pub fn set_pdf_link(&self, link: Option<&str>) {
        let pdf_link = &self.imp().pdf_link;
        match link {
            Some(uri) => {
                pdf_link.set_uri(uri);
                pdf_link.set_visible(true);
            }
            None => pdf_link.set_visible(false),
        }
    }
}

impl Default for ReaderHeaderBar {
    fn default() -> Self {
        Self::new()
    }
}
