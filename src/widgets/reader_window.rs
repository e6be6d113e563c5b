use gtk::gio;
use gtk::glib;
use gtk::prelude::*;
use gtk::subclass::prelude::*;
use gtk::{ApplicationWindow, Button, Orientation, Overlay, Paned, PolicyType, ScrolledWindow};
use std::cell::{Cell, RefCell};
use std::path::PathBuf;
use std::sync::mpsc::{self, TryRecvError};
use std::time::Duration;

use crate::config::AppConfig;
use crate::error::{DocumentError, LookupError};
use crate::reader::{FormFactor, ReaderSession};
use crate::services::{self, ExplanationClient, Paper};
use crate::widgets::{BottomDrawer, DefinitionPanel, DocumentView, ReaderHeaderBar};

mod imp {
    use super::*;

    pub struct ReaderWindow {
        pub header_bar: ReaderHeaderBar,
        pub document_view: DocumentView,
        pub side_panel: DefinitionPanel,
        pub side_scroller: ScrolledWindow,
        pub drawer: BottomDrawer,
        pub open_drawer_button: Button,
        pub backdrop: gtk::Box,
        pub session: RefCell<ReaderSession>,
        pub config: RefCell<AppConfig>,
        pub client: RefCell<Option<ExplanationClient>>,
        pub last_size: Cell<(i32, i32)>,
        pub resize_pending: Cell<bool>,
    }

    impl Default for ReaderWindow {
        fn default() -> Self {
            Self {
                header_bar: ReaderHeaderBar::new(),
                document_view: DocumentView::new(),
                side_panel: DefinitionPanel::new(),
                side_scroller: ScrolledWindow::new(),
                drawer: BottomDrawer::new(),
                open_drawer_button: Button::new(),
                backdrop: gtk::Box::new(Orientation::Vertical, 0),
                session: RefCell::new(ReaderSession::default()),
                config: RefCell::new(AppConfig::default()),
                client: RefCell::new(None),
                last_size: Cell::new((0, 0)),
                resize_pending: Cell::new(false),
            }
        }
    }

    #[glib::object_subclass]
    impl ObjectSubclass for ReaderWindow {
        const NAME: &'static str = "PaperlightWindow";
        type Type = super::ReaderWindow;
        type ParentType = ApplicationWindow;
    }

    impl ObjectImpl for ReaderWindow {
        fn constructed(&self) {
            self.parent_constructed();
            self.obj().setup_widgets();
        }
    }

    impl WidgetImpl for ReaderWindow {
        fn size_allocate(&self, width: i32, height: i32, baseline: i32) {
            self.parent_size_allocate(width, height, baseline);

            if self.last_size.get() == (width, height) || self.resize_pending.get() {
                return;
            }
            self.resize_pending.set(true);

            // Widgets can't change visibility in the middle of an allocation
            let window_weak = self.obj().downgrade();
            glib::idle_add_local_once(move || {
                if let Some(window) = window_weak.upgrade() {
                    window.imp().resize_pending.set(false);
                    window.on_resized();
                }
            });
        }
    }

    impl WindowImpl for ReaderWindow {}
    impl ApplicationWindowImpl for ReaderWindow {}
}

glib::wrapper! {
    pub struct ReaderWindow(ObjectSubclass<imp::ReaderWindow>)
        @extends ApplicationWindow, gtk::Window, gtk::Widget,
        @implements gio::ActionGroup, gio::ActionMap, gtk::Accessible, gtk::Buildable,
                    gtk::ConstraintTarget, gtk::Native, gtk::Root, gtk::ShortcutManager;
}

impl ReaderWindow {
    pub fn new(app: &gtk::Application, config: AppConfig) -> Self {
        let window: Self = glib::Object::builder()
            .property("application", app)
            .property("title", "Paperlight")
            .property("default-width", 1100)
            .property("default-height", 760)
            .build();

        window.set_config(config);
        window
    }

    fn set_config(&self, config: AppConfig) {
        let imp = self.imp();
        log::info!("Using backend at {}", config.backend.url);
        imp.client
            .replace(Some(ExplanationClient::new(&config.backend)));
        imp.config.replace(config);
    }

    fn setup_widgets(&self) {
        let imp = self.imp();

        self.set_titlebar(Some(imp.header_bar.widget()));
        self.setup_open_button();

        let document_scroller = ScrolledWindow::builder()
            .hscrollbar_policy(PolicyType::Never)
            .vscrollbar_policy(PolicyType::Automatic)
            .vexpand(true)
            .hexpand(true)
            .child(&imp.document_view)
            .build();

        imp.side_scroller
            .set_hscrollbar_policy(PolicyType::Never);
        imp.side_scroller
            .set_vscrollbar_policy(PolicyType::Automatic);
        imp.side_scroller.set_child(Some(&imp.side_panel));
        imp.side_scroller.add_css_class("side-panel");
        imp.side_scroller.set_visible(false);

        let paned = Paned::builder()
            .orientation(Orientation::Horizontal)
            .build();
        paned.set_wide_handle(true);
        paned.set_start_child(Some(&document_scroller));
        paned.set_end_child(Some(&imp.side_scroller));
        paned.set_resize_start_child(true);
        paned.set_shrink_start_child(false);
        paned.set_resize_end_child(false);
        paned.set_shrink_end_child(false);

        // Compact layout floats over the text
        imp.backdrop.add_css_class("drawer-backdrop");
        imp.backdrop.set_hexpand(true);
        imp.backdrop.set_vexpand(true);
        imp.backdrop.set_visible(false);

        imp.drawer.set_visible(false);

        imp.open_drawer_button.set_label("Show definition");
        imp.open_drawer_button.set_halign(gtk::Align::End);
        imp.open_drawer_button.set_valign(gtk::Align::End);
        imp.open_drawer_button.set_margin_end(16);
        imp.open_drawer_button.set_margin_bottom(16);
        imp.open_drawer_button.add_css_class("suggested-action");
        imp.open_drawer_button.add_css_class("pill");
        imp.open_drawer_button.set_visible(false);

        let overlay = Overlay::new();
        overlay.set_child(Some(&paned));
        overlay.add_overlay(&imp.backdrop);
        overlay.add_overlay(&imp.drawer);
        overlay.add_overlay(&imp.open_drawer_button);

        self.set_child(Some(&overlay));

        self.setup_document_view();
        self.setup_drawer();
        self.render();
    }

    fn setup_open_button(&self) {
        let window_weak = self.downgrade();

        self.imp()
            .header_bar
            .open_button()
            .connect_clicked(move |_| {
                if let Some(window) = window_weak.upgrade() {
                    window.show_open_dialog();
                }
            });
    }

    fn setup_document_view(&self) {
        self.imp().document_view.connect_closure(
            "selection-resolved",
            false,
            glib::closure_local!(
                #[weak(rename_to = window)]
                self,
                move |_view: &DocumentView, text: &str| {
                    window.start_lookup(text);
                }
            ),
        );
    }

    fn setup_drawer(&self) {
        let imp = self.imp();

        imp.drawer.connect_closure(
            "handle-tapped",
            false,
            glib::closure_local!(
                #[weak(rename_to = window)]
                self,
                move |_drawer: &BottomDrawer| {
                    window.imp().session.borrow_mut().toggle_drawer_snap();
                    window.render();
                }
            ),
        );

        imp.drawer.connect_closure(
            "drag-started",
            false,
            glib::closure_local!(
                #[weak(rename_to = window)]
                self,
                move |_drawer: &BottomDrawer| {
                    window.imp().session.borrow_mut().begin_drawer_drag();
                }
            ),
        );

        imp.drawer.connect_closure(
            "drag-moved",
            false,
            glib::closure_local!(
                #[weak(rename_to = window)]
                self,
                move |_drawer: &BottomDrawer, offset_y: f64| {
                    let mut session = window.imp().session.borrow_mut();
                    if !session.drawer().is_dragging() {
                        return;
                    }
                    session.drag_drawer(offset_y.round() as i32);
                    drop(session);
                    window.render_drawer();
                }
            ),
        );

        imp.drawer.connect_closure(
            "drag-cancelled",
            false,
            glib::closure_local!(
                #[weak(rename_to = window)]
                self,
                move |_drawer: &BottomDrawer| {
                    window.imp().session.borrow_mut().cancel_drawer_drag();
                    window.render();
                }
            ),
        );

        imp.drawer.connect_closure(
            "drag-released",
            false,
            glib::closure_local!(
                #[weak(rename_to = window)]
                self,
                move |_drawer: &BottomDrawer| {
                    let position = window.imp().session.borrow_mut().end_drawer_drag();
                    log::debug!("Drawer settled at {:?}", position);
                    window.render();
                }
            ),
        );

        imp.drawer.connect_closure(
            "close-requested",
            false,
            glib::closure_local!(
                #[weak(rename_to = window)]
                self,
                move |_drawer: &BottomDrawer| {
                    window.imp().session.borrow_mut().close_drawer();
                    window.render();
                }
            ),
        );

        // Tapping outside the drawer closes it
        let backdrop_click = gtk::GestureClick::new();
        let window_weak = self.downgrade();
        backdrop_click.connect_released(move |_, _, _, _| {
            if let Some(window) = window_weak.upgrade() {
                window.imp().session.borrow_mut().close_drawer();
                window.render();
            }
        });
        imp.backdrop.add_controller(backdrop_click);

        let window_weak = self.downgrade();
        imp.open_drawer_button.connect_clicked(move |_| {
            if let Some(window) = window_weak.upgrade() {
                window.imp().session.borrow_mut().open_drawer();
                window.render();
            }
        });
    }

    fn on_resized(&self) {
        let imp = self.imp();
        let size = (self.width(), self.height());
        imp.last_size.set(size);

        let breakpoint = imp.config.borrow().layout.compact_breakpoint;
        let form_factor = FormFactor::for_width(size.0, breakpoint);
        if imp.session.borrow_mut().set_form_factor(form_factor) {
            log::debug!("Switched to {:?} layout at width {}", form_factor, size.0);
        }
        self.render();
    }

    /// Push the session state into every widget
    fn render(&self) {
        let imp = self.imp();
        {
            let session = imp.session.borrow();
            let selected = session.selected_text();
            let query = session.live_query();

            imp.side_panel.show_state(selected, query);
            imp.drawer.panel().show_state(selected, query);

            imp.side_scroller.set_visible(session.side_panel_visible());
            imp.drawer.set_visible(session.drawer_visible());
            imp.backdrop.set_visible(session.drawer_visible());
            imp.open_drawer_button
                .set_visible(session.open_affordance_visible());
        }
        self.render_drawer();
    }

    /// Cheap path for live drags: only the drawer's height changes
    fn render_drawer(&self) {
        let imp = self.imp();
        let session = imp.session.borrow();
        let drawer = session.drawer();
        if drawer.is_open() {
            imp.drawer
                .apply_layout(drawer.snap(), drawer.offset(), self.height());
        }
    }

    fn start_lookup(&self, text: &str) {
        let imp = self.imp();
        let Some(ticket) = imp.session.borrow_mut().selection_resolved(text) else {
            return;
        };
        self.render();

        let Some(client) = imp.client.borrow().clone() else {
            log::warn!("No explanation client configured");
            return;
        };

        log::info!("Looking up selection #{} ({} chars)", ticket.seq, ticket.text.chars().count());
        let seq = ticket.seq;
        let interval = imp.config.borrow().layout.poll_interval_ms;
        let window_weak = self.downgrade();

        run_in_background(
            interval,
            move || client.explain(&ticket.text),
            move |outcome: Result<Option<String>, LookupError>| {
                if let Some(window) = window_weak.upgrade() {
                    window.finish_lookup(seq, outcome);
                }
            },
        );
    }

    fn finish_lookup(&self, seq: u64, outcome: Result<Option<String>, LookupError>) {
        let applied = self.imp().session.borrow_mut().complete(seq, outcome);
        if applied {
            self.render();
        }
    }

    fn show_open_dialog(&self) {
        let dialog = gtk::FileDialog::builder()
            .title("Select a paper")
            .build();
        let window_weak = self.downgrade();

        dialog.open(Some(self), None::<&gio::Cancellable>, move |result| {
            if let Some(window) = window_weak.upgrade() {
                window.handle_file_dialog_result(result);
            }
        });
    }

    fn handle_file_dialog_result(&self, result: Result<gio::File, glib::Error>) {
        let file = match result {
            Ok(f) => f,
            Err(_) => return,
        };

        if let Some(path) = file.path() {
            self.open_file(path);
        }
    }

    /// Load a plain-text paper from disk
    pub fn open_file(&self, path: PathBuf) {
        let title = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "Paperlight".to_string());
        self.imp().header_bar.set_title(&title);
        self.load_in_background(move || services::load_paper_file(&path));
    }

    /// Fetch a paper body from the backend by id
    pub fn open_paper_id(&self, id: String) {
        let backend = self.imp().config.borrow().backend.clone();
        self.imp().header_bar.set_title(&format!("Paper {id}"));
        self.load_in_background(move || services::fetch_paper(&backend, &id));
    }

    fn load_in_background<F>(&self, load: F)
    where
        F: FnOnce() -> Result<Paper, DocumentError> + Send + 'static,
    {
        let imp = self.imp();
        imp.document_view.show_message("Loading paper...");
        let seq = imp.session.borrow_mut().begin_load();
        imp.header_bar.set_pdf_link(None);
        self.render();

        let interval = imp.config.borrow().layout.poll_interval_ms;
        let window_weak = self.downgrade();
        run_in_background(interval, load, move |result| {
            let Some(window) = window_weak.upgrade() else {
                return;
            };
            if !window.imp().session.borrow().is_current_load(seq) {
                log::debug!("Dropping paper load #{seq}, a newer one was started");
                return;
            }
            match result {
                Ok(paper) => window.load_paper(paper),
                Err(DocumentError::NotFound(id)) => {
                    log::warn!("Paper {} not found", id);
                    window.imp().document_view.show_message("Paper not found");
                }
                Err(e) => {
                    log::error!("Failed to load paper: {}", e);
                    window
                        .imp()
                        .document_view
                        .show_message(&format!("Could not load paper: {e}"));
                }
            }
        });
    }

    fn load_paper(&self, paper: Paper) {
        let imp = self.imp();
        imp.session.borrow_mut().reset();
        imp.document_view.load_document(&paper.text);
        imp.header_bar.set_pdf_link(paper.pdf_link.as_deref());
        self.render();
    }
}

/// Run `work` on a worker thread and hand its result to `done` on the main loop
fn run_in_background<T, W, D>(interval_ms: u64, work: W, done: D)
where
    T: Send + 'static,
    W: FnOnce() -> T + Send + 'static,
    D: FnOnce(T) + 'static,
{
    let (sender, receiver) = mpsc::channel::<T>();

    std::thread::spawn(move || {
        let _ = sender.send(work());
    });

    let mut done = Some(done);
    glib::timeout_add_local(Duration::from_millis(interval_ms), move || {
        match receiver.try_recv() {
            Ok(result) => {
                if let Some(done) = done.take() {
                    done(result);
                }
                glib::ControlFlow::Break
            }
            Err(TryRecvError::Empty) => glib::ControlFlow::Continue,
            Err(TryRecvError::Disconnected) => {
                log::error!("Background task ended without a result");
                glib::ControlFlow::Break
            }
        }
    });
}
