mod bottom_drawer;
mod definition_panel;
mod document_view;
mod reader_header_bar;
mod reader_window;

pub use bottom_drawer::BottomDrawer;
pub use definition_panel::DefinitionPanel;
pub use document_view::DocumentView;
pub use reader_header_bar::ReaderHeaderBar;
pub use reader_window::ReaderWindow;
