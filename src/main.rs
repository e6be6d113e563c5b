mod config;
mod error;
mod lookup;
mod reader;
mod selection;
mod services;
mod text_map;
mod widgets;

use clap::Parser;
use gtk::prelude::*;
use gtk::{Application, gdk, glib};
use std::path::PathBuf;

use crate::config::AppConfig;
use crate::widgets::ReaderWindow;

const APP_ID: &str = "org.gtk_rs.paperlight";

const STYLE: &str = "
.document-text { font-size: 1.1em; }
.side-panel { border-left: 1px solid alpha(currentColor, 0.15); }
.definition-panel .selected-text { font-style: italic; }
.definition-panel .error { color: @error_color; }
.drawer-backdrop { background-color: rgba(0, 0, 0, 0.3); }
.bottom-drawer {
    background-color: @window_bg_color;
    border-radius: 16px 16px 0 0;
    box-shadow: 0 -2px 12px rgba(0, 0, 0, 0.25);
}
.drawer-grip { background-color: alpha(currentColor, 0.3); border-radius: 3px; }
";

#[derive(Parser, Debug)]
#[command(name = "paperlight", version, about = "Select text in a paper and get it explained")]
struct Cli {
    /// Plain-text paper to open
    #[arg(value_name = "FILE")]
    file: Option<PathBuf>,

    /// Paper id to fetch from the backend
    #[arg(short, long, value_name = "ID")]
    paper: Option<String>,

    /// Backend base URL, overrides config and environment
    #[arg(short, long, value_name = "URL")]
    backend: Option<String>,
}

fn main() -> glib::ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    let mut config = AppConfig::load();
    if let Some(url) = cli.backend.clone() {
        config.backend.url = url;
    }

    let app = Application::builder().application_id(APP_ID).build();
    app.connect_startup(|_| load_css());
    app.connect_activate(move |app| {
        let window = ReaderWindow::new(app, config.clone());

        if let Some(path) = cli.file.clone() {
            if cli.paper.is_some() {
                log::warn!("Both a file and a paper id were given, opening the file");
            }
            window.open_file(path);
        } else if let Some(id) = cli.paper.clone() {
            window.open_paper_id(id);
        }

        window.present();
    });

    // Arguments are already handled by clap
    let program = std::env::args().next().unwrap_or_else(|| "paperlight".to_string());
    app.run_with_args(&[program])
}

fn load_css() {
    let provider = gtk::CssProvider::new();
    provider.load_from_string(STYLE);

    match gdk::Display::default() {
        Some(display) => gtk::style_context_add_provider_for_display(
            &display,
            &provider,
            gtk::STYLE_PROVIDER_PRIORITY_APPLICATION,
        ),
        None => log::warn!("No display available, skipping custom styles"),
    }
}
