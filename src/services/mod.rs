pub mod explanation;
pub mod papers;

pub use explanation::ExplanationClient;
pub use papers::{Paper, fetch_paper, load_paper_file};
