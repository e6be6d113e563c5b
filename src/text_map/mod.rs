pub mod token;
pub mod token_map;
pub mod tokenizer;

pub use token::{SelectionRange, Token};
pub use token_map::TokenMap;
pub use tokenizer::{strip_document_markers, tokenize};
