pub mod fetcher;

pub use fetcher::{DefinitionFetcher, DefinitionQuery, QueryStatus, QueryTicket};
