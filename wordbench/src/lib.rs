pub mod config;
pub mod corpus;
pub mod errors;
pub mod results;
pub mod search;

pub use config::{CliOverrides, SearchConfig};
pub use corpus::{Corpus, Document};
pub use errors::{SearchError, SearchResult};
pub use results::{Match, ScanStats, SearchOutput};
pub use search::search;
