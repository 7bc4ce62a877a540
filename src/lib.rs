pub mod api;
pub mod config;
pub mod document;
pub mod engine;
pub mod error;
pub mod fetcher;
pub mod index;
pub mod loader;
pub mod tokenizer;
pub mod tools;
pub mod vectorizer;

// Re-export commonly used types
pub use config::Config;
pub use document::{Document, SearchHit};
pub use engine::{build_index, index_directory};
pub use error::{FetchError, IndexError, LoadError};
pub use fetcher::ArchiveFetcher;
pub use index::{Index, IndexStats, SearchOptions};
pub use loader::load_documents;
pub use tokenizer::Tokenizer;
pub use tools::{count_characters, ReaderClient};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
