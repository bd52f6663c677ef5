pub mod alternatives;
pub mod archive;
pub mod config;
pub mod error;
pub mod index;
pub mod logging;
pub mod source;

pub use alternatives::{NoAlternatives, ScalaAlternatives};
pub use archive::ArchiveLoader;
pub use config::IndexConfig;
pub use error::{IndexError, Result};
pub use index::{
    ErrorSink, IndexStats, LogAndContinue, SymbolDefinition, SymbolIndex, SymbolIndexBuilder,
};
pub use source::SourceFile;
