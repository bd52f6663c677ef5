pub mod extract;
pub mod models;

// Re-export commonly used types
pub use extract::{
    BoxError, DefinitionAlternatives, DefinitionExtractor, LanguageExtractor, SourceInput,
    ToplevelExtractor,
};
pub use models::*;
