//! Collaborator contracts the symbol index is built on.
//!
//! - Toplevel extraction (cheap, syntax only) runs on every file seen in bulk.
//! - Definition extraction (expensive) runs lazily, once per file that a query
//!   actually needs.
//! - Definition alternatives propose related symbols for declarations that have
//!   no literal source location of their own.

use crate::models::{Language, Symbol, SymbolOccurrence};

/// Error type for extractor operations
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// One source file handed to an extractor.
#[derive(Debug, Clone, Copy)]
pub struct SourceInput<'a> {
    pub language: Language,
    /// Canonical path of the file, `/`-separated.
    pub path: &'a str,
    pub text: &'a str,
}

impl<'a> SourceInput<'a> {
    pub fn new(language: Language, path: &'a str, text: &'a str) -> Self {
        Self {
            language,
            path,
            text,
        }
    }
}

/// Yields the toplevel symbols declared by a file.
pub trait ToplevelExtractor: Send + Sync {
    /// Must not fail on syntactically valid source. Failures are reported as
    /// errors, never as partial results.
    fn toplevels(&self, input: &SourceInput<'_>) -> Result<Vec<Symbol>, BoxError>;
}

/// Yields every symbol occurrence in a file together with its role.
pub trait DefinitionExtractor: Send + Sync {
    fn occurrences(&self, input: &SourceInput<'_>) -> Result<Vec<SymbolOccurrence>, BoxError>;
}

/// Both extractors for a single language.
pub trait LanguageExtractor: ToplevelExtractor + DefinitionExtractor {
    fn language(&self) -> Language;
}

/// Proposes related symbols that may carry the definition of a symbol
/// without one. Must return a finite list for every input.
pub trait DefinitionAlternatives: Send + Sync {
    fn alternatives(&self, symbol: &Symbol) -> Vec<Symbol>;
}

impl<F> DefinitionAlternatives for F
where
    F: Fn(&Symbol) -> Vec<Symbol> + Send + Sync,
{
    fn alternatives(&self, symbol: &Symbol) -> Vec<Symbol> {
        self(symbol)
    }
}
