//! Java symbol extraction backed by tree-sitter-java.
//!
//! ```text
//! package a.b;                 a/b/
//! class Foo<T> {               a/b/Foo#       a/b/Foo#[T]
//!     int count;               a/b/Foo#count.
//!     Foo(int count) {}        a/b/Foo#`<init>`().  a/b/Foo#`<init>`().(count)
//!     void run() {}            a/b/Foo#run().
//!     void run(int times) {}   a/b/Foo#run(+1).     a/b/Foo#run(+1).(times)
//! }
//! ```

mod declarations;
pub mod error;

pub use error::{JavaError, Result};

use declarations::DeclarationWalker;
use defscope_api::{
    BoxError, DefinitionExtractor, Language, LanguageExtractor, SourceInput, Symbol,
    SymbolOccurrence, ToplevelExtractor,
};
use tree_sitter::{Parser, Tree};

pub struct JavaExtractor {
    language: tree_sitter::Language,
}

impl JavaExtractor {
    pub fn new() -> Self {
        Self {
            language: tree_sitter_java::LANGUAGE.into(),
        }
    }

    fn parse(&self, input: &SourceInput<'_>) -> Result<Tree> {
        let mut parser = Parser::new();
        parser.set_language(&self.language)?;
        parser.parse(input.text, None).ok_or_else(|| JavaError::Parse {
            path: input.path.to_string(),
        })
    }

    /// Definitions declared in `input`; with `toplevels_only`, just the
    /// outermost types.
    pub fn declarations(
        &self,
        input: &SourceInput<'_>,
        toplevels_only: bool,
    ) -> Result<Vec<SymbolOccurrence>> {
        let tree = self.parse(input)?;
        Ok(DeclarationWalker::new(input.text, toplevels_only).walk(tree.root_node()))
    }
}

impl Default for JavaExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl ToplevelExtractor for JavaExtractor {
    fn toplevels(&self, input: &SourceInput<'_>) -> std::result::Result<Vec<Symbol>, BoxError> {
        Ok(self
            .declarations(input, true)?
            .into_iter()
            .map(|occurrence| occurrence.symbol)
            .collect())
    }
}

impl DefinitionExtractor for JavaExtractor {
    fn occurrences(
        &self,
        input: &SourceInput<'_>,
    ) -> std::result::Result<Vec<SymbolOccurrence>, BoxError> {
        Ok(self.declarations(input, false)?)
    }
}

impl LanguageExtractor for JavaExtractor {
    fn language(&self) -> Language {
        Language::Java
    }
}
