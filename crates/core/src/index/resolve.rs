//! Definition resolution.
//!
//! For a queried symbol the resolver tries, in order:
//!
//! 1. the definitions table;
//! 2. materializing the file of the symbol's toplevel (recorded toplevel file,
//!    else the first trivial path found under the registered source roots) and
//!    looking again;
//! 3. every alternative proposed for the symbol, recursively, first success
//!    wins.

use super::SymbolIndex;
use crate::error::{IndexError, Result};
use crate::source::SourceFile;
use defscope_api::{SourceInput, Symbol};
use std::collections::HashSet;
use std::sync::{Arc, Mutex, PoisonError};
use tracing::{debug, trace};

/// Outcome of a successful query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SymbolDefinition {
    /// Symbol the caller asked for
    pub query_symbol: Symbol,
    /// Symbol whose definition was found; differs from `query_symbol` when an
    /// alternative matched
    pub definition_symbol: Symbol,
    pub file: SourceFile,
}

impl SymbolIndex {
    /// Find the file defining `symbol`.
    ///
    /// `Ok(None)` means not found. Read and parse failures during lazy
    /// materialization are offered to the error sink when one is installed
    /// (handled → `Ok(None)`) and returned otherwise.
    pub fn definition(&self, symbol: &Symbol) -> Result<Option<SymbolDefinition>> {
        self.ensure_open()?;
        let mut visited = HashSet::new();
        match self.find_definition(symbol, symbol, &mut visited, 0) {
            Ok(found) => Ok(found),
            Err(err) if err.is_recoverable() => match &self.error_sink {
                Some(sink) if sink.handle(&err) => Ok(None),
                _ => Err(err),
            },
            Err(err) => Err(err),
        }
    }

    fn find_definition(
        &self,
        query: &Symbol,
        symbol: &Symbol,
        visited: &mut HashSet<Symbol>,
        depth: usize,
    ) -> Result<Option<SymbolDefinition>> {
        if !visited.insert(symbol.clone()) {
            trace!("Already tried {} for {}", symbol, query);
            return Ok(None);
        }

        if let Some(found) = self.lookup(query, symbol) {
            return Ok(Some(found));
        }

        self.materialize_toplevel(symbol)?;
        if let Some(found) = self.lookup(query, symbol) {
            return Ok(Some(found));
        }

        if self
            .config
            .max_alternative_depth
            .is_some_and(|max| depth >= max)
        {
            debug!("Alternative depth limit reached for {}", query);
            return Ok(None);
        }

        for alternative in self.alternatives.alternatives(symbol) {
            if let Some(found) = self.find_definition(query, &alternative, visited, depth + 1)? {
                debug!("Resolved {} through alternative {}", query, alternative);
                return Ok(Some(found));
            }
        }
        Ok(None)
    }

    fn lookup(&self, query: &Symbol, symbol: &Symbol) -> Option<SymbolDefinition> {
        self.definitions
            .get(symbol)
            .map(|file| SymbolDefinition {
                query_symbol: query.clone(),
                definition_symbol: symbol.clone(),
                file: file.value().clone(),
            })
    }

    /// Locate the file of `symbol`'s toplevel and load its definitions.
    fn materialize_toplevel(&self, symbol: &Symbol) -> Result<()> {
        let toplevel = symbol.toplevel();
        let recorded = self.toplevel_file(&toplevel);
        let file = match recorded {
            Some(file) => Some(file),
            None => self
                .loader
                .resolve_first(&toplevel.trivial_paths(&self.config.extensions))?,
        };

        match file {
            Some(file) => self.materialize(&file, symbol),
            None => {
                trace!("No source known for toplevel {}", toplevel);
                Ok(())
            }
        }
    }

    fn materialize(&self, file: &SourceFile, symbol: &Symbol) -> Result<()> {
        if !self.config.dedupe_materialization {
            return self.load_definitions(file);
        }

        let lock: Arc<Mutex<()>> = self
            .materializing
            .entry(file.clone())
            .or_default()
            .value()
            .clone();
        let result = {
            let _guard = lock.lock().unwrap_or_else(PoisonError::into_inner);
            // A concurrent query may have loaded the file while we waited
            if self.definitions.contains_key(symbol) {
                Ok(())
            } else {
                self.load_definitions(file)
            }
        };
        drop(lock);
        // Last one out removes the entry; waiters still hold a clone
        self.materializing
            .remove_if(file, |_, lock| Arc::strong_count(lock) == 1);
        result
    }

    /// Fully parse `file` and merge its global definitions. Re-running it
    /// overwrites entries with the same or newer locations.
    fn load_definitions(&self, file: &SourceFile) -> Result<()> {
        let Some((language, extractor)) = self.extractor_for(file) else {
            debug!("No extractor for {}, nothing to materialize", file);
            return Ok(());
        };

        let path = file.canonical_path(None);
        let text = self.loader.read(file)?;
        let occurrences = extractor
            .occurrences(&SourceInput::new(language, &path, &text))
            .map_err(|source| IndexError::Extract {
                path: path.clone(),
                source,
            })?;

        let mut added = 0;
        for occurrence in occurrences {
            if occurrence.is_global_definition() {
                self.definitions.insert(occurrence.symbol, file.clone());
                added += 1;
            }
        }
        debug!("Materialized {} definitions from {}", added, file);
        Ok(())
    }
}
