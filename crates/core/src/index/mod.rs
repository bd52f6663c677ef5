//! On-demand symbol index.
//!
//! Two concurrent tables back every query:
//!
//! - **toplevels**: non-trivial toplevel symbol → file. Filled cheaply by bulk
//!   indexing with the toplevel extractor only.
//! - **definitions**: global symbol → file. Filled lazily, one file at a time,
//!   when a query needs a file that has not been fully parsed yet.
//!
//! A toplevel is *trivial* when its file path can be computed from its name
//! (`a/b/Foo#` in `a/b/Foo.scala`). Trivial toplevels are never stored; the
//! resolver finds their files under the registered source roots instead,
//! source jars and source directories alike.

mod resolve;
mod sink;

pub use resolve::SymbolDefinition;
pub use sink::{ErrorSink, LogAndContinue};

use crate::alternatives::ScalaAlternatives;
use crate::archive::ArchiveLoader;
use crate::config::IndexConfig;
use crate::error::{IndexError, Result};
use crate::source::SourceFile;
use dashmap::DashMap;
use defscope_api::{DefinitionAlternatives, Language, LanguageExtractor, SourceInput, Symbol};
use rayon::prelude::*;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tracing::{debug, info, trace, warn};
use walkdir::WalkDir;

/// Snapshot of index sizes, for diagnostics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IndexStats {
    pub toplevels: usize,
    pub definitions: usize,
    pub archives: usize,
    pub indexed_files: usize,
}

pub struct SymbolIndexBuilder {
    extractors: Vec<Arc<dyn LanguageExtractor>>,
    alternatives: Option<Arc<dyn DefinitionAlternatives>>,
    error_sink: Option<Arc<dyn ErrorSink>>,
    config: IndexConfig,
}

impl SymbolIndexBuilder {
    pub fn new() -> Self {
        Self {
            extractors: Vec::new(),
            alternatives: None,
            error_sink: None,
            config: IndexConfig::default(),
        }
    }

    /// Register an extractor. A later extractor for the same language
    /// replaces an earlier one.
    pub fn with_extractor(mut self, extractor: Arc<dyn LanguageExtractor>) -> Self {
        self.extractors.push(extractor);
        self
    }

    pub fn with_alternatives(mut self, alternatives: Arc<dyn DefinitionAlternatives>) -> Self {
        self.alternatives = Some(alternatives);
        self
    }

    pub fn with_error_sink(mut self, sink: Arc<dyn ErrorSink>) -> Self {
        self.error_sink = Some(sink);
        self
    }

    pub fn with_config(mut self, config: IndexConfig) -> Self {
        self.config = config;
        self
    }

    pub fn build(self) -> SymbolIndex {
        let extractors = self
            .extractors
            .into_iter()
            .map(|extractor| (extractor.language(), extractor))
            .collect();

        SymbolIndex {
            toplevels: DashMap::new(),
            definitions: DashMap::new(),
            loader: ArchiveLoader::new(),
            extractors,
            alternatives: self
                .alternatives
                .unwrap_or_else(|| Arc::new(ScalaAlternatives)),
            error_sink: self.error_sink,
            indexed_files: AtomicUsize::new(0),
            materializing: DashMap::new(),
            config: self.config,
        }
    }
}

impl Default for SymbolIndexBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Lazily populated "where is symbol X defined?" index.
///
/// Safe to share between threads: bulk indexing and queries may run
/// concurrently without external locking.
pub struct SymbolIndex {
    toplevels: DashMap<Symbol, SourceFile>,
    definitions: DashMap<Symbol, SourceFile>,
    loader: ArchiveLoader,
    extractors: HashMap<Language, Arc<dyn LanguageExtractor>>,
    alternatives: Arc<dyn DefinitionAlternatives>,
    error_sink: Option<Arc<dyn ErrorSink>>,
    indexed_files: AtomicUsize,
    /// One lock per file currently or previously materialized
    materializing: DashMap<SourceFile, Arc<Mutex<()>>>,
    config: IndexConfig,
}

impl SymbolIndex {
    pub fn builder() -> SymbolIndexBuilder {
        SymbolIndexBuilder::new()
    }

    pub fn config(&self) -> &IndexConfig {
        &self.config
    }

    /// Register a source archive and bulk-index every source entry in it.
    ///
    /// Registering the same archive twice is a no-op. A failure anywhere in
    /// the archive stops its traversal and is offered to the error sink; the
    /// archive may stay partially indexed.
    pub fn add_source_jar(&self, archive: &Path) -> Result<()> {
        self.ensure_open()?;
        match self.index_source_jar(archive) {
            Ok(_) => Ok(()),
            Err(err) => self.recover(err, "Failed to index source jar"),
        }
    }

    fn index_source_jar(&self, archive: &Path) -> Result<usize> {
        let Some(canonical) = self.loader.register_archive(archive)? else {
            debug!("Source jar {} already indexed", archive.display());
            return Ok(0);
        };

        let start = std::time::Instant::now();
        let mut indexed = 0;
        for file in self.loader.source_entries(&canonical)? {
            if self.index_file(&file, None)? {
                indexed += 1;
            }
        }

        info!(
            "Indexed {} sources from {} in {:?}",
            indexed,
            canonical.display(),
            start.elapsed()
        );
        Ok(indexed)
    }

    /// Record the toplevels of a single file.
    ///
    /// `source_directory` roots the file's canonical path and is registered
    /// as a lookup root for trivial toplevels; without it the absolute path
    /// is used. Failures are offered to the error sink and the file
    /// contributes nothing.
    pub fn add_source_file(&self, file: &Path, source_directory: Option<&Path>) -> Result<()> {
        self.ensure_open()?;
        if let Some(root) = source_directory {
            self.register_source_directory(root)?;
        }
        self.index_local_file(file, source_directory)
    }

    /// Register `directory` as a source root, then index every recognized
    /// source file under it with the directory as root.
    pub fn add_source_directory(&self, directory: &Path) -> Result<()> {
        self.ensure_open()?;
        self.register_source_directory(directory)?;

        let files: Vec<PathBuf> = WalkDir::new(directory)
            .into_iter()
            .filter_map(|entry| match entry {
                Ok(entry) => Some(entry),
                Err(err) => {
                    warn!(
                        "Skipping unreadable entry under {}: {}",
                        directory.display(),
                        err
                    );
                    None
                }
            })
            .filter(|entry| entry.file_type().is_file())
            .map(|entry| entry.into_path())
            .filter(|path| Language::from_path(path).is_some())
            .collect();

        debug!("Indexing {} files under {}", files.len(), directory.display());
        files
            .par_iter()
            .try_for_each(|file| self.index_local_file(file, Some(directory)))
    }

    /// Registered source directories, in registration order.
    pub fn source_directories(&self) -> Vec<PathBuf> {
        self.loader.directories()
    }

    /// Record a toplevel learned elsewhere, e.g. from a cached toplevel list.
    /// `path` is the file's canonical path.
    pub fn add_toplevel_symbol(
        &self,
        path: &str,
        file: SourceFile,
        toplevel: Symbol,
    ) -> Result<()> {
        self.ensure_open()?;
        self.insert_toplevel(path, toplevel, &file);
        Ok(())
    }

    /// Register an archive whose toplevels were computed earlier, without
    /// parsing any of its entries. `toplevels` pairs entry names with symbols.
    pub fn add_indexed_source_jar(
        &self,
        archive: &Path,
        toplevels: &[(String, Symbol)],
    ) -> Result<()> {
        self.ensure_open()?;
        let canonical = match self.loader.register_archive(archive) {
            Ok(Some(canonical)) => canonical,
            Ok(None) => return Ok(()),
            Err(err) => return self.recover(err, "Failed to register source jar"),
        };
        for (entry, toplevel) in toplevels {
            let file = SourceFile::archive(canonical.clone(), entry.as_str());
            self.insert_toplevel(entry, toplevel.clone(), &file);
        }
        Ok(())
    }

    /// File recorded for a non-trivial toplevel.
    pub fn toplevel_file(&self, toplevel: &Symbol) -> Option<SourceFile> {
        self.toplevels.get(toplevel).map(|file| file.value().clone())
    }

    /// Whether `symbol` has been materialized into the definitions table.
    pub fn contains_definition(&self, symbol: &Symbol) -> bool {
        self.definitions.contains_key(symbol)
    }

    pub fn indexed_file_count(&self) -> usize {
        self.indexed_files.load(Ordering::Relaxed)
    }

    pub fn stats(&self) -> IndexStats {
        IndexStats {
            toplevels: self.toplevels.len(),
            definitions: self.definitions.len(),
            archives: self.loader.len(),
            indexed_files: self.indexed_file_count(),
        }
    }

    /// Registered archives, in registration order.
    pub fn source_jars(&self) -> Vec<PathBuf> {
        self.loader.archives()
    }

    /// Release every archive handle. Any later operation fails with
    /// [`IndexError::Closed`].
    pub fn close(&self) {
        self.loader.release_all();
        self.materializing.clear();
        info!("Symbol index closed");
    }

    pub fn is_closed(&self) -> bool {
        self.loader.is_closed()
    }

    fn ensure_open(&self) -> Result<()> {
        if self.is_closed() {
            return Err(IndexError::Closed);
        }
        Ok(())
    }

    fn register_source_directory(&self, directory: &Path) -> Result<()> {
        match self.loader.register_directory(directory) {
            Ok(_) => Ok(()),
            Err(err) => self.recover(err, "Failed to register source directory"),
        }
    }

    fn index_local_file(&self, file: &Path, source_root: Option<&Path>) -> Result<()> {
        let source = SourceFile::local(file);
        match self.index_file(&source, source_root) {
            Ok(_) => Ok(()),
            Err(err) => self.recover(err, "Failed to index source file"),
        }
    }

    fn extractor_for(
        &self,
        file: &SourceFile,
    ) -> Option<(Language, &Arc<dyn LanguageExtractor>)> {
        let language = file.language()?;
        self.extractors.get(&language).map(|e| (language, e))
    }

    /// Toplevel-index one file. Returns `false` when no extractor handles
    /// the file's language.
    fn index_file(&self, file: &SourceFile, source_root: Option<&Path>) -> Result<bool> {
        let Some((language, extractor)) = self.extractor_for(file) else {
            trace!("No extractor for {}", file);
            return Ok(false);
        };
        self.indexed_files.fetch_add(1, Ordering::Relaxed);

        let path = file.canonical_path(source_root);
        let text = self.loader.read(file)?;
        let toplevels = extractor
            .toplevels(&SourceInput::new(language, &path, &text))
            .map_err(|source| IndexError::Extract {
                path: path.clone(),
                source,
            })?;

        for toplevel in toplevels {
            self.insert_toplevel(&path, toplevel, file);
        }
        Ok(true)
    }

    fn insert_toplevel(&self, path: &str, toplevel: Symbol, file: &SourceFile) {
        if is_trivial_toplevel(path, &toplevel) {
            trace!("Skipping trivial toplevel {} in {}", toplevel, path);
            return;
        }
        self.toplevels.insert(toplevel, file.clone());
    }

    /// Offer a failure to the error sink. Without a sink, bulk failures are
    /// logged and skipped.
    fn recover(&self, err: IndexError, context: &str) -> Result<()> {
        if !err.is_recoverable() {
            return Err(err);
        }
        match &self.error_sink {
            Some(sink) if sink.handle(&err) => Ok(()),
            Some(_) => Err(err),
            None => {
                warn!("{}: {}", context, err);
                Ok(())
            }
        }
    }
}

/// True if `toplevel` lives where its name says it does, e.g. `a/b/Foo#` in
/// `a/b/Foo.scala` or `/a/b/Foo.java`.
pub(crate) fn is_trivial_toplevel(path: &str, toplevel: &Symbol) -> bool {
    if !toplevel.is_toplevel() {
        return false;
    }
    let path = path.trim_start_matches('/');
    let Some(stem) = Language::ALL
        .iter()
        .find_map(|language| language.strip_extension(path))
    else {
        return false;
    };
    toplevel.trivial_stem().is_some_and(|expected| expected == stem)
}
