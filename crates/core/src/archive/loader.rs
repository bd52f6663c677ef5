//! Registry of source roots: opened source archives and plain source
//! directories.
//!
//! Roots are searched strictly in registration order, archives and
//! directories interleaved. Archive entry names are read once at registration
//! and never change afterwards; reading an entry goes through a per-archive
//! lock on the open handle. Directory roots are checked on the filesystem at
//! lookup time.

use crate::error::{IndexError, Result};
use crate::source::SourceFile;
use defscope_api::Language;
use std::collections::HashSet;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError, RwLock};
use tracing::{debug, info};
use zip::ZipArchive;

struct OpenArchive {
    path: Arc<Path>,
    /// File entries in archive order
    entries: Vec<Arc<str>>,
    names: HashSet<Arc<str>>,
    handle: Mutex<ZipArchive<File>>,
}

impl OpenArchive {
    fn open(path: Arc<Path>) -> Result<Self> {
        let file = File::open(&path).map_err(|e| IndexError::io(&*path, e))?;
        let archive = ZipArchive::new(file).map_err(|e| IndexError::archive(&*path, e))?;

        let entries: Vec<Arc<str>> = archive
            .file_names()
            .filter(|name| !name.ends_with('/'))
            .map(Arc::from)
            .collect();
        let names = entries.iter().cloned().collect();

        Ok(Self {
            path,
            entries,
            names,
            handle: Mutex::new(archive),
        })
    }

    fn read(&self, entry: &str) -> Result<Vec<u8>> {
        let mut archive = self.handle.lock().unwrap_or_else(PoisonError::into_inner);
        let mut file = archive
            .by_name(entry)
            .map_err(|e| IndexError::archive(&*self.path, e))?;
        let mut bytes = Vec::with_capacity(file.size() as usize);
        file.read_to_end(&mut bytes)
            .map_err(|e| IndexError::io(&*self.path, e))?;
        Ok(bytes)
    }
}

enum SourceRoot {
    Archive(Arc<OpenArchive>),
    /// Files are reported under `path` as given, compared by `canonical`
    Directory { path: PathBuf, canonical: PathBuf },
}

impl SourceRoot {
    fn canonical(&self) -> &Path {
        match self {
            SourceRoot::Archive(archive) => &archive.path,
            SourceRoot::Directory { canonical, .. } => canonical,
        }
    }

    fn lookup(&self, relative: &str) -> Option<SourceFile> {
        match self {
            SourceRoot::Archive(archive) => archive
                .names
                .get(relative)
                .map(|entry| SourceFile::archive(archive.path.clone(), entry.clone())),
            SourceRoot::Directory { path, .. } => {
                let candidate = path.join(relative);
                candidate.is_file().then(|| SourceFile::local(candidate))
            }
        }
    }
}

/// Thread-safe set of registered source roots
pub struct ArchiveLoader {
    roots: RwLock<Vec<SourceRoot>>,
    closed: AtomicBool,
}

impl ArchiveLoader {
    pub fn new() -> Self {
        Self {
            roots: RwLock::new(Vec::new()),
            closed: AtomicBool::new(false),
        }
    }

    /// Open and register an archive. Returns `false` when the archive was
    /// already registered.
    pub fn register(&self, path: &Path) -> Result<bool> {
        Ok(self.register_archive(path)?.is_some())
    }

    /// Like [`register`](Self::register), returning the canonical archive path
    /// when it was newly added.
    pub(crate) fn register_archive(&self, path: &Path) -> Result<Option<Arc<Path>>> {
        self.ensure_open()?;
        let canonical: Arc<Path> = Arc::from(
            path.canonicalize()
                .map_err(|e| IndexError::io(path, e))?,
        );
        if self.is_registered(&canonical) {
            debug!("Archive {} already registered", canonical.display());
            return Ok(None);
        }

        let opened = Arc::new(OpenArchive::open(canonical.clone())?);
        let entry_count = opened.entries.len();

        let mut roots = self.roots.write().unwrap_or_else(PoisonError::into_inner);
        // Another thread may have won the race while we were opening
        if roots.iter().any(|root| root.canonical() == &*canonical) {
            return Ok(None);
        }
        roots.push(SourceRoot::Archive(opened));
        info!(
            "Registered archive {} ({} entries)",
            canonical.display(),
            entry_count
        );
        Ok(Some(canonical))
    }

    /// Register a source directory as a lookup root. Returns `false` when the
    /// directory was already registered.
    pub fn register_directory(&self, path: &Path) -> Result<bool> {
        self.ensure_open()?;
        let canonical = path.canonicalize().map_err(|e| IndexError::io(path, e))?;
        if !canonical.is_dir() {
            return Err(IndexError::io(
                path,
                std::io::Error::other("not a directory"),
            ));
        }

        let mut roots = self.roots.write().unwrap_or_else(PoisonError::into_inner);
        if roots.iter().any(|root| root.canonical() == canonical) {
            debug!("Source directory {} already registered", canonical.display());
            return Ok(false);
        }
        info!("Registered source directory {}", canonical.display());
        roots.push(SourceRoot::Directory {
            path: path.to_path_buf(),
            canonical,
        });
        Ok(true)
    }

    /// Find `relative` in the registered roots, first registered first.
    pub fn resolve(&self, relative: &str) -> Result<Option<SourceFile>> {
        self.ensure_open()?;
        let relative = relative.trim_start_matches('/');
        let roots = self.roots.read().unwrap_or_else(PoisonError::into_inner);
        Ok(roots.iter().find_map(|root| root.lookup(relative)))
    }

    /// Resolve the first candidate path that exists under any root. Candidates
    /// are tried in order; each candidate searches roots in registration
    /// order.
    pub fn resolve_first(&self, candidates: &[String]) -> Result<Option<SourceFile>> {
        for candidate in candidates {
            if let Some(found) = self.resolve(candidate)? {
                return Ok(Some(found));
            }
        }
        Ok(None)
    }

    /// Source entries of a registered archive, in archive order.
    pub fn source_entries(&self, archive: &Path) -> Result<Vec<SourceFile>> {
        self.ensure_open()?;
        let Some(opened) = self.find(archive) else {
            return Ok(Vec::new());
        };
        Ok(opened
            .entries
            .iter()
            .filter(|name| Language::from_entry_name(name).is_some())
            .map(|name| SourceFile::archive(opened.path.clone(), name.clone()))
            .collect())
    }

    /// Read the text of a local file or archive entry.
    pub fn read(&self, file: &SourceFile) -> Result<String> {
        self.ensure_open()?;
        let bytes = match file {
            SourceFile::Local(path) => {
                std::fs::read(path).map_err(|e| IndexError::io(&**path, e))?
            }
            SourceFile::Archive { archive, entry } => match self.find(archive) {
                Some(opened) => opened.read(entry)?,
                // Handles for archives that were never registered are not kept
                None => OpenArchive::open(archive.clone())?.read(entry)?,
            },
        };
        String::from_utf8(bytes).map_err(|_| IndexError::InvalidUtf8 {
            path: file.to_string(),
        })
    }

    /// Registered archive paths, in registration order.
    pub fn archives(&self) -> Vec<PathBuf> {
        let roots = self.roots.read().unwrap_or_else(PoisonError::into_inner);
        roots
            .iter()
            .filter_map(|root| match root {
                SourceRoot::Archive(archive) => Some(archive.path.to_path_buf()),
                SourceRoot::Directory { .. } => None,
            })
            .collect()
    }

    /// Registered source directories, canonicalized, in registration order.
    pub fn directories(&self) -> Vec<PathBuf> {
        let roots = self.roots.read().unwrap_or_else(PoisonError::into_inner);
        roots
            .iter()
            .filter_map(|root| match root {
                SourceRoot::Directory { canonical, .. } => Some(canonical.clone()),
                SourceRoot::Archive(_) => None,
            })
            .collect()
    }

    /// Number of registered archives.
    pub fn len(&self) -> usize {
        let roots = self.roots.read().unwrap_or_else(PoisonError::into_inner);
        roots
            .iter()
            .filter(|root| matches!(root, SourceRoot::Archive(_)))
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop every archive handle and directory root. All later operations
    /// fail with [`IndexError::Closed`].
    pub fn release_all(&self) {
        self.closed.store(true, Ordering::SeqCst);
        let mut roots = self.roots.write().unwrap_or_else(PoisonError::into_inner);
        let released = roots.len();
        roots.clear();
        debug!("Released {} source roots", released);
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    fn ensure_open(&self) -> Result<()> {
        if self.is_closed() {
            return Err(IndexError::Closed);
        }
        Ok(())
    }

    fn is_registered(&self, canonical: &Path) -> bool {
        let roots = self.roots.read().unwrap_or_else(PoisonError::into_inner);
        roots.iter().any(|root| root.canonical() == canonical)
    }

    fn find(&self, path: &Path) -> Option<Arc<OpenArchive>> {
        let roots = self.roots.read().unwrap_or_else(PoisonError::into_inner);
        roots.iter().find_map(|root| match root {
            SourceRoot::Archive(archive) if &*archive.path == path => Some(archive.clone()),
            _ => None,
        })
    }
}

impl Default for ArchiveLoader {
    fn default() -> Self {
        Self::new()
    }
}
