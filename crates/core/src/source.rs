use defscope_api::Language;
use std::fmt;
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

/// Resolvable handle to a source file, either on disk or inside an archive.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SourceFile {
    Local(Arc<Path>),
    Archive { archive: Arc<Path>, entry: Arc<str> },
}

impl SourceFile {
    pub fn local(path: impl Into<PathBuf>) -> Self {
        SourceFile::Local(Arc::from(path.into()))
    }

    pub fn archive(archive: Arc<Path>, entry: impl Into<Arc<str>>) -> Self {
        SourceFile::Archive {
            archive,
            entry: entry.into(),
        }
    }

    pub fn language(&self) -> Option<Language> {
        match self {
            SourceFile::Local(path) => Language::from_path(path),
            SourceFile::Archive { entry, .. } => Language::from_entry_name(entry),
        }
    }

    /// `/`-separated identity of the file used for triviality checks and
    /// handed to extractors.
    ///
    /// Archive entries are identified by their path inside the archive. Local
    /// files are identified relative to `source_root` when they live under it,
    /// and by their absolute path otherwise.
    pub fn canonical_path(&self, source_root: Option<&Path>) -> String {
        match self {
            SourceFile::Archive { entry, .. } => entry.to_string(),
            SourceFile::Local(path) => {
                let relative = source_root.and_then(|root| path.strip_prefix(root).ok());
                match relative {
                    Some(relative) => slash_path(relative, false),
                    None => slash_path(path, true),
                }
            }
        }
    }

    pub fn as_local(&self) -> Option<&Path> {
        match self {
            SourceFile::Local(path) => Some(path),
            SourceFile::Archive { .. } => None,
        }
    }

    pub fn uri(&self) -> String {
        match self {
            SourceFile::Local(path) => format!("file://{}", slash_path(path, true)),
            SourceFile::Archive { archive, entry } => {
                format!("jar:file://{}!/{}", slash_path(archive, true), entry)
            }
        }
    }
}

impl fmt::Display for SourceFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.uri())
    }
}

fn slash_path(path: &Path, absolute: bool) -> String {
    let mut out = String::new();
    for component in path.components() {
        match component {
            Component::Normal(part) => {
                if !out.is_empty() || absolute {
                    out.push('/');
                }
                out.push_str(&part.to_string_lossy());
            }
            Component::Prefix(prefix) => out.push_str(&prefix.as_os_str().to_string_lossy()),
            Component::RootDir | Component::CurDir | Component::ParentDir => {}
        }
    }
    out
}
