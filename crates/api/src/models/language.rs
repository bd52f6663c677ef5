use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

/// Source languages the index knows how to locate on disk and inside archives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    Scala,
    Java,
}

impl Language {
    /// Every supported language, in the default trivial-path preference order.
    pub const ALL: [Language; 2] = [Language::Scala, Language::Java];

    /// File extension (without the leading dot).
    pub fn extension(&self) -> &'static str {
        match self {
            Language::Scala => "scala",
            Language::Java => "java",
        }
    }

    pub fn as_str(&self) -> &'static str {
        self.extension()
    }

    /// Map a file extension to a Language.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "scala" => Some(Language::Scala),
            "java" => Some(Language::Java),
            _ => None,
        }
    }

    /// Detect the language of a `/`-separated path such as an archive entry name.
    pub fn from_entry_name(name: &str) -> Option<Self> {
        let file_name = name.rsplit('/').next().unwrap_or(name);
        let (_, ext) = file_name.rsplit_once('.')?;
        Self::from_extension(ext)
    }

    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(Self::from_extension)
    }

    /// Strip this language's extension (including the dot) from `path`.
    pub fn strip_extension<'a>(&self, path: &'a str) -> Option<&'a str> {
        path.strip_suffix(self.extension())?.strip_suffix('.')
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
