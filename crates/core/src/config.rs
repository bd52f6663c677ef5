use defscope_api::Language;

/// Tuning knobs for a [`SymbolIndex`](crate::SymbolIndex).
#[derive(Debug, Clone)]
pub struct IndexConfig {
    /// Order in which trivial file paths are tried when a toplevel has no
    /// recorded file.
    pub extensions: Vec<Language>,
    /// Serialize materialization per file so concurrent queries sharing a
    /// toplevel parse it once.
    pub dedupe_materialization: bool,
    /// Maximum nesting of definition alternatives per query. `None` relies on
    /// the per-query visited set alone.
    pub max_alternative_depth: Option<usize>,
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            extensions: Language::ALL.to_vec(),
            dedupe_materialization: true,
            max_alternative_depth: None,
        }
    }
}
