use crate::SourceArgs;
use defscope_core::IndexStats;
use serde::Serialize;

#[derive(Serialize)]
struct StatsView {
    toplevels: usize,
    archives: usize,
    indexed_files: usize,
}

impl From<IndexStats> for StatsView {
    fn from(stats: IndexStats) -> Self {
        Self {
            toplevels: stats.toplevels,
            archives: stats.archives,
            indexed_files: stats.indexed_files,
        }
    }
}

pub fn run(sources: &SourceArgs, json: bool) -> Result<String, Box<dyn std::error::Error>> {
    let index = sources.build_index()?;
    let stats = StatsView::from(index.stats());
    index.close();

    if json {
        return Ok(serde_json::to_string_pretty(&stats)?);
    }
    Ok(format!(
        "Indexed {} files from {} archives, {} non-trivial toplevels",
        stats.indexed_files, stats.archives, stats.toplevels
    ))
}
