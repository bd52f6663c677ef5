mod define;
mod toplevels;

use clap::{Args, Parser, Subcommand};
use defscope_api::Symbol;
use defscope_core::{IndexConfig, SymbolIndex};
use defscope_java::JavaExtractor;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

#[derive(Parser)]
#[command(
    name = "defscope",
    version,
    about = "Find where a JVM symbol is defined",
    long_about = "Defscope indexes source archives and directories cheaply, recording only \
                  the toplevels whose file cannot be guessed from their name, and fully \
                  parses a file only when a query needs it."
)]
pub struct Cli {
    /// Mirror logs to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Sources to index before running a command.
#[derive(Args, Debug, Default)]
pub struct SourceArgs {
    /// Source archive to register; repeatable, searched in the order given
    #[arg(long = "jar", value_name = "JAR")]
    pub jars: Vec<PathBuf>,

    /// Directory indexed recursively, used as source root
    #[arg(long = "source-dir", value_name = "DIR")]
    pub source_dirs: Vec<PathBuf>,

    /// Single source file, recorded by absolute path
    #[arg(long = "file", value_name = "FILE")]
    pub files: Vec<PathBuf>,

    /// Stop following definition alternatives after N hops
    #[arg(long, value_name = "N")]
    pub max_depth: Option<usize>,
}

impl SourceArgs {
    pub fn build_index(&self) -> defscope_core::Result<SymbolIndex> {
        let index = SymbolIndex::builder()
            .with_extractor(Arc::new(JavaExtractor::new()))
            .with_config(IndexConfig {
                max_alternative_depth: self.max_depth,
                ..IndexConfig::default()
            })
            .build();

        for jar in &self.jars {
            index.add_source_jar(jar)?;
        }
        for dir in &self.source_dirs {
            index.add_source_directory(dir)?;
        }
        for file in &self.files {
            index.add_source_file(file, None)?;
        }
        info!("Index ready: {:?}", index.stats());
        Ok(index)
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Resolve the definition site of a SemanticDB symbol
    #[command(long_about = "Resolves a symbol such as `com/acme/Client#send().` to the file \
                            that defines it, trying related symbols when the symbol itself \
                            has no source location.")]
    Define {
        /// Symbol to resolve, e.g. `com/acme/Client#send().`
        #[arg(value_name = "SYMBOL")]
        symbol: String,

        #[command(flatten)]
        sources: SourceArgs,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },
    /// Bulk-index sources and print index statistics
    Toplevels {
        #[command(flatten)]
        sources: SourceArgs,

        /// Print the statistics as JSON
        #[arg(long)]
        json: bool,
    },
}

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let _guard = defscope_core::logging::init_logging("cli", cli.verbose);

    let output = match cli.command {
        Commands::Define {
            symbol,
            sources,
            json,
        } => define::run(&Symbol::new(symbol), &sources, json)?,
        Commands::Toplevels { sources, json } => toplevels::run(&sources, json)?,
    };
    println!("{output}");
    Ok(())
}
