//! Shared fixtures: a token-based fake extractor and archive helpers.
//!
//! The fake understands a tiny Scala-like syntax, enough for
//! `package a.b; class Foo { def bar = 1; val x = 2 }`:
//!
//! - `package p.q` sets the package of following declarations
//! - `class N` / `trait N` declare toplevel type `p/q/N#`
//! - `object N` declares toplevel term `p/q/N.`
//! - `def m` / `val v` / `var v` declare members of the last toplevel
//! - `ref S` records a reference occurrence of symbol `S`
//! - `boom` makes extraction fail

use defscope_api::{
    BoxError, DefinitionExtractor, Language, LanguageExtractor, SourceInput, Symbol,
    SymbolOccurrence, ToplevelExtractor,
};
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use zip::write::SimpleFileOptions;

pub struct FakeExtractor {
    language: Language,
    pub toplevel_runs: AtomicUsize,
    pub full_runs: AtomicUsize,
}

#[allow(dead_code)]
impl FakeExtractor {
    pub fn new(language: Language) -> Self {
        Self {
            language,
            toplevel_runs: AtomicUsize::new(0),
            full_runs: AtomicUsize::new(0),
        }
    }

    pub fn scala() -> Self {
        Self::new(Language::Scala)
    }

    pub fn toplevel_runs(&self) -> usize {
        self.toplevel_runs.load(Ordering::SeqCst)
    }

    pub fn full_runs(&self) -> usize {
        self.full_runs.load(Ordering::SeqCst)
    }
}

fn tokens(text: &str) -> Vec<&str> {
    text.split(|c: char| c.is_whitespace() || matches!(c, '{' | '}' | '=' | ';' | ':'))
        .filter(|t| !t.is_empty())
        .collect()
}

fn scan(text: &str) -> Result<Vec<SymbolOccurrence>, BoxError> {
    let tokens = tokens(text);
    let mut package = String::new();
    let mut owner: Option<Symbol> = None;
    let mut out = Vec::new();
    let mut i = 0;

    while i < tokens.len() {
        let keyword = tokens[i];
        let name = tokens.get(i + 1).copied();
        match (keyword, name) {
            ("boom", _) => return Err("fake extractor exploded".into()),
            ("package", Some(name)) => {
                package = format!("{}/", name.replace('.', "/"));
                i += 2;
            }
            ("class" | "trait", Some(name)) => {
                let symbol = Symbol::new(format!("{package}{name}#"));
                owner = Some(symbol.clone());
                out.push(SymbolOccurrence::definition(symbol));
                i += 2;
            }
            ("object", Some(name)) => {
                let symbol = Symbol::new(format!("{package}{name}."));
                owner = Some(symbol.clone());
                out.push(SymbolOccurrence::definition(symbol));
                i += 2;
            }
            ("def", Some(name)) => {
                if let Some(owner) = &owner {
                    out.push(SymbolOccurrence::definition(Symbol::new(format!(
                        "{owner}{name}()."
                    ))));
                }
                i += 2;
            }
            ("val" | "var", Some(name)) => {
                if let Some(owner) = &owner {
                    out.push(SymbolOccurrence::definition(Symbol::new(format!(
                        "{owner}{name}."
                    ))));
                }
                i += 2;
            }
            ("ref", Some(name)) => {
                out.push(SymbolOccurrence::reference(Symbol::new(name)));
                i += 2;
            }
            _ => i += 1,
        }
    }
    Ok(out)
}

impl ToplevelExtractor for FakeExtractor {
    fn toplevels(&self, input: &SourceInput<'_>) -> Result<Vec<Symbol>, BoxError> {
        self.toplevel_runs.fetch_add(1, Ordering::SeqCst);
        Ok(scan(input.text)?
            .into_iter()
            .filter(|o| o.is_global_definition() && o.symbol.is_toplevel())
            .map(|o| o.symbol)
            .collect())
    }
}

impl DefinitionExtractor for FakeExtractor {
    fn occurrences(&self, input: &SourceInput<'_>) -> Result<Vec<SymbolOccurrence>, BoxError> {
        self.full_runs.fetch_add(1, Ordering::SeqCst);
        scan(input.text)
    }
}

impl LanguageExtractor for FakeExtractor {
    fn language(&self) -> Language {
        self.language
    }
}

#[allow(dead_code)]
pub fn write_file(root: &Path, relative: &str, content: &str) -> PathBuf {
    let path = root.join(relative);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    std::fs::write(&path, content).unwrap();
    path
}

#[allow(dead_code)]
pub fn write_jar(path: &Path, entries: &[(&str, &str)]) -> PathBuf {
    let mut writer = zip::ZipWriter::new(File::create(path).unwrap());
    let options = SimpleFileOptions::default().compression_method(zip::CompressionMethod::Stored);
    for (name, content) in entries {
        writer.start_file(*name, options).unwrap();
        writer.write_all(content.as_bytes()).unwrap();
    }
    writer.finish().unwrap();
    path.to_path_buf()
}

#[allow(dead_code)]
pub fn sym(value: &str) -> Symbol {
    Symbol::new(value)
}
