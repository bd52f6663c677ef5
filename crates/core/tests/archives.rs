mod common;

use common::{FakeExtractor, sym, write_file, write_jar};
use defscope_api::Language;
use defscope_core::{
    IndexConfig, IndexError, LogAndContinue, NoAlternatives, SourceFile, SymbolIndex,
};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tempfile::tempdir;

fn archive_of(file: &SourceFile) -> std::path::PathBuf {
    match file {
        SourceFile::Archive { archive, .. } => archive.to_path_buf(),
        SourceFile::Local(path) => panic!("expected an archive entry, got {}", path.display()),
    }
}

#[test]
fn test_first_registered_archive_wins() {
    let dir = tempdir().unwrap();
    let first = write_jar(
        &dir.path().join("first-sources.jar"),
        &[("a/Dup.scala", "package a\nclass Dup { def x = 1 }")],
    );
    let second = write_jar(
        &dir.path().join("second-sources.jar"),
        &[("a/Dup.scala", "package a\nclass Dup { def x = 2 }")],
    );

    let index = SymbolIndex::builder()
        .with_extractor(Arc::new(FakeExtractor::scala()))
        .with_alternatives(Arc::new(NoAlternatives))
        .build();
    index.add_source_jar(&first).unwrap();
    index.add_source_jar(&second).unwrap();

    let found = index.definition(&sym("a/Dup#x().")).unwrap().unwrap();
    assert_eq!(archive_of(&found.file), std::fs::canonicalize(&first).unwrap());
    assert_eq!(
        index.source_jars(),
        vec![
            std::fs::canonicalize(&first).unwrap(),
            std::fs::canonicalize(&second).unwrap()
        ]
    );
}

#[test]
fn test_adding_same_jar_twice_is_noop() {
    let dir = tempdir().unwrap();
    let jar = write_jar(
        &dir.path().join("lib-sources.jar"),
        &[
            ("a/Foo.scala", "package a\nclass Foo\nclass Side"),
            ("a/Bar.scala", "package a\nobject Bar"),
        ],
    );

    let extractor = Arc::new(FakeExtractor::scala());
    let index = SymbolIndex::builder().with_extractor(extractor.clone()).build();
    index.add_source_jar(&jar).unwrap();
    let stats = index.stats();

    index.add_source_jar(&jar).unwrap();
    assert_eq!(index.stats(), stats);
    assert_eq!(extractor.toplevel_runs(), 2);
    assert_eq!(stats.archives, 1);
    assert_eq!(stats.toplevels, 1);
}

#[test]
fn test_indexed_file_count_covers_recognized_entries_only() {
    let dir = tempdir().unwrap();
    let jar = write_jar(
        &dir.path().join("mixed-sources.jar"),
        &[
            ("META-INF/MANIFEST.MF", "Manifest-Version: 1.0"),
            ("a/One.scala", "package a\nclass One"),
            ("a/Two.scala", "package a\nclass Two"),
            ("a/Three.java", "package a\nclass Three"),
            ("README.md", "class NotSource"),
        ],
    );

    // Only Scala is handled; the Java entry has no extractor
    let index = SymbolIndex::builder()
        .with_extractor(Arc::new(FakeExtractor::scala()))
        .build();
    index.add_source_jar(&jar).unwrap();
    assert_eq!(index.indexed_file_count(), 2);

    let both = SymbolIndex::builder()
        .with_extractor(Arc::new(FakeExtractor::scala()))
        .with_extractor(Arc::new(FakeExtractor::new(Language::Java)))
        .build();
    both.add_source_jar(&jar).unwrap();
    assert_eq!(both.indexed_file_count(), 3);
}

#[test]
fn test_trivial_paths_follow_extension_order() {
    let dir = tempdir().unwrap();
    let jar = write_jar(
        &dir.path().join("dual-sources.jar"),
        &[
            ("a/Dual.java", "package a\nclass Dual { def fromJava }"),
            ("a/Dual.scala", "package a\nclass Dual { def fromScala }"),
        ],
    );

    let build = |extensions: Vec<Language>| {
        let index = SymbolIndex::builder()
            .with_extractor(Arc::new(FakeExtractor::scala()))
            .with_extractor(Arc::new(FakeExtractor::new(Language::Java)))
            .with_alternatives(Arc::new(NoAlternatives))
            .with_config(IndexConfig {
                extensions,
                ..IndexConfig::default()
            })
            .build();
        index.add_source_jar(&jar).unwrap();
        index
    };

    let scala_first = build(vec![Language::Scala, Language::Java]);
    assert!(scala_first.definition(&sym("a/Dual#fromScala().")).unwrap().is_some());
    assert!(scala_first.definition(&sym("a/Dual#fromJava().")).unwrap().is_none());

    let java_first = build(vec![Language::Java, Language::Scala]);
    assert!(java_first.definition(&sym("a/Dual#fromJava().")).unwrap().is_some());
    assert!(java_first.definition(&sym("a/Dual#fromScala().")).unwrap().is_none());
}

#[test]
fn test_unregistered_archives_are_never_searched() {
    let dir = tempdir().unwrap();
    write_jar(
        &dir.path().join("unused-sources.jar"),
        &[("a/Hidden.scala", "package a\nclass Hidden { def x = 1 }")],
    );

    let index = SymbolIndex::builder()
        .with_extractor(Arc::new(FakeExtractor::scala()))
        .build();
    assert_eq!(index.definition(&sym("a/Hidden#x().")).unwrap(), None);
}

#[test]
fn test_failure_stops_archive_and_reaches_sink() {
    let dir = tempdir().unwrap();
    let jar = write_jar(
        &dir.path().join("broken-sources.jar"),
        &[
            ("a/Good.scala", "package a\nclass Good\nclass Kept"),
            ("a/Bad.scala", "boom"),
            ("a/Late.scala", "package a\nclass Late\nclass Skipped"),
        ],
    );

    let failures = Arc::new(AtomicUsize::new(0));
    let counter = failures.clone();
    let index = SymbolIndex::builder()
        .with_extractor(Arc::new(FakeExtractor::scala()))
        .with_error_sink(Arc::new(move |err: &IndexError| {
            counter.fetch_add(1, Ordering::SeqCst);
            err.is_recoverable()
        }))
        .build();
    index.add_source_jar(&jar).unwrap();

    assert_eq!(failures.load(Ordering::SeqCst), 1);
    assert!(index.toplevel_file(&sym("a/Kept#")).is_some());
    assert!(index.toplevel_file(&sym("a/Skipped#")).is_none());
    // The archive stays registered, so trivial lookups still work
    assert!(index.definition(&sym("a/Late#")).unwrap().is_some());
}

#[test]
fn test_missing_archive_is_reported() {
    let dir = tempdir().unwrap();
    let missing = dir.path().join("missing-sources.jar");

    let lenient = SymbolIndex::builder()
        .with_extractor(Arc::new(FakeExtractor::scala()))
        .build();
    lenient.add_source_jar(&missing).unwrap();
    assert!(lenient.source_jars().is_empty());

    let strict = SymbolIndex::builder()
        .with_extractor(Arc::new(FakeExtractor::scala()))
        .with_error_sink(Arc::new(|_: &IndexError| false))
        .build();
    assert!(matches!(
        strict.add_source_jar(&missing),
        Err(IndexError::Io { .. })
    ));
}

#[test]
fn test_not_a_zip_is_an_archive_error() {
    let dir = tempdir().unwrap();
    let bogus = dir.path().join("bogus-sources.jar");
    std::fs::write(&bogus, "definitely not a zip").unwrap();

    let index = SymbolIndex::builder()
        .with_extractor(Arc::new(FakeExtractor::scala()))
        .with_error_sink(Arc::new(|_: &IndexError| false))
        .build();
    assert!(matches!(
        index.add_source_jar(&bogus),
        Err(IndexError::Archive { .. })
    ));
}

#[test]
fn test_log_and_continue_keeps_indexing() {
    let dir = tempdir().unwrap();
    let good = write_jar(
        &dir.path().join("good-sources.jar"),
        &[("a/Fine.scala", "package a\nclass Fine\nclass Also")],
    );

    let index = SymbolIndex::builder()
        .with_extractor(Arc::new(FakeExtractor::scala()))
        .with_error_sink(Arc::new(LogAndContinue))
        .build();
    index
        .add_source_jar(&dir.path().join("absent-sources.jar"))
        .unwrap();
    index.add_source_jar(&good).unwrap();

    assert_eq!(index.source_jars().len(), 1);
    assert!(index.toplevel_file(&sym("a/Also#")).is_some());
}

#[test]
fn test_jars_and_directories_share_registration_order() {
    let dir = tempdir().unwrap();
    let jar = write_jar(
        &dir.path().join("early-sources.jar"),
        &[("a/Dup.scala", "package a\nclass Dup { def fromJar = 1 }")],
    );
    let src = dir.path().join("src");
    write_file(&src, "a/Dup.scala", "package a\nclass Dup { def fromDir = 1 }");
    write_file(&src, "a/Only.scala", "package a\nclass Only { def here = 1 }");
    let late = write_jar(
        &dir.path().join("late-sources.jar"),
        &[("a/Only.scala", "package a\nclass Only { def fromLateJar = 1 }")],
    );

    let index = SymbolIndex::builder()
        .with_extractor(Arc::new(FakeExtractor::scala()))
        .with_alternatives(Arc::new(NoAlternatives))
        .build();
    index.add_source_jar(&jar).unwrap();
    index.add_source_directory(&src).unwrap();
    index.add_source_jar(&late).unwrap();

    let dup = index.definition(&sym("a/Dup#fromJar().")).unwrap().unwrap();
    assert_eq!(archive_of(&dup.file), std::fs::canonicalize(&jar).unwrap());
    assert!(index.definition(&sym("a/Dup#fromDir().")).unwrap().is_none());

    let only = index.definition(&sym("a/Only#here().")).unwrap().unwrap();
    assert_eq!(only.file, SourceFile::local(src.join("a/Only.scala")));
    assert!(index.definition(&sym("a/Only#fromLateJar().")).unwrap().is_none());

    assert_eq!(index.stats().archives, 2);
}
