//! Source archive layer.
//!
//! Holds the source jars and source directories registered with an index and
//! answers relative-path lookups against them:
//!
//! ```text
//! register(a.jar), register_directory(src/), register(b.jar)
//!            │
//!            ▼
//! ┌───────────────────────────┐
//! │   ArchiveLoader           │   resolve("x/Foo.scala")
//! │   [a.jar, src/, b.jar]    │ ─────────────────────────▶ first hit in
//! │   (entry names per jar)   │                            registration order
//! └───────────────────────────┘
//! ```

pub mod loader;

pub use loader::ArchiveLoader;
