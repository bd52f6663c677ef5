pub mod language;
pub mod occurrence;
pub mod symbol;

pub use language::*;
pub use occurrence::*;
pub use symbol::*;
