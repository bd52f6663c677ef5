use thiserror::Error;

#[derive(Error, Debug)]
pub enum JavaError {
    #[error("Failed to load Java grammar: {0}")]
    Grammar(#[from] tree_sitter::LanguageError),

    #[error("Failed to parse Java file {path}")]
    Parse { path: String },
}

pub type Result<T> = std::result::Result<T, JavaError>;
