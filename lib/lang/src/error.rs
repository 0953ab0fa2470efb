use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, LangError>;

#[derive(Error, Debug)]
pub enum LangError {
    #[error("Lex error at {line}:{column}: {message}")]
    Lex {
        line: usize,
        column: usize,
        message: String,
    },

    #[error("Parse error at {line}:{column}: {message}")]
    Parse {
        line: usize,
        column: usize,
        message: String,
    },

    #[error("IO error on {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid file pattern: {0}")]
    Pattern(#[from] globset::Error),

    #[error("Directory walk failed: {0}")]
    Walk(#[from] walkdir::Error),
}

impl From<LangError> for codebuff_core::Error {
    fn from(e: LangError) -> Self {
        match e {
            LangError::Io { source, .. } => codebuff_core::Error::Io(source),
            other => codebuff_core::Error::FrontEnd(other.to_string()),
        }
    }
}
