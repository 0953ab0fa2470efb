use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Unsupported language: {0}")]
    UnsupportedLanguage(String),

    #[error("Corpus is empty: no exemplar to classify against")]
    EmptyCorpus,

    #[error("Invalid k: {k} (corpus holds {corpus_size} exemplars, k must be in 1..={corpus_size})")]
    InvalidK { k: usize, corpus_size: usize },

    #[error("Invalid feature vector dimension: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Front end error: {0}")]
    FrontEnd(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl Error {
    /// Configuration errors are fatal for a whole run and are reported
    /// before any output is produced.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            Error::UnsupportedLanguage(_)
                | Error::EmptyCorpus
                | Error::InvalidK { .. }
                | Error::InvalidConfig(_)
        )
    }
}
