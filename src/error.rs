use thiserror::Error;

/// User-facing errors.
#[derive(Error, Debug)]
pub enum SqltidyError {
    #[error("sqltidy config error: {0}")]
    Config(String),

    #[error("sqltidy parsing error at line {line}, column {column}: {message}")]
    Parsing {
        line: usize,
        column: usize,
        message: String,
    },

    #[error("sqltidy tagger registry error: {0}")]
    Registry(String),

    #[error("sqltidy equivalence error: {0}")]
    Equivalence(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
}

pub type Result<T> = std::result::Result<T, SqltidyError>;
