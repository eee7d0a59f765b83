use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Chaser has been destroyed")]
    Destroyed,

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Unknown easing curve: {0}")]
    UnknownEase(String),
}

pub type Result<T> = std::result::Result<T, Error>;
