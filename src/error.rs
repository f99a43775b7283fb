use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Attempted to use a 0-byte key")]
    EmptyKey,
    #[error("Failed to load value: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
