use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("{0}")]
    Validation(String),

    #[error("Store write failed: {0}")]
    StoreWrite(String),

    #[error("Store list failed: {0}")]
    StoreList(String),

    #[error("Store read failed: {0}")]
    StoreRead(String),

    #[error("JSON serialization error: {0}")]
    JsonSerialization(#[from] serde_json::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
