// shared/src/lib.rs

use std::time::Duration;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("not found")]
    NotFound,
    #[error("storage: {0}")]
    Storage(String),
    #[error("serialization: {0}")]
    Serialization(String),
    #[error("cache: {0}")]
    Cache(String),
    #[error("validation: {0}")]
    Validation(String),
    #[error("job queue closed")]
    QueueClosed,
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Serialization(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TtlMs(pub u64);

impl TtlMs {
    pub fn as_duration(&self) -> Duration {
        Duration::from_millis(self.0)
    }
}

impl From<Duration> for TtlMs {
    fn from(duration: Duration) -> Self {
        TtlMs(duration.as_millis() as u64)
    }
}

pub mod config;
