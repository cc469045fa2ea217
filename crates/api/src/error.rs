use thiserror::Error;

#[derive(Debug, Error)]
pub enum FinderError {
    #[error("I/O error while enumerating mod locations: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to scan {0}")]
    Scan(String),
}
