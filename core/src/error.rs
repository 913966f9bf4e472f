use thiserror::Error;

#[derive(Error, Debug)]
pub enum StreamError {
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("no teams discovered and the fallback list is empty")]
    NoTeams,

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type StreamResult<T> = Result<T, StreamError>;
