use thiserror::Error;

#[derive(Debug, Error)]
pub enum AllocError {
    #[error("invalid hybrid policy: {0}")]
    InvalidPolicy(String),
}

pub type AllocResult<T> = Result<T, AllocError>;
