use thiserror::Error;
use wh_sim::SimError;

#[derive(Debug, Error)]
pub enum StressError {
    #[error("stress configuration error: {0}")]
    Config(String),

    #[error("a stress run is already in progress")]
    AlreadyRunning,

    #[error("simulation error: {0}")]
    Sim(#[from] SimError),
}

pub type StressResult<T> = Result<T, StressError>;
