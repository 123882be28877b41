use crate::Discrete;

/// Errors surfaced by layouts, configs and environments.
#[derive(thiserror::Error, Debug)]
pub enum EnvError {
    #[error("Invalid action {action}: action space is Discrete({n})")]
    InvalidAction { action: Discrete, n: usize },

    #[error("Invalid state {state}: state space is Discrete({n})")]
    InvalidState { state: Discrete, n: usize },

    #[error("Episode has ended, call reset() before stepping again")]
    EpisodeEnded,

    #[error("Environment has not been reset yet")]
    ResetNeeded,

    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    #[error("Invalid layout: {0}")]
    InvalidLayout(String),

    #[error("Unrecognized environment id: {0}")]
    UnknownEnvironment(String),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, EnvError>;
