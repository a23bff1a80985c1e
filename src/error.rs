use thiserror::Error;

/// Errors raised while building or driving a trainer session
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TrainerError {
    #[error("alphabet is empty: a session needs at least one symbol")]
    EmptyAlphabet,

    #[error("alphabet contains '{0}' more than once")]
    DuplicateSymbol(char),

    #[error("strategy '{strategy}' returned no symbol for a non-empty alphabet")]
    NoSelection { strategy: &'static str },

    #[error("floor weight must be finite and greater than zero (got {0})")]
    InvalidFloorWeight(f64),

    #[error("drill already finished")]
    DrillFinished,
}

/// Errors raised by the config store
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("config io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("config is not valid json: {0}")]
    Parse(#[from] serde_json::Error),
}

pub type TrainerResult<T> = Result<T, TrainerError>;
