use thiserror::Error;

#[derive(Debug, Error)]
pub enum FlagError {
    #[error("not a T-flag: '{0}'")]
    NotTFlag(String),

    #[error("unknown time letter '{letter}' in '{token}'")]
    UnknownTimeLetter { token: String, letter: char },

    #[error("invalid flag category: {0}")]
    InvalidCategory(String),

    #[error("invalid time '{0}': expected HH:MM")]
    InvalidTime(String),

    #[error("invalid config: {0}")]
    InvalidConfig(String),

    #[error("config not found: {0}")]
    ConfigNotFound(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, FlagError>;
