use thiserror::Error;

#[derive(Debug, Error)]
pub enum GamedataError {
    #[error("gamedata entry '{0}' required but missing on this host")]
    MissingEntry(String),
    #[error("gamedata store used before init()")]
    NotInitialised,
}

pub type Result<T> = std::result::Result<T, GamedataError>;
