use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConError {
    #[error("no known console ABI shape matched this host binary")]
    UnknownAbi,
    #[error("variable '{0}' already registered")]
    DuplicateVariable(String),
    #[error("command '{0}' already registered")]
    DuplicateCommand(String),
    #[error("'{0}' is not a registered command")]
    NotACommand(String),
}

pub type Result<T> = std::result::Result<T, ConError>;
