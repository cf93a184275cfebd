use thiserror::Error;

#[derive(Debug, Error)]
pub enum FeatureError {
    #[error("feature dependency cycle detected: {0:?}")]
    Cycle(Vec<&'static str>),
    #[error("feature '{0}' references unknown dependency '{1}'")]
    UnknownDependency(&'static str, &'static str),
}

pub type Result<T> = std::result::Result<T, FeatureError>;
