pub type GenResult<T> = Result<T, GenError>;

#[derive(Debug, thiserror::Error)]
pub enum GenError {
    #[error("field must not be empty: {0}")]
    EmptyField(String),

    #[error("at least one instance is required")]
    NoInstances,

    #[error("duplicate domain: {0}")]
    DuplicateDomain(String),

    #[error("invalid instance spec: {0}")]
    InvalidInstance(String),

    #[error("file already exists: {0}")]
    FileExists(String),

    #[error("unsupported config format: {0}")]
    UnsupportedFormat(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),
}
