use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Docker error: {0}")]
    Docker(#[from] bollard::errors::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Glob pattern error: {0}")]
    Pattern(#[from] glob::PatternError),

    #[error("Compose file not found: {0}")]
    FileNotFound(String),

    #[error("Invalid value {value:?} for {field}")]
    InvalidFieldValue { field: &'static str, value: String },

    #[error("No Docker host could be reached ({0} configured)")]
    AllHostsFailed(usize),
}

impl Error {
    /// Whether the error means "the thing is not there" rather than a failure
    pub fn is_not_found(&self) -> bool {
        match self {
            Error::FileNotFound(_) => true,
            Error::Io(e) => e.kind() == std::io::ErrorKind::NotFound,
            _ => false,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
