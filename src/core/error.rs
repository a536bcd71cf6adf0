use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("The repository does not contain a .gitstatic.yml manifest file at its root")]
    ManifestMissing,

    #[error("Invalid manifest: {0}")]
    Manifest(String),

    #[error("{context} failed: {detail}")]
    Tool { context: String, detail: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yml::Error),

    #[error("{0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub fn tool(context: impl Into<String>, detail: impl Into<String>) -> Self {
        Error::Tool {
            context: context.into(),
            detail: detail.into(),
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            Error::ManifestMissing => "MANIFEST_MISSING",
            Error::Manifest(_) => "MANIFEST_INVALID",
            Error::Tool { .. } => "TOOL_FAILED",
            Error::Io(_) => "IO_ERROR",
            Error::Yaml(_) => "YAML_ERROR",
            Error::Other(_) => "ERROR",
        }
    }
}
