use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("no command specified")]
    MissingCommand,

    #[error("command not found: {name}")]
    CommandNotFound {
        name: String,
        #[source]
        source: which::Error,
    },

    #[error("invalid environment variable: {0} (expected KEY=value)")]
    InvalidEnvVar(String),

    #[error("malformed secret token: {0}")]
    MalformedToken(String),

    #[error("unsupported secret platform: {0}")]
    UnsupportedPlatform(String),

    #[error("secret backend error: {0}")]
    Backend(String),

    #[error("data corruption detected in secret payload: {0}")]
    Integrity(String),

    #[error("failed to resolve secret for {key}: {source}")]
    Secret {
        key: String,
        #[source]
        source: Box<Error>,
    },

    #[error("failed to replace process image: {0}")]
    Exec(std::io::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
}

impl Error {
    /// Attach the environment key whose value failed to resolve.
    pub(crate) fn for_key(self, key: &str) -> Error {
        Error::Secret {
            key: key.to_string(),
            source: Box::new(self),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
