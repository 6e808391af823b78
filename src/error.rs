use std::path::PathBuf;

use thiserror::Error;

use crate::validation::ValidationError;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("failed to load zonefile {}: {message}", path.display())]
    Config { path: PathBuf, message: String },

    #[error("lookup of {target} on server '{server}' failed")]
    Lookup {
        server: String,
        target: String,
        #[source]
        source: anyhow::Error,
    },

    #[error("failed to apply {change}")]
    Apply {
        change: String,
        #[source]
        source: anyhow::Error,
    },
}

impl Error {
    pub fn config(path: impl Into<PathBuf>, message: impl ToString) -> Self {
        Error::Config {
            path: path.into(),
            message: message.to_string(),
        }
    }

    pub fn lookup(server: &str, target: impl Into<String>, source: anyhow::Error) -> Self {
        Error::Lookup {
            server: server.to_string(),
            target: target.into(),
            source,
        }
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, Error::Validation(_))
    }
}
