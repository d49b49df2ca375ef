use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("I/O operation failed: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },

    #[error("failed to process {what} JSON: {source}")]
    Json {
        what: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

impl Error {
    pub fn json(what: &'static str, source: serde_json::Error) -> Self {
        Self::Json { what, source }
    }

    /// Line of the JSON document the error was detected at, if known.
    pub fn line(&self) -> Option<usize> {
        match self {
            Self::Json { source, .. } if source.line() > 0 => Some(source.line()),
            _ => None,
        }
    }
}
