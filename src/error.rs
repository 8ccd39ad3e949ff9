use std::path::PathBuf;

use thiserror::Error;

/// Problems detected while assembling a session, before any typing happens.
#[derive(Debug, Error)]
pub enum ConfigurationError {
    #[error("word corpus is empty")]
    EmptyCorpus,
    #[error("session duration must be at least one second, got {0}")]
    InvalidDuration(u64),
    #[error("sample interval must be at least one second")]
    InvalidSampleInterval,
    #[error("word batch size must be at least one")]
    InvalidBatchSize,
    #[error("no built-in corpus named `{0}`")]
    UnknownCorpus(String),
    #[error("unable to read word list {}: {source}", .path.display())]
    WordList {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("unable to parse corpus: {0}")]
    Corpus(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_problem() {
        assert_eq!(
            ConfigurationError::InvalidDuration(0).to_string(),
            "session duration must be at least one second, got 0"
        );
        assert_eq!(
            ConfigurationError::UnknownCorpus("klingon".into()).to_string(),
            "no built-in corpus named `klingon`"
        );
    }

    #[test]
    fn word_list_error_keeps_io_source() {
        let err = ConfigurationError::WordList {
            path: PathBuf::from("/nope/words.txt"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "missing"),
        };
        assert!(std::error::Error::source(&err).is_some());
        assert!(err.to_string().contains("/nope/words.txt"));
    }
}
