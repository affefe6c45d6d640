use reqwest::StatusCode;
use thiserror::Error;

/// Failure of a single file's upload. Always captured at the per-file
/// boundary and turned into an `UploadResult::Failure`.
#[derive(Debug, Error)]
pub enum UploadError {
    /// The file could not be read for encoding
    #[error("could not read {file_name}: {source}")]
    Encoding {
        file_name: String,
        #[source]
        source: std::io::Error,
    },

    /// The request never produced a response
    #[error("failed to send {file_name}: {source}")]
    Request {
        file_name: String,
        #[source]
        source: reqwest::Error,
    },

    /// The endpoint answered with a non-2xx status
    #[error("error sending {file_name} - status code: {status}")]
    Transport {
        file_name: String,
        status: StatusCode,
    },

    /// The response body was not valid JSON
    #[error("invalid response for {file_name}: {source}")]
    Parse {
        file_name: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Errors that stop a batch before any request is issued.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PipelineError {
    #[error("Select at least one file before sending!")]
    NoFilesSelected,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid config file: {0}")]
    Toml(#[from] toml::de::Error),
}
