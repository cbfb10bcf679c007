use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Device unreachable: {0}")]
    DeviceUnreachable(String),

    #[error("Malformed device payload: {0}")]
    MalformedPayload(String),

    #[error("No data to export")]
    EmptyHistory,

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Metrics error: {0}")]
    Metrics(#[from] prometheus::Error),
}

impl Error {
    /// Message handed back to callers in the offline placeholder.
    pub fn device_message(&self) -> String {
        match self {
            Error::DeviceUnreachable(msg) | Error::MalformedPayload(msg) => msg.clone(),
            other => other.to_string(),
        }
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Error::MalformedPayload(err.to_string())
        } else {
            Error::DeviceUnreachable(err.to_string())
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
