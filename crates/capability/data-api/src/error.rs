//! 参考数据访问错误

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DataApiError {
    #[error("historian request failed: {0}")]
    Http(String),
    #[error("historian responded with {status}: {message}")]
    Status { status: u16, message: String },
    #[error("invalid historian response: {0}")]
    Decode(String),
    #[error("historian unavailable: {0}")]
    Unavailable(String),
}

impl From<reqwest::Error> for DataApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Self::Decode(err.to_string())
        } else if err.is_timeout() || err.is_connect() {
            Self::Unavailable(err.to_string())
        } else {
            Self::Http(err.to_string())
        }
    }
}
