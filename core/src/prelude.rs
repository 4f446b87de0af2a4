/// Failure kinds surfaced by every [`crate::DetectionClient`] accessor.
#[derive(thiserror::Error, Debug)]
pub enum ClientError {
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("server error: status {status}, content type {}", .content_type.as_deref().unwrap_or("N/A"))]
    Server {
        status: u16,
        content_type: Option<String>,
    },
    #[error("malformed response: {0}")]
    MalformedResponse(String),
    #[error("no objects found in the detection response")]
    EmptyResult,
    #[error("index {index} out of range for {len} detected objects")]
    IndexOutOfRange { index: i64, len: usize },
    #[error("{0} not found in the detected object")]
    MissingField(&'static str),
}

pub type ClientResult<T> = Result<T, ClientError>;
