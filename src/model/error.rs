use thiserror::Error;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("request to model endpoint failed: {0}")]
    Transport(String),

    #[error("model endpoint returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("failed to decode model response: {0}")]
    Decode(String),

    #[error("model response missing text at {path}")]
    MissingText { path: &'static str },
}

pub type ModelResult<T> = Result<T, ModelError>;
