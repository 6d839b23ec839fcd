use thiserror::Error;

#[derive(Error, Debug)]
pub enum LecternError {
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    #[error("Chat error: {0}")]
    Chat(String),
}

impl From<validator::ValidationErrors> for LecternError {
    fn from(errors: validator::ValidationErrors) -> Self {
        LecternError::Validation(errors.to_string())
    }
}

pub type Result<T> = std::result::Result<T, LecternError>;
