use thiserror::Error;

#[derive(Error, Debug)]
pub enum WizardError {
    #[error("missing input: {0}")] MissingInput(String),
    #[error("provider error ({status}): {message}")] Provider { status: u16, message: String },
    #[error("request failed: {0}")] Http(#[from] reqwest::Error),
    #[error("parse error: {0}")] Parse(String),
    #[error("storage error: {0}")] Storage(String),
    #[error("clipboard error: {0}")] Clipboard(String),
    #[error("config error: {0}")] Config(String),
}

pub type Result<T> = std::result::Result<T, WizardError>;
