use thiserror::Error;

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Template rendering failed: {0}")]
    Template(#[from] bridge_traits::BridgeError),

    #[error("Invalid date format: {0}")]
    InvalidDateFormat(String),

    #[error("No template engine configured")]
    EngineMissing,
}

pub type Result<T> = std::result::Result<T, RenderError>;
