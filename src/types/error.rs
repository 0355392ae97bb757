use thiserror::Error;

#[derive(Debug, Error)]
pub enum NavFieldError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("image error: {0}")]
    Image(#[from] image::ImageError),
    #[error("invalid dimensions: {0}")]
    InvalidDimensions(String),
    #[error("size mismatch: {0}")]
    SizeMismatch(String),
    #[error("out of bounds: {0}")]
    OutOfBounds(String),
}
