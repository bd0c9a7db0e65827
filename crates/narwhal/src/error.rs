#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("shape must be 'circle' or 'square', got {shape:?}")]
    UnknownShape { shape: String },

    #[error("invalid chart options: {0}")]
    InvalidOptions(#[from] serde_json::Error),

    #[error("invalid driver option {field}: {value}")]
    InvalidDriver { field: &'static str, value: f64 },

    #[error("canvas size must be finite and non-negative, got {width}x{height}")]
    InvalidCanvas { width: f64, height: f64 },
}

pub type Result<T> = std::result::Result<T, Error>;
