/// Convenience result type used across linkcard.
pub type CardResult<T> = Result<T, CardError>;

/// Top-level error taxonomy used by card APIs.
#[derive(thiserror::Error, Debug)]
pub enum CardError {
    /// Invalid user-provided configuration or options.
    #[error("validation error: {0}")]
    Validation(String),

    /// Image bytes or data URIs that could not be decoded.
    #[error("decode error: {0}")]
    Decode(String),

    /// Failures while encoding a QR matrix or a PNG.
    #[error("encode error: {0}")]
    Encode(String),

    /// Failures while building or rasterizing the render tree.
    #[error("render error: {0}")]
    Render(String),

    /// Remote image loading failures.
    #[error("fetch error: {0}")]
    Fetch(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl CardError {
    /// Build a [`CardError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`CardError::Decode`] value.
    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode(msg.into())
    }

    /// Build a [`CardError::Encode`] value.
    pub fn encode(msg: impl Into<String>) -> Self {
        Self::Encode(msg.into())
    }

    /// Build a [`CardError::Render`] value.
    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }

    /// Build a [`CardError::Fetch`] value.
    pub fn fetch(msg: impl Into<String>) -> Self {
        Self::Fetch(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
