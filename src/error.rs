//! Central error handling for the kissview renderer.
//!
//! Provides a unified RenderError enum with consistent categorization
//! used by every component from tessellation to the window loop.

/// Centralized error type for all renderer operations
#[derive(thiserror::Error, Debug)]
pub enum RenderError {
    #[error("Device error: {0}")]
    Device(String),

    #[error("Surface error: {0}")]
    Surface(String),

    #[error("Shader error: {0}")]
    Shader(String),

    #[error("Geometry error: {0}")]
    Geometry(String),

    #[error("Texture error: {0}")]
    Texture(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl RenderError {
    /// Convenience constructors for common error types
    pub fn device<T: ToString>(msg: T) -> Self {
        RenderError::Device(msg.to_string())
    }

    pub fn surface<T: ToString>(msg: T) -> Self {
        RenderError::Surface(msg.to_string())
    }

    pub fn shader<T: ToString>(msg: T) -> Self {
        RenderError::Shader(msg.to_string())
    }

    pub fn geometry<T: ToString>(msg: T) -> Self {
        RenderError::Geometry(msg.to_string())
    }

    pub fn texture<T: ToString>(msg: T) -> Self {
        RenderError::Texture(msg.to_string())
    }
}

/// Result type alias for renderer operations
pub type RenderResult<T> = Result<T, RenderError>;
