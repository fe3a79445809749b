/// Convenience result type used across Tortuga.
pub type TortugaResult<T> = Result<T, TortugaError>;

/// Top-level error taxonomy for the fallible surfaces around the engine.
///
/// Frame advancement itself never fails; errors come from configuration, raster backends and
/// script loading.
#[derive(thiserror::Error, Debug)]
pub enum TortugaError {
    /// Invalid user-provided values.
    #[error("validation error: {0}")]
    Validation(String),

    /// Invalid or unreadable engine configuration.
    #[error("config error: {0}")]
    Config(String),

    /// Raster backend failures (surface limits, readback, encoding).
    #[error("render error: {0}")]
    Render(String),

    /// Malformed turtle programs.
    #[error("script error: {0}")]
    Script(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl TortugaError {
    /// Build a [`TortugaError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`TortugaError::Config`] value.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Build a [`TortugaError::Render`] value.
    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }

    /// Build a [`TortugaError::Script`] value.
    pub fn script(msg: impl Into<String>) -> Self {
        Self::Script(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
