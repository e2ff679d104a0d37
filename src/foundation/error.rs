/// Convenience result type used across the renderer.
pub type RouteMapResult<T> = Result<T, RouteMapError>;

/// Top-level error taxonomy used by renderer APIs.
#[derive(thiserror::Error, Debug)]
pub enum RouteMapError {
    /// Caller-supplied data broke a contract (out-of-range turnback, bad override).
    #[error("validation error: {0}")]
    Validation(String),

    /// A geometry sequence was empty or degenerate where points are required.
    #[error("geometry error: {0}")]
    Geometry(String),

    /// A style expression used an unsupported operator or had the wrong shape.
    #[error("expression error: {0}")]
    Expression(String),

    /// A color literal could not be parsed.
    #[error("color error: {0}")]
    Color(String),

    /// Errors while evaluating a style expression or rendering a layer.
    #[error("evaluation error: {0}")]
    Evaluation(String),

    /// Errors when deserializing style documents or tiles.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl RouteMapError {
    /// Build a [`RouteMapError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`RouteMapError::Geometry`] value.
    pub fn geometry(msg: impl Into<String>) -> Self {
        Self::Geometry(msg.into())
    }

    /// Build a [`RouteMapError::Expression`] value.
    pub fn expression(msg: impl Into<String>) -> Self {
        Self::Expression(msg.into())
    }

    /// Build a [`RouteMapError::Color`] value.
    pub fn color(msg: impl Into<String>) -> Self {
        Self::Color(msg.into())
    }

    /// Build a [`RouteMapError::Evaluation`] value.
    pub fn evaluation(msg: impl Into<String>) -> Self {
        Self::Evaluation(msg.into())
    }

    /// Build a [`RouteMapError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

impl From<serde_json::Error> for RouteMapError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serde(err.to_string())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
