/// Convenience result type used across routeplay.
pub type RouteplayResult<T> = Result<T, RouteplayError>;

/// Top-level error taxonomy used by engine APIs.
///
/// Absent geometry, renderer-not-ready and unknown ids are not errors; they surface as
/// `Option`s, `has_route == false` or silent no-ops. This type covers boundary failures only.
#[derive(thiserror::Error, Debug)]
pub enum RouteplayError {
    /// Invalid user-provided data (ids, ranges, intents).
    #[error("validation error: {0}")]
    Validation(String),

    /// Malformed solver payload.
    #[error("payload error: {0}")]
    Payload(String),

    /// Invalid engine configuration.
    #[error("config error: {0}")]
    Config(String),

    /// Renderer backend failures.
    #[error("render error: {0}")]
    Render(String),

    /// Errors when serializing or deserializing data structures.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl RouteplayError {
    /// Build a [`RouteplayError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`RouteplayError::Payload`] value.
    pub fn payload(msg: impl Into<String>) -> Self {
        Self::Payload(msg.into())
    }

    /// Build a [`RouteplayError::Config`] value.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Build a [`RouteplayError::Render`] value.
    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }

    /// Build a [`RouteplayError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

impl From<serde_json::Error> for RouteplayError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serde(err.to_string())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
