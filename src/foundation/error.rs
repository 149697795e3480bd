/// Convenience result type used across r3d.
pub type R3dResult<T> = Result<T, R3dError>;

/// Error taxonomy shared by the backend contract, the factory registry and settings.
///
/// All variants are local validation failures: nothing here is transient and
/// nothing is retried.
#[derive(thiserror::Error, Debug)]
pub enum R3dError {
    /// A required input or output value was absent.
    #[error("bad arguments: {0}")]
    BadArguments(String),

    /// An enum selector did not match any recognized variant.
    #[error("invalid value: {0}")]
    InvalidValue(String),

    /// A factory or backend id is not advertised.
    #[error("not found: {0}")]
    NotFound(String),

    /// Rejected settings, buffer layout or factory version.
    #[error("validation error: {0}")]
    Validation(String),

    /// Errors when serializing or deserializing settings.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl R3dError {
    /// Build a [`R3dError::BadArguments`] value.
    pub fn bad_arguments(msg: impl Into<String>) -> Self {
        Self::BadArguments(msg.into())
    }

    /// Build a [`R3dError::InvalidValue`] value.
    pub fn invalid_value(msg: impl Into<String>) -> Self {
        Self::InvalidValue(msg.into())
    }

    /// Build a [`R3dError::NotFound`] value.
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    /// Build a [`R3dError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`R3dError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
