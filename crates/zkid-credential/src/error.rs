use zkid_core::ErrorClass;

/// Failures decoding or encoding a disclosure bundle.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CodecError {
    /// Not JSON, not an object, or a field of the wrong type.
    #[error("failed to parse disclosure bundle: {0}")]
    Parse(String),

    /// Required fields absent or null.
    #[error("missing required fields: {}", .0.join(", "))]
    MissingFields(Vec<&'static str>),

    /// Serialization failed.
    #[error("failed to encode disclosure bundle: {0}")]
    Encode(String),
}

impl CodecError {
    /// Error taxonomy class.
    pub fn class(&self) -> ErrorClass {
        match self {
            Self::MissingFields(_) => ErrorClass::MissingFields,
            Self::Parse(_) | Self::Encode(_) => ErrorClass::Parse,
        }
    }
}
