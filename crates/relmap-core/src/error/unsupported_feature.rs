use super::Error;

/// Error when a driver does not support a requested capability.
///
/// This occurs when a statement asks for something the underlying database cannot
/// provide, such as several result sets from a single execution.
#[derive(Debug)]
pub(super) struct UnsupportedFeatureError {
    message: Box<str>,
}

impl std::error::Error for UnsupportedFeatureError {}

impl core::fmt::Display for UnsupportedFeatureError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "unsupported feature: {}", self.message)
    }
}

impl Error {
    /// Creates an unsupported feature error.
    pub fn unsupported_feature(message: impl Into<String>) -> Error {
        Error::from(super::ErrorKind::UnsupportedFeature(UnsupportedFeatureError {
            message: message.into().into(),
        }))
    }

    /// Returns `true` if this error is an unsupported feature error.
    pub fn is_unsupported_feature(&self) -> bool {
        matches!(self.kind(), super::ErrorKind::UnsupportedFeature(_))
    }
}
