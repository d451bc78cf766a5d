use super::Error;

/// Error when a decoded row cannot be turned into an object.
///
/// The underlying reason (a type conversion failure, a missing value, a constructor
/// error) is attached as the cause.
#[derive(Debug)]
pub(super) struct MappingError {
    model: Box<str>,
}

impl std::error::Error for MappingError {}

impl core::fmt::Display for MappingError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "cannot map row to `{}`", self.model)
    }
}

impl Error {
    /// Creates a mapping error for the named model.
    ///
    /// Use it as context around the failure that prevented construction:
    /// `cause.context(Error::mapping("Parent"))`.
    pub fn mapping(model: impl Into<String>) -> Error {
        Error::from(super::ErrorKind::Mapping(MappingError {
            model: model.into().into(),
        }))
    }

    /// Returns `true` if this error is a mapping error.
    pub fn is_mapping(&self) -> bool {
        matches!(self.kind(), super::ErrorKind::Mapping(_))
    }
}
