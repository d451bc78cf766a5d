use super::Error;

/// Error when no type serializer is registered for a property's type.
#[derive(Debug)]
pub(super) struct SerializerMissingError {
    owner: Box<str>,
    ty: Box<str>,
}

impl std::error::Error for SerializerMissingError {}

impl core::fmt::Display for SerializerMissingError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(
            f,
            "no serializer registered for `{}` (used by `{}`)",
            self.ty, self.owner
        )
    }
}

impl Error {
    /// Creates a missing serializer error.
    ///
    /// `owner` names the column, argument or property that needed the serializer.
    pub fn serializer_missing(owner: impl Into<String>, ty: impl Into<String>) -> Error {
        Error::from(super::ErrorKind::SerializerMissing(SerializerMissingError {
            owner: owner.into().into(),
            ty: ty.into().into(),
        }))
    }

    /// Returns `true` if this error is a missing serializer error.
    pub fn is_serializer_missing(&self) -> bool {
        matches!(self.kind(), super::ErrorKind::SerializerMissing(_))
    }
}
