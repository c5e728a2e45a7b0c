use super::Error;

/// More than one foreign key path links two selectables and nothing narrows
/// the choice down to one.
#[derive(Debug)]
pub(super) struct AmbiguousForeignKeys {
    message: Box<str>,
}

impl std::error::Error for AmbiguousForeignKeys {}

impl core::fmt::Display for AmbiguousForeignKeys {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        f.write_str(&self.message)
    }
}

impl Error {
    /// Creates an "ambiguous foreign keys" error. The message is displayed verbatim.
    pub fn ambiguous_foreign_keys(message: impl Into<String>) -> Error {
        Error::from(super::ErrorKind::AmbiguousForeignKeys(AmbiguousForeignKeys {
            message: message.into().into(),
        }))
    }

    /// Returns `true` if this error is an "ambiguous foreign keys" error.
    pub fn is_ambiguous_foreign_keys(&self) -> bool {
        matches!(self.kind(), super::ErrorKind::AmbiguousForeignKeys(_))
    }
}
