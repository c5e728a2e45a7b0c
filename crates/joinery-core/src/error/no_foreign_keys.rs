use super::Error;

/// No foreign key path links two selectables, so no join condition can be
/// derived between them.
#[derive(Debug)]
pub(super) struct NoForeignKeys {
    message: Box<str>,
}

impl std::error::Error for NoForeignKeys {}

impl core::fmt::Display for NoForeignKeys {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        f.write_str(&self.message)
    }
}

impl Error {
    /// Creates a "no foreign keys" error. The message is displayed verbatim.
    pub fn no_foreign_keys(message: impl Into<String>) -> Error {
        Error::from(super::ErrorKind::NoForeignKeys(NoForeignKeys {
            message: message.into().into(),
        }))
    }

    /// Returns `true` if this error is a "no foreign keys" error.
    pub fn is_no_foreign_keys(&self) -> bool {
        matches!(self.kind(), super::ErrorKind::NoForeignKeys(_))
    }
}
