use super::Error;

/// A relationship's arguments cannot be resolved into a join condition.
///
/// Covers contradictory or incomplete arguments (`secondaryjoin` without
/// `secondary`, redundant remote side specifications), join conditions that
/// carry no usable foreign key columns, and relationships whose direction
/// cannot be determined.
#[derive(Debug)]
pub(super) struct InvalidRelationship {
    message: Box<str>,
}

impl std::error::Error for InvalidRelationship {}

impl core::fmt::Display for InvalidRelationship {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        f.write_str(&self.message)
    }
}

impl Error {
    /// Creates an invalid relationship error. The message is displayed verbatim.
    pub fn invalid_relationship(message: impl Into<String>) -> Error {
        Error::from(super::ErrorKind::InvalidRelationship(InvalidRelationship {
            message: message.into().into(),
        }))
    }

    /// Returns `true` if this error is an invalid relationship error.
    pub fn is_invalid_relationship(&self) -> bool {
        matches!(self.kind(), super::ErrorKind::InvalidRelationship(_))
    }
}
