use std::fmt;

/// Column storage type.
///
/// Only used to carry type information from columns to the bind parameters
/// that replace them; the resolver itself never inspects it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Type {
    Boolean,
    Integer,
    Text,
    Float,
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Type::Boolean => "BOOLEAN".fmt(f),
            Type::Integer => "INTEGER".fmt(f),
            Type::Text => "TEXT".fmt(f),
            Type::Float => "FLOAT".fmt(f),
        }
    }
}
