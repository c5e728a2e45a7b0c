use std::fmt;

/// The cardinality of a relationship, as seen from its parent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// The child holds the foreign key; one parent has many children.
    OneToMany,

    /// The parent holds the foreign key; many parents share one child.
    ManyToOne,

    /// Parent and child are linked through a secondary (association) table.
    ManyToMany,
}

impl Direction {
    pub fn is_one_to_many(self) -> bool {
        matches!(self, Direction::OneToMany)
    }

    pub fn is_many_to_one(self) -> bool {
        matches!(self, Direction::ManyToOne)
    }

    pub fn is_many_to_many(self) -> bool {
        matches!(self, Direction::ManyToMany)
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::OneToMany => "ONETOMANY".fmt(f),
            Direction::ManyToOne => "MANYTOONE".fmt(f),
            Direction::ManyToMany => "MANYTOMANY".fmt(f),
        }
    }
}
