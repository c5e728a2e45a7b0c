use super::{Diagnostic, JoinCondition, JoinConditionArgs};
use joinery_core::{Catalog, Error};

/// Identifies a relationship within a [`Registry`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RelationshipId(pub usize);

/// Caller-owned set of relationship definitions and their resolved joins.
///
/// Relationships are registered up front and resolved together by
/// [`Registry::configure`]. A resolved join is cached until its relationship
/// is redefined or the registry is invalidated. A relationship that fails to
/// resolve keeps its error and does not affect the others.
#[derive(Debug, Default)]
pub struct Registry {
    entries: Vec<Option<Entry>>,
}

#[derive(Debug)]
struct Entry {
    args: JoinConditionArgs,
    state: State,
}

#[derive(Debug)]
enum State {
    Pending,
    Configured(JoinCondition),
    Failed(Error),
}

impl Registry {
    pub fn new() -> Registry {
        Registry::default()
    }

    pub fn register(&mut self, args: JoinConditionArgs) -> RelationshipId {
        let id = RelationshipId(self.entries.len());
        self.entries.push(Some(Entry {
            args,
            state: State::Pending,
        }));
        id
    }

    /// Replaces the definition of a relationship, returning the previous
    /// one. The relationship is resolved again on the next
    /// [`configure`](Self::configure).
    pub fn redefine(&mut self, id: RelationshipId, args: JoinConditionArgs) -> Option<JoinConditionArgs> {
        let entry = self.entries.get_mut(id.0)?.as_mut()?;
        entry.state = State::Pending;
        Some(std::mem::replace(&mut entry.args, args))
    }

    pub fn deregister(&mut self, id: RelationshipId) -> Option<JoinConditionArgs> {
        self.entries
            .get_mut(id.0)
            .and_then(Option::take)
            .map(|entry| entry.args)
    }

    pub fn args(&self, id: RelationshipId) -> Option<&JoinConditionArgs> {
        self.entry(id).map(|entry| &entry.args)
    }

    /// Returns the resolved join, if the relationship was configured
    /// successfully.
    pub fn get(&self, id: RelationshipId) -> Option<&JoinCondition> {
        match &self.entry(id)?.state {
            State::Configured(join_condition) => Some(join_condition),
            _ => None,
        }
    }

    /// Returns the error the relationship failed to resolve with.
    pub fn error(&self, id: RelationshipId) -> Option<&Error> {
        match &self.entry(id)?.state {
            State::Failed(err) => Some(err),
            _ => None,
        }
    }

    /// Returns `true` when no relationship is waiting to be resolved.
    pub fn is_configured(&self) -> bool {
        self.entries
            .iter()
            .flatten()
            .all(|entry| !matches!(entry.state, State::Pending))
    }

    /// Marks every relationship as pending, e.g. after the catalog changed.
    pub fn invalidate_all(&mut self) {
        for entry in self.entries.iter_mut().flatten() {
            entry.state = State::Pending;
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (RelationshipId, &JoinConditionArgs)> + '_ {
        self.entries
            .iter()
            .enumerate()
            .filter_map(|(index, entry)| Some((RelationshipId(index), &entry.as_ref()?.args)))
    }

    /// Resolves every pending relationship against `catalog`.
    ///
    /// Returns the relationships currently in a failed state, including ones
    /// that failed during an earlier call and were not redefined since.
    pub fn configure(
        &mut self,
        catalog: &Catalog,
        diagnostics: &mut Vec<Diagnostic>,
    ) -> Vec<(RelationshipId, Error)> {
        let mut failed = vec![];

        for (index, entry) in self.entries.iter_mut().enumerate() {
            let Some(entry) = entry else {
                continue;
            };

            if matches!(entry.state, State::Pending) {
                entry.state = match entry.args.build(catalog, diagnostics) {
                    Ok(join_condition) => State::Configured(join_condition),
                    Err(err) => {
                        tracing::debug!(
                            relationship = %entry.args.name,
                            error = %err,
                            "relationship failed to configure"
                        );
                        State::Failed(err)
                    }
                };
            }

            if let State::Failed(err) = &entry.state {
                failed.push((RelationshipId(index), err.clone()));
            }
        }

        failed
    }

    fn entry(&self, id: RelationshipId) -> Option<&Entry> {
        self.entries.get(id.0)?.as_ref()
    }
}
