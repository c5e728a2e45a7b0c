use indexmap::IndexMap;

/// Hands out anonymous alias names within one query.
///
/// Names are numbered per base name, starting at 1: aliasing `items` twice
/// yields `items_1` then `items_2`.
#[derive(Debug, Default, Clone)]
pub struct AliasNames {
    counters: IndexMap<String, usize>,
}

impl AliasNames {
    pub fn new() -> AliasNames {
        AliasNames::default()
    }

    /// Returns the next unused alias name for `base`.
    pub fn next(&mut self, base: &str) -> String {
        let counter = self.counters.entry(base.to_string()).or_insert(0);
        *counter += 1;
        format!("{base}_{counter}")
    }
}
