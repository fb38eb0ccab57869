//! Append-only route storage.

use std::sync::Arc;

use crate::routing::pattern::CompiledFragment;
use crate::routing::verb::Verb;

/// A registered route for one verb.
#[derive(Debug, Clone)]
pub struct RouteEntry<H> {
    /// The pattern as declared.
    pub pattern: String,
    /// Compiled form, shared by every verb the pattern was registered under.
    pub fragment: Arc<CompiledFragment>,
    /// Opaque handler reference.
    pub handler: H,
    /// Zero-based position among the routes of this verb.
    pub registration_index: usize,
}

/// Registered routes grouped by verb, in registration order.
#[derive(Debug, Clone)]
pub struct RouteTable<H> {
    entries: [Vec<RouteEntry<H>>; 7],
}

impl<H> Default for RouteTable<H> {
    fn default() -> Self {
        Self {
            entries: Default::default(),
        }
    }
}

impl<H> RouteTable<H> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Routes registered for `verb`, oldest first.
    pub fn entries_for(&self, verb: Verb) -> &[RouteEntry<H>] {
        &self.entries[verb.index()]
    }

    /// Number of routes registered for `verb`.
    pub fn len(&self, verb: Verb) -> usize {
        self.entries[verb.index()].len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.iter().all(Vec::is_empty)
    }

    /// Append `entry`, whose index must be the next one for `verb`.
    pub(crate) fn push(&mut self, verb: Verb, entry: RouteEntry<H>) {
        debug_assert_eq!(entry.registration_index, self.len(verb));
        self.entries[verb.index()].push(entry);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routing::pattern::compile;

    #[test]
    fn test_registration_index_is_per_verb() {
        let mut table: RouteTable<&str> = RouteTable::new();
        let a = Arc::new(compile("/a").unwrap());
        let b = Arc::new(compile("/b").unwrap());
        let entry = |pattern: &str, fragment: &Arc<CompiledFragment>, index| RouteEntry {
            pattern: pattern.to_string(),
            fragment: Arc::clone(fragment),
            handler: "h",
            registration_index: index,
        };

        table.push(Verb::Get, entry("/a", &a, 0));
        table.push(Verb::Post, entry("/a", &a, 0));
        table.push(Verb::Get, entry("/b", &b, 1));

        let get: Vec<&str> = table
            .entries_for(Verb::Get)
            .iter()
            .map(|e| e.pattern.as_str())
            .collect();
        assert_eq!(get, vec!["/a", "/b"]);
        assert_eq!(table.len(Verb::Post), 1);
        assert!(table.entries_for(Verb::Delete).is_empty());
        assert!(!table.is_empty());
    }
}
