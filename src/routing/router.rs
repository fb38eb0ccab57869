//! Route registration and lookup.
//!
//! # Responsibilities
//! - Accept route registrations for one or several verbs
//! - Keep one combined expression snapshot per verb
//! - Resolve (verb, path) pairs to a handler and parameters
//!
//! # Design Decisions
//! - Registrations are serialized behind a mutex; lookups never lock
//! - Snapshots are rebuilt eagerly and published with an atomic swap, so a
//!   lookup sees either the old or the new snapshot in full
//! - A failed registration leaves both the table and the snapshots untouched
//! - Explicit NoMatch rather than silent default

use std::sync::{Arc, Mutex, PoisonError};

use arc_swap::ArcSwapOption;

use crate::routing::combiner::{self, CombinedExpression};
use crate::routing::error::{RouteError, RouteResult};
use crate::routing::pattern;
use crate::routing::resolver::{self, Resolution};
use crate::routing::table::{RouteEntry, RouteTable};
use crate::routing::verb::Verb;

/// Router mapping verb and path patterns to handlers of type `H`.
pub struct Router<H> {
    table: Mutex<RouteTable<H>>,
    snapshots: [ArcSwapOption<CombinedExpression<H>>; 7],
}

impl<H> Default for Router<H> {
    fn default() -> Self {
        Self {
            table: Mutex::new(RouteTable::new()),
            snapshots: Default::default(),
        }
    }
}

impl<H: Clone> Router<H> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `pattern` under one verb or a set of verbs.
    ///
    /// Each verb gets its own entry and registration index. Nothing is
    /// registered if the verb set is empty, the pattern fails to compile or
    /// a combined expression fails to build.
    pub fn add_route<V>(&self, verbs: V, pattern: &str, handler: H) -> RouteResult<()>
    where
        V: IntoIterator<Item = Verb>,
    {
        self.add_routes(std::iter::once((verbs, pattern, handler)))
    }

    /// Register a batch of routes in order, rebuilding each touched verb once.
    ///
    /// All or nothing: on error no route of the batch is registered.
    pub fn add_routes<I, V, P>(&self, routes: I) -> RouteResult<()>
    where
        I: IntoIterator<Item = (V, P, H)>,
        V: IntoIterator<Item = Verb>,
        P: AsRef<str>,
    {
        let mut compiled = Vec::new();
        for (verbs, pattern, handler) in routes {
            let pattern = pattern.as_ref();
            let mut verbs: Vec<Verb> = verbs.into_iter().collect();
            verbs.sort();
            verbs.dedup();
            if verbs.is_empty() {
                return Err(RouteError::NoVerbs {
                    pattern: pattern.to_string(),
                });
            }
            let fragment = Arc::new(pattern::compile(pattern)?);
            compiled.push((verbs, pattern.to_string(), fragment, handler));
        }

        let mut table = self.table.lock().unwrap_or_else(PoisonError::into_inner);

        let mut staged: [Option<Vec<RouteEntry<H>>>; 7] = Default::default();
        for (verbs, pattern, fragment, handler) in &compiled {
            for &verb in verbs {
                let entries = staged[verb.index()].get_or_insert_with(|| table.entries_for(verb).to_vec());
                entries.push(RouteEntry {
                    pattern: pattern.clone(),
                    fragment: Arc::clone(fragment),
                    handler: handler.clone(),
                    registration_index: entries.len(),
                });
            }
        }

        let mut built = Vec::new();
        for verb in Verb::ALL {
            if let Some(entries) = &staged[verb.index()] {
                built.push((verb, combiner::build(verb, entries)?));
            }
        }

        for (verb, combined) in built {
            let entries = staged[verb.index()].take().unwrap_or_default();
            let committed = table.len(verb);
            for entry in entries.into_iter().skip(committed) {
                tracing::debug!(
                    verb = %verb,
                    pattern = %entry.pattern,
                    registration_index = entry.registration_index,
                    "Route registered"
                );
                table.push(verb, entry);
            }
            self.snapshots[verb.index()].store(Some(Arc::new(combined)));
        }

        Ok(())
    }

    /// Resolve `path` for `verb`.
    pub fn resolve(&self, verb: Verb, path: &str) -> RouteResult<Resolution<H>> {
        let snapshot = self.snapshots[verb.index()].load();
        match snapshot.as_deref() {
            Some(combined) => resolver::resolve(combined, path),
            None => Ok(Resolution::NoMatch),
        }
    }

    /// The current combined expression for `verb`, if any route exists.
    pub fn snapshot(&self, verb: Verb) -> Option<Arc<CombinedExpression<H>>> {
        self.snapshots[verb.index()].load_full()
    }

    /// Number of routes registered for `verb`.
    pub fn route_count(&self, verb: Verb) -> usize {
        self.table
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len(verb)
    }

    pub fn get(&self, pattern: &str, handler: H) -> RouteResult<()> {
        self.add_route(Verb::Get, pattern, handler)
    }

    pub fn post(&self, pattern: &str, handler: H) -> RouteResult<()> {
        self.add_route(Verb::Post, pattern, handler)
    }

    pub fn put(&self, pattern: &str, handler: H) -> RouteResult<()> {
        self.add_route(Verb::Put, pattern, handler)
    }

    pub fn delete(&self, pattern: &str, handler: H) -> RouteResult<()> {
        self.add_route(Verb::Delete, pattern, handler)
    }

    pub fn patch(&self, pattern: &str, handler: H) -> RouteResult<()> {
        self.add_route(Verb::Patch, pattern, handler)
    }

    pub fn head(&self, pattern: &str, handler: H) -> RouteResult<()> {
        self.add_route(Verb::Head, pattern, handler)
    }

    pub fn options(&self, pattern: &str, handler: H) -> RouteResult<()> {
        self.add_route(Verb::Options, pattern, handler)
    }
}

impl<H> std::fmt::Debug for Router<H> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let verbs: Vec<Verb> = Verb::ALL
            .iter()
            .copied()
            .filter(|verb| self.snapshots[verb.index()].load().is_some())
            .collect();
        f.debug_struct("Router").field("verbs", &verbs).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_routes_is_no_match() {
        let router: Router<&str> = Router::new();
        assert_eq!(router.resolve(Verb::Get, "/").unwrap(), Resolution::NoMatch);
    }

    #[test]
    fn test_verbs_are_independent() {
        let router = Router::new();
        router.get(r"/users/{id:\d+}", "show").unwrap();
        router.post("/users", "create").unwrap();

        let m = router.resolve(Verb::Get, "/users/5").unwrap().into_match().unwrap();
        assert_eq!(m.handler, "show");
        assert!(!router.resolve(Verb::Post, "/users/5").unwrap().is_match());
        assert!(!router.resolve(Verb::Get, "/users").unwrap().is_match());
    }

    #[test]
    fn test_fan_out_registers_each_verb() {
        let router = Router::new();
        router.get("/first", "f").unwrap();
        router.add_route([Verb::Get, Verb::Put, Verb::Get], "/item/{id:}", "item").unwrap();

        assert_eq!(router.route_count(Verb::Get), 2);
        assert_eq!(router.route_count(Verb::Put), 1);

        let get = router.resolve(Verb::Get, "/item/x").unwrap().into_match().unwrap();
        let put = router.resolve(Verb::Put, "/item/x").unwrap().into_match().unwrap();
        assert_eq!(get.registration_index, 1);
        assert_eq!(put.registration_index, 0);
    }

    #[test]
    fn test_failed_registration_does_not_mutate() {
        let router = Router::new();
        router.get("/a", "a").unwrap();
        let before = router.snapshot(Verb::Get).unwrap();

        let err = router.get("/a/{id", "broken").unwrap_err();
        assert!(matches!(err, RouteError::MalformedPattern { .. }));
        assert!(err.is_configuration());

        assert_eq!(router.route_count(Verb::Get), 1);
        let after = router.snapshot(Verb::Get).unwrap();
        assert!(Arc::ptr_eq(&before, &after));
    }

    #[test]
    fn test_empty_verb_set_is_rejected() {
        let router: Router<&str> = Router::new();
        let err = router.add_route(Vec::new(), "/a", "a").unwrap_err();
        assert!(matches!(err, RouteError::NoVerbs { .. }));
        assert!(err.is_configuration());
        assert!(Verb::ALL.iter().all(|&verb| router.route_count(verb) == 0));
    }

    #[test]
    fn test_batch_registration_keeps_order_and_is_atomic() {
        let router = Router::new();
        router.get("/first", 0usize).unwrap();
        router
            .add_routes([
                (vec![Verb::Get], "/a/{x:}", 1),
                (vec![Verb::Get, Verb::Post], "/a/b", 2),
            ])
            .unwrap();

        let m = router.resolve(Verb::Get, "/a/b").unwrap().into_match().unwrap();
        assert_eq!((m.handler, m.registration_index), (1, 1));
        let m = router.resolve(Verb::Post, "/a/b").unwrap().into_match().unwrap();
        assert_eq!((m.handler, m.registration_index), (2, 0));

        let err = router
            .add_routes([(vec![Verb::Get], "/ok", 3), (vec![Verb::Get], "/bad/{", 4)])
            .unwrap_err();
        assert!(matches!(err, RouteError::MalformedPattern { .. }));
        assert_eq!(router.route_count(Verb::Get), 3);
        assert!(!router.resolve(Verb::Get, "/ok").unwrap().is_match());
    }

    #[test]
    fn test_hundreds_of_routes_per_verb() {
        let router = Router::new();
        let routes: Vec<(Verb, String, usize)> = (0..400)
            .map(|i| (Verb::Get, format!("/res{}/{{id:}}/item/{{sku:}}", i), i))
            .collect();
        router.add_routes(routes).unwrap();
        router.get("/res400/{id:}", 400).unwrap();

        assert_eq!(router.route_count(Verb::Get), 401);
        let m = router
            .resolve(Verb::Get, "/res399/7/item/abc")
            .unwrap()
            .into_match()
            .unwrap();
        assert_eq!(m.handler, 399);
        assert_eq!(m.params.get("sku"), Some("abc"));
        let m = router.resolve(Verb::Get, "/res400/9").unwrap().into_match().unwrap();
        assert_eq!(m.registration_index, 400);
    }

    #[test]
    fn test_digit_and_word_classes_are_ascii() {
        let router = Router::new();
        router.get(r"/users/{id:\d+}", "show").unwrap();
        router.get("/tags/{tag:}", "tag").unwrap();

        assert!(!router.resolve(Verb::Get, "/users/\u{664}\u{662}").unwrap().is_match());
        assert!(!router.resolve(Verb::Get, "/tags/caf\u{e9}").unwrap().is_match());
        assert!(router.resolve(Verb::Get, "/users/42").unwrap().is_match());
    }

    #[test]
    fn test_old_snapshot_stays_valid_after_registration() {
        let router = Router::new();
        router.get("/a", "a").unwrap();
        let old = router.snapshot(Verb::Get).unwrap();

        router.get("/b", "b").unwrap();

        assert_eq!(old.alternatives().len(), 1);
        assert!(!resolver::resolve(&old, "/b").unwrap().is_match());
        assert!(router.resolve(Verb::Get, "/b").unwrap().is_match());
    }

    #[test]
    fn test_concurrent_lookups_during_registration() {
        let router = Arc::new(Router::new());
        router.get("/stable", 0usize).unwrap();

        let readers: Vec<_> = (0..4)
            .map(|_| {
                let router = Arc::clone(&router);
                std::thread::spawn(move || {
                    for _ in 0..200 {
                        let m = router.resolve(Verb::Get, "/stable").unwrap().into_match().unwrap();
                        assert_eq!(m.handler, 0);
                    }
                })
            })
            .collect();

        for i in 1..50 {
            router.get(&format!("/dynamic/{}/{{id:}}", i), i).unwrap();
        }
        for reader in readers {
            reader.join().unwrap();
        }
        assert_eq!(router.route_count(Verb::Get), 50);
    }
}
