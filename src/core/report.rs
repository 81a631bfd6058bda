//! Diagnostic views over the registered graph.
//!
//! [`expanded_requires`] walks declared prerequisite identities recursively
//! (discovered order, skipping already-visited identities), and
//! [`render_report`] lists every node with its expanded set, fewest transitive
//! prerequisites first — a readable approximation of topological order, not a
//! correctness-critical one.

use std::collections::HashSet;

use crate::inits::InitId;

use super::registry::Registry;

/// Transitive closure of a node's prerequisites, deduplicated, in discovered
/// order. Declared-but-unregistered identities are included; they just cannot
/// be expanded further.
pub(crate) fn expanded_requires(registry: &Registry, id: &InitId) -> Vec<InitId> {
    let mut seen = HashSet::new();
    let mut out = Vec::new();
    if let Some(requires) = registry.requires_of(id) {
        for req in requires {
            expand(registry, req, &mut seen, &mut out);
        }
    }
    out
}

fn expand(registry: &Registry, id: &InitId, seen: &mut HashSet<InitId>, out: &mut Vec<InitId>) {
    if !seen.insert(id.clone()) {
        return;
    }
    out.push(id.clone());
    if let Some(requires) = registry.requires_of(id) {
        for req in requires {
            expand(registry, req, seen, out);
        }
    }
}

/// One line per registered node: description plus expanded prerequisite
/// descriptions, sorted ascending by expanded-set size (registration order
/// breaks ties, so the output is deterministic).
pub(crate) fn render_report(registry: &Registry) -> String {
    let mut entries: Vec<(usize, usize, String)> = Vec::with_capacity(registry.len());
    for (position, (id, node)) in registry.iter_in_order().enumerate() {
        let expanded = expanded_requires(registry, id);
        let deps: Vec<&str> = expanded
            .iter()
            .map(|dep| match registry.get(dep) {
                Some(dep_node) => dep_node.describe(),
                None => dep.as_str(),
            })
            .collect();
        let line = format!("{} <- [{}]", node.describe(), deps.join(", "));
        entries.push((expanded.len(), position, line));
    }
    entries.sort_by(|a, b| (a.0, a.1).cmp(&(b.0, b.1)));

    let lines: Vec<String> = entries.into_iter().map(|(_, _, line)| line).collect();
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::InitError;
    use crate::inits::{InitFn, InitRef};
    use crate::CompletionHandle;

    fn node(id: &'static str, requires: &[&'static str]) -> InitRef {
        let requires = requires.iter().map(|r| InitId::from(*r)).collect();
        InitFn::arc(id, requires, |_handle: CompletionHandle| async {
            Ok::<(), InitError>(())
        })
    }

    #[test]
    fn expansion_deduplicates_shared_subtrees() {
        let mut registry = Registry::new();
        registry.insert(node("base", &[]));
        registry.insert(node("left", &["base"]));
        registry.insert(node("right", &["base"]));
        registry.insert(node("top", &["left", "right"]));

        let expanded = expanded_requires(&registry, &"top".into());
        assert_eq!(
            expanded,
            vec![
                InitId::from("left"),
                InitId::from("base"),
                InitId::from("right")
            ]
        );
    }

    #[test]
    fn expansion_includes_unregistered_identities() {
        let mut registry = Registry::new();
        registry.insert(node("ui", &["ghost"]));

        let expanded = expanded_requires(&registry, &"ui".into());
        assert_eq!(expanded, vec![InitId::from("ghost")]);
    }

    #[test]
    fn report_sorts_by_expanded_size() {
        let mut registry = Registry::new();
        registry.insert(node("stats", &["net", "auth"]));
        registry.insert(node("auth", &["net"]));
        registry.insert(node("net", &[]));

        let report = render_report(&registry);
        assert_eq!(
            report,
            "net <- []\nauth <- [net]\nstats <- [net, auth]"
        );
    }

    #[test]
    fn report_breaks_size_ties_in_registration_order() {
        let mut registry = Registry::new();
        registry.insert(node("b", &[]));
        registry.insert(node("a", &[]));

        assert_eq!(render_report(&registry), "b <- []\na <- []");
    }
}
