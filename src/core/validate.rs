//! Prerequisite graph checks.
//!
//! Two layers: [`find_cycle`] is the best-effort probe run for every
//! registration, walking only *already-registered* nodes — registration order
//! therefore determines what it can see, and a cycle closed by a later
//! registration is only visible from the later node's perspective.
//! [`check_registered`] is the opt-in fail-fast pass behind
//! [`Scheduler::validate`](super::Scheduler::validate): it resolves every
//! declared prerequisite and runs a whole-graph cycle check, catching what
//! the per-registration probe structurally cannot.

use std::collections::{HashMap, HashSet, VecDeque};

use crate::error::SchedulerError;
use crate::inits::InitId;

use super::registry::Registry;

/// Depth-first probe: does any of `requires`, transitively through registered
/// nodes, lead back to `candidate`? Returns the offending path (ending in the
/// candidate's own identity) if so.
pub(crate) fn find_cycle(
    registry: &Registry,
    candidate: &InitId,
    requires: &[InitId],
) -> Option<Vec<InitId>> {
    let mut visited = HashSet::new();
    let mut path = Vec::new();
    for req in requires {
        path.push(req.clone());
        if probe(registry, candidate, req, &mut visited, &mut path) {
            return Some(path);
        }
        path.pop();
    }
    None
}

fn probe(
    registry: &Registry,
    candidate: &InitId,
    current: &InitId,
    visited: &mut HashSet<InitId>,
    path: &mut Vec<InitId>,
) -> bool {
    if current == candidate {
        return true;
    }
    if !visited.insert(current.clone()) {
        return false;
    }
    let Some(requires) = registry.requires_of(current) else {
        // Unregistered identity: nothing to traverse (and possibly a stall,
        // but that is the round loop's diagnostic, not ours).
        return false;
    };
    for next in requires {
        path.push(next.clone());
        if probe(registry, candidate, next, visited, path) {
            return true;
        }
        path.pop();
    }
    false
}

/// Renders a cycle path for logs: `session -> auth -> session`.
pub(crate) fn render_path(candidate: &InitId, path: &[InitId]) -> String {
    let mut parts = Vec::with_capacity(path.len() + 1);
    parts.push(candidate.as_str().to_string());
    parts.extend(path.iter().map(|id| id.as_str().to_string()));
    parts.join(" -> ")
}

/// Fail-fast precondition check over the whole registered graph.
///
/// Errors on the first declared prerequisite with no registered node, then on
/// any cycle (Kahn's algorithm: if not every node can be peeled off in
/// dependency order, a cycle remains).
pub(crate) fn check_registered(registry: &Registry) -> Result<(), SchedulerError> {
    for (id, node) in registry.iter_in_order() {
        for req in node.requires() {
            if !registry.contains(req) {
                return Err(SchedulerError::MissingDependency {
                    init: id.clone(),
                    requires: req.clone(),
                });
            }
        }
    }

    let mut in_degree: HashMap<&InitId, usize> = HashMap::new();
    let mut dependents: HashMap<&InitId, Vec<&InitId>> = HashMap::new();
    for (id, node) in registry.iter_in_order() {
        in_degree.insert(id, node.requires().len());
        for req in node.requires() {
            dependents.entry(req).or_default().push(id);
        }
    }

    let mut queue: VecDeque<&InitId> = registry
        .ids_in_order()
        .iter()
        .filter(|id| in_degree.get(id) == Some(&0))
        .collect();
    let mut processed: HashSet<&InitId> = HashSet::new();

    while let Some(current) = queue.pop_front() {
        processed.insert(current);
        if let Some(deps) = dependents.get(current) {
            for &dep in deps {
                if let Some(degree) = in_degree.get_mut(dep) {
                    *degree -= 1;
                    if *degree == 0 {
                        queue.push_back(dep);
                    }
                }
            }
        }
    }

    if processed.len() < registry.len() {
        // Deterministic: report the first cycle member in registration order.
        let stuck = registry
            .ids_in_order()
            .iter()
            .find(|id| !processed.contains(id))
            .cloned();
        if let Some(id) = stuck {
            return Err(SchedulerError::DependencyCycle { id });
        }
    }
    Ok(())
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
    fn no_cycle_in_a_chain() {
        let mut registry = Registry::new();
        registry.insert(node("net", &[]));
        registry.insert(node("auth", &["net"]));

        let candidate = InitId::from("stats");
        let requires = vec![InitId::from("net"), InitId::from("auth")];
        assert!(find_cycle(&registry, &candidate, &requires).is_none());
    }

    #[test]
    fn probe_sees_cycle_through_registered_chain() {
        // auth -> session is registered; registering session -> auth closes
        // the loop and the probe reports it from session's perspective.
        let mut registry = Registry::new();
        registry.insert(node("auth", &["session"]));

        let candidate = InitId::from("session");
        let requires = vec![InitId::from("auth")];
        let path = find_cycle(&registry, &candidate, &requires).unwrap();
        assert_eq!(path.last(), Some(&candidate));
        assert_eq!(
            render_path(&candidate, &path),
            "session -> auth -> session"
        );
    }

    #[test]
    fn probe_is_blind_to_cycles_closed_later() {
        // Registering x -> y while y is unknown cannot see the cycle that a
        // later y -> x registration will close.
        let registry = Registry::new();
        let candidate = InitId::from("x");
        let requires = vec![InitId::from("y")];
        assert!(find_cycle(&registry, &candidate, &requires).is_none());
    }

    #[test]
    fn self_dependency_is_a_cycle() {
        let registry = Registry::new();
        let candidate = InitId::from("boot");
        let requires = vec![InitId::from("boot")];
        let path = find_cycle(&registry, &candidate, &requires).unwrap();
        assert_eq!(render_path(&candidate, &path), "boot -> boot");
    }

    #[test]
    fn check_registered_accepts_a_diamond() {
        let mut registry = Registry::new();
        registry.insert(node("base", &[]));
        registry.insert(node("left", &["base"]));
        registry.insert(node("right", &["base"]));
        registry.insert(node("top", &["left", "right"]));

        assert!(check_registered(&registry).is_ok());
    }

    #[test]
    fn check_registered_flags_missing_prerequisite() {
        let mut registry = Registry::new();
        registry.insert(node("ui", &["ghost"]));

        match check_registered(&registry) {
            Err(SchedulerError::MissingDependency { init, requires }) => {
                assert_eq!(init, InitId::from("ui"));
                assert_eq!(requires, InitId::from("ghost"));
            }
            other => panic!("expected MissingDependency, got {other:?}"),
        }
    }

    #[test]
    fn check_registered_flags_cycle_the_probe_missed() {
        // Built in the order that blinds the registration probe.
        let mut registry = Registry::new();
        registry.insert(node("x", &["y"]));
        registry.insert(node("y", &["x"]));

        match check_registered(&registry) {
            Err(SchedulerError::DependencyCycle { id }) => {
                assert_eq!(id, InitId::from("x"));
            }
            other => panic!("expected DependencyCycle, got {other:?}"),
        }
    }
}
