//! Prerequisite graph validation.
//!
//! The prerequisite relation across all scenes must stay a DAG. This
//! validator runs when a scene's prerequisite list is edited (not on every
//! gating check) and reports full diagnostic detail: each cycle as an
//! ordered id list and every dangling reference, so the editor can show
//! the human exactly what to fix.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use sultan_domain::{Scene, SceneId};

use crate::error::EngineError;
use crate::ports::ContentStore;

/// A prerequisite pointing at a scene that does not exist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DanglingPrerequisite {
    /// The scene whose prerequisite list holds the reference.
    pub scene_id: SceneId,
    /// The referenced id with no matching scene.
    pub missing: SceneId,
}

/// Result of validating the full prerequisite graph.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GraphReport {
    /// Each cycle as an ordered list of scene ids; the last entry requires
    /// the first. Rotated so the smallest id leads, and deduplicated.
    pub cycles: Vec<Vec<SceneId>>,
    /// Prerequisites referencing non-existent scenes.
    pub dangling: Vec<DanglingPrerequisite>,
}

impl GraphReport {
    pub fn is_valid(&self) -> bool {
        self.cycles.is_empty() && self.dangling.is_empty()
    }

    /// Human-readable reasons, suitable for echoing verbatim in the editor.
    pub fn reasons(&self) -> Vec<String> {
        let mut reasons = Vec::new();
        for cycle in &self.cycles {
            let path: Vec<&str> = cycle.iter().map(|id| id.as_str()).collect();
            reasons.push(format!(
                "Prerequisite cycle: {} -> {}",
                path.join(" -> "),
                path[0]
            ));
        }
        for d in &self.dangling {
            reasons.push(format!(
                "Scene '{}' requires unknown scene '{}'",
                d.scene_id, d.missing
            ));
        }
        reasons
    }
}

/// Validate the prerequisite graph over a full set of scenes.
///
/// Cycle detection is a depth-first traversal with a recursion-stack
/// marker; a back-edge yields the whole offending path, not just "cycle
/// detected". Scenes are visited in id order so reports are deterministic.
pub fn validate_graph(scenes: &[Scene]) -> GraphReport {
    let by_id: BTreeMap<&SceneId, &Scene> =
        scenes.iter().map(|s| (s.scene_id(), s)).collect();

    let mut dangling = Vec::new();
    for scene in by_id.values() {
        for prereq in scene.prerequisite_scenes() {
            if !by_id.contains_key(prereq) {
                dangling.push(DanglingPrerequisite {
                    scene_id: scene.scene_id().clone(),
                    missing: prereq.clone(),
                });
            }
        }
    }

    let mut visited: BTreeSet<&SceneId> = BTreeSet::new();
    let mut seen_cycles: BTreeSet<Vec<SceneId>> = BTreeSet::new();
    for start in by_id.keys() {
        if !visited.contains(*start) {
            let mut stack: Vec<&SceneId> = Vec::new();
            visit(start, &by_id, &mut visited, &mut stack, &mut seen_cycles);
        }
    }

    GraphReport {
        cycles: seen_cycles.into_iter().collect(),
        dangling,
    }
}

fn visit<'a>(
    node: &'a SceneId,
    by_id: &BTreeMap<&'a SceneId, &'a Scene>,
    visited: &mut BTreeSet<&'a SceneId>,
    stack: &mut Vec<&'a SceneId>,
    cycles: &mut BTreeSet<Vec<SceneId>>,
) {
    if let Some(pos) = stack.iter().position(|id| *id == node) {
        // Back-edge: everything from the first occurrence onward is the cycle.
        let cycle: Vec<SceneId> = stack[pos..].iter().map(|id| (*id).clone()).collect();
        cycles.insert(normalize_cycle(cycle));
        return;
    }
    if visited.contains(node) {
        return;
    }
    let Some(scene) = by_id.get(node) else {
        // Dangling reference; reported separately.
        return;
    };

    stack.push(node);
    for prereq in scene.prerequisite_scenes() {
        visit(prereq, by_id, visited, stack, cycles);
    }
    stack.pop();
    visited.insert(node);
}

/// Rotate a cycle so its smallest id comes first, making equal cycles
/// found from different entry points compare equal.
fn normalize_cycle(cycle: Vec<SceneId>) -> Vec<SceneId> {
    let Some(min_pos) = cycle
        .iter()
        .enumerate()
        .min_by(|a, b| a.1.cmp(b.1))
        .map(|(i, _)| i)
    else {
        return cycle;
    };
    let mut rotated = Vec::with_capacity(cycle.len());
    rotated.extend_from_slice(&cycle[min_pos..]);
    rotated.extend_from_slice(&cycle[..min_pos]);
    rotated
}

/// Store-backed wrapper: validates the prerequisite graph over the whole
/// content store. Invoked by the editing collaborator after an edit.
pub struct ValidatePrerequisites {
    store: Arc<dyn ContentStore>,
}

impl ValidatePrerequisites {
    pub fn new(store: Arc<dyn ContentStore>) -> Self {
        Self { store }
    }

    pub fn execute(&self) -> Result<GraphReport, EngineError> {
        let scenes = self.store.scenes()?;
        let report = validate_graph(&scenes);
        if !report.is_valid() {
            tracing::warn!(
                cycles = report.cycles.len(),
                dangling = report.dangling.len(),
                "prerequisite graph validation failed"
            );
        }
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sultan_domain::SceneCategory;

    fn scene(id: &str, prereqs: &[&str]) -> Scene {
        Scene::new(SceneId::new(id), id, SceneCategory::SideQuest)
            .with_prerequisites(prereqs.iter().map(|p| SceneId::new(*p)))
    }

    #[test]
    fn empty_graph_is_valid() {
        assert!(validate_graph(&[]).is_valid());
    }

    #[test]
    fn linear_chain_is_valid() {
        let scenes = vec![
            scene("a", &[]),
            scene("b", &["a"]),
            scene("c", &["b", "a"]),
        ];
        let report = validate_graph(&scenes);
        assert!(report.is_valid(), "unexpected report: {:?}", report);
    }

    #[test]
    fn diamond_is_valid() {
        let scenes = vec![
            scene("root", &[]),
            scene("left", &["root"]),
            scene("right", &["root"]),
            scene("join", &["left", "right"]),
        ];
        assert!(validate_graph(&scenes).is_valid());
    }

    #[test]
    fn two_cycle_is_reported_with_full_path() {
        let scenes = vec![scene("a", &["b"]), scene("b", &["a"])];
        let report = validate_graph(&scenes);
        assert_eq!(report.cycles.len(), 1);
        assert_eq!(
            report.cycles[0],
            vec![SceneId::new("a"), SceneId::new("b")]
        );
    }

    #[test]
    fn three_cycle_is_reported_once_regardless_of_entry_point() {
        let scenes = vec![
            scene("c", &["b"]),
            scene("a", &["c"]),
            scene("b", &["a"]),
        ];
        let report = validate_graph(&scenes);
        assert_eq!(report.cycles.len(), 1);
        let cycle = &report.cycles[0];
        assert_eq!(cycle.len(), 3);
        assert_eq!(cycle[0], SceneId::new("a"));
    }

    #[test]
    fn dangling_reference_is_reported() {
        let scenes = vec![scene("a", &["ghost"])];
        let report = validate_graph(&scenes);
        assert!(report.cycles.is_empty());
        assert_eq!(
            report.dangling,
            vec![DanglingPrerequisite {
                scene_id: SceneId::new("a"),
                missing: SceneId::new("ghost"),
            }]
        );
        assert!(!report.is_valid());
    }

    #[test]
    fn cycle_and_dangling_reported_together() {
        let scenes = vec![scene("a", &["b", "ghost"]), scene("b", &["a"])];
        let report = validate_graph(&scenes);
        assert_eq!(report.cycles.len(), 1);
        assert_eq!(report.dangling.len(), 1);
        assert_eq!(report.reasons().len(), 2);
    }

    #[test]
    fn reasons_spell_out_the_cycle() {
        let scenes = vec![scene("a", &["b"]), scene("b", &["a"])];
        let reasons = validate_graph(&scenes).reasons();
        assert_eq!(reasons, vec!["Prerequisite cycle: a -> b -> a".to_string()]);
    }

    #[test]
    fn disjoint_components_each_checked() {
        let scenes = vec![
            scene("a", &[]),
            scene("b", &["a"]),
            scene("x", &["y"]),
            scene("y", &["x"]),
        ];
        let report = validate_graph(&scenes);
        assert_eq!(report.cycles.len(), 1);
        assert_eq!(report.cycles[0][0], SceneId::new("x"));
    }
}
