//! In-memory content store.
//!
//! Holds the records the editing collaborator produces and enforces the
//! write-time validation rules: record invariants, referential integrity
//! (bindings and rewards must point at existing cards/NPCs), the
//! player-NPC-only rule for NPC rewards, and the prerequisite DAG
//! invariant. Malformed content is rejected here with a specific reason,
//! never discovered later at evaluation time.
//!
//! Records are exchanged whole: putting a requirement set, binding, or
//! reward spec replaces the previous one in full.

use std::collections::{BTreeMap, HashMap};
use std::sync::{PoisonError, RwLock};

use sultan_domain::{
    AttributeRequirements, Card, CardBinding, CardId, DomainError, Npc, NpcId, RewardSpec, Scene,
    SceneId,
};

use crate::error::EngineError;
use crate::ports::ContentStore;
use crate::use_cases::prereq::validate_graph;

#[derive(Default)]
struct Inner {
    scenes: HashMap<SceneId, Scene>,
    requirements: HashMap<SceneId, AttributeRequirements>,
    // One binding per (scene, card); BTreeMap keeps listing order stable.
    bindings: HashMap<SceneId, BTreeMap<CardId, CardBinding>>,
    reward_specs: HashMap<SceneId, RewardSpec>,
    cards: HashMap<CardId, Card>,
    npcs: HashMap<NpcId, Npc>,
}

/// Thread-safe in-memory [`ContentStore`] implementation.
#[derive(Default)]
pub struct MemoryStore {
    inner: RwLock<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    // === Write boundary ===

    /// Insert or replace a scene.
    ///
    /// Rejects the write if the scene record is invalid or if the new
    /// prerequisite list would close a cycle. Dangling prerequisites are
    /// tolerated here (authoring may reference scenes written later) and
    /// surfaced by the graph validator instead.
    pub fn put_scene(&self, scene: Scene) -> Result<(), DomainError> {
        scene.validate()?;
        let mut inner = self.write();

        let mut candidate: Vec<Scene> = inner
            .scenes
            .values()
            .filter(|s| s.scene_id() != scene.scene_id())
            .cloned()
            .collect();
        candidate.push(scene.clone());
        let report = validate_graph(&candidate);
        if let Some(cycle) = report.cycles.first() {
            let path: Vec<&str> = cycle.iter().map(|id| id.as_str()).collect();
            return Err(DomainError::constraint(format!(
                "prerequisite cycle: {} -> {}",
                path.join(" -> "),
                path[0]
            )));
        }

        inner.scenes.insert(scene.scene_id().clone(), scene);
        Ok(())
    }

    /// Replace a scene's attribute requirement set wholesale.
    pub fn put_requirements(
        &self,
        scene_id: SceneId,
        requirements: AttributeRequirements,
    ) -> Result<(), DomainError> {
        let mut inner = self.write();
        if !inner.scenes.contains_key(&scene_id) {
            return Err(DomainError::not_found("Scene", scene_id.as_str()));
        }
        inner.requirements.insert(scene_id, requirements);
        Ok(())
    }

    /// Insert or replace the binding for this binding's (scene, card) pair.
    pub fn put_binding(&self, binding: CardBinding) -> Result<(), DomainError> {
        binding.validate()?;
        let mut inner = self.write();
        if !inner.scenes.contains_key(binding.scene_id()) {
            return Err(DomainError::not_found("Scene", binding.scene_id().as_str()));
        }
        if !inner.cards.contains_key(binding.card_id()) {
            return Err(DomainError::not_found("Card", binding.card_id().as_str()));
        }
        inner
            .bindings
            .entry(binding.scene_id().clone())
            .or_default()
            .insert(binding.card_id().clone(), binding);
        Ok(())
    }

    /// Remove one card's binding from a scene.
    pub fn remove_binding(&self, scene_id: &SceneId, card_id: &CardId) -> Result<(), DomainError> {
        let mut inner = self.write();
        let removed = inner
            .bindings
            .get_mut(scene_id)
            .and_then(|per_scene| per_scene.remove(card_id));
        if removed.is_none() {
            return Err(DomainError::not_found("CardBinding", card_id.as_str()));
        }
        Ok(())
    }

    /// Replace a scene's reward spec wholesale.
    ///
    /// Every referenced card must exist; every referenced NPC must exist
    /// AND be party-ownable, because world NPCs cannot be granted.
    pub fn put_reward_spec(&self, spec: RewardSpec) -> Result<(), DomainError> {
        spec.validate()?;
        let mut inner = self.write();
        if !inner.scenes.contains_key(spec.scene_id()) {
            return Err(DomainError::not_found("Scene", spec.scene_id().as_str()));
        }
        for card in &spec.extended().reward_cards {
            if !inner.cards.contains_key(&card.card_id) {
                return Err(DomainError::not_found("Card", card.card_id.as_str()));
            }
        }
        for npc_reward in &spec.extended().reward_npcs {
            match inner.npcs.get(&npc_reward.npc_id) {
                None => {
                    return Err(DomainError::not_found("NPC", npc_reward.npc_id.as_str()));
                }
                Some(npc) if !npc.is_player_npc() => {
                    return Err(DomainError::validation(format!(
                        "NPC reward '{}' targets a world NPC; only player NPCs can be granted",
                        npc_reward.npc_id
                    )));
                }
                Some(_) => {}
            }
        }
        inner.reward_specs.insert(spec.scene_id().clone(), spec);
        Ok(())
    }

    pub fn put_card(&self, card: Card) -> Result<(), DomainError> {
        card.validate()?;
        let mut inner = self.write();
        inner.cards.insert(card.card_id().clone(), card);
        Ok(())
    }

    pub fn put_npc(&self, npc: Npc) -> Result<(), DomainError> {
        npc.validate()?;
        let mut inner = self.write();
        inner.npcs.insert(npc.npc_id().clone(), npc);
        Ok(())
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, Inner> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, Inner> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }
}

impl ContentStore for MemoryStore {
    fn scene(&self, id: &SceneId) -> Result<Scene, EngineError> {
        self.read()
            .scenes
            .get(id)
            .cloned()
            .ok_or_else(|| EngineError::not_found("Scene", id.as_str()))
    }

    fn requirements_for(&self, id: &SceneId) -> Result<AttributeRequirements, EngineError> {
        let inner = self.read();
        if !inner.scenes.contains_key(id) {
            return Err(EngineError::not_found("Scene", id.as_str()));
        }
        Ok(inner.requirements.get(id).cloned().unwrap_or_default())
    }

    fn bindings_for(&self, id: &SceneId) -> Result<Vec<CardBinding>, EngineError> {
        let inner = self.read();
        if !inner.scenes.contains_key(id) {
            return Err(EngineError::not_found("Scene", id.as_str()));
        }
        Ok(inner
            .bindings
            .get(id)
            .map(|per_scene| per_scene.values().cloned().collect())
            .unwrap_or_default())
    }

    fn reward_spec_for(&self, id: &SceneId) -> Result<RewardSpec, EngineError> {
        let inner = self.read();
        if !inner.scenes.contains_key(id) {
            return Err(EngineError::not_found("Scene", id.as_str()));
        }
        Ok(inner
            .reward_specs
            .get(id)
            .cloned()
            .unwrap_or_else(|| RewardSpec::new(id.clone())))
    }

    fn card(&self, id: &CardId) -> Result<Card, EngineError> {
        self.read()
            .cards
            .get(id)
            .cloned()
            .ok_or_else(|| EngineError::not_found("Card", id.as_str()))
    }

    fn npc(&self, id: &NpcId) -> Result<Npc, EngineError> {
        self.read()
            .npcs
            .get(id)
            .cloned()
            .ok_or_else(|| EngineError::not_found("NPC", id.as_str()))
    }

    fn scenes(&self) -> Result<Vec<Scene>, EngineError> {
        let mut scenes: Vec<Scene> = self.read().scenes.values().cloned().collect();
        scenes.sort_by(|a, b| a.scene_id().cmp(b.scene_id()));
        Ok(scenes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sultan_domain::{
        BindingType, CardCategory, CardRarity, CardReward, ExtendedRewards, Faction, NpcReward,
        SceneCategory, Tier,
    };

    fn store_with_scene(id: &str) -> MemoryStore {
        let store = MemoryStore::new();
        store
            .put_scene(Scene::new(SceneId::new(id), id, SceneCategory::MainStory))
            .unwrap();
        store
    }

    #[test]
    fn put_and_read_scene() {
        let store = store_with_scene("throne_room");
        let scene = store.scene(&SceneId::new("throne_room")).unwrap();
        assert_eq!(scene.name(), "throne_room");
    }

    #[test]
    fn missing_scene_is_a_hard_fault() {
        let store = MemoryStore::new();
        let err = store.scene(&SceneId::new("ghost")).unwrap_err();
        assert!(matches!(err, EngineError::NotFound { .. }));
    }

    #[test]
    fn unconfigured_requirements_default_to_empty() {
        let store = store_with_scene("throne_room");
        let reqs = store.requirements_for(&SceneId::new("throne_room")).unwrap();
        assert!(reqs.is_unconstrained());
    }

    #[test]
    fn requirements_for_missing_scene_faults() {
        let store = MemoryStore::new();
        assert!(store.requirements_for(&SceneId::new("ghost")).is_err());
    }

    #[test]
    fn scene_write_closing_a_cycle_is_rejected() {
        let store = MemoryStore::new();
        store
            .put_scene(
                Scene::new(SceneId::new("a"), "a", SceneCategory::MainStory)
                    .with_prerequisites(vec![SceneId::new("b")]),
            )
            .unwrap();
        let err = store
            .put_scene(
                Scene::new(SceneId::new("b"), "b", SceneCategory::MainStory)
                    .with_prerequisites(vec![SceneId::new("a")]),
            )
            .unwrap_err();
        assert!(matches!(err, DomainError::Constraint(_)));
        assert!(err.to_string().contains("prerequisite cycle"));
        // The offending write was not applied.
        assert!(store.scene(&SceneId::new("b")).is_err());
    }

    #[test]
    fn dangling_prerequisite_is_tolerated_at_write_time() {
        let store = MemoryStore::new();
        let scene = Scene::new(SceneId::new("late"), "late", SceneCategory::SideQuest)
            .with_prerequisites(vec![SceneId::new("not_yet_written")]);
        assert!(store.put_scene(scene).is_ok());
    }

    #[test]
    fn replacing_a_scene_prerequisites_is_wholesale() {
        let store = store_with_scene("a");
        let replacement = Scene::new(SceneId::new("a"), "a", SceneCategory::MainStory)
            .with_prerequisites(vec![SceneId::new("intro")]);
        store.put_scene(replacement).unwrap();
        let scene = store.scene(&SceneId::new("a")).unwrap();
        assert_eq!(scene.prerequisite_scenes(), &[SceneId::new("intro")]);
    }

    #[test]
    fn binding_requires_existing_scene_and_card() {
        let store = store_with_scene("throne_room");
        let binding = CardBinding::new(
            SceneId::new("throne_room"),
            CardId::new("court_pass"),
            BindingType::Required,
        );
        // Card not registered yet.
        assert!(store.put_binding(binding.clone()).is_err());

        store
            .put_card(Card::new(
                CardId::new("court_pass"),
                "Court Pass",
                CardRarity::Rare,
                CardCategory::Access,
            ))
            .unwrap();
        assert!(store.put_binding(binding).is_ok());
        let bindings = store.bindings_for(&SceneId::new("throne_room")).unwrap();
        assert_eq!(bindings.len(), 1);
    }

    #[test]
    fn invalid_binding_is_rejected_at_write_time() {
        let store = store_with_scene("throne_room");
        store
            .put_card(Card::new(
                CardId::new("court_pass"),
                "Court Pass",
                CardRarity::Rare,
                CardCategory::Access,
            ))
            .unwrap();
        let binding = CardBinding::new(
            SceneId::new("throne_room"),
            CardId::new("court_pass"),
            BindingType::Optional,
        )
        .with_max_uses(0);
        assert!(matches!(
            store.put_binding(binding),
            Err(DomainError::Validation(_))
        ));
    }

    #[test]
    fn reward_spec_rejects_world_npc_targets() {
        let store = store_with_scene("throne_room");
        store
            .put_npc(Npc::new(
                NpcId::new("vizier"),
                "Vizier",
                Faction::Minister,
                Tier::Gold,
            ))
            .unwrap();
        let spec = RewardSpec::new(SceneId::new("throne_room")).with_extended(ExtendedRewards {
            reward_npcs: vec![NpcReward::new(NpcId::new("vizier"), 1, 0.5)],
            ..ExtendedRewards::default()
        });
        let err = store.put_reward_spec(spec).unwrap_err();
        assert!(err.to_string().contains("world NPC"));
    }

    #[test]
    fn reward_spec_accepts_player_npc_targets() {
        let store = store_with_scene("throne_room");
        store
            .put_npc(
                Npc::new(
                    NpcId::new("recruit"),
                    "Recruit",
                    Faction::Military,
                    Tier::Bronze,
                )
                .with_player_npc(true),
            )
            .unwrap();
        let spec = RewardSpec::new(SceneId::new("throne_room")).with_extended(ExtendedRewards {
            reward_npcs: vec![NpcReward::new(NpcId::new("recruit"), 1, 0.5)],
            ..ExtendedRewards::default()
        });
        assert!(store.put_reward_spec(spec).is_ok());
    }

    #[test]
    fn reward_spec_rejects_unknown_cards() {
        let store = store_with_scene("throne_room");
        let spec = RewardSpec::new(SceneId::new("throne_room")).with_extended(ExtendedRewards {
            reward_cards: vec![CardReward::new(CardId::new("ghost_card"), 1, 0.5)],
            ..ExtendedRewards::default()
        });
        assert!(matches!(
            store.put_reward_spec(spec),
            Err(DomainError::NotFound { .. })
        ));
    }

    #[test]
    fn unconfigured_reward_spec_defaults_to_zeroes() {
        let store = store_with_scene("throne_room");
        let spec = store.reward_spec_for(&SceneId::new("throne_room")).unwrap();
        assert_eq!(spec.basic().success_gold, 0);
        assert!(spec.extended().reward_cards.is_empty());
    }

    #[test]
    fn scenes_lists_in_id_order() {
        let store = MemoryStore::new();
        for id in ["gamma", "alpha", "beta"] {
            store
                .put_scene(Scene::new(SceneId::new(id), id, SceneCategory::Random))
                .unwrap();
        }
        let ids: Vec<String> = store
            .scenes()
            .unwrap()
            .iter()
            .map(|s| s.scene_id().to_string())
            .collect();
        assert_eq!(ids, vec!["alpha", "beta", "gamma"]);
    }
}
