//! Reward specifications.
//!
//! Each scene carries a two-layer reward spec: a basic layer of fixed
//! payouts that are never scaled, and an extended layer whose success
//! fields scale with the party's performance and which may grant cards and
//! NPCs probabilistically.

use serde::{Deserialize, Serialize};

use crate::error::DomainError;
use crate::ids::{CardId, NpcId, SceneId};

/// Fixed payouts, never scaled by performance.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BasicRewards {
    pub success_attribute_points: i64,
    pub success_experience: i64,
    pub success_reputation: i64,
    pub success_gold: i64,
    /// Reputation delta applied on failure (signed; usually negative).
    pub failure_reputation: i64,
}

/// A card entry in the probabilistic reward pool.
///
/// Each entry is drawn independently; probabilities in a pool need not sum
/// to one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardReward {
    pub card_id: CardId,
    pub quantity: u32,
    pub probability: f64,
}

impl CardReward {
    pub fn new(card_id: CardId, quantity: u32, probability: f64) -> Self {
        Self {
            card_id,
            quantity,
            probability,
        }
    }
}

/// An NPC entry in the probabilistic reward pool. Only player-ownable NPCs
/// are valid targets; the content store enforces that at write time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NpcReward {
    pub npc_id: NpcId,
    pub quantity: u32,
    pub probability: f64,
}

impl NpcReward {
    pub fn new(npc_id: NpcId, quantity: u32, probability: f64) -> Self {
        Self {
            npc_id,
            quantity,
            probability,
        }
    }
}

/// Tunable payouts layered on top of [`BasicRewards`].
///
/// Success fields scale with `performance_multiplier` and the caller's
/// performance signal; failure penalties are flat magnitudes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ExtendedRewards {
    pub success_attribute_points: i64,
    pub success_experience: i64,
    pub success_reputation: i64,
    pub success_gold: i64,
    /// Gold lost on failure, as a non-negative magnitude.
    pub failure_gold: i64,
    /// Attribute points lost on failure, as a non-negative magnitude.
    pub failure_attribute_penalty: i64,
    pub reward_cards: Vec<CardReward>,
    pub reward_npcs: Vec<NpcReward>,
    /// Scene ids unlocked by a successful completion.
    pub unlocked_scenes: Vec<SceneId>,
    /// Multiplier applied to the extended numeric success fields.
    pub performance_multiplier: f64,
}

impl Default for ExtendedRewards {
    fn default() -> Self {
        Self {
            success_attribute_points: 0,
            success_experience: 0,
            success_reputation: 0,
            success_gold: 0,
            failure_gold: 0,
            failure_attribute_penalty: 0,
            reward_cards: Vec::new(),
            reward_npcs: Vec::new(),
            unlocked_scenes: Vec::new(),
            performance_multiplier: 1.0,
        }
    }
}

/// Complete reward configuration for one scene.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RewardSpec {
    scene_id: SceneId,
    basic: BasicRewards,
    #[serde(default)]
    extended: ExtendedRewards,
}

impl RewardSpec {
    pub fn new(scene_id: SceneId) -> Self {
        Self {
            scene_id,
            basic: BasicRewards::default(),
            extended: ExtendedRewards::default(),
        }
    }

    pub fn scene_id(&self) -> &SceneId {
        &self.scene_id
    }

    pub fn basic(&self) -> &BasicRewards {
        &self.basic
    }

    pub fn extended(&self) -> &ExtendedRewards {
        &self.extended
    }

    pub fn with_basic(mut self, basic: BasicRewards) -> Self {
        self.basic = basic;
        self
    }

    pub fn with_extended(mut self, extended: ExtendedRewards) -> Self {
        self.extended = extended;
        self
    }

    /// Validate invariants required at the content-store write boundary.
    ///
    /// Malformed probabilities and quantities are rejected here so the
    /// resolver never has to re-check them.
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.scene_id.is_empty() {
            return Err(DomainError::validation("Reward scene id cannot be empty"));
        }
        let mult = self.extended.performance_multiplier;
        if !mult.is_finite() || mult < 0.0 {
            return Err(DomainError::validation(format!(
                "performance_multiplier must be a non-negative number, got {}",
                mult
            )));
        }
        if self.extended.failure_gold < 0 {
            return Err(DomainError::validation(
                "failure_gold is a magnitude and cannot be negative",
            ));
        }
        if self.extended.failure_attribute_penalty < 0 {
            return Err(DomainError::validation(
                "failure_attribute_penalty is a magnitude and cannot be negative",
            ));
        }
        for card in &self.extended.reward_cards {
            validate_pool_entry("card", card.card_id.as_str(), card.quantity, card.probability)?;
        }
        for npc in &self.extended.reward_npcs {
            validate_pool_entry("NPC", npc.npc_id.as_str(), npc.quantity, npc.probability)?;
        }
        Ok(())
    }
}

fn validate_pool_entry(
    kind: &str,
    id: &str,
    quantity: u32,
    probability: f64,
) -> Result<(), DomainError> {
    if id.is_empty() {
        return Err(DomainError::validation(format!(
            "{} reward id cannot be empty",
            kind
        )));
    }
    if quantity < 1 {
        return Err(DomainError::validation(format!(
            "{} reward '{}' quantity must be at least 1",
            kind, id
        )));
    }
    if !probability.is_finite() || !(0.0..=1.0).contains(&probability) {
        return Err(DomainError::validation(format!(
            "{} reward '{}' probability must be within [0, 1], got {}",
            kind, id, probability
        )));
    }
    Ok(())
}
