//! Card-to-scene bindings.
//!
//! A binding governs how one card behaves inside one scene: whether the
//! card is required to enter, how many times it may be used per
//! playthrough, its per-scene cooldown, and the effect multiplier the scene
//! applies to it. The free-form "special effects" and "unlock conditions"
//! payloads of the editing tool are modeled as closed variants here so the
//! engine stays exhaustive; unknown keys are rejected at the boundary.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::DomainError;
use crate::ids::{CardId, SceneId};
use crate::value_objects::attributes::Attribute;

/// How a card participates in a scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum BindingType {
    /// The card must be in the party's pool for the scene to be enterable.
    Required,
    /// The card may be played during the scene.
    Optional,
    /// The card may be played and grants extra effects beyond its base.
    Bonus,
}

impl fmt::Display for BindingType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Required => write!(f, "required"),
            Self::Optional => write!(f, "optional"),
            Self::Bonus => write!(f, "bonus"),
        }
    }
}

impl FromStr for BindingType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "required" => Ok(Self::Required),
            "optional" => Ok(Self::Optional),
            "bonus" => Ok(Self::Bonus),
            _ => Err(DomainError::parse(format!("Unknown binding type: {}", s))),
        }
    }
}

/// Scene-specific effect a card use contributes, beyond its base effect.
///
/// Closed set: the engine consumes exactly these kinds. Anything else in
/// authoring data is a content error, not a passthrough.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub enum BindingEffect {
    /// Flat bonus to one party attribute while the scene is active.
    AttributeBonus { attribute: Attribute, amount: i32 },
    /// Extra payout added when the scene resolves successfully.
    RewardBonus { gold: i64, experience: i64 },
}

/// Condition gating whether a binding is available to the party at all.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub enum UnlockCondition {
    /// Player reputation must be at least this value.
    MinReputation { value: i64 },
    /// At least this many in-game days must have elapsed.
    MinGameDay { day: u32 },
    /// The named scene must already be completed.
    CompletedScene { scene_id: SceneId },
}

/// Associates one card with one scene.
///
/// Multiple bindings may exist per scene (one per card); a card may be
/// bound to many scenes independently.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardBinding {
    scene_id: SceneId,
    card_id: CardId,
    binding_type: BindingType,
    /// Maximum uses within one playthrough of the scene.
    max_uses_per_scene: u32,
    /// Cooldown between uses, in scene rounds.
    cooldown_rounds: u32,
    /// Multiplier applied to the card's downstream effect in this scene.
    effect_modifier: f64,
    #[serde(default)]
    effects: Vec<BindingEffect>,
    #[serde(default)]
    unlock_conditions: Vec<UnlockCondition>,
}

impl CardBinding {
    pub fn new(scene_id: SceneId, card_id: CardId, binding_type: BindingType) -> Self {
        Self {
            scene_id,
            card_id,
            binding_type,
            max_uses_per_scene: 1,
            cooldown_rounds: 0,
            effect_modifier: 1.0,
            effects: Vec::new(),
            unlock_conditions: Vec::new(),
        }
    }

    // === Accessors ===

    pub fn scene_id(&self) -> &SceneId {
        &self.scene_id
    }

    pub fn card_id(&self) -> &CardId {
        &self.card_id
    }

    pub fn binding_type(&self) -> BindingType {
        self.binding_type
    }

    pub fn max_uses_per_scene(&self) -> u32 {
        self.max_uses_per_scene
    }

    pub fn cooldown_rounds(&self) -> u32 {
        self.cooldown_rounds
    }

    pub fn effect_modifier(&self) -> f64 {
        self.effect_modifier
    }

    pub fn effects(&self) -> &[BindingEffect] {
        &self.effects
    }

    pub fn unlock_conditions(&self) -> &[UnlockCondition] {
        &self.unlock_conditions
    }

    // === Builder Methods ===

    pub fn with_max_uses(mut self, max_uses: u32) -> Self {
        self.max_uses_per_scene = max_uses;
        self
    }

    pub fn with_cooldown(mut self, rounds: u32) -> Self {
        self.cooldown_rounds = rounds;
        self
    }

    pub fn with_effect_modifier(mut self, modifier: f64) -> Self {
        self.effect_modifier = modifier;
        self
    }

    pub fn with_effect(mut self, effect: BindingEffect) -> Self {
        self.effects.push(effect);
        self
    }

    pub fn with_unlock_condition(mut self, condition: UnlockCondition) -> Self {
        self.unlock_conditions.push(condition);
        self
    }

    /// Validate invariants required at the content-store write boundary.
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.scene_id.is_empty() {
            return Err(DomainError::validation("Binding scene id cannot be empty"));
        }
        if self.card_id.is_empty() {
            return Err(DomainError::validation("Binding card id cannot be empty"));
        }
        if self.max_uses_per_scene < 1 {
            return Err(DomainError::validation(
                "max_uses_per_scene must be at least 1",
            ));
        }
        if !self.effect_modifier.is_finite() || self.effect_modifier < 0.0 {
            return Err(DomainError::validation(format!(
                "effect_modifier must be a non-negative number, got {}",
                self.effect_modifier
            )));
        }
        Ok(())
    }
}
