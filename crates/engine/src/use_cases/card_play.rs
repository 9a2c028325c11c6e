//! Card use validation during an active scene.
//!
//! The engine owns legality (use counters, cooldowns, binding lookup); the
//! nature of the card's downstream effect - an attribute boost in a dice
//! check, say - is owned by the caller, which multiplies the returned
//! effect modifier into it. Usage counters live with the caller's
//! playthrough state, not in the engine; [`ScenePlayTracker`] is a
//! convenience holder for them.

use std::collections::HashMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use sultan_domain::{BindingEffect, CardBinding, CardId, SceneId};

use crate::error::EngineError;
use crate::ports::ContentStore;

/// Integration policy for cards with no binding in the scene.
///
/// The content model supports both readings; the integrator must choose
/// one explicitly - there is no default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum UnboundCardPolicy {
    /// Unbound cards may be played but the scene contributes nothing:
    /// modifier 1.0, no scene effects.
    Inert,
    /// Unbound cards are rejected outright.
    Reject,
}

/// Per-card usage counters within one playthrough of a scene.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CardUsage {
    pub uses_so_far: u32,
    /// Round of the most recent use; `None` if never used.
    pub last_used_round: Option<u32>,
}

/// Why a card use was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UseDenied {
    /// The per-playthrough use cap is spent.
    ExceededUses { max_uses: u32, uses_so_far: u32 },
    /// The cooldown has not elapsed yet.
    CoolingDown { ready_at_round: u32 },
    /// No binding exists and the scene rejects unbound cards.
    NotBound,
}

/// Outcome of a card-use legality check.
#[derive(Debug, Clone, PartialEq)]
pub enum UseDecision {
    /// The use is legal; multiply `effect_modifier` into the card's
    /// downstream effect and apply the scene effects.
    Legal {
        effect_modifier: f64,
        effects: Vec<BindingEffect>,
    },
    Denied(UseDenied),
}

impl UseDecision {
    pub fn is_legal(&self) -> bool {
        matches!(self, Self::Legal { .. })
    }
}

/// Check one card use against a pinned binding.
///
/// `binding` is the scene's binding for this card, if any. Required,
/// optional, and bonus bindings all share the same counter semantics once
/// the scene is underway; `required` additionally gates entry, which is
/// the gating evaluator's job.
pub fn validate(
    binding: Option<&CardBinding>,
    usage: CardUsage,
    current_round: u32,
    policy: UnboundCardPolicy,
) -> UseDecision {
    let Some(binding) = binding else {
        return match policy {
            UnboundCardPolicy::Inert => {
                tracing::warn!("card has no binding for this scene; treating as inert");
                UseDecision::Legal {
                    effect_modifier: 1.0,
                    effects: Vec::new(),
                }
            }
            UnboundCardPolicy::Reject => UseDecision::Denied(UseDenied::NotBound),
        };
    };

    if usage.uses_so_far >= binding.max_uses_per_scene() {
        return UseDecision::Denied(UseDenied::ExceededUses {
            max_uses: binding.max_uses_per_scene(),
            uses_so_far: usage.uses_so_far,
        });
    }

    // Vacuously satisfied when the card has never been used.
    if let Some(last) = usage.last_used_round {
        let elapsed = current_round.checked_sub(last);
        if elapsed.is_none() || elapsed < Some(binding.cooldown_rounds()) {
            return UseDecision::Denied(UseDenied::CoolingDown {
                ready_at_round: last.saturating_add(binding.cooldown_rounds()),
            });
        }
    }

    UseDecision::Legal {
        effect_modifier: binding.effect_modifier(),
        effects: binding.effects().to_vec(),
    }
}

/// Store-backed card-use validation: re-fetches the scene's bindings at
/// call time.
pub struct PlayCard {
    store: Arc<dyn ContentStore>,
}

impl PlayCard {
    pub fn new(store: Arc<dyn ContentStore>) -> Self {
        Self { store }
    }

    /// Validate a use of `card_id` in `scene_id` at `current_round`.
    ///
    /// # Errors
    /// Returns [`EngineError::NotFound`] if the scene or card record does
    /// not exist; an illegal use is reported inside the `UseDecision`.
    pub fn execute(
        &self,
        scene_id: &SceneId,
        card_id: &CardId,
        usage: CardUsage,
        current_round: u32,
        policy: UnboundCardPolicy,
    ) -> Result<UseDecision, EngineError> {
        let _scene = self.store.scene(scene_id)?;
        let _card = self.store.card(card_id)?;
        let bindings = self.store.bindings_for(scene_id)?;
        let binding = bindings.iter().find(|b| b.card_id() == card_id);
        Ok(validate(binding, usage, current_round, policy))
    }
}

/// Usage counters for one playthrough of one scene.
///
/// Owned by the play-session caller; the engine never holds it between
/// calls. Record a use only after the corresponding decision was legal.
#[derive(Debug, Clone, Default)]
pub struct ScenePlayTracker {
    usage: HashMap<CardId, CardUsage>,
}

impl ScenePlayTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Counters for a card; zeroed if the card was never used.
    pub fn usage(&self, card_id: &CardId) -> CardUsage {
        self.usage.get(card_id).copied().unwrap_or_default()
    }

    /// Record a legal use at `round`.
    pub fn record_use(&mut self, card_id: &CardId, round: u32) {
        let entry = self.usage.entry(card_id.clone()).or_default();
        entry.uses_so_far += 1;
        entry.last_used_round = Some(round);
    }
}
