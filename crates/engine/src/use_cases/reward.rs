//! Reward resolution.
//!
//! Turns a scene outcome plus a caller-supplied performance signal into a
//! concrete payout. The basic layer is emitted verbatim; the extended
//! success layer scales with `performance_multiplier * performance` and
//! truncates to integers; the probabilistic pools are drawn independently
//! from a caller-provided RNG so a seeded source reproduces the payout
//! exactly. The resolver mutates no inventory - applying the payout is the
//! caller's job.

use std::sync::Arc;

use rand::Rng;
use serde::{Deserialize, Serialize};
use sultan_domain::{CardId, NpcId, RewardSpec, SceneId};

use crate::error::EngineError;
use crate::ports::ContentStore;

/// Terminal outcome of a scene playthrough.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SceneOutcome {
    Success,
    Failure,
}

/// Cards granted by a resolution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardGrant {
    pub card_id: CardId,
    pub quantity: u32,
}

/// NPCs granted by a resolution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NpcGrant {
    pub npc_id: NpcId,
    pub quantity: u32,
}

/// The concrete rewards of one resolution. All numeric fields are signed
/// deltas against the player's holdings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Payout {
    pub attribute_points: i64,
    pub experience: i64,
    pub reputation: i64,
    pub gold: i64,
    pub cards: Vec<CardGrant>,
    pub npcs: Vec<NpcGrant>,
    /// Scenes unlocked by a successful completion.
    pub unlocked_scenes: Vec<SceneId>,
}

/// Resolve a pinned reward spec.
///
/// Deterministic given `(spec, outcome, performance)` and the RNG state:
/// seeding the RNG identically reproduces the payout, which is what makes
/// the probabilistic pools testable. Pool entries are evaluated
/// independently, in list order, one uniform draw each.
pub fn resolve_spec<R: Rng + ?Sized>(
    spec: &RewardSpec,
    outcome: SceneOutcome,
    performance: f64,
    rng: &mut R,
) -> Payout {
    let basic = spec.basic();
    let extended = spec.extended();
    let mut payout = Payout::default();

    match outcome {
        SceneOutcome::Success => {
            // Negative performance is clamped; the scale factor is never
            // allowed to turn a reward into a penalty.
            let factor = extended.performance_multiplier * performance.max(0.0);
            let scale = |value: i64| (value as f64 * factor).trunc() as i64;

            payout.attribute_points =
                basic.success_attribute_points + scale(extended.success_attribute_points);
            payout.experience = basic.success_experience + scale(extended.success_experience);
            payout.reputation = basic.success_reputation + scale(extended.success_reputation);
            payout.gold = basic.success_gold + scale(extended.success_gold);

            for entry in &extended.reward_cards {
                if rng.gen::<f64>() < entry.probability {
                    payout.cards.push(CardGrant {
                        card_id: entry.card_id.clone(),
                        quantity: entry.quantity,
                    });
                }
            }
            for entry in &extended.reward_npcs {
                if rng.gen::<f64>() < entry.probability {
                    payout.npcs.push(NpcGrant {
                        npc_id: entry.npc_id.clone(),
                        quantity: entry.quantity,
                    });
                }
            }

            payout.unlocked_scenes = extended.unlocked_scenes.clone();
        }
        SceneOutcome::Failure => {
            // Failure penalties are flat by design: no performance scaling,
            // no probabilistic pools.
            payout.reputation = basic.failure_reputation;
            payout.gold = -extended.failure_gold;
            payout.attribute_points = -extended.failure_attribute_penalty;
        }
    }

    tracing::debug!(
        scene = %spec.scene_id(),
        ?outcome,
        gold = payout.gold,
        cards = payout.cards.len(),
        npcs = payout.npcs.len(),
        "rewards resolved"
    );

    payout
}

/// Store-backed resolution: re-fetches the scene's reward spec at call
/// time. The scene itself is fetched first so an unknown id surfaces as a
/// hard fault rather than resolving an empty default spec.
pub struct ResolveRewards {
    store: Arc<dyn ContentStore>,
}

impl ResolveRewards {
    pub fn new(store: Arc<dyn ContentStore>) -> Self {
        Self { store }
    }

    pub fn execute<R: Rng + ?Sized>(
        &self,
        scene_id: &SceneId,
        outcome: SceneOutcome,
        performance: f64,
        rng: &mut R,
    ) -> Result<Payout, EngineError> {
        let _scene = self.store.scene(scene_id)?;
        let spec = self.store.reward_spec_for(scene_id)?;
        Ok(resolve_spec(&spec, outcome, performance, rng))
    }
}
