//! Scene gating.
//!
//! Decides whether a party may enter a scene, and reports every unmet
//! condition rather than short-circuiting, so a caller can render a
//! precise explanation. A denial is a normal outcome, not an error; only a
//! missing scene record is a fault.

use std::collections::HashSet;
use std::sync::Arc;

use sultan_domain::{
    Attribute, AttributeRequirements, AttributeTotals, BindingType, CardBinding, CardId, Scene,
    SceneId, SceneStatus,
};

use crate::error::EngineError;
use crate::ports::ContentStore;

/// Snapshot of the entering party's state.
///
/// Attribute totals arrive pre-aggregated - max-per-member, party sum, or
/// whatever policy the caller fixed. The evaluator performs no aggregation
/// itself.
#[derive(Debug, Clone)]
pub struct PlayerSnapshot {
    /// In-game days elapsed since the campaign started.
    pub elapsed_days: u32,
    /// Scene ids the party has already completed.
    pub completed_scenes: HashSet<SceneId>,
    /// Pre-aggregated attribute totals.
    pub attribute_totals: AttributeTotals,
    /// Cards the party brings to the scene.
    pub card_pool: HashSet<CardId>,
    /// NPCs the party fields for this scene.
    pub party_size: u32,
    /// Prior entry attempts for the scene under evaluation.
    pub prior_attempts: u32,
}

impl Default for PlayerSnapshot {
    fn default() -> Self {
        Self {
            elapsed_days: 0,
            completed_scenes: HashSet::new(),
            attribute_totals: AttributeTotals::new(),
            card_pool: HashSet::new(),
            party_size: 1,
            prior_attempts: 0,
        }
    }
}

impl PlayerSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_elapsed_days(mut self, days: u32) -> Self {
        self.elapsed_days = days;
        self
    }

    pub fn with_completed_scenes(mut self, scenes: impl IntoIterator<Item = SceneId>) -> Self {
        self.completed_scenes = scenes.into_iter().collect();
        self
    }

    pub fn with_attribute_totals(mut self, totals: AttributeTotals) -> Self {
        self.attribute_totals = totals;
        self
    }

    pub fn with_cards(mut self, cards: impl IntoIterator<Item = CardId>) -> Self {
        self.card_pool = cards.into_iter().collect();
        self
    }

    pub fn with_party_size(mut self, size: u32) -> Self {
        self.party_size = size;
        self
    }

    pub fn with_prior_attempts(mut self, attempts: u32) -> Self {
        self.prior_attempts = attempts;
        self
    }
}

/// One attribute that fell short of its minimum.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttributeShortfall {
    pub attribute: Attribute,
    pub required: u32,
    pub actual: u32,
}

/// The elapsed-days requirement was not met.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DaysShortfall {
    pub required: u32,
    pub elapsed: u32,
}

/// The party size fell outside the scene's bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PartySizeViolation {
    pub min: u32,
    pub max: u32,
    pub actual: u32,
}

/// A non-repeatable scene has no attempts left.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttemptsExhausted {
    pub max_attempts: u32,
    pub attempts: u32,
}

/// Admission decision with itemized failure reasons.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Decision {
    /// Set when the scene is not in active rotation.
    pub not_active: Option<SceneStatus>,
    /// Every attribute below its minimum (never short-circuited).
    pub failed_attributes: Vec<AttributeShortfall>,
    /// Set when too few in-game days have elapsed.
    pub days: Option<DaysShortfall>,
    /// Prerequisite scenes not yet completed, in the scene's declared order.
    pub missing_prerequisites: Vec<SceneId>,
    /// Cards with `required` bindings absent from the party's pool.
    pub missing_required_cards: Vec<CardId>,
    /// Set when the party size is out of bounds.
    pub party_size: Option<PartySizeViolation>,
    /// Set when a non-repeatable scene is out of attempts.
    pub attempts: Option<AttemptsExhausted>,
}

impl Decision {
    /// True when every check passed.
    pub fn admitted(&self) -> bool {
        self.not_active.is_none()
            && self.failed_attributes.is_empty()
            && self.days.is_none()
            && self.missing_prerequisites.is_empty()
            && self.missing_required_cards.is_empty()
            && self.party_size.is_none()
            && self.attempts.is_none()
    }

    /// Human-readable reasons, suitable for echoing verbatim to a player
    /// or designer.
    pub fn reasons(&self) -> Vec<String> {
        let mut reasons = Vec::new();
        if let Some(status) = self.not_active {
            reasons.push(format!("Scene is not active (status: {})", status));
        }
        for fail in &self.failed_attributes {
            reasons.push(format!(
                "Requires {} {} (have {})",
                fail.attribute, fail.required, fail.actual
            ));
        }
        if let Some(days) = self.days {
            reasons.push(format!(
                "Requires day {} (currently day {})",
                days.required, days.elapsed
            ));
        }
        for prereq in &self.missing_prerequisites {
            reasons.push(format!("Scene not completed: {}", prereq));
        }
        for card in &self.missing_required_cards {
            reasons.push(format!("Missing required card: {}", card));
        }
        if let Some(party) = self.party_size {
            reasons.push(format!(
                "Party size {} outside allowed {}..{}",
                party.actual, party.min, party.max
            ));
        }
        if let Some(attempts) = self.attempts {
            reasons.push(format!(
                "No attempts remaining ({}/{})",
                attempts.attempts, attempts.max_attempts
            ));
        }
        reasons
    }
}

/// Evaluate scene admission against a pinned set of records.
///
/// Pure function of its inputs: calling it twice with identical inputs
/// yields identical decisions. Callers who pinned a scene's configuration
/// at session start use this directly; [`EnterScene`] re-fetches from the
/// store instead.
pub fn evaluate(
    scene: &Scene,
    requirements: &AttributeRequirements,
    bindings: &[CardBinding],
    snapshot: &PlayerSnapshot,
) -> Decision {
    let mut decision = Decision::default();

    if scene.status() != SceneStatus::Active {
        decision.not_active = Some(scene.status());
    }

    for (attribute, required) in requirements.constrained() {
        let actual = snapshot.attribute_totals.total(attribute);
        if actual < required {
            decision.failed_attributes.push(AttributeShortfall {
                attribute,
                required,
                actual,
            });
        }
    }

    if scene.days_required() > 0 && snapshot.elapsed_days < scene.days_required() {
        decision.days = Some(DaysShortfall {
            required: scene.days_required(),
            elapsed: snapshot.elapsed_days,
        });
    }

    for prereq in scene.prerequisite_scenes() {
        if !snapshot.completed_scenes.contains(prereq) {
            decision.missing_prerequisites.push(prereq.clone());
        }
    }

    for binding in bindings {
        if binding.binding_type() == BindingType::Required
            && !snapshot.card_pool.contains(binding.card_id())
        {
            decision.missing_required_cards.push(binding.card_id().clone());
        }
    }

    if snapshot.party_size < scene.min_party_npcs() || snapshot.party_size > scene.max_party_npcs()
    {
        decision.party_size = Some(PartySizeViolation {
            min: scene.min_party_npcs(),
            max: scene.max_party_npcs(),
            actual: snapshot.party_size,
        });
    }

    if !scene.is_repeatable() && snapshot.prior_attempts >= scene.max_attempts() {
        decision.attempts = Some(AttemptsExhausted {
            max_attempts: scene.max_attempts(),
            attempts: snapshot.prior_attempts,
        });
    }

    tracing::debug!(
        scene = %scene.scene_id(),
        admitted = decision.admitted(),
        failed_attributes = decision.failed_attributes.len(),
        missing_prerequisites = decision.missing_prerequisites.len(),
        "scene gating evaluated"
    );

    decision
}

/// Store-backed gating: re-fetches the scene's records at call time so
/// edits are visible on the next call.
pub struct EnterScene {
    store: Arc<dyn ContentStore>,
}

impl EnterScene {
    pub fn new(store: Arc<dyn ContentStore>) -> Self {
        Self { store }
    }

    /// Decide admission for `scene_id` given the party snapshot.
    ///
    /// # Errors
    /// Returns [`EngineError::NotFound`] if the scene does not exist; a
    /// denial is reported inside the `Decision`, not as an error.
    pub fn execute(
        &self,
        scene_id: &SceneId,
        snapshot: &PlayerSnapshot,
    ) -> Result<Decision, EngineError> {
        let scene = self.store.scene(scene_id)?;
        let requirements = self.store.requirements_for(scene_id)?;
        let bindings = self.store.bindings_for(scene_id)?;
        Ok(evaluate(&scene, &requirements, &bindings, snapshot))
    }
}
