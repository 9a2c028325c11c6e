//! Scene entity - a discrete unit of playable content with entry rules
//! and a reward outcome.
//!
//! Entry gating data (attribute requirements, card bindings, reward spec)
//! lives in separate records keyed by the scene id; the scene itself
//! carries identity, lifecycle, and its display configuration.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::DomainError;
use crate::ids::SceneId;

/// Narrative category of a scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SceneCategory {
    /// Main storyline content
    MainStory,
    /// Optional side content
    SideQuest,
    /// Faction-specific content
    Faction,
    /// Random encounter
    Random,
}

impl std::fmt::Display for SceneCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MainStory => write!(f, "main_story"),
            Self::SideQuest => write!(f, "side_quest"),
            Self::Faction => write!(f, "faction"),
            Self::Random => write!(f, "random"),
        }
    }
}

impl std::str::FromStr for SceneCategory {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "main_story" => Ok(Self::MainStory),
            "side_quest" => Ok(Self::SideQuest),
            "faction" => Ok(Self::Faction),
            "random" => Ok(Self::Random),
            _ => Err(DomainError::parse(format!("Unknown scene category: {}", s))),
        }
    }
}

/// Lifecycle status of a scene. Transitions are one-way:
/// draft -> active -> archived.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[derive(Default)]
pub enum SceneStatus {
    #[default]
    Draft,
    Active,
    Archived,
}

impl std::fmt::Display for SceneStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Draft => write!(f, "draft"),
            Self::Active => write!(f, "active"),
            Self::Archived => write!(f, "archived"),
        }
    }
}

/// A scene record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Scene {
    scene_id: SceneId,
    name: String,
    category: SceneCategory,
    status: SceneStatus,
    chapter: u32,
    /// Number of card slots available while playing the scene.
    card_slots: u32,
    /// In-game days that must have elapsed before the scene opens.
    days_required: u32,
    /// Scenes that must be completed first, in display order.
    prerequisite_scenes: Vec<SceneId>,
    /// Whether the scene can be replayed after completion.
    is_repeatable: bool,
    /// Entry attempts allowed before the scene locks (ignored when repeatable).
    max_attempts: u32,
    min_party_npcs: u32,
    max_party_npcs: u32,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Scene {
    pub fn new(scene_id: SceneId, name: impl Into<String>, category: SceneCategory) -> Self {
        let now = Utc::now();
        Self {
            scene_id,
            name: name.into(),
            category,
            status: SceneStatus::Draft,
            chapter: 1,
            card_slots: 0,
            days_required: 0,
            prerequisite_scenes: Vec::new(),
            is_repeatable: false,
            max_attempts: 1,
            min_party_npcs: 1,
            max_party_npcs: 3,
            created_at: now,
            updated_at: now,
        }
    }

    // === Accessors ===

    pub fn scene_id(&self) -> &SceneId {
        &self.scene_id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn category(&self) -> SceneCategory {
        self.category
    }

    pub fn status(&self) -> SceneStatus {
        self.status
    }

    pub fn chapter(&self) -> u32 {
        self.chapter
    }

    pub fn card_slots(&self) -> u32 {
        self.card_slots
    }

    pub fn days_required(&self) -> u32 {
        self.days_required
    }

    pub fn prerequisite_scenes(&self) -> &[SceneId] {
        &self.prerequisite_scenes
    }

    pub fn is_repeatable(&self) -> bool {
        self.is_repeatable
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    pub fn min_party_npcs(&self) -> u32 {
        self.min_party_npcs
    }

    pub fn max_party_npcs(&self) -> u32 {
        self.max_party_npcs
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    // === Builder Methods ===

    pub fn with_chapter(mut self, chapter: u32) -> Self {
        self.chapter = chapter;
        self
    }

    pub fn with_card_slots(mut self, slots: u32) -> Self {
        self.card_slots = slots;
        self
    }

    pub fn with_days_required(mut self, days: u32) -> Self {
        self.days_required = days;
        self
    }

    pub fn with_prerequisites(mut self, scenes: impl IntoIterator<Item = SceneId>) -> Self {
        self.prerequisite_scenes = scenes.into_iter().collect();
        self
    }

    pub fn with_repeatable(mut self, repeatable: bool) -> Self {
        self.is_repeatable = repeatable;
        self
    }

    pub fn with_max_attempts(mut self, attempts: u32) -> Self {
        self.max_attempts = attempts;
        self
    }

    pub fn with_party_bounds(mut self, min: u32, max: u32) -> Self {
        self.min_party_npcs = min;
        self.max_party_npcs = max;
        self
    }

    /// Set the status directly (used when loading from storage).
    pub fn with_status(mut self, status: SceneStatus) -> Self {
        self.status = status;
        self
    }

    // === Lifecycle ===

    /// Move a draft scene into active rotation.
    pub fn activate(&mut self) -> Result<(), DomainError> {
        match self.status {
            SceneStatus::Draft => {
                self.status = SceneStatus::Active;
                self.updated_at = Utc::now();
                Ok(())
            }
            other => Err(DomainError::invalid_state_transition(format!(
                "{} -> active",
                other
            ))),
        }
    }

    /// Retire an active scene.
    pub fn archive(&mut self) -> Result<(), DomainError> {
        match self.status {
            SceneStatus::Active => {
                self.status = SceneStatus::Archived;
                self.updated_at = Utc::now();
                Ok(())
            }
            other => Err(DomainError::invalid_state_transition(format!(
                "{} -> archived",
                other
            ))),
        }
    }

    /// Validate invariants required at the content-store write boundary.
    ///
    /// The cross-scene DAG invariant over prerequisites is checked by the
    /// graph validator, which sees the full store; here we only reject
    /// what a single record can prove wrong.
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.scene_id.is_empty() {
            return Err(DomainError::validation("Scene id cannot be empty"));
        }
        if self.name.trim().is_empty() {
            return Err(DomainError::validation("Scene name cannot be empty"));
        }
        if self.chapter < 1 {
            return Err(DomainError::validation("Scene chapter must be at least 1"));
        }
        if self.max_attempts < 1 {
            return Err(DomainError::validation("max_attempts must be at least 1"));
        }
        if self.min_party_npcs < 1 || self.min_party_npcs > self.max_party_npcs {
            return Err(DomainError::validation(format!(
                "party bounds must satisfy 1 <= min <= max, got {}..{}",
                self.min_party_npcs, self.max_party_npcs
            )));
        }
        if self.prerequisite_scenes.contains(&self.scene_id) {
            return Err(DomainError::validation(format!(
                "Scene '{}' cannot require itself",
                self.scene_id
            )));
        }
        for (i, prereq) in self.prerequisite_scenes.iter().enumerate() {
            if prereq.is_empty() {
                return Err(DomainError::validation("Prerequisite id cannot be empty"));
            }
            if self.prerequisite_scenes[..i].contains(prereq) {
                return Err(DomainError::validation(format!(
                    "Duplicate prerequisite '{}'",
                    prereq
                )));
            }
        }
        Ok(())
    }
}
