//! Sultan Game domain crate.
//!
//! Pure content records and invariants: scenes, cards, NPCs, attribute
//! requirements, card bindings, and reward specifications. No I/O, no
//! randomness, no async - the engine crate consumes these records and the
//! external editing tooling produces them.

pub mod entities;
pub mod error;
pub mod ids;
pub mod value_objects;

// Re-export entities
pub use entities::{Card, CardCategory, CardRarity, Faction, Npc, NpcAttributes, Scene,
    SceneCategory, SceneStatus, Tier};

pub use error::DomainError;

// Re-export ID types
pub use ids::{CardId, NpcId, SceneId};

// Re-export value objects
pub use value_objects::{
    Attribute, AttributeRequirements, AttributeTotals, BasicRewards, BindingEffect, BindingType,
    CardBinding, CardReward, ExtendedRewards, NpcReward, RewardSpec, UnlockCondition,
};
