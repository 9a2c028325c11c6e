//! Sultan Game engine crate.
//!
//! The rule core behind scene play: admission gating, card-binding
//! legality, reward resolution, and prerequisite graph validation. The
//! engine is stateless between calls - every operation takes fully
//! materialized records (fetched through the [`ports::ContentStore`] port
//! or pinned by the caller) plus player state, and returns a value. No
//! operation blocks, performs I/O, or holds process-wide mutable state,
//! so concurrent requests need no locking at this layer.

pub mod error;
pub mod ports;
pub mod store;
pub mod use_cases;

#[cfg(test)]
mod e2e_tests;

pub use error::EngineError;
pub use ports::ContentStore;
pub use store::MemoryStore;
pub use use_cases::{
    card_play, gating, prereq, reward, AttemptsExhausted, AttributeShortfall, CardGrant,
    CardUsage, DanglingPrerequisite, DaysShortfall, Decision, EnterScene, GraphReport, NpcGrant,
    PartySizeViolation, Payout, PlayCard, PlayerSnapshot, ResolveRewards, ScenePlayTracker,
    SceneOutcome, UnboundCardPolicy, UseDecision, UseDenied, ValidatePrerequisites,
};
