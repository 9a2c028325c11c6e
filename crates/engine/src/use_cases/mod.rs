//! Engine use cases.
//!
//! One module per operation family: scene gating, card-use validation,
//! reward resolution, and prerequisite graph validation. Each exposes a
//! pure function over pinned records plus a store-backed wrapper that
//! re-fetches records at call time.

pub mod card_play;
pub mod gating;
pub mod prereq;
pub mod reward;

pub use card_play::{
    CardUsage, PlayCard, ScenePlayTracker, UnboundCardPolicy, UseDecision, UseDenied,
};
pub use gating::{
    AttemptsExhausted, AttributeShortfall, DaysShortfall, Decision, EnterScene,
    PartySizeViolation, PlayerSnapshot,
};
pub use prereq::{DanglingPrerequisite, GraphReport, ValidatePrerequisites};
pub use reward::{CardGrant, NpcGrant, Payout, ResolveRewards, SceneOutcome};
