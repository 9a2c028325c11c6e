//! Port traits for the content-store boundary.
//!
//! This is the ONLY abstraction in the engine; everything else is concrete
//! types. Every engine operation re-reads the records it needs through
//! this port at call time, so edits made by the external tooling are
//! visible on the next call. All methods are synchronous: inputs are
//! already-resolved in-memory records and no operation at this layer may
//! block or perform I/O. Callers wanting session-stable configuration pin
//! a copy of the records instead and use the pure evaluation functions.

use sultan_domain::{
    AttributeRequirements, Card, CardBinding, CardId, Npc, NpcId, RewardSpec, Scene, SceneId,
};

use crate::error::EngineError;

/// Read access to the content records the engine consumes.
///
/// A missing record is a hard fault ([`EngineError::NotFound`]), never a
/// silent default - except for requirement sets, bindings, and reward
/// specs, which default to "empty" for an existing scene because the
/// editing tool creates them lazily.
#[cfg_attr(test, mockall::automock)]
pub trait ContentStore: Send + Sync {
    fn scene(&self, id: &SceneId) -> Result<Scene, EngineError>;

    /// The scene's attribute requirement set; all-zero if never configured.
    fn requirements_for(&self, id: &SceneId) -> Result<AttributeRequirements, EngineError>;

    /// All card bindings configured for the scene; empty if none.
    fn bindings_for(&self, id: &SceneId) -> Result<Vec<CardBinding>, EngineError>;

    /// The scene's reward spec; zeroed defaults if never configured.
    fn reward_spec_for(&self, id: &SceneId) -> Result<RewardSpec, EngineError>;

    fn card(&self, id: &CardId) -> Result<Card, EngineError>;

    fn npc(&self, id: &NpcId) -> Result<Npc, EngineError>;

    /// Every scene in the store. Only the prerequisite graph validator
    /// needs this full view.
    fn scenes(&self) -> Result<Vec<Scene>, EngineError>;
}
