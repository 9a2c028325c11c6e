//! Content entities edited by the external tooling and read by the engine.

pub mod card;
pub mod npc;
pub mod scene;

pub use card::{Card, CardCategory, CardRarity};
pub use npc::{Faction, Npc, NpcAttributes, Tier};
pub use scene::{Scene, SceneCategory, SceneStatus};
