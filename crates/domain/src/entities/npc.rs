//! NPC entity.
//!
//! World NPCs populate scenes; player NPCs can be owned by a party and are
//! the only valid targets of NPC rewards.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::DomainError;
use crate::ids::NpcId;

/// The six factions of the court.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Faction {
    Sultan,
    Minister,
    Military,
    Blackduck,
    Commoner,
    Scholar,
}

impl std::fmt::Display for Faction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Sultan => "sultan",
            Self::Minister => "minister",
            Self::Military => "military",
            Self::Blackduck => "blackduck",
            Self::Commoner => "commoner",
            Self::Scholar => "scholar",
        };
        write!(f, "{}", name)
    }
}

/// Quality tier of an NPC.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Tier {
    Bronze,
    Silver,
    Gold,
    Legendary,
}

/// The fixed attribute block every NPC carries.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NpcAttributes {
    pub intelligence: u32,
    pub strength: u32,
    pub defense: u32,
    pub charisma: u32,
    pub loyalty: u32,
    pub fear: u32,
    pub health: u32,
}

/// An NPC record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Npc {
    npc_id: NpcId,
    name: String,
    faction: Faction,
    tier: Tier,
    attributes: NpcAttributes,
    /// Party-ownable NPCs may be granted as rewards; world NPCs may not.
    is_player_npc: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Npc {
    pub fn new(npc_id: NpcId, name: impl Into<String>, faction: Faction, tier: Tier) -> Self {
        let now = Utc::now();
        Self {
            npc_id,
            name: name.into(),
            faction,
            tier,
            attributes: NpcAttributes::default(),
            is_player_npc: false,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn npc_id(&self) -> &NpcId {
        &self.npc_id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn faction(&self) -> Faction {
        self.faction
    }

    pub fn tier(&self) -> Tier {
        self.tier
    }

    pub fn attributes(&self) -> &NpcAttributes {
        &self.attributes
    }

    pub fn is_player_npc(&self) -> bool {
        self.is_player_npc
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    pub fn with_attributes(mut self, attributes: NpcAttributes) -> Self {
        self.attributes = attributes;
        self
    }

    pub fn with_player_npc(mut self, is_player_npc: bool) -> Self {
        self.is_player_npc = is_player_npc;
        self
    }

    pub fn validate(&self) -> Result<(), DomainError> {
        if self.npc_id.is_empty() {
            return Err(DomainError::validation("NPC id cannot be empty"));
        }
        if self.name.trim().is_empty() {
            return Err(DomainError::validation("NPC name cannot be empty"));
        }
        Ok(())
    }
}
