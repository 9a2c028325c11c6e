//! The fixed attribute dimensions used by scene gating.
//!
//! Scene entry requirements and party snapshots both range over the same
//! nine attributes. A value of zero always means "unconstrained" on the
//! requirement side.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// The fixed, closed set of attributes a scene can gate on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Attribute {
    Strength,
    Defense,
    Intelligence,
    Charisma,
    Loyalty,
    Influence,
    Command,
    Stealth,
    Health,
}

impl Attribute {
    /// All attributes in canonical order. Gating iterates this so failure
    /// reports come out in a stable order.
    pub const ALL: [Attribute; 9] = [
        Attribute::Strength,
        Attribute::Defense,
        Attribute::Intelligence,
        Attribute::Charisma,
        Attribute::Loyalty,
        Attribute::Influence,
        Attribute::Command,
        Attribute::Stealth,
        Attribute::Health,
    ];
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Strength => "strength",
            Self::Defense => "defense",
            Self::Intelligence => "intelligence",
            Self::Charisma => "charisma",
            Self::Loyalty => "loyalty",
            Self::Influence => "influence",
            Self::Command => "command",
            Self::Stealth => "stealth",
            Self::Health => "health",
        };
        write!(f, "{}", name)
    }
}

impl FromStr for Attribute {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "strength" => Ok(Self::Strength),
            "defense" => Ok(Self::Defense),
            "intelligence" => Ok(Self::Intelligence),
            "charisma" => Ok(Self::Charisma),
            "loyalty" => Ok(Self::Loyalty),
            "influence" => Ok(Self::Influence),
            "command" => Ok(Self::Command),
            "stealth" => Ok(Self::Stealth),
            "health" => Ok(Self::Health),
            _ => Err(DomainError::parse(format!("Unknown attribute: {}", s))),
        }
    }
}

/// Minimum attribute values required to enter a scene.
///
/// Owned by exactly one scene and replaced wholesale on edit. Minimums are
/// unsigned, so "negative requirement" is unrepresentable by construction.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AttributeRequirements {
    pub strength: u32,
    pub defense: u32,
    pub intelligence: u32,
    pub charisma: u32,
    pub loyalty: u32,
    pub influence: u32,
    pub command: u32,
    pub stealth: u32,
    pub health: u32,
}

impl AttributeRequirements {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style setter used when assembling a requirement set.
    pub fn with(mut self, attribute: Attribute, minimum: u32) -> Self {
        self.set(attribute, minimum);
        self
    }

    pub fn set(&mut self, attribute: Attribute, minimum: u32) {
        *self.slot_mut(attribute) = minimum;
    }

    pub fn minimum(&self, attribute: Attribute) -> u32 {
        match attribute {
            Attribute::Strength => self.strength,
            Attribute::Defense => self.defense,
            Attribute::Intelligence => self.intelligence,
            Attribute::Charisma => self.charisma,
            Attribute::Loyalty => self.loyalty,
            Attribute::Influence => self.influence,
            Attribute::Command => self.command,
            Attribute::Stealth => self.stealth,
            Attribute::Health => self.health,
        }
    }

    /// True when every minimum is zero, i.e. the scene has no attribute gate.
    pub fn is_unconstrained(&self) -> bool {
        Attribute::ALL.iter().all(|a| self.minimum(*a) == 0)
    }

    /// Iterate the non-zero entries in canonical attribute order.
    pub fn constrained(&self) -> impl Iterator<Item = (Attribute, u32)> + '_ {
        Attribute::ALL
            .iter()
            .map(|a| (*a, self.minimum(*a)))
            .filter(|(_, min)| *min > 0)
    }

    fn slot_mut(&mut self, attribute: Attribute) -> &mut u32 {
        match attribute {
            Attribute::Strength => &mut self.strength,
            Attribute::Defense => &mut self.defense,
            Attribute::Intelligence => &mut self.intelligence,
            Attribute::Charisma => &mut self.charisma,
            Attribute::Loyalty => &mut self.loyalty,
            Attribute::Influence => &mut self.influence,
            Attribute::Command => &mut self.command,
            Attribute::Stealth => &mut self.stealth,
            Attribute::Health => &mut self.health,
        }
    }
}

/// Pre-aggregated attribute totals for the entering party.
///
/// Aggregation (max-per-attribute, party sum, ...) is the caller's choice;
/// the gating evaluator compares these totals as-is.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AttributeTotals {
    pub strength: u32,
    pub defense: u32,
    pub intelligence: u32,
    pub charisma: u32,
    pub loyalty: u32,
    pub influence: u32,
    pub command: u32,
    pub stealth: u32,
    pub health: u32,
}

impl AttributeTotals {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, attribute: Attribute, total: u32) -> Self {
        self.set(attribute, total);
        self
    }

    pub fn set(&mut self, attribute: Attribute, total: u32) {
        match attribute {
            Attribute::Strength => self.strength = total,
            Attribute::Defense => self.defense = total,
            Attribute::Intelligence => self.intelligence = total,
            Attribute::Charisma => self.charisma = total,
            Attribute::Loyalty => self.loyalty = total,
            Attribute::Influence => self.influence = total,
            Attribute::Command => self.command = total,
            Attribute::Stealth => self.stealth = total,
            Attribute::Health => self.health = total,
        }
    }

    pub fn total(&self, attribute: Attribute) -> u32 {
        match attribute {
            Attribute::Strength => self.strength,
            Attribute::Defense => self.defense,
            Attribute::Intelligence => self.intelligence,
            Attribute::Charisma => self.charisma,
            Attribute::Loyalty => self.loyalty,
            Attribute::Influence => self.influence,
            Attribute::Command => self.command,
            Attribute::Stealth => self.stealth,
            Attribute::Health => self.health,
        }
    }
}
