//! Card entity.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::DomainError;
use crate::ids::CardId;

/// Card rarity band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CardRarity {
    Common,
    Rare,
    Epic,
    Legendary,
}

/// Functional category of a card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CardCategory {
    /// Boosts a party attribute
    Attribute,
    /// Grants entry somewhere otherwise closed
    Access,
    /// Sways a judgement or check
    Influence,
    /// Bespoke behavior
    Special,
}

/// A card record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Card {
    card_id: CardId,
    name: String,
    rarity: CardRarity,
    category: CardCategory,
    /// Whether a use consumes the card from the player's holdings.
    consumable: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Card {
    pub fn new(
        card_id: CardId,
        name: impl Into<String>,
        rarity: CardRarity,
        category: CardCategory,
    ) -> Self {
        let now = Utc::now();
        Self {
            card_id,
            name: name.into(),
            rarity,
            category,
            consumable: true,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn card_id(&self) -> &CardId {
        &self.card_id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn rarity(&self) -> CardRarity {
        self.rarity
    }

    pub fn category(&self) -> CardCategory {
        self.category
    }

    pub fn consumable(&self) -> bool {
        self.consumable
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    pub fn with_consumable(mut self, consumable: bool) -> Self {
        self.consumable = consumable;
        self
    }

    pub fn validate(&self) -> Result<(), DomainError> {
        if self.card_id.is_empty() {
            return Err(DomainError::validation("Card id cannot be empty"));
        }
        if self.name.trim().is_empty() {
            return Err(DomainError::validation("Card name cannot be empty"));
        }
        Ok(())
    }
}
