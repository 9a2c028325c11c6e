//! Value objects shared across content records.

pub mod attributes;
pub mod binding;
pub mod reward;

pub use attributes::{Attribute, AttributeRequirements, AttributeTotals};
pub use binding::{BindingEffect, BindingType, CardBinding, UnlockCondition};
pub use reward::{BasicRewards, CardReward, ExtendedRewards, NpcReward, RewardSpec};
