//! Engine error types.
//!
//! A gating denial or an illegal card use is a *result*, not an error;
//! errors here are true faults: a referenced record is missing, or content
//! failed validation at the store's write boundary.

use sultan_domain::DomainError;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum EngineError {
    /// A referenced scene/card/NPC does not exist in the content store.
    #[error("Not found: {entity_type} with id {id}")]
    NotFound {
        entity_type: &'static str,
        id: String,
    },

    /// A record violated a domain invariant.
    #[error(transparent)]
    Domain(#[from] DomainError),
}

impl EngineError {
    pub fn not_found(entity_type: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type,
            id: id.into(),
        }
    }
}
