use serde::{Deserialize, Serialize};

use crate::{Entitlement, ResourceId};

/// Assignment of an entitlement to a principal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grant {
    id: String,
    entitlement: Entitlement,
    principal: ResourceId,
}

impl Grant {
    /// Creates a grant of `entitlement` to `principal`.
    #[must_use]
    pub fn new(entitlement: Entitlement, principal: ResourceId) -> Self {
        Self {
            id: format!("{}:{}", entitlement.id(), principal),
            entitlement,
            principal,
        }
    }

    /// Returns the stable grant identifier.
    #[must_use]
    pub fn id(&self) -> &str {
        self.id.as_str()
    }

    /// Returns the granted entitlement.
    #[must_use]
    pub fn entitlement(&self) -> &Entitlement {
        &self.entitlement
    }

    /// Returns the principal holding the entitlement.
    #[must_use]
    pub fn principal(&self) -> &ResourceId {
        &self.principal
    }
}
