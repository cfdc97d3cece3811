use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

use crate::{Resource, ResourceId, ResourceType};

/// Permission levels a group can hold on a database.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DatabaseEntitlement {
    /// The group can see and query the database.
    Access,
    /// The group can run native (SQL) queries against the database.
    Write,
}

impl DatabaseEntitlement {
    /// Returns the stable slug for this entitlement.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Access => "access",
            Self::Write => "write",
        }
    }

    /// Returns all database entitlements in presentation order.
    #[must_use]
    pub fn all() -> &'static [Self] {
        const ALL: &[DatabaseEntitlement] =
            &[DatabaseEntitlement::Access, DatabaseEntitlement::Write];

        ALL
    }

    fn label(&self) -> &'static str {
        match self {
            Self::Access => "Access",
            Self::Write => "Write",
        }
    }

    fn description(&self) -> &'static str {
        match self {
            Self::Access => "Can view and query data in the database",
            Self::Write => "Can write native queries against the database",
        }
    }
}

impl Display for DatabaseEntitlement {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(self.as_str())
    }
}

/// Entitlement offered by a resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entitlement {
    id: String,
    resource: ResourceId,
    slug: DatabaseEntitlement,
    display_name: String,
    description: String,
    grantable_to: Vec<ResourceType>,
}

impl Entitlement {
    /// Builds the entitlement of the given level on a database resource.
    #[must_use]
    pub fn for_database(database: &Resource, slug: DatabaseEntitlement) -> Self {
        Self {
            id: format!("{}:{}", database.id(), slug),
            resource: database.id().clone(),
            slug,
            display_name: format!("{} {}", database.display_name(), slug.label()),
            description: slug.description().to_owned(),
            grantable_to: vec![ResourceType::Group],
        }
    }

    /// Returns the stable entitlement identifier, `<type>:<resource>:<slug>`.
    #[must_use]
    pub fn id(&self) -> &str {
        self.id.as_str()
    }

    /// Returns the resource offering the entitlement.
    #[must_use]
    pub fn resource(&self) -> &ResourceId {
        &self.resource
    }

    /// Returns the entitlement level.
    #[must_use]
    pub fn slug(&self) -> DatabaseEntitlement {
        self.slug
    }

    /// Returns the entitlement display name.
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.display_name.as_str()
    }

    /// Returns the entitlement description.
    #[must_use]
    pub fn description(&self) -> &str {
        self.description.as_str()
    }

    /// Returns the principal types this entitlement can be granted to.
    #[must_use]
    pub fn grantable_to(&self) -> &[ResourceType] {
        &self.grantable_to
    }
}

#[cfg(test)]
mod tests {
    use super::{DatabaseEntitlement, Entitlement};
    use crate::{Resource, ResourceId, ResourceType};

    #[test]
    fn database_entitlement_uses_resource_scoped_id() {
        let Ok(database) = Resource::new(ResourceId::new(ResourceType::Database, "1"), "SalesDB")
        else {
            panic!("database resource should be valid");
        };

        let entitlement = Entitlement::for_database(&database, DatabaseEntitlement::Write);

        assert_eq!(entitlement.id(), "database:1:write");
        assert_eq!(entitlement.display_name(), "SalesDB Write");
        assert_eq!(entitlement.grantable_to(), &[ResourceType::Group]);
    }
}
