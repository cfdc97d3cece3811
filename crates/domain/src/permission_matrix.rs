use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::{
    DatabaseEntitlement, DatabaseId, Entitlement, Grant, GroupPermission, Resource, ResourceId,
    ResourceType,
};

/// Group to database to permission mapping fetched from Metabase.
///
/// The upstream always returns the graph for every database, so filtering to
/// one database happens here.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PermissionMatrix(HashMap<String, HashMap<String, GroupPermission>>);

impl PermissionMatrix {
    /// Creates a matrix from the raw graph.
    #[must_use]
    pub fn new(groups: HashMap<String, HashMap<String, GroupPermission>>) -> Self {
        Self(groups)
    }

    /// Returns the number of groups in the matrix.
    #[must_use]
    pub fn group_count(&self) -> usize {
        self.0.len()
    }

    /// Returns the entry for one (group, database) pair.
    #[must_use]
    pub fn entry(&self, group_id: &str, database_id: &DatabaseId) -> Option<&GroupPermission> {
        self.0
            .get(group_id)
            .and_then(|databases| databases.get(database_id.as_str()))
    }

    /// Iterates the groups holding any entry for `database_id`.
    pub fn entries_for_database<'a>(
        &'a self,
        database_id: &'a DatabaseId,
    ) -> impl Iterator<Item = (&'a str, &'a GroupPermission)> + 'a {
        self.0.iter().filter_map(move |(group_id, databases)| {
            databases
                .get(database_id.as_str())
                .map(|permission| (group_id.as_str(), permission))
        })
    }

    /// Translates the matrix into grants on one database resource.
    ///
    /// Every group with an entry gets `access`; `write` is added only when the
    /// native permission is exactly `write`. Groups without an entry get
    /// nothing.
    #[must_use]
    pub fn grants_for_database(&self, database: &Resource) -> Vec<Grant> {
        let database_id = DatabaseId::new(database.id().resource());
        let access = Entitlement::for_database(database, DatabaseEntitlement::Access);
        let write = Entitlement::for_database(database, DatabaseEntitlement::Write);

        let mut grants = Vec::new();
        for (group_id, permission) in self.entries_for_database(&database_id) {
            let principal = ResourceId::new(ResourceType::Group, group_id);
            grants.push(Grant::new(access.clone(), principal.clone()));

            if permission.data.native().allows_write() {
                grants.push(Grant::new(write.clone(), principal));
            }
        }

        grants
    }
}
