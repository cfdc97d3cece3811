use std::fmt::{Display, Formatter};
use std::str::FromStr;

use metagov_core::{AppError, AppResult, NonEmptyString};
use serde::{Deserialize, Serialize};

/// Resource types mirrored from Metabase into the governance graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceType {
    /// A connected Metabase database.
    Database,
    /// A Metabase permission group.
    Group,
    /// A Metabase user account.
    User,
}

impl ResourceType {
    /// Returns the stable identifier for this resource type.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Database => "database",
            Self::Group => "group",
            Self::User => "user",
        }
    }
}

impl Display for ResourceType {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(self.as_str())
    }
}

impl FromStr for ResourceType {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "database" => Ok(Self::Database),
            "group" => Ok(Self::Group),
            "user" => Ok(Self::User),
            _ => Err(AppError::Validation(format!(
                "unknown resource type '{value}'"
            ))),
        }
    }
}

/// Typed reference to one resource in the governance graph.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ResourceId {
    resource_type: ResourceType,
    resource: String,
}

impl ResourceId {
    /// Creates a resource reference.
    #[must_use]
    pub fn new(resource_type: ResourceType, resource: impl Into<String>) -> Self {
        Self {
            resource_type,
            resource: resource.into(),
        }
    }

    /// Returns the resource type.
    #[must_use]
    pub fn resource_type(&self) -> ResourceType {
        self.resource_type
    }

    /// Returns the remote identifier of the resource.
    #[must_use]
    pub fn resource(&self) -> &str {
        self.resource.as_str()
    }
}

impl Display for ResourceId {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        write!(formatter, "{}:{}", self.resource_type, self.resource)
    }
}

/// Resource emitted by listing operations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resource {
    id: ResourceId,
    display_name: NonEmptyString,
}

impl Resource {
    /// Creates a validated resource.
    pub fn new(id: ResourceId, display_name: impl Into<String>) -> AppResult<Self> {
        Ok(Self {
            id,
            display_name: NonEmptyString::new(display_name)?,
        })
    }

    /// Returns the resource reference.
    #[must_use]
    pub fn id(&self) -> &ResourceId {
        &self.id
    }

    /// Returns the resource display name.
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.display_name.as_str()
    }
}
