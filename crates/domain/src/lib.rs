//! Domain entities and invariants.

#![forbid(unsafe_code)]

mod annotations;
mod entitlement;
mod grant;
mod metabase;
mod permission_matrix;
mod resource;

pub use annotations::{Annotation, Annotations, RateLimitDescription};
pub use entitlement::{DatabaseEntitlement, Entitlement};
pub use grant::Grant;
pub use metabase::{
    DataAccessDetails, Database, DatabaseId, GroupPermission, MetabaseUser, NativePermission,
};
pub use permission_matrix::PermissionMatrix;
pub use resource::{Resource, ResourceId, ResourceType};
