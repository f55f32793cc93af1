//! Resource Implementations
//!
//! Implements the CRUD operations for each resource type.

pub mod folder;

use anyhow::Result;
use crate::client::FolderApi;
use crate::schema::Schema;
use crate::state::ResourceData;

/// Trait for resource operations
///
/// Every operation works on the host's state record in place. An empty
/// identifier after an operation means the resource is no longer tracked.
#[async_trait::async_trait]
pub trait Resource {
    /// Resource type name
    fn type_name() -> &'static str;

    /// Declared attributes
    fn schema() -> Schema;

    /// Create a new resource
    async fn create(client: &dyn FolderApi, data: &mut ResourceData) -> Result<()>;

    /// Refresh the record from the device
    async fn read(client: &dyn FolderApi, data: &mut ResourceData) -> Result<()>;

    /// Push the record to the device
    async fn update(client: &dyn FolderApi, data: &mut ResourceData) -> Result<()>;

    /// Delete a resource
    async fn delete(client: &dyn FolderApi, data: &mut ResourceData) -> Result<()>;

    /// Adopt an existing resource by identifier
    async fn import(client: &dyn FolderApi, id: &str) -> Result<ResourceData>;
}
