//! Folder Resource handler
//!
//! Maps the `bigip_sys_folder` configuration block onto `sys folder` calls.

use anyhow::{bail, Context, Result};
use tracing::{debug, error, info, warn};

use bigip_common::Folder;
use crate::client::FolderApi;
use crate::schema::{self, Schema};
use crate::state::ResourceData;
use super::Resource;

pub const TYPE_NAME: &str = "bigip_sys_folder";

pub const ATTR_NAME: &str = "name";
pub const ATTR_APP_SERVICE: &str = "appService";
pub const ATTR_DESCRIPTION: &str = "description";
pub const ATTR_DEVICE_GROUP: &str = "deviceGroup";
pub const ATTR_HIDDEN: &str = "hidden";
pub const ATTR_NO_REF_CHECK: &str = "noRefCheck";
pub const ATTR_TRAFFIC_GROUP: &str = "trafficGroup";

pub const DEFAULT_DEVICE_GROUP: &str = "default";
pub const DEFAULT_HIDDEN: &str = "false";
pub const DEFAULT_NO_REF_CHECK: &str = "";
pub const DEFAULT_TRAFFIC_GROUP: &str = "default";

/// Typed view of one folder block, defaults applied
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FolderConfig {
    pub name: String,
    pub app_service: String,
    pub description: String,
    pub device_group: String,
    pub hidden: String,
    pub no_ref_check: String,
    pub traffic_group: String,
}

impl Default for FolderConfig {
    fn default() -> Self {
        Self {
            name: String::new(),
            app_service: String::new(),
            description: String::new(),
            device_group: DEFAULT_DEVICE_GROUP.to_string(),
            hidden: DEFAULT_HIDDEN.to_string(),
            no_ref_check: DEFAULT_NO_REF_CHECK.to_string(),
            traffic_group: DEFAULT_TRAFFIC_GROUP.to_string(),
        }
    }
}

impl FolderConfig {
    pub fn from_data(data: &ResourceData) -> Self {
        let get = |key: &str, default: &str| data.get_string(key).unwrap_or(default).to_string();
        Self {
            name: get(ATTR_NAME, ""),
            app_service: get(ATTR_APP_SERVICE, ""),
            description: get(ATTR_DESCRIPTION, ""),
            device_group: get(ATTR_DEVICE_GROUP, DEFAULT_DEVICE_GROUP),
            hidden: get(ATTR_HIDDEN, DEFAULT_HIDDEN),
            no_ref_check: get(ATTR_NO_REF_CHECK, DEFAULT_NO_REF_CHECK),
            traffic_group: get(ATTR_TRAFFIC_GROUP, DEFAULT_TRAFFIC_GROUP),
        }
    }

    /// Copy a device folder into config form
    pub fn from_folder(folder: &Folder) -> Self {
        Self {
            name: folder.path().to_string(),
            app_service: folder.app_service.clone(),
            description: folder.description.clone(),
            device_group: folder.device_group.clone(),
            hidden: folder.hidden.clone(),
            no_ref_check: folder.no_ref_check.clone(),
            traffic_group: folder.traffic_group.clone(),
        }
    }

    /// Request payload; empty fields are dropped on the wire (see `Folder`)
    pub fn to_folder(&self) -> Folder {
        Folder {
            name: self.name.clone(),
            app_service: self.app_service.clone(),
            description: self.description.clone(),
            device_group: self.device_group.clone(),
            hidden: self.hidden.clone(),
            no_ref_check: self.no_ref_check.clone(),
            traffic_group: self.traffic_group.clone(),
            full_path: None,
        }
    }

    pub fn write_to(&self, data: &mut ResourceData) {
        data.set_string(ATTR_NAME, &self.name);
        data.set_string(ATTR_APP_SERVICE, &self.app_service);
        data.set_string(ATTR_DESCRIPTION, &self.description);
        data.set_string(ATTR_DEVICE_GROUP, &self.device_group);
        data.set_string(ATTR_HIDDEN, &self.hidden);
        data.set_string(ATTR_NO_REF_CHECK, &self.no_ref_check);
        data.set_string(ATTR_TRAFFIC_GROUP, &self.traffic_group);
    }
}

/// Whether the device has a folder with this identifier
pub async fn exists(client: &dyn FolderApi, id: &str) -> Result<bool> {
    info!("Fetching folder {}", id);

    let folder = client.get_folder(id).await.map_err(|e| {
        error!("Unable to retrieve folder {}: {}", id, e);
        e
    })?;

    if folder.is_none() {
        warn!("Folder ({}) not found", id);
        return Ok(false);
    }
    Ok(true)
}

pub struct FolderResource;

#[async_trait::async_trait]
impl Resource for FolderResource {
    fn type_name() -> &'static str {
        TYPE_NAME
    }

    fn schema() -> Schema {
        schema::folder_schema()
    }

    async fn create(client: &dyn FolderApi, data: &mut ResourceData) -> Result<()> {
        let config = FolderConfig::from_data(data);
        if config.name.trim().is_empty() {
            bail!("error creating Folder: name must not be empty");
        }
        info!("Configuring Folder {}", config.name);

        let folder = config.to_folder();
        debug!("Config of Folder to be added: {:?}", folder);
        data.set_id(&config.name);

        // A failed lookup counts as "not there", so the add is still attempted
        let found = exists(client, data.id()).await.unwrap_or(false);
        if !found {
            if let Err(e) = client.add_folder(&folder).await {
                data.set_id("");
                return Err(e).with_context(|| format!("error creating Folder {}", config.name));
            }
        }

        Self::read(client, data).await
    }

    async fn read(client: &dyn FolderApi, data: &mut ResourceData) -> Result<()> {
        let id = data.id().to_string();
        info!("Reading Folder {}", id);

        let folder = match client.get_folder(&id).await {
            Ok(folder) => folder,
            Err(e) => {
                error!("Unable to retrieve Folder {}: {}", id, e);
                return Err(e).with_context(|| format!("unable to retrieve Folder {}", id));
            }
        };

        let Some(folder) = folder else {
            warn!("Folder ({}) not found, removing from state", id);
            data.set_id("");
            return Ok(());
        };

        FolderConfig::from_folder(&folder).write_to(data);
        Ok(())
    }

    async fn update(client: &dyn FolderApi, data: &mut ResourceData) -> Result<()> {
        let id = data.id().to_string();
        info!("Updating Folder {}", id);

        let folder = FolderConfig::from_data(data).to_folder();
        client
            .modify_folder(&id, &folder)
            .await
            .with_context(|| format!("error modifying Folder {}", id))?;

        Self::read(client, data).await
    }

    async fn delete(client: &dyn FolderApi, data: &mut ResourceData) -> Result<()> {
        let id = data.id().to_string();
        info!("Deleting Folder {}", id);

        if let Err(e) = client.delete_folder(&id).await {
            error!("Unable to delete Folder {}: {}", id, e);
            return Err(e).with_context(|| format!("unable to delete Folder {}", id));
        }

        data.set_id("");
        Ok(())
    }

    async fn import(client: &dyn FolderApi, id: &str) -> Result<ResourceData> {
        info!("Importing Folder {}", id);

        let mut data = ResourceData::new();
        data.set_id(id);
        Self::read(client, &mut data).await?;
        Ok(data)
    }
}
