//! Folder Commands

use anyhow::{bail, Result};
use clap::{Args, Subcommand};
use serde::Serialize;

use bigip_provider::resources::folder::{
    self, ATTR_APP_SERVICE, ATTR_DESCRIPTION, ATTR_DEVICE_GROUP, ATTR_HIDDEN, ATTR_NAME,
    ATTR_NO_REF_CHECK, ATTR_TRAFFIC_GROUP,
};
use bigip_provider::{FolderApi, FolderConfig, FolderResource, Resource, ResourceData};

use crate::output::{OutputFormat, TableDisplay, print_item, print_success};

#[derive(Subcommand, Clone)]
pub enum FolderCommands {
    /// Get folder details
    Get {
        /// Folder path (e.g. /Common/apps)
        name: String,
    },

    /// Create a folder unless one with the same name exists
    Create {
        /// Folder path (e.g. /Common/apps)
        name: String,

        #[command(flatten)]
        attrs: FolderArgs,
    },

    /// Update a folder; omitted options keep the device's current values
    Update {
        /// Folder path
        name: String,

        #[command(flatten)]
        attrs: FolderArgs,
    },

    /// Delete a folder
    Delete {
        /// Folder path
        name: String,
    },

    /// Adopt an existing folder and print its state
    Import {
        /// Folder path
        name: String,
    },
}

/// Optional folder attributes
#[derive(Args, Debug, Clone, Default)]
pub struct FolderArgs {
    /// Application service the folder belongs to
    #[arg(long)]
    pub app_service: Option<String>,

    /// User-defined description
    #[arg(long)]
    pub description: Option<String>,

    /// Device group ("default" inherits the parent's)
    #[arg(long)]
    pub device_group: Option<String>,

    /// Hide the folder from standard commands ("true" or "false")
    #[arg(long)]
    pub hidden: Option<String>,

    /// Strict device group reference validation during sync
    #[arg(long)]
    pub no_ref_check: Option<String>,

    /// Traffic group ("default" inherits the parent's)
    #[arg(long)]
    pub traffic_group: Option<String>,
}

impl FolderArgs {
    /// Overlay the given options on a state record
    pub fn apply(&self, data: &mut ResourceData) {
        let pairs = [
            (ATTR_APP_SERVICE, &self.app_service),
            (ATTR_DESCRIPTION, &self.description),
            (ATTR_DEVICE_GROUP, &self.device_group),
            (ATTR_HIDDEN, &self.hidden),
            (ATTR_NO_REF_CHECK, &self.no_ref_check),
            (ATTR_TRAFFIC_GROUP, &self.traffic_group),
        ];
        for (key, value) in pairs {
            if let Some(value) = value {
                data.set_string(key, value);
            }
        }
    }
}

/// Folder display wrapper for serialization
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FolderDisplay {
    pub id: String,
    pub name: String,
    pub app_service: String,
    pub description: String,
    pub device_group: String,
    pub hidden: String,
    pub no_ref_check: String,
    pub traffic_group: String,
}

impl From<&ResourceData> for FolderDisplay {
    fn from(data: &ResourceData) -> Self {
        let config = FolderConfig::from_data(data);
        Self {
            id: data.id().to_string(),
            name: config.name,
            app_service: config.app_service,
            description: config.description,
            device_group: config.device_group,
            hidden: config.hidden,
            no_ref_check: config.no_ref_check,
            traffic_group: config.traffic_group,
        }
    }
}

impl TableDisplay for FolderDisplay {
    fn headers() -> Vec<&'static str> {
        vec![
            "ID",
            "Name",
            "App Service",
            "Description",
            "Device Group",
            "Hidden",
            "No Ref Check",
            "Traffic Group",
        ]
    }

    fn row(&self) -> Vec<String> {
        vec![
            self.id.clone(),
            self.name.clone(),
            self.app_service.clone(),
            self.description.clone(),
            self.device_group.clone(),
            self.hidden.clone(),
            self.no_ref_check.clone(),
            self.traffic_group.clone(),
        ]
    }
}

/// What `folder create` did on the device
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CreateOutcome {
    Created,
    /// A folder with this name was already there and is now tracked
    Adopted,
}

impl CreateOutcome {
    pub fn message(self, name: &str) -> String {
        match self {
            CreateOutcome::Created => format!("Folder '{}' created", name),
            CreateOutcome::Adopted => format!("Folder '{}' already exists, adopted", name),
        }
    }
}

/// Run the create lifecycle and report whether a folder was actually added
pub async fn create(
    client: &dyn FolderApi,
    name: &str,
    attrs: &FolderArgs,
) -> Result<(ResourceData, CreateOutcome)> {
    let mut data = ResourceData::new();
    data.set_string(ATTR_NAME, name);
    attrs.apply(&mut data);

    // Same lookup rule as the adapter: an error counts as absent
    let outcome = match folder::exists(client, name).await {
        Ok(true) => CreateOutcome::Adopted,
        _ => CreateOutcome::Created,
    };

    FolderResource::create(client, &mut data).await?;
    if data.id().is_empty() {
        bail!("Folder {} not found after create", name);
    }
    Ok((data, outcome))
}

/// Read a folder that must exist on the device
async fn fetch(client: &dyn FolderApi, name: &str) -> Result<ResourceData> {
    let data = FolderResource::import(client, name).await?;
    if data.id().is_empty() {
        bail!("Folder {} not found", name);
    }
    Ok(data)
}

pub async fn execute(cmd: FolderCommands, client: &dyn FolderApi, format: OutputFormat) -> Result<()> {
    match cmd {
        FolderCommands::Get { name } | FolderCommands::Import { name } => {
            let data = fetch(client, &name).await?;
            print_item(&FolderDisplay::from(&data), format);
        }

        FolderCommands::Create { name, attrs } => {
            let (data, outcome) = create(client, &name, &attrs).await?;
            print_success(&outcome.message(&name));
            print_item(&FolderDisplay::from(&data), format);
        }

        FolderCommands::Update { name, attrs } => {
            let mut data = fetch(client, &name).await?;
            attrs.apply(&mut data);

            FolderResource::update(client, &mut data).await?;
            print_success(&format!("Folder '{}' updated", name));
            print_item(&FolderDisplay::from(&data), format);
        }

        FolderCommands::Delete { name } => {
            let mut data = ResourceData::new();
            data.set_id(&name);

            FolderResource::delete(client, &mut data).await?;
            print_success(&format!("Folder '{}' deleted", name));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::render_item;

    #[test]
    fn test_args_only_set_given_options() {
        let args = FolderArgs {
            description: Some("team a".to_string()),
            hidden: Some("true".to_string()),
            ..Default::default()
        };
        let mut data = ResourceData::new();
        data.set_string(ATTR_DEVICE_GROUP, "/Common/dg1");

        args.apply(&mut data);

        assert_eq!(data.get_string(ATTR_DESCRIPTION), Some("team a"));
        assert_eq!(data.get_string(ATTR_HIDDEN), Some("true"));
        assert_eq!(data.get_string(ATTR_DEVICE_GROUP), Some("/Common/dg1"));
        assert_eq!(data.get_string(ATTR_TRAFFIC_GROUP), None);
    }

    #[test]
    fn test_create_messages() {
        assert_eq!(CreateOutcome::Created.message("/Common/apps"), "Folder '/Common/apps' created");
        assert_eq!(
            CreateOutcome::Adopted.message("/Common/apps"),
            "Folder '/Common/apps' already exists, adopted"
        );
    }

    #[test]
    fn test_display_applies_defaults() {
        let mut data = ResourceData::new();
        data.set_id("/Common/apps");
        data.set_string(ATTR_NAME, "/Common/apps");

        let display = FolderDisplay::from(&data);
        assert_eq!(display.id, "/Common/apps");
        assert_eq!(display.device_group, "default");
        assert_eq!(display.hidden, "false");
        assert_eq!(display.row().len(), FolderDisplay::headers().len());
    }

    #[test]
    fn test_json_output_uses_attribute_names() {
        let mut data = ResourceData::new();
        data.set_id("/Common/apps");
        data.set_string(ATTR_NAME, "/Common/apps");

        let rendered = render_item(&FolderDisplay::from(&data), OutputFormat::Json);
        let value: serde_json::Value = serde_json::from_str(&rendered).unwrap();
        assert_eq!(value["deviceGroup"], "default");
        assert_eq!(value["noRefCheck"], "");
    }

    #[test]
    fn test_plain_output() {
        let mut data = ResourceData::new();
        data.set_string(ATTR_NAME, "/Common/apps");

        let rendered = render_item(&FolderDisplay::from(&data), OutputFormat::Plain);
        assert!(rendered.contains("Name: /Common/apps"));
        assert!(rendered.contains("Traffic Group: default"));
    }
}
