//! Device model types for BIG-IP

use serde::{Deserialize, Serialize};

/// A `sys folder` object as exchanged with iControl REST.
///
/// Empty strings are left out of request bodies, like go-bigip's
/// `omitempty`: the device rejects `""` for enumerated properties such as
/// `noRefCheck`, and a PUT resets every omitted property to its default.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Folder {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub app_service: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub device_group: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub hidden: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub no_ref_check: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub traffic_group: String,
    /// Read-only, set by the device
    #[serde(default, skip_serializing)]
    pub full_path: Option<String>,
}

impl Folder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Name the device knows this folder by, preferring the full path
    pub fn path(&self) -> &str {
        match self.full_path.as_deref() {
            Some(p) if !p.is_empty() => p,
            _ => &self.name,
        }
    }
}

/// Encode a folder path for use in an iControl REST URL.
///
/// `/Common/app` becomes `~Common~app`.
pub fn encode_path(name: &str) -> String {
    name.replace('/', "~")
}

/// Error body returned by iControl REST on failure
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiErrorBody {
    #[serde(default)]
    pub code: u16,
    #[serde(default)]
    pub message: String,
}

/// Login request for token authentication
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
    pub login_provider_name: String,
}

/// Login response carrying the session token
#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    pub token: AuthToken,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AuthToken {
    pub token: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_folder_serializes_camel_case_and_skips_empty() {
        let folder = Folder {
            name: "/Common/myfolder".to_string(),
            device_group: "default".to_string(),
            hidden: "false".to_string(),
            ..Default::default()
        };

        let value = serde_json::to_value(&folder).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "name": "/Common/myfolder",
                "deviceGroup": "default",
                "hidden": "false",
            })
        );
    }

    #[test]
    fn test_folder_from_device_response() {
        let body = serde_json::json!({
            "kind": "tm:sys:folder:folderstate",
            "name": "app",
            "partition": "Common",
            "fullPath": "/Common/app",
            "generation": 42,
            "deviceGroup": "/Common/dg1",
            "hidden": "false",
            "inheritedDevicegroup": "true",
            "noRefCheck": "false",
            "trafficGroup": "/Common/traffic-group-1"
        });

        let folder: Folder = serde_json::from_value(body).unwrap();
        assert_eq!(folder.name, "app");
        assert_eq!(folder.path(), "/Common/app");
        assert_eq!(folder.device_group, "/Common/dg1");
        assert_eq!(folder.no_ref_check, "false");
        assert_eq!(folder.traffic_group, "/Common/traffic-group-1");
        assert!(folder.app_service.is_empty());
    }

    #[test]
    fn test_full_path_never_sent() {
        let mut folder = Folder::new("/Common/app");
        folder.full_path = Some("/Common/app".to_string());
        let value = serde_json::to_value(&folder).unwrap();
        assert!(value.get("fullPath").is_none());
    }

    #[test]
    fn test_path_falls_back_to_name() {
        let folder = Folder::new("/Common/plain");
        assert_eq!(folder.path(), "/Common/plain");
    }

    #[test]
    fn test_encode_path() {
        assert_eq!(encode_path("/Common/myfolder"), "~Common~myfolder");
        assert_eq!(encode_path("/Common/a/b"), "~Common~a~b");
        assert_eq!(encode_path("plain"), "plain");
    }
}
