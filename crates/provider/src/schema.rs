//! Resource Schemas
//!
//! Declares the configurable attributes of the provider and each resource
//! type, and the schema-driven checks the host relies on.

use std::collections::HashMap;

use crate::provider::Diagnostic;
use crate::resources::folder;
use crate::state::{string_value, DynamicValue, ID_ATTR};

/// Value type of an attribute
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttributeType {
    String,
    Number,
    Bool,
}

impl AttributeType {
    fn accepts(&self, value: &DynamicValue) -> bool {
        match (self, value) {
            (_, DynamicValue::Null) => true,
            (AttributeType::String, DynamicValue::String(_)) => true,
            (AttributeType::Number, DynamicValue::Number(_)) => true,
            (AttributeType::Bool, DynamicValue::Bool(_)) => true,
            _ => false,
        }
    }
}

/// A single declared attribute
#[derive(Debug, Clone)]
pub struct Attribute {
    pub name: &'static str,
    pub kind: AttributeType,
    pub description: &'static str,
    pub required: bool,
    pub optional: bool,
    pub computed: bool,
    pub sensitive: bool,
    /// Changing the value forces the resource to be replaced
    pub force_new: bool,
    pub default: Option<DynamicValue>,
}

impl Attribute {
    pub fn new(name: &'static str, kind: AttributeType, description: &'static str) -> Self {
        Self {
            name,
            kind,
            description,
            required: false,
            optional: true,
            computed: false,
            sensitive: false,
            force_new: false,
            default: None,
        }
    }

    pub fn string(name: &'static str, description: &'static str) -> Self {
        Self::new(name, AttributeType::String, description)
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self.optional = false;
        self
    }

    pub fn computed(mut self) -> Self {
        self.computed = true;
        self.optional = false;
        self
    }

    pub fn sensitive(mut self) -> Self {
        self.sensitive = true;
        self
    }

    pub fn force_new(mut self) -> Self {
        self.force_new = true;
        self
    }

    pub fn default_string(mut self, value: &str) -> Self {
        self.default = Some(string_value(value));
        self
    }
}

/// Attribute set of a provider or resource type
#[derive(Debug, Clone)]
pub struct Schema {
    pub version: i64,
    pub attributes: Vec<Attribute>,
}

impl Schema {
    pub fn attribute(&self, name: &str) -> Option<&Attribute> {
        self.attributes.iter().find(|a| a.name == name)
    }

    /// Fill omitted or null attributes with their declared defaults
    pub fn apply_defaults(&self, value: &DynamicValue) -> DynamicValue {
        let mut map = value.as_map().cloned().unwrap_or_default();
        for attr in &self.attributes {
            let Some(default) = &attr.default else { continue };
            let missing = map.get(attr.name).map_or(true, DynamicValue::is_null);
            if missing {
                map.insert(attr.name.to_string(), default.clone());
            }
        }
        DynamicValue::Map(map)
    }

    /// Force-new attributes whose value differs between prior and planned
    pub fn requires_replace(&self, prior: &DynamicValue, planned: &DynamicValue) -> Vec<String> {
        self.attributes
            .iter()
            .filter(|a| a.force_new)
            .filter(|a| prior.get(a.name) != planned.get(a.name))
            .map(|a| a.name.to_string())
            .collect()
    }

    /// Check a configuration against the declared attributes
    pub fn validate(&self, config: &DynamicValue) -> Vec<Diagnostic> {
        let mut diagnostics = Vec::new();

        let empty = HashMap::new();
        let map = match config {
            DynamicValue::Map(m) => m,
            DynamicValue::Null => &empty,
            _ => {
                diagnostics.push(Diagnostic::error(
                    "Invalid configuration",
                    "configuration must be an object",
                ));
                return diagnostics;
            }
        };

        for attr in &self.attributes {
            let value = map.get(attr.name);
            if attr.required && value.map_or(true, DynamicValue::is_null) {
                diagnostics.push(
                    Diagnostic::error(
                        "Missing required argument",
                        format!("The argument \"{}\" is required, but no definition was found.", attr.name),
                    )
                    .with_attribute(attr.name),
                );
            } else if attr.required && matches!(value, Some(DynamicValue::String(s)) if s.trim().is_empty()) {
                diagnostics.push(
                    Diagnostic::error(
                        "Invalid attribute value",
                        format!("The argument \"{}\" must not be empty.", attr.name),
                    )
                    .with_attribute(attr.name),
                );
            }
            if let Some(value) = value {
                if !attr.kind.accepts(value) {
                    diagnostics.push(
                        Diagnostic::error(
                            "Incorrect attribute value type",
                            format!("Attribute \"{}\" must be of type {:?}", attr.name, attr.kind),
                        )
                        .with_attribute(attr.name),
                    );
                }
            }
        }

        let mut unknown: Vec<&String> = map
            .keys()
            .filter(|k| self.attribute(k).is_none())
            .collect();
        unknown.sort();
        for key in unknown {
            diagnostics.push(
                Diagnostic::error(
                    "Unsupported argument",
                    format!("An argument named \"{}\" is not expected here.", key),
                )
                .with_attribute(key.as_str()),
            );
        }

        diagnostics
    }
}

/// Provider block schema
pub fn provider_schema() -> Schema {
    Schema {
        version: 0,
        attributes: vec![
            Attribute::string("address", "Domain name/IP of the BigIP"),
            Attribute::new("port", AttributeType::Number, "Management port to connect to BigIP"),
            Attribute::string("username", "Username with API access to the BigIP"),
            Attribute::string("password", "The user's password").sensitive(),
            Attribute::new(
                "token_auth",
                AttributeType::Bool,
                "Enable to use token authentication",
            ),
            Attribute::string("login_ref", "Login reference for token authentication"),
            Attribute::new(
                "validate_certs_disable",
                AttributeType::Bool,
                "If set to true, disables TLS certificate check on BIG-IP",
            ),
            Attribute::new("timeout_secs", AttributeType::Number, "Per-request timeout in seconds"),
        ],
    }
}

/// `bigip_sys_folder` resource schema
pub fn folder_schema() -> Schema {
    Schema {
        version: 0,
        attributes: vec![
            Attribute::string(ID_ATTR, "Identifier of the folder").computed(),
            Attribute::string(folder::ATTR_NAME, "Name of folder")
                .required()
                .force_new(),
            Attribute::string(
                folder::ATTR_APP_SERVICE,
                "The application service that the object belongs to.",
            ),
            Attribute::string(
                folder::ATTR_DESCRIPTION,
                "User-defined description of the folder",
            ),
            Attribute::string(
                folder::ATTR_DEVICE_GROUP,
                "Associate this folder with a device failover group or device sync group. \
                 'default' to associate this folder with its parent's device group. \
                 'non-default' to leave this field's value untouched but disassociate this folder from its parent.",
            )
            .default_string(folder::DEFAULT_DEVICE_GROUP),
            Attribute::string(
                folder::ATTR_HIDDEN,
                "Specifies if this folder will be hidden. If set to 'true', this folder will be \
                 hidden from standard command usage.",
            )
            .default_string(folder::DEFAULT_HIDDEN),
            Attribute::string(
                folder::ATTR_NO_REF_CHECK,
                "Specifies whether strict device group reference validation is performed \
                 during sync behavior on items in this folder",
            )
            .default_string(folder::DEFAULT_NO_REF_CHECK),
            Attribute::string(
                folder::ATTR_TRAFFIC_GROUP,
                "Associate this folder with a network failover group. \
                 'default' to associate this folder with its parent's traffic group.",
            )
            .default_string(folder::DEFAULT_TRAFFIC_GROUP),
        ],
    }
}
