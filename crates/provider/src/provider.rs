//! BIG-IP Provider Implementation
//!
//! Host-facing surface: schema, configuration, planning and the resource
//! lifecycle calls, routed by resource type name.

use std::collections::HashMap;
use std::sync::Arc;

use thiserror::Error;
use tokio::sync::RwLock;
use tracing::{debug, error, info};

use bigip_common::ProviderConfig;
use crate::client::{BigIpClient, FolderApi};
use crate::resources::{folder::{FolderResource, ATTR_NAME}, Resource};
use crate::schema::{self, Schema};
use crate::state::{
    decode_dynamic_value, encode_dynamic_value, get_bool_attr, get_int_attr,
    get_optional_string_attr, DynamicValue, ResourceData, StateError, ID_ATTR,
};

/// Failures of the provider surface itself, as opposed to resource errors
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("Unknown resource type: {0}")]
    UnknownResourceType(String),

    #[error("Provider is not configured")]
    NotConfigured,

    #[error(transparent)]
    State(#[from] StateError),
}

/// Diagnostic severity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Error,
    Warning,
}

/// A message reported back to the host
#[derive(Debug, Clone, PartialEq)]
pub struct Diagnostic {
    pub severity: Severity,
    pub summary: String,
    pub detail: String,
    pub attribute: Option<String>,
}

impl Diagnostic {
    pub fn error(summary: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            summary: summary.into(),
            detail: detail.into(),
            attribute: None,
        }
    }

    pub fn with_attribute(mut self, attribute: impl Into<String>) -> Self {
        self.attribute = Some(attribute.into());
        self
    }

    fn from_error(summary: &str, err: &anyhow::Error) -> Self {
        Self::error(summary, format!("{:#}", err))
    }
}

/// Encoded value as exchanged with the host
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EncodedValue {
    pub msgpack: Vec<u8>,
    pub json: Vec<u8>,
}

impl EncodedValue {
    pub fn encode(value: &DynamicValue) -> Result<Self, StateError> {
        Ok(Self {
            msgpack: encode_dynamic_value(value)?,
            json: vec![],
        })
    }

    pub fn decode(&self) -> Result<DynamicValue, StateError> {
        if self.msgpack.is_empty() {
            decode_dynamic_value(&self.json)
        } else {
            decode_dynamic_value(&self.msgpack)
        }
    }
}

#[derive(Debug, Clone)]
pub struct ProviderSchema {
    pub provider: Schema,
    pub resource_schemas: HashMap<String, Schema>,
}

#[derive(Debug, Clone, Default)]
pub struct PlanResponse {
    pub planned_state: Option<EncodedValue>,
    pub requires_replace: Vec<String>,
    pub diagnostics: Vec<Diagnostic>,
}

#[derive(Debug, Clone, Default)]
pub struct ApplyResponse {
    pub new_state: Option<EncodedValue>,
    pub diagnostics: Vec<Diagnostic>,
}

#[derive(Debug, Clone, Default)]
pub struct ReadResponse {
    pub new_state: Option<EncodedValue>,
    pub diagnostics: Vec<Diagnostic>,
}

#[derive(Debug, Clone)]
pub struct ImportedResource {
    pub type_name: String,
    pub state: EncodedValue,
}

#[derive(Debug, Clone, Default)]
pub struct ImportResponse {
    pub imported_resources: Vec<ImportedResource>,
    pub diagnostics: Vec<Diagnostic>,
}

/// BIG-IP provider
pub struct BigIpProvider {
    /// Client for communicating with the device
    client: Arc<RwLock<Option<Arc<dyn FolderApi>>>>,
}

impl Default for BigIpProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl BigIpProvider {
    pub fn new() -> Self {
        Self {
            client: Arc::new(RwLock::new(None)),
        }
    }

    /// Provider bound to an already configured client
    pub fn with_client(client: Arc<dyn FolderApi>) -> Self {
        Self {
            client: Arc::new(RwLock::new(Some(client))),
        }
    }

    async fn get_client(&self) -> Result<Arc<dyn FolderApi>, ProviderError> {
        self.client
            .read()
            .await
            .clone()
            .ok_or(ProviderError::NotConfigured)
    }

    fn resource_schema(type_name: &str) -> Result<Schema, ProviderError> {
        match type_name {
            t if t == FolderResource::type_name() => Ok(FolderResource::schema()),
            _ => Err(ProviderError::UnknownResourceType(type_name.to_string())),
        }
    }

    pub fn get_schema(&self) -> ProviderSchema {
        info!("GetProviderSchema called");

        ProviderSchema {
            provider: schema::provider_schema(),
            resource_schemas: vec![(FolderResource::type_name().to_string(), FolderResource::schema())]
                .into_iter()
                .collect(),
        }
    }

    /// Configure from a provider block, with `BIGIP_*` variables as fallback
    pub async fn configure(&self, config: &EncodedValue) -> Vec<Diagnostic> {
        info!("ConfigureProvider called");

        let value = match config.decode() {
            Ok(v) => v,
            Err(e) => return vec![Diagnostic::error("Invalid provider configuration", e.to_string())],
        };

        let mut settings = ProviderConfig::default();
        if let Err(e) = settings.apply_env() {
            return vec![Diagnostic::error("Invalid provider configuration", e.to_string())];
        }
        merge_provider_block(&mut settings, &value);

        self.configure_with(&settings).await
    }

    pub async fn configure_with(&self, settings: &ProviderConfig) -> Vec<Diagnostic> {
        info!("Connecting to BIG-IP at {}", settings.base_url());

        match BigIpClient::connect(settings).await {
            Ok(client) => {
                *self.client.write().await = Some(Arc::new(client));
                info!("Connected to BIG-IP successfully");
                vec![]
            }
            Err(e) => {
                error!("Failed to configure BIG-IP client: {}", e);
                vec![Diagnostic::error(
                    "Failed to connect to BIG-IP",
                    format!("Could not connect to {}: {}", settings.base_url(), e),
                )]
            }
        }
    }

    pub fn validate_resource_config(
        &self,
        type_name: &str,
        config: &EncodedValue,
    ) -> Result<Vec<Diagnostic>, ProviderError> {
        debug!("ValidateResourceConfig called for {}", type_name);

        let schema = Self::resource_schema(type_name)?;
        Ok(schema.validate(&config.decode()?))
    }

    pub fn plan_resource_change(
        &self,
        type_name: &str,
        prior: Option<&EncodedValue>,
        proposed: Option<&EncodedValue>,
    ) -> Result<PlanResponse, ProviderError> {
        debug!("PlanResourceChange called for {}", type_name);

        let schema = Self::resource_schema(type_name)?;
        let prior = decode_optional(prior)?;
        let proposed = decode_optional(proposed)?;

        let Some(proposed) = proposed else {
            return Ok(PlanResponse::default());
        };

        let mut planned = schema.apply_defaults(&proposed);
        let mut requires_replace = vec![];

        if let Some(prior) = prior {
            requires_replace = schema.requires_replace(&prior, &planned);
            if requires_replace.is_empty() {
                if let (Some(id), DynamicValue::Map(map)) = (prior.get(ID_ATTR), &mut planned) {
                    map.insert(ID_ATTR.to_string(), id.clone());
                }
            }
        }

        Ok(PlanResponse {
            planned_state: Some(EncodedValue::encode(&planned)?),
            requires_replace,
            diagnostics: vec![],
        })
    }

    pub async fn apply_resource_change(
        &self,
        type_name: &str,
        prior: Option<&EncodedValue>,
        planned: Option<&EncodedValue>,
    ) -> Result<ApplyResponse, ProviderError> {
        info!("ApplyResourceChange called for {}", type_name);

        Self::resource_schema(type_name)?;
        let client = self.get_client().await?;
        let prior = decode_optional(prior)?;
        let planned = decode_optional(planned)?;

        let result = match (prior.as_ref(), planned.as_ref()) {
            // Create
            (None, Some(planned)) => {
                let mut data = ResourceData::from_value(planned);
                FolderResource::create(client.as_ref(), &mut data)
                    .await
                    .map_err(|e| Diagnostic::from_error("Failed to create resource", &e))
                    .and_then(|_| applied_state(&data, "Failed to create resource"))
            }
            // Delete
            (Some(prior), None) => {
                let mut data = ResourceData::from_value(prior);
                FolderResource::delete(client.as_ref(), &mut data)
                    .await
                    .map(|_| None)
                    .map_err(|e| Diagnostic::from_error("Failed to delete resource", &e))
            }
            // Update
            (Some(prior), Some(planned)) => {
                let mut data = ResourceData::from_value(planned);
                if data.id().is_empty() {
                    data.set_id(ResourceData::from_value(prior).id());
                }
                FolderResource::update(client.as_ref(), &mut data)
                    .await
                    .map_err(|e| Diagnostic::from_error("Failed to update resource", &e))
                    .and_then(|_| applied_state(&data, "Failed to update resource"))
            }
            // No change
            (None, None) => Ok(None),
        };

        match result {
            Ok(new_state) => Ok(ApplyResponse {
                new_state: encode_optional(new_state.as_ref())?,
                diagnostics: vec![],
            }),
            Err(diagnostic) => Ok(ApplyResponse {
                new_state: encode_optional(prior.as_ref())?,
                diagnostics: vec![diagnostic],
            }),
        }
    }

    pub async fn read_resource(
        &self,
        type_name: &str,
        current: &EncodedValue,
    ) -> Result<ReadResponse, ProviderError> {
        info!("ReadResource called for {}", type_name);

        Self::resource_schema(type_name)?;
        let client = self.get_client().await?;
        let current = current.decode()?;

        let mut data = ResourceData::from_value(&current);
        match FolderResource::read(client.as_ref(), &mut data).await {
            Ok(()) => Ok(ReadResponse {
                new_state: encode_optional(tracked_state(&data).as_ref())?,
                diagnostics: vec![],
            }),
            Err(e) => Ok(ReadResponse {
                new_state: Some(EncodedValue::encode(&current)?),
                diagnostics: vec![Diagnostic::from_error("Failed to read resource", &e)],
            }),
        }
    }

    pub async fn import_resource_state(
        &self,
        type_name: &str,
        id: &str,
    ) -> Result<ImportResponse, ProviderError> {
        info!("ImportResourceState called for {} with ID {}", type_name, id);

        Self::resource_schema(type_name)?;
        let client = self.get_client().await?;

        match FolderResource::import(client.as_ref(), id).await {
            Ok(data) if !data.id().is_empty() => Ok(ImportResponse {
                imported_resources: vec![ImportedResource {
                    type_name: type_name.to_string(),
                    state: EncodedValue::encode(&data.to_value())?,
                }],
                diagnostics: vec![],
            }),
            Ok(_) => Ok(ImportResponse {
                imported_resources: vec![],
                diagnostics: vec![Diagnostic::error(
                    "Cannot import non-existent remote object",
                    format!("No {} with ID {} exists on the device", type_name, id),
                )],
            }),
            Err(e) => Ok(ImportResponse {
                imported_resources: vec![],
                diagnostics: vec![Diagnostic::from_error("Failed to import resource", &e)],
            }),
        }
    }
}

/// State to hand back, or `None` once the identifier has been cleared
fn tracked_state(data: &ResourceData) -> Option<DynamicValue> {
    if data.id().is_empty() {
        None
    } else {
        Some(data.to_value())
    }
}

/// State after a create or update; the folder must still be there
fn applied_state(data: &ResourceData, summary: &str) -> Result<Option<DynamicValue>, Diagnostic> {
    match tracked_state(data) {
        Some(state) => Ok(Some(state)),
        None => {
            let name = data.get_string(ATTR_NAME).unwrap_or_default();
            Err(Diagnostic::error(
                summary,
                format!("Folder {} was not found on the device after the change", name),
            ))
        }
    }
}

fn decode_optional(value: Option<&EncodedValue>) -> Result<Option<DynamicValue>, StateError> {
    match value {
        Some(v) => {
            let decoded = v.decode()?;
            Ok((!decoded.is_null()).then_some(decoded))
        }
        None => Ok(None),
    }
}

fn encode_optional(value: Option<&DynamicValue>) -> Result<Option<EncodedValue>, StateError> {
    value.map(EncodedValue::encode).transpose()
}

/// Overlay non-empty provider block attributes on the settings
fn merge_provider_block(settings: &mut ProviderConfig, value: &DynamicValue) {
    if let Some(v) = get_optional_string_attr(value, "address") {
        settings.address = v;
    }
    if let Some(v) = get_int_attr(value, "port").and_then(|p| u16::try_from(p).ok()) {
        settings.port = v;
    }
    if let Some(v) = get_optional_string_attr(value, "username") {
        settings.username = v;
    }
    if let Some(v) = get_optional_string_attr(value, "password") {
        settings.password = v;
    }
    if let Some(v) = get_bool_attr(value, "token_auth") {
        settings.token_auth = v;
    }
    if let Some(v) = get_optional_string_attr(value, "login_ref") {
        settings.login_ref = v;
    }
    if let Some(v) = get_bool_attr(value, "validate_certs_disable") {
        settings.validate_certs_disable = v;
    }
    if let Some(v) = get_int_attr(value, "timeout_secs").and_then(|t| u64::try_from(t).ok()) {
        settings.timeout_secs = v;
    }
}
