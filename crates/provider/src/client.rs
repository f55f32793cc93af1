//! Client for communicating with a BIG-IP device over iControl REST

use async_trait::async_trait;
use reqwest::{Method, RequestBuilder, Response, StatusCode};
use tokio::sync::RwLock;
use tracing::{debug, info};

use bigip_common::{
    encode_path, ApiErrorBody, Error, Folder, LoginRequest, LoginResponse, ProviderConfig, Result,
};

const FOLDER_URI: &str = "/mgmt/tm/sys/folder";
const LOGIN_URI: &str = "/mgmt/shared/authn/login";
const TOKEN_HEADER: &str = "X-F5-Auth-Token";

/// Folder operations the resource adapter needs from a device
#[async_trait]
pub trait FolderApi: Send + Sync {
    /// Create a folder
    async fn add_folder(&self, folder: &Folder) -> Result<()>;

    /// Fetch a folder by name; `None` when the device has no such folder
    async fn get_folder(&self, name: &str) -> Result<Option<Folder>>;

    /// Replace every field of an existing folder
    async fn modify_folder(&self, name: &str, folder: &Folder) -> Result<()>;

    /// Delete a folder
    async fn delete_folder(&self, name: &str) -> Result<()>;
}

/// iControl REST client for one device
pub struct BigIpClient {
    http: reqwest::Client,
    base_url: String,
    username: String,
    password: String,
    login_ref: String,
    token: RwLock<Option<String>>,
}

impl BigIpClient {
    /// Build a client without contacting the device
    pub fn new(config: &ProviderConfig) -> Result<Self> {
        config.validate()?;

        let http = reqwest::Client::builder()
            .danger_accept_invalid_certs(config.validate_certs_disable)
            .timeout(config.timeout())
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url(),
            username: config.username.clone(),
            password: config.password.clone(),
            login_ref: config.login_ref.clone(),
            token: RwLock::new(None),
        })
    }

    /// Build a client and, with token auth enabled, open a session
    pub async fn connect(config: &ProviderConfig) -> Result<Self> {
        let client = Self::new(config)?;
        if config.token_auth {
            client.login().await?;
        }
        info!("Configured BIG-IP client for {}", client.base_url);
        Ok(client)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Exchange credentials for a session token
    pub async fn login(&self) -> Result<()> {
        let body = LoginRequest {
            username: self.username.clone(),
            password: self.password.clone(),
            login_provider_name: self.login_ref.clone(),
        };

        let response = self
            .http
            .post(format!("{}{}", self.base_url, LOGIN_URI))
            .json(&body)
            .send()
            .await?;

        let response = check_response(response).await.map_err(|e| match e {
            Error::Api { status, message } => Error::Auth(format!("HTTP {}: {}", status, message)),
            other => other,
        })?;

        let login: LoginResponse = response.json().await?;
        *self.token.write().await = Some(login.token.token);
        debug!("Obtained auth token for {}", self.username);
        Ok(())
    }

    /// URL of a single folder; an empty name would address the collection
    fn folder_url(&self, name: &str) -> Result<String> {
        if name.trim().is_empty() {
            return Err(Error::InvalidConfig("folder name must not be empty".to_string()));
        }
        Ok(format!("{}{}/{}", self.base_url, FOLDER_URI, encode_path(name)))
    }

    async fn request(&self, method: Method, url: String) -> RequestBuilder {
        let builder = self.http.request(method, url);
        match self.token.read().await.as_deref() {
            Some(token) => builder.header(TOKEN_HEADER, token),
            None => builder.basic_auth(&self.username, Some(&self.password)),
        }
    }
}

/// Turn a non-success response into an API error using the device error body
async fn check_response(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let text = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ApiErrorBody>(&text)
        .ok()
        .map(|body| body.message)
        .filter(|m| !m.is_empty())
        .unwrap_or(text);

    Err(Error::Api {
        status: status.as_u16(),
        message,
    })
}

#[async_trait]
impl FolderApi for BigIpClient {
    async fn add_folder(&self, folder: &Folder) -> Result<()> {
        if folder.name.trim().is_empty() {
            return Err(Error::InvalidConfig("folder name must not be empty".to_string()));
        }
        let url = format!("{}{}", self.base_url, FOLDER_URI);
        let response = self.request(Method::POST, url).await.json(folder).send().await?;
        check_response(response).await?;
        Ok(())
    }

    async fn get_folder(&self, name: &str) -> Result<Option<Folder>> {
        let response = self
            .request(Method::GET, self.folder_url(name)?)
            .await
            .send()
            .await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }

        let response = check_response(response).await?;
        Ok(Some(response.json().await?))
    }

    // PUT replaces the whole object: fields left out of the body (the empty
    // ones, see `Folder`) go back to the device defaults.
    async fn modify_folder(&self, name: &str, folder: &Folder) -> Result<()> {
        let response = self
            .request(Method::PUT, self.folder_url(name)?)
            .await
            .json(folder)
            .send()
            .await?;
        check_response(response).await?;
        Ok(())
    }

    async fn delete_folder(&self, name: &str) -> Result<()> {
        let response = self
            .request(Method::DELETE, self.folder_url(name)?)
            .await
            .send()
            .await?;
        check_response(response).await?;
        Ok(())
    }
}
