//! In-memory device used by unit tests

use std::collections::HashMap;

use async_trait::async_trait;
use parking_lot::Mutex;

use bigip_common::{Error, Folder, Result};
use crate::client::FolderApi;

/// Folder store that records every call and can be told to fail
#[derive(Default)]
pub struct MockDevice {
    pub folders: Mutex<HashMap<String, Folder>>,
    pub get_calls: Mutex<Vec<String>>,
    pub add_calls: Mutex<Vec<Folder>>,
    pub modify_calls: Mutex<Vec<(String, Folder)>>,
    pub delete_calls: Mutex<Vec<String>>,
    pub fail_get: bool,
    pub fail_add: bool,
    pub fail_modify: bool,
    pub fail_delete: bool,
    /// Accept adds without storing them
    pub drop_adds: bool,
}

impl MockDevice {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_folder(self, folder: Folder) -> Self {
        self.folders.lock().insert(folder.name.clone(), folder);
        self
    }

    pub fn folder(&self, name: &str) -> Option<Folder> {
        self.folders.lock().get(name).cloned()
    }

    fn failure(status: u16, message: &str) -> Error {
        Error::Api {
            status,
            message: message.to_string(),
        }
    }
}

#[async_trait]
impl FolderApi for MockDevice {
    async fn add_folder(&self, folder: &Folder) -> Result<()> {
        self.add_calls.lock().push(folder.clone());
        if self.fail_add {
            return Err(Self::failure(400, "folder rejected"));
        }
        if self.drop_adds {
            return Ok(());
        }
        self.folders.lock().insert(folder.name.clone(), folder.clone());
        Ok(())
    }

    async fn get_folder(&self, name: &str) -> Result<Option<Folder>> {
        self.get_calls.lock().push(name.to_string());
        if self.fail_get {
            return Err(Self::failure(503, "device unavailable"));
        }
        Ok(self.folder(name))
    }

    async fn modify_folder(&self, name: &str, folder: &Folder) -> Result<()> {
        self.modify_calls.lock().push((name.to_string(), folder.clone()));
        if self.fail_modify {
            return Err(Self::failure(400, "modify rejected"));
        }
        let mut folders = self.folders.lock();
        match folders.get_mut(name) {
            Some(existing) => {
                *existing = folder.clone();
                Ok(())
            }
            None => Err(Self::failure(404, "folder not found")),
        }
    }

    async fn delete_folder(&self, name: &str) -> Result<()> {
        self.delete_calls.lock().push(name.to_string());
        if self.fail_delete {
            return Err(Self::failure(400, "folder in use"));
        }
        match self.folders.lock().remove(name) {
            Some(_) => Ok(()),
            None => Err(Self::failure(404, "folder not found")),
        }
    }
}
