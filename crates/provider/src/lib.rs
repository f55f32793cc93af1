//! BIG-IP Provider
//!
//! This crate implements a Terraform-style provider for F5 BIG-IP devices,
//! managing `sys folder` objects over iControl REST.

pub mod client;
pub mod provider;
pub mod resources;
pub mod schema;
pub mod state;

#[cfg(test)]
mod testing;

pub use client::{BigIpClient, FolderApi};
pub use provider::{BigIpProvider, Diagnostic, ProviderError, Severity};
pub use resources::{folder::{FolderConfig, FolderResource}, Resource};
pub use state::{DynamicValue, ResourceData};
