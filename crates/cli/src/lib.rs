//! BIG-IP CLI
//!
//! Command-line interface driving the folder resource lifecycle against a
//! BIG-IP device.

pub mod commands;
pub mod output;
