//! CLI Commands

pub mod folder;
