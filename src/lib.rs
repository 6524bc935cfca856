//! Command-line client and SDK for OpenStack-like cloud services.
//!
//! The SDK half authenticates against the identity service, resolves service
//! endpoints from the catalog and exposes resource managers for bare-metal
//! servers, block storage volumes, monitoring alarms and meters, and identity
//! users and tenants. The CLI half maps commands onto those managers.
//!
//! # Modules
//!
//! - `client`: HTTP client, authentication session and service catalog
//! - `manager`: Generic CRUD operations over a REST collection
//! - `services`: Per-service resource managers
//! - `resource`: Dynamic resources returned by the services
//! - `format` / `format_utils`: Table, JSON and CSV rendering
//! - `commands` / `actions` / `cli`: Command definitions and their implementations
//! - `configuration` / `keyring` / `context`: Settings and the token cache

pub mod actions;
pub mod cli;
pub mod client;
pub mod commands;
pub mod configuration;
pub mod context;
pub mod error;
pub mod exit_codes;
pub mod format;
pub mod format_utils;
pub mod keyring;
pub mod manager;
pub mod resource;
pub mod services;
