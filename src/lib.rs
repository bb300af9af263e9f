//! Terraform Provider Registry Client Library
//!
//! This file serves as the library root for the terraform-registry-client
//! crate, organizing and exposing the modules that make up the client:
//! configuration, error taxonomy, environment-derived proxy selection, and
//! the registry client itself.

pub mod client;
pub mod config;
pub mod error;
pub mod proxy;

pub use client::{RegistryClient, RegistryClientBuilder};
pub use config::Config;
pub use error::{ConfigError, RegistryError, Result};
pub use proxy::ProxySelector;
