//! Subcommand handlers.

pub mod config_cmd;
pub mod geocode;
pub mod markers;
pub mod serve;

use pinmap_config::Config;
use pinmap_core::{GeocodeService, LocationResolver, ServiceConfig};

use crate::cli::GlobalOpts;
use crate::error::CliError;

/// Load config and apply global CLI overrides.
pub fn load(global: &GlobalOpts) -> Result<Config, CliError> {
    let mut config = pinmap_config::load_config(global.config.as_deref())?;
    if let Some(timeout) = global.timeout {
        config.timeout = timeout;
    }
    Ok(config)
}

pub fn resolver(service: &ServiceConfig) -> Result<LocationResolver<GeocodeService>, CliError> {
    let geocoder = GeocodeService::from_config(&service.geocoder, &service.transport)?;
    Ok(LocationResolver::new(geocoder, service.resolver.clone()))
}
