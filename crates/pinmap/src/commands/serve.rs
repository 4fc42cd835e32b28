use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;

use pinmap_config::ConfigError;
use pinmap_core::RecordsGateway;

use crate::cli::{GlobalOpts, ServeArgs};
use crate::error::CliError;
use crate::server::{self, Services};

pub async fn handle(args: ServeArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let mut config = super::load(global)?;
    if let Some(bind) = args.bind {
        config.server.bind = bind;
    }
    if let Some(port) = args.port {
        config.server.port = port;
    }

    let ip: IpAddr = config.server.bind.parse().map_err(|_| {
        CliError::Config(ConfigError::Validation {
            field: "server.bind".into(),
            reason: format!("not an IP address: {}", config.server.bind),
        })
    })?;
    let addr = SocketAddr::new(ip, config.server.port);

    let service = pinmap_config::to_service_config(&config, true)?;
    let workspace = service
        .workspace
        .as_ref()
        .ok_or_else(|| CliError::NoCredentials {
            name: config.workspace.name.clone(),
            path: pinmap_config::config_path().display().to_string(),
        })?;

    let services = Services {
        gateway: RecordsGateway::from_config(workspace, &service.transport)?,
        resolver: super::resolver(&service)?,
        public_url: config.server.public_url()?,
    };

    server::serve(addr, Arc::new(services)).await?;
    Ok(())
}
