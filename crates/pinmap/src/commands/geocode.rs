use serde_json::json;

use pinmap_core::{GeocodeOutcome, Geocoder};

use crate::cli::{GeocodeArgs, GlobalOpts};
use crate::error::CliError;

pub async fn handle(args: GeocodeArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let config = super::load(global)?;
    let service = pinmap_config::to_service_config(&config, false)?;
    let resolver = super::resolver(&service)?;

    match resolver.geocoder().geocode(&args.address).await? {
        GeocodeOutcome::Found(hit) => {
            let out = json!({
                "lat": hit.lat,
                "lon": hit.lon,
                "display_name": hit.display_name,
            });
            println!("{}", serde_json::to_string_pretty(&out)?);
            Ok(())
        }
        GeocodeOutcome::NotFound => Err(CliError::NoResults {
            address: args.address,
        }),
    }
}
