use pinmap_core::{Intent, MapView, RecordsGateway, collection_markers, split_field_list};

use crate::cli::{GlobalOpts, MarkersArgs};
use crate::error::CliError;

pub async fn handle(args: MarkersArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let config = super::load(global)?;
    let service = pinmap_config::to_service_config(&config, true)?;
    let workspace = service
        .workspace
        .as_ref()
        .ok_or_else(|| CliError::NoCredentials {
            name: config.workspace.name.clone(),
            path: pinmap_config::config_path().display().to_string(),
        })?;

    let gateway = RecordsGateway::from_config(workspace, &service.transport)?;
    let resolver = super::resolver(&service)?;

    let view = split_field_list(&args.fields).into_iter().fold(
        MapView::for_collection(args.collection_id).update(Intent::SetColorField(args.color)),
        |view, field| view.update(Intent::ToggleField(field)),
    );

    let markers = collection_markers(&gateway, &resolver, &view).await?;
    tracing::info!(count = markers.len(), "markers built");
    println!("{}", serde_json::to_string_pretty(&markers)?);
    Ok(())
}
