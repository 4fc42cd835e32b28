use std::collections::HashMap;
use std::fmt::Write as _;

use serde::Serialize;

use super::field::format_field;
use super::view::MapView;
use crate::model::{FieldValue, Item, ResolvedLocation};

pub const DEFAULT_MARKER_COLOR: &str = "blue";

/// One point marker, ready for a map library.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Marker {
    pub item_id: String,
    pub lat: f64,
    pub lon: f64,
    pub title: String,
    pub color: String,
    pub popup_html: String,
}

/// Minimal HTML escaping for text and attribute values.
pub fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            other => out.push(other),
        }
    }
    out
}

fn marker_color(view: &MapView, item: Option<&Item>) -> String {
    view.color_field
        .as_deref()
        .and_then(|field| item?.field(field))
        .and_then(|value| match value {
            FieldValue::Select(Some(option)) => option.color.clone(),
            _ => None,
        })
        .filter(|color| color != "default")
        .unwrap_or_else(|| DEFAULT_MARKER_COLOR.to_owned())
}

fn popup_html(view: &MapView, location: &ResolvedLocation, item: Option<&Item>) -> String {
    let mut html = format!(
        "<strong>{}</strong><br>{}",
        escape_html(&location.title),
        escape_html(&location.address)
    );

    let Some(item) = item else {
        return html;
    };
    for name in &view.visible_fields {
        let Some(display) = item.field(name).and_then(format_field) else {
            continue;
        };
        let _ = write!(
            html,
            "<br><em>{}:</em> {}",
            escape_html(name),
            display.to_html()
        );
    }
    html
}

/// One marker per resolved location, in location order.
///
/// `items` supplies the field values shown in popups and the colour field;
/// locations whose item is missing still get a title/address popup.
pub fn build_markers(
    view: &MapView,
    items: &[Item],
    locations: &[ResolvedLocation],
) -> Vec<Marker> {
    let by_id: HashMap<&str, &Item> = items.iter().map(|i| (i.id.as_str(), i)).collect();

    locations
        .iter()
        .map(|location| {
            let item = by_id.get(location.item_id.as_str()).copied();
            Marker {
                item_id: location.item_id.clone(),
                lat: location.coordinates.latitude,
                lon: location.coordinates.longitude,
                title: location.title.clone(),
                color: marker_color(view, item),
                popup_html: popup_html(view, location, item),
            }
        })
        .collect()
}
