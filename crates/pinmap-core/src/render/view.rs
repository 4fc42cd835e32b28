use serde::{Deserialize, Serialize};

use super::marker::Marker;

/// Explicit map view state.
///
/// Every change goes through [`MapView::update`]; nothing mutates the view
/// behind the caller's back.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MapView {
    pub collection_id: Option<String>,
    /// Fields shown in popups, in the order they were ticked.
    #[serde(default)]
    pub visible_fields: Vec<String>,
    /// Single-select field whose option colour tints the marker.
    #[serde(default)]
    pub color_field: Option<String>,
    #[serde(skip)]
    pub markers: Vec<Marker>,
}

/// A user action against the map view.
#[derive(Debug, Clone, PartialEq)]
pub enum Intent {
    /// Switch collection. Field choices and markers belong to the old one
    /// and are dropped.
    SelectCollection(Option<String>),
    ToggleField(String),
    SetColorField(Option<String>),
    ShowMarkers(Vec<Marker>),
    Clear,
}

impl MapView {
    pub fn for_collection(collection_id: impl Into<String>) -> Self {
        Self {
            collection_id: Some(collection_id.into()),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn update(mut self, intent: Intent) -> Self {
        match intent {
            Intent::SelectCollection(id) => {
                if id != self.collection_id {
                    self = Self {
                        collection_id: id,
                        ..Self::default()
                    };
                }
            }
            Intent::ToggleField(name) => {
                if let Some(pos) = self.visible_fields.iter().position(|f| *f == name) {
                    self.visible_fields.remove(pos);
                } else {
                    self.visible_fields.push(name);
                }
            }
            Intent::SetColorField(field) => self.color_field = field,
            Intent::ShowMarkers(markers) => self.markers = markers,
            Intent::Clear => self = Self::default(),
        }
        self
    }

    /// Whether the map section should be visible at all.
    pub fn is_active(&self) -> bool {
        self.collection_id.is_some()
    }
}

/// Split a comma-separated field list, trimming blanks.
///
/// Repeats keep their first position, so folding the result through
/// [`Intent::ToggleField`] never turns a field back off.
pub fn split_field_list(raw: &str) -> Vec<String> {
    let mut fields: Vec<String> = Vec::new();
    for field in raw.split(',').map(str::trim).filter(|f| !f.is_empty()) {
        if !fields.iter().any(|seen| seen == field) {
            fields.push(field.to_owned());
        }
    }
    fields
}
