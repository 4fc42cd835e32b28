use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, EnumString};

/// Type tag of a collection field, as reported by the workspace API.
///
/// Tags this crate does not know are preserved in `Other`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, EnumString, AsRefStr, Serialize, Deserialize)]
#[strum(serialize_all = "snake_case")]
#[serde(from = "String", into = "String")]
pub enum FieldType {
    Title,
    RichText,
    Number,
    Url,
    Select,
    MultiSelect,
    PhoneNumber,
    Email,
    Checkbox,
    Date,
    Status,
    People,
    Files,
    Relation,
    Formula,
    Rollup,
    CreatedTime,
    LastEditedTime,
    #[strum(default)]
    Other(String),
}

impl FieldType {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Other(tag) => tag,
            known => known.as_ref(),
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<String> for FieldType {
    fn from(tag: String) -> Self {
        match tag.parse() {
            Ok(kind) => kind,
            Err(_) => Self::Other(tag),
        }
    }
}

impl From<FieldType> for String {
    fn from(kind: FieldType) -> Self {
        kind.as_str().to_owned()
    }
}

/// Field name → type tag, in upstream order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldSchema(pub IndexMap<String, FieldType>);

impl FieldSchema {
    pub fn get(&self, name: &str) -> Option<&FieldType> {
        self.0.get(name)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldType)> {
        self.0.iter().map(|(name, kind)| (name.as_str(), kind))
    }

    /// Fields usable for marker colouring (single-select fields).
    pub fn color_candidates(&self) -> Vec<&str> {
        self.iter()
            .filter(|(_, kind)| **kind == FieldType::Select)
            .map(|(name, _)| name)
            .collect()
    }

    /// Fields that can appear in a marker popup.
    pub fn displayable(&self) -> Vec<&str> {
        self.iter()
            .filter(|(_, kind)| {
                matches!(
                    kind,
                    FieldType::RichText
                        | FieldType::Number
                        | FieldType::Url
                        | FieldType::Select
                        | FieldType::MultiSelect
                        | FieldType::PhoneNumber
                )
            })
            .map(|(name, _)| name)
            .collect()
    }
}
