use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

use super::schema::FieldType;

const NO_TITLE: &str = "No title";

/// One rich-text run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextRun {
    #[serde(default)]
    pub plain_text: String,
    #[serde(default)]
    pub href: Option<String>,
}

/// An option of a select / multi-select field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectOption {
    #[serde(default)]
    pub id: Option<String>,
    pub name: String,
    #[serde(default)]
    pub color: Option<String>,
}

/// A typed field value.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Title(Vec<TextRun>),
    RichText(Vec<TextRun>),
    Number(Option<f64>),
    Url(Option<String>),
    Select(Option<SelectOption>),
    MultiSelect(Vec<SelectOption>),
    PhoneNumber(Option<String>),
    /// Any other field type; only the type tag is kept.
    Other(String),
}

impl FieldValue {
    pub fn field_type(&self) -> FieldType {
        match self {
            Self::Title(_) => FieldType::Title,
            Self::RichText(_) => FieldType::RichText,
            Self::Number(_) => FieldType::Number,
            Self::Url(_) => FieldType::Url,
            Self::Select(_) => FieldType::Select,
            Self::MultiSelect(_) => FieldType::MultiSelect,
            Self::PhoneNumber(_) => FieldType::PhoneNumber,
            Self::Other(tag) => FieldType::from(tag.clone()),
        }
    }

    /// Text runs of title and rich-text fields.
    pub fn runs(&self) -> Option<&[TextRun]> {
        match self {
            Self::Title(runs) | Self::RichText(runs) => Some(runs.as_slice()),
            _ => None,
        }
    }

    /// Plain text of the first run, if it is non-empty.
    pub fn first_text(&self) -> Option<&str> {
        self.runs()?
            .first()
            .map(|run| run.plain_text.as_str())
            .filter(|text| !text.is_empty())
    }
}

/// A row of a collection.
///
/// Serializes as the raw upstream object, so listing endpoints forward
/// items exactly as the workspace returned them.
#[derive(Debug, Clone, PartialEq)]
pub struct Item {
    pub id: String,
    pub fields: IndexMap<String, FieldValue>,
    pub(crate) raw: Value,
}

impl Item {
    pub fn raw(&self) -> &Value {
        &self.raw
    }

    pub fn field(&self, name: &str) -> Option<&FieldValue> {
        self.fields.get(name)
    }

    /// The field whose type is `title`. Exactly one is expected; the first wins.
    pub fn title_field(&self) -> Option<(&str, &FieldValue)> {
        self.fields
            .iter()
            .find(|(_, value)| matches!(value, FieldValue::Title(_)))
            .map(|(name, value)| (name.as_str(), value))
    }

    /// First run of the title field, or `"No title"`.
    ///
    /// This doubles as the free-text address submitted to the geocoder.
    pub fn display_title(&self) -> String {
        self.title_field()
            .and_then(|(_, value)| value.first_text())
            .unwrap_or(NO_TITLE)
            .to_owned()
    }
}

impl Serialize for Item {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.raw.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Item {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Value::deserialize(deserializer)?;
        Item::try_from(raw).map_err(serde::de::Error::custom)
    }
}
