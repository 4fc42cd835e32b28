// ── API-to-domain conversions ──
//
// Bridges raw workspace JSON objects into `crate::model` types. Field values
// are parsed leniently: a malformed payload degrades to an empty value of
// the same type rather than failing the whole item.

use indexmap::IndexMap;
use serde::Deserialize;
use serde_json::Value;

use crate::error::CoreError;
use crate::model::{Collection, FieldSchema, FieldType, FieldValue, Item, SelectOption, TextRun};

const UNTITLED: &str = "(Untitled)";

// ── Helpers ────────────────────────────────────────────────────────

fn object_id(value: &Value, what: &str) -> Result<String, CoreError> {
    value
        .get("id")
        .and_then(Value::as_str)
        .map(str::to_owned)
        .ok_or_else(|| CoreError::Internal(format!("{what} object without an id")))
}

/// Deserialize `payload` as `T`, falling back to `T::default()`.
fn lenient<T: for<'de> Deserialize<'de> + Default>(payload: Option<&Value>) -> T {
    payload
        .and_then(|p| T::deserialize(p).ok())
        .unwrap_or_default()
}

fn plain_text(runs: &[TextRun]) -> String {
    runs.iter().map(|run| run.plain_text.as_str()).collect()
}

// ── Fields ─────────────────────────────────────────────────────────

/// Parse one property value (`{"type": "...", "<type>": payload}`).
pub fn field_from_value(value: &Value) -> FieldValue {
    let tag = value.get("type").and_then(Value::as_str).unwrap_or_default();
    let payload = value.get(tag);

    match FieldType::from(tag.to_owned()) {
        FieldType::Title => FieldValue::Title(lenient(payload)),
        FieldType::RichText => FieldValue::RichText(lenient(payload)),
        FieldType::Number => FieldValue::Number(payload.and_then(Value::as_f64)),
        FieldType::Url => FieldValue::Url(lenient(payload)),
        FieldType::Select => FieldValue::Select(lenient::<Option<SelectOption>>(payload)),
        FieldType::MultiSelect => FieldValue::MultiSelect(lenient(payload)),
        FieldType::PhoneNumber => FieldValue::PhoneNumber(lenient(payload)),
        other => FieldValue::Other(other.as_str().to_owned()),
    }
}

// ── Collections ────────────────────────────────────────────────────

impl TryFrom<Value> for Collection {
    type Error = CoreError;

    fn try_from(raw: Value) -> Result<Self, Self::Error> {
        let id = object_id(&raw, "database")?;
        let runs: Vec<TextRun> = lenient(raw.get("title"));
        let title = plain_text(&runs);
        let archived = raw
            .get("archived")
            .and_then(Value::as_bool)
            .unwrap_or(false);

        Ok(Self {
            id,
            title: if title.is_empty() {
                UNTITLED.to_owned()
            } else {
                title
            },
            archived,
            raw,
        })
    }
}

// ── Items ──────────────────────────────────────────────────────────

impl TryFrom<Value> for Item {
    type Error = CoreError;

    fn try_from(raw: Value) -> Result<Self, Self::Error> {
        let id = object_id(&raw, "page")?;
        let fields = raw
            .get("properties")
            .and_then(Value::as_object)
            .map(|props| {
                props
                    .iter()
                    .map(|(name, value)| (name.clone(), field_from_value(value)))
                    .collect::<IndexMap<_, _>>()
            })
            .unwrap_or_default();

        Ok(Self { id, fields, raw })
    }
}

// ── Schema ─────────────────────────────────────────────────────────

/// Extract field name → type tag from a database object's `properties`.
pub fn schema_from_database(database: &Value) -> FieldSchema {
    let fields = database
        .get("properties")
        .and_then(Value::as_object)
        .map(|props| {
            props
                .iter()
                .map(|(name, prop)| {
                    let tag = prop.get("type").and_then(Value::as_str).unwrap_or_default();
                    (name.clone(), FieldType::from(tag.to_owned()))
                })
                .collect()
        })
        .unwrap_or_default();
    FieldSchema(fields)
}
