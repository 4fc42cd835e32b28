use serde::Serialize;

use super::marker::escape_html;
use crate::model::FieldValue;

/// A field value formatted for a popup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FieldDisplay {
    Link { href: String },
    Text { text: String },
}

impl FieldDisplay {
    fn text(text: impl Into<String>) -> Self {
        Self::Text { text: text.into() }
    }

    pub fn to_html(&self) -> String {
        match self {
            Self::Link { href } => {
                let href = escape_html(href);
                format!(r#"<a href="{href}" target="_blank" rel="noopener">{href}</a>"#)
            }
            Self::Text { text } => escape_html(text),
        }
    }
}

fn is_web_link(href: &str) -> bool {
    let lower = href.trim_start().to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}

/// Format one field for display; `None` for empty values and for types
/// that are never shown (title, dates, people, ...).
pub fn format_field(value: &FieldValue) -> Option<FieldDisplay> {
    match value {
        FieldValue::Url(Some(href)) if is_web_link(href) => Some(FieldDisplay::Link {
            href: href.clone(),
        }),
        FieldValue::Url(Some(href)) => Some(FieldDisplay::text(href.as_str())),
        FieldValue::Number(Some(n)) => Some(FieldDisplay::text(n.to_string())),
        FieldValue::Select(Some(option)) => Some(FieldDisplay::text(option.name.as_str())),
        FieldValue::MultiSelect(options) if !options.is_empty() => Some(FieldDisplay::text(
            options
                .iter()
                .map(|o| o.name.as_str())
                .collect::<Vec<_>>()
                .join(", "),
        )),
        FieldValue::RichText(runs) => {
            let text: String = runs.iter().map(|r| r.plain_text.as_str()).collect();
            (!text.is_empty()).then(|| FieldDisplay::text(text))
        }
        FieldValue::PhoneNumber(Some(phone)) => Some(FieldDisplay::text(phone.as_str())),
        _ => None,
    }
}
