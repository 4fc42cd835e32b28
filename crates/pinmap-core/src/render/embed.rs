use url::Url;

use super::marker::escape_html;
use super::view::MapView;

/// An `<iframe>` snippet that reproduces `view` on another page.
///
/// `None` until a collection is selected.
pub fn embed_snippet(base_url: &Url, view: &MapView) -> Option<String> {
    let collection_id = view.collection_id.as_deref()?;

    let mut src = base_url.join("embed").ok()?;
    {
        let mut query = src.query_pairs_mut();
        query.append_pair("db", collection_id);
        if !view.visible_fields.is_empty() {
            query.append_pair("fields", &view.visible_fields.join(","));
        }
        if let Some(color) = view.color_field.as_deref() {
            query.append_pair("color", color);
        }
    }

    Some(format!(
        r#"<iframe src="{}" width="100%" height="480" style="border:0" loading="lazy"></iframe>"#,
        escape_html(src.as_str())
    ))
}
