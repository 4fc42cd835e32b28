// ── Marker view-model ──
//
// Pure functions from resolved locations + view state to map markers.
// No I/O; the HTTP layer and any front-end consume the output as data.

mod embed;
mod field;
mod marker;
mod view;

pub use embed::embed_snippet;
pub use field::{FieldDisplay, format_field};
pub use marker::{DEFAULT_MARKER_COLOR, Marker, build_markers, escape_html};
pub use view::{Intent, MapView, split_field_list};
