// ── Domain model ──
//
// Canonical types built from raw workspace objects by `crate::convert`.
// Collections and items keep the raw upstream JSON so pass-through
// endpoints can forward it untouched.

pub mod collection;
pub mod item;
pub mod location;
pub mod schema;

pub use collection::Collection;
pub use item::{FieldValue, Item, SelectOption, TextRun};
pub use location::{Coordinates, LocationSource, ResolvedLocation};
pub use schema::{FieldSchema, FieldType};
