use serde::{Serialize, Serializer};
use serde_json::Value;

/// A database-like resource in the workspace.
///
/// Serializes as the raw upstream object.
#[derive(Debug, Clone, PartialEq)]
pub struct Collection {
    pub id: String,
    /// Concatenated plain text of the title runs, `"(Untitled)"` when empty.
    pub title: String,
    pub archived: bool,
    pub(crate) raw: Value,
}

impl Collection {
    pub fn raw(&self) -> &Value {
        &self.raw
    }
}

impl Serialize for Collection {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.raw.serialize(serializer)
    }
}
