//! One version of the schema.

use super::{Change, SchemaObject};

/// A single schema version: the full object list at that version plus the
/// top-level changes migrating the previous one to it.
#[derive(Debug, Clone)]
pub struct SchemaVersion {
    pub version: u32,
    top_changes: Vec<Change>,
    schema: Vec<SchemaObject>,
}

impl SchemaVersion {
    /// Both lists are sorted by declaration order on construction.
    pub fn new(version: u32, mut top_changes: Vec<Change>, mut schema: Vec<SchemaObject>) -> Self {
        top_changes.sort_by_key(|c| c.order());
        schema.sort_by_key(|s| s.order());
        SchemaVersion {
            version,
            top_changes,
            schema,
        }
    }

    pub fn top_changes(&self) -> &[Change] {
        &self.top_changes
    }

    pub fn schema(&self) -> &[SchemaObject] {
        &self.schema
    }
}
