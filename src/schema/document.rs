use serde_json::{Value as JsonValue, json};

use crate::core::{FrameError, Result};

use super::{ColumnSchema, DataFrameSchema};

impl DataFrameSchema {
    /// JSON description of the schema:
    /// `{"columns": [{"name": .., "kind": "value", "type": "Int?"}, ..]}`.
    /// Group and frame columns carry a nested `schema` object instead of `type`.
    pub fn to_document(&self) -> JsonValue {
        let columns: Vec<JsonValue> = self
            .columns()
            .map(|(name, column)| match column {
                ColumnSchema::Value(t) => json!({
                    "name": name,
                    "kind": column.kind(),
                    "type": t,
                }),
                ColumnSchema::Group(s) | ColumnSchema::Frame(s) => json!({
                    "name": name,
                    "kind": column.kind(),
                    "schema": s.to_document(),
                }),
            })
            .collect();
        json!({ "columns": columns })
    }

    pub fn to_json_string(&self) -> Result<String> {
        serde_json::to_string_pretty(&self.to_document())
            .map_err(|e| FrameError::Serialization(e.to_string()))
    }
}
