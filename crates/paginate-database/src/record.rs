//! Schema-less records.

use serde::ser::{Serialize, SerializeMap, Serializer};
use sqlx::sqlite::SqliteRow;
use sqlx::{Column, FromRow, Row, TypeInfo, ValueRef};

use paginate_core::types::Value;

/// A row decoded column by column, keeping the select-list order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DynamicRecord {
    columns: Vec<(String, Value)>,
}

impl DynamicRecord {
    /// Value of the named column.
    pub fn get(&self, column: &str) -> Option<&Value> {
        self.columns
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, value)| value)
    }

    /// Column names, in select-list order.
    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|(name, _)| name.as_str())
    }

    /// Column values, in select-list order.
    pub fn values(&self) -> impl Iterator<Item = &Value> {
        self.columns.iter().map(|(_, value)| value)
    }
}

impl<'r> FromRow<'r, SqliteRow> for DynamicRecord {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        let mut columns = Vec::with_capacity(row.columns().len());
        for column in row.columns() {
            let index = column.ordinal();
            let raw = row.try_get_raw(index)?;
            let value = if raw.is_null() {
                Value::Null
            } else {
                match raw.type_info().name().to_ascii_uppercase().as_str() {
                    "INTEGER" | "INT" | "INT4" | "INT8" | "BIGINT" | "BOOLEAN" => {
                        Value::Integer(row.try_get_unchecked(index)?)
                    }
                    "REAL" | "FLOAT" | "DOUBLE" | "NUMERIC" => {
                        Value::Float(row.try_get_unchecked(index)?)
                    }
                    "BLOB" => {
                        let bytes: Vec<u8> = row.try_get_unchecked(index)?;
                        Value::Text(String::from_utf8_lossy(&bytes).into_owned())
                    }
                    _ => Value::Text(row.try_get_unchecked(index)?),
                }
            };
            columns.push((column.name().to_string(), value));
        }
        Ok(Self { columns })
    }
}

impl Serialize for DynamicRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.columns.len()))?;
        for (name, value) in &self.columns {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}
