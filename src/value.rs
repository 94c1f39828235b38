//! Flat record values.
//!
//! [`FieldValue`] is the scalar type a flattened column can hold, and
//! [`FlatRecord`] is one flattened row: an ordered list of column name /
//! value pairs matching the entity's declared column set. Raw API values
//! arrive as `serde_json::Value` and leave as `mysql_async::Value`; this
//! module owns both conversions.

use mysql_async::{Params, Value as SqlValue};

/// A single flat column value.
///
/// JSON arrays and objects never reach this type directly; the field mapper
/// degrades any non-scalar (or absent) value to `Null` rather than failing.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Int(i64),
    Float(f64),
    Bool(bool),
    Text(String),
    Null,
}

impl FieldValue {
    pub fn is_null(&self) -> bool {
        matches!(self, FieldValue::Null)
    }

    /// Convert a raw JSON value into a flat scalar.
    ///
    /// Non-scalar shapes (arrays, objects) resolve to `Null` so that one
    /// malformed record cannot abort a batch.
    pub fn from_json(value: &serde_json::Value) -> FieldValue {
        match value {
            serde_json::Value::Null => FieldValue::Null,
            serde_json::Value::Bool(b) => FieldValue::Bool(*b),
            serde_json::Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    FieldValue::Int(i)
                } else if let Some(f) = n.as_f64() {
                    FieldValue::Float(f)
                } else {
                    // u64 above i64::MAX and no f64 representation
                    FieldValue::Null
                }
            }
            serde_json::Value::String(s) => FieldValue::Text(s.clone()),
            serde_json::Value::Array(_) | serde_json::Value::Object(_) => FieldValue::Null,
        }
    }
}

impl From<&FieldValue> for SqlValue {
    fn from(value: &FieldValue) -> SqlValue {
        match value {
            FieldValue::Int(i) => SqlValue::Int(*i),
            FieldValue::Float(f) => SqlValue::Double(*f),
            FieldValue::Bool(b) => SqlValue::Int(i64::from(*b)),
            FieldValue::Text(s) => SqlValue::Bytes(s.clone().into_bytes()),
            FieldValue::Null => SqlValue::NULL,
        }
    }
}

/// One flattened row, with columns in the entity's declared order.
#[derive(Debug, Clone, PartialEq)]
pub struct FlatRecord {
    columns: Vec<(&'static str, FieldValue)>,
}

impl FlatRecord {
    pub fn new(columns: Vec<(&'static str, FieldValue)>) -> Self {
        FlatRecord { columns }
    }

    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.columns
            .iter()
            .find(|(col, _)| *col == name)
            .map(|(_, value)| value)
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn column_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.columns.iter().map(|(col, _)| *col)
    }

    /// Positional statement parameters, in declared column order.
    pub fn sql_params(&self) -> Params {
        Params::Positional(
            self.columns
                .iter()
                .map(|(_, value)| SqlValue::from(value))
                .collect(),
        )
    }
}
