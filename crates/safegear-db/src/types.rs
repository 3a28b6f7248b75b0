//! Database value types and conversions.

use crate::DbError;
use serde::de::DeserializeOwned;

/// A database value that can be used as a parameter or result.
#[derive(Debug, Clone)]
pub enum Value {
    /// Null value.
    Null,
    /// Integer value.
    Integer(i64),
    /// Real/float value.
    Real(f64),
    /// Text value.
    Text(String),
    /// Binary blob value.
    Blob(Vec<u8>),
}

impl Value {
    /// Try to get the value as an i64.
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Value::Integer(i) => Some(*i),
            Value::Real(f) => Some(*f as i64),
            _ => None,
        }
    }

    /// Try to get the value as a string.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Check if the value is null.
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }
}

// Conversions from Rust types to Value
impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Integer(v as i64)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Integer(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Real(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Text(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Text(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Integer(if v { 1 } else { 0 })
    }
}

impl<T> From<Option<T>> for Value
where
    T: Into<Value>,
{
    fn from(v: Option<T>) -> Self {
        match v {
            Some(v) => v.into(),
            None => Value::Null,
        }
    }
}

/// A row from a query result.
#[derive(Debug, Clone)]
pub struct Row {
    columns: Vec<String>,
    values: Vec<Value>,
}

impl Row {
    /// Create a new row from columns and values.
    pub fn new(columns: Vec<String>, values: Vec<Value>) -> Self {
        Self { columns, values }
    }

    /// Get a value by column name.
    pub fn get(&self, column: &str) -> Option<&Value> {
        self.columns
            .iter()
            .position(|c| c == column)
            .map(|i| &self.values[i])
    }

    /// Try to deserialize the row into a type.
    pub fn deserialize<T: DeserializeOwned>(&self) -> Result<T, DbError> {
        // Convert row to JSON value, then deserialize
        let map: serde_json::Map<String, serde_json::Value> = self
            .columns
            .iter()
            .zip(self.values.iter())
            .map(|(k, v)| (k.clone(), value_to_json(v)))
            .collect();

        let json = serde_json::Value::Object(map);
        serde_json::from_value(json).map_err(|e| DbError::DeserializeError(e.to_string()))
    }
}

/// Query result containing rows.
#[derive(Debug, Clone)]
pub struct QueryResult {
    /// The column names.
    pub columns: Vec<String>,
    /// The rows.
    pub rows: Vec<Row>,
}

impl QueryResult {
    /// Create a new query result.
    pub fn new(columns: Vec<String>, rows: Vec<Row>) -> Self {
        Self { columns, rows }
    }

    /// Get the number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Check if the result is empty.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Get the first row.
    pub fn first(&self) -> Option<&Row> {
        self.rows.first()
    }

    /// Iterate over the rows.
    pub fn iter(&self) -> impl Iterator<Item = &Row> {
        self.rows.iter()
    }

    /// Deserialize all rows into a vector of a type.
    pub fn deserialize_all<T: DeserializeOwned>(&self) -> Result<Vec<T>, DbError> {
        self.rows.iter().map(|row| row.deserialize()).collect()
    }
}

/// Convert a Value to a serde_json::Value.
///
/// Blob cells render lossily as text; no table in this schema stores
/// binary data.
fn value_to_json(value: &Value) -> serde_json::Value {
    match value {
        Value::Null => serde_json::Value::Null,
        Value::Integer(i) => serde_json::Value::Number((*i).into()),
        Value::Real(f) => serde_json::Number::from_f64(*f)
            .map(serde_json::Value::Number)
            .unwrap_or(serde_json::Value::Null),
        Value::Text(s) => serde_json::Value::String(s.clone()),
        Value::Blob(b) => serde_json::Value::String(String::from_utf8_lossy(b).into_owned()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Deserialize, PartialEq, Debug)]
    struct CouponCount {
        code: String,
        used_count: i64,
    }

    #[test]
    fn test_row_get_by_column() {
        let row = Row::new(
            vec!["code".to_string(), "used_count".to_string()],
            vec![Value::Text("HELMET20".to_string()), Value::Integer(3)],
        );
        assert_eq!(row.get("used_count").and_then(|v| v.as_integer()), Some(3));
        assert!(row.get("missing").is_none());
    }

    #[test]
    fn test_row_deserialize() {
        let row = Row::new(
            vec!["code".to_string(), "used_count".to_string()],
            vec![Value::Text("HELMET20".to_string()), Value::Integer(3)],
        );
        let parsed: CouponCount = row.deserialize().unwrap();
        assert_eq!(
            parsed,
            CouponCount {
                code: "HELMET20".to_string(),
                used_count: 3
            }
        );
    }

    #[test]
    fn test_value_conversions() {
        assert!(matches!(Value::from(7_i64), Value::Integer(7)));
        assert!(matches!(Value::from(true), Value::Integer(1)));
        assert!(matches!(Value::from(None::<i64>), Value::Null));
        assert!(Value::from(None::<String>).is_null());
    }
}
