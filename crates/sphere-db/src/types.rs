//! Database value types and conversions.

use crate::DbError;
use base64::Engine;
use bytes::BytesMut;
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use std::error::Error;
use tokio_postgres::types::{to_sql_checked, IsNull, ToSql, Type};

/// A database value that can be used as a parameter or result.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Null value.
    Null,
    /// Boolean value.
    Bool(bool),
    /// Integer value.
    Integer(i64),
    /// Real/float value.
    Real(f64),
    /// Text value.
    Text(String),
    /// Binary blob value.
    Blob(Vec<u8>),
    /// Array of text values (`TEXT[]`).
    TextArray(Vec<String>),
    /// Timestamp with time zone.
    Timestamp(DateTime<Utc>),
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

    /// Try to get the value as an f64.
    pub fn as_real(&self) -> Option<f64> {
        match self {
            Value::Real(f) => Some(*f),
            Value::Integer(i) => Some(*i as f64),
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

    /// Try to get the value as a text array.
    pub fn as_text_array(&self) -> Option<&[String]> {
        match self {
            Value::TextArray(v) => Some(v),
            _ => None,
        }
    }

    /// Check if the value is null.
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Read column `idx` of a driver row.
    pub(crate) fn from_pg(row: &tokio_postgres::Row, idx: usize) -> Result<Value, DbError> {
        let column = &row.columns()[idx];
        let type_err = |e: tokio_postgres::Error| {
            DbError::TypeError(format!("column {}: {}", column.name(), e))
        };

        let value = match column.type_().name() {
            "bool" => row.try_get::<_, Option<bool>>(idx).map_err(type_err)?.map(Value::Bool),
            "int2" => row
                .try_get::<_, Option<i16>>(idx)
                .map_err(type_err)?
                .map(|v| Value::Integer(v.into())),
            "int4" => row
                .try_get::<_, Option<i32>>(idx)
                .map_err(type_err)?
                .map(|v| Value::Integer(v.into())),
            "int8" => row.try_get::<_, Option<i64>>(idx).map_err(type_err)?.map(Value::Integer),
            "float4" => row
                .try_get::<_, Option<f32>>(idx)
                .map_err(type_err)?
                .map(|v| Value::Real(v.into())),
            "float8" => row.try_get::<_, Option<f64>>(idx).map_err(type_err)?.map(Value::Real),
            "text" | "varchar" | "bpchar" | "name" => row
                .try_get::<_, Option<String>>(idx)
                .map_err(type_err)?
                .map(Value::Text),
            "bytea" => row.try_get::<_, Option<Vec<u8>>>(idx).map_err(type_err)?.map(Value::Blob),
            "_text" | "_varchar" => row
                .try_get::<_, Option<Vec<String>>>(idx)
                .map_err(type_err)?
                .map(Value::TextArray),
            "timestamptz" => row
                .try_get::<_, Option<DateTime<Utc>>>(idx)
                .map_err(type_err)?
                .map(Value::Timestamp),
            "timestamp" => row
                .try_get::<_, Option<chrono::NaiveDateTime>>(idx)
                .map_err(type_err)?
                .map(|t| Value::Timestamp(t.and_utc())),
            other => {
                return Err(DbError::TypeError(format!(
                    "column {} has unsupported type {}",
                    column.name(),
                    other
                )))
            }
        };

        Ok(value.unwrap_or(Value::Null))
    }
}

impl ToSql for Value {
    fn to_sql(&self, ty: &Type, out: &mut BytesMut) -> Result<IsNull, Box<dyn Error + Sync + Send>> {
        match self {
            Value::Null => Ok(IsNull::Yes),
            Value::Bool(b) => b.to_sql_checked(ty, out),
            Value::Integer(i) => match ty.name() {
                "int2" => i16::try_from(*i)?.to_sql_checked(ty, out),
                "int4" => i32::try_from(*i)?.to_sql_checked(ty, out),
                "float8" => (*i as f64).to_sql_checked(ty, out),
                _ => i.to_sql_checked(ty, out),
            },
            Value::Real(f) => match ty.name() {
                "float4" => (*f as f32).to_sql_checked(ty, out),
                _ => f.to_sql_checked(ty, out),
            },
            Value::Text(s) => s.to_sql_checked(ty, out),
            Value::Blob(b) => b.to_sql_checked(ty, out),
            Value::TextArray(v) => v.to_sql_checked(ty, out),
            Value::Timestamp(t) => t.to_sql_checked(ty, out),
        }
    }

    // Each variant checks its own type in `to_sql`
    fn accepts(_ty: &Type) -> bool {
        true
    }

    to_sql_checked!();
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

impl From<usize> for Value {
    fn from(v: usize) -> Self {
        Value::Integer(v as i64)
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

impl From<&String> for Value {
    fn from(v: &String) -> Self {
        Value::Text(v.clone())
    }
}

impl From<Vec<u8>> for Value {
    fn from(v: Vec<u8>) -> Self {
        Value::Blob(v)
    }
}

impl From<Vec<String>> for Value {
    fn from(v: Vec<String>) -> Self {
        Value::TextArray(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(v: DateTime<Utc>) -> Self {
        Value::Timestamp(v)
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

    pub(crate) fn from_pg(columns: &[String], row: &tokio_postgres::Row) -> Result<Self, DbError> {
        let values = (0..row.len())
            .map(|idx| Value::from_pg(row, idx))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::new(columns.to_vec(), values))
    }

    /// Get a value by column name.
    pub fn get(&self, column: &str) -> Option<&Value> {
        self.columns
            .iter()
            .position(|c| c == column)
            .and_then(|i| self.values.get(i))
    }

    /// Get a value by column index.
    pub fn get_index(&self, index: usize) -> Option<&Value> {
        self.values.get(index)
    }

    /// Get the column names.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Get all values.
    pub fn values(&self) -> &[Value] {
        &self.values
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
fn value_to_json(value: &Value) -> serde_json::Value {
    match value {
        Value::Null => serde_json::Value::Null,
        Value::Bool(b) => serde_json::Value::Bool(*b),
        Value::Integer(i) => serde_json::Value::Number((*i).into()),
        Value::Real(f) => serde_json::Number::from_f64(*f)
            .map(serde_json::Value::Number)
            .unwrap_or(serde_json::Value::Null),
        Value::Text(s) => serde_json::Value::String(s.clone()),
        Value::Blob(b) => String::from_utf8(b.clone())
            .map(serde_json::Value::String)
            .unwrap_or_else(|_| {
                serde_json::Value::String(base64::engine::general_purpose::STANDARD.encode(b))
            }),
        Value::TextArray(v) => serde_json::Value::Array(
            v.iter().cloned().map(serde_json::Value::String).collect(),
        ),
        Value::Timestamp(t) => serde_json::Value::String(t.to_rfc3339()),
    }
}
