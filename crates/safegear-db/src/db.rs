//! Database connection and query execution.

use crate::{DbError, QueryResult, Value};
use serde::de::DeserializeOwned;

#[cfg(target_arch = "wasm32")]
use crate::Row;

/// SQLite database connection.
///
/// Provides type-safe query execution with automatic result
/// deserialization. On non-wasm32 targets the connection is a no-op stub
/// so the workspace builds and unit tests run without a Spin runtime.
pub struct Db {
    #[cfg(target_arch = "wasm32")]
    conn: spin_sdk::sqlite::Connection,
    #[cfg(not(target_arch = "wasm32"))]
    _phantom: std::marker::PhantomData<()>,
}

#[cfg(target_arch = "wasm32")]
impl Db {
    /// Open the default SQLite database.
    pub fn open_default() -> Result<Self, DbError> {
        let conn = spin_sdk::sqlite::Connection::open_default()
            .map_err(|e| DbError::OpenError(e.to_string()))?;
        Ok(Self { conn })
    }

    /// Open a named SQLite database.
    pub fn open(name: &str) -> Result<Self, DbError> {
        let conn = spin_sdk::sqlite::Connection::open(name)
            .map_err(|e| DbError::OpenError(e.to_string()))?;
        Ok(Self { conn })
    }

    /// Execute a SQL statement that doesn't return rows.
    ///
    /// Use this for INSERT, UPDATE, DELETE, CREATE TABLE, etc.
    pub fn execute(&self, sql: &str, params: &[Value]) -> Result<(), DbError> {
        self.conn
            .execute(sql, map_params(params).as_slice())
            .map_err(|e| DbError::QueryError(e.to_string()))?;
        Ok(())
    }

    /// Execute a SQL query and return raw results.
    pub fn query(&self, sql: &str, params: &[Value]) -> Result<QueryResult, DbError> {
        let result = self
            .conn
            .execute(sql, map_params(params).as_slice())
            .map_err(|e| DbError::QueryError(e.to_string()))?;

        let columns: Vec<String> = result.columns.iter().map(|c| c.to_string()).collect();

        let rows: Vec<Row> = result
            .rows
            .iter()
            .map(|row| {
                let values: Vec<Value> = row.values.iter().map(map_spin_value).collect();
                Row::new(columns.clone(), values)
            })
            .collect();

        Ok(QueryResult::new(columns, rows))
    }

    /// Number of rows changed by the most recent statement.
    pub fn changes(&self) -> Result<i64, DbError> {
        let result = self.query("SELECT changes() AS affected", &[])?;
        Ok(result
            .first()
            .and_then(|row| row.get("affected"))
            .and_then(|v| v.as_integer())
            .unwrap_or(0))
    }
}

#[cfg(target_arch = "wasm32")]
fn map_params(params: &[Value]) -> Vec<spin_sdk::sqlite::Value> {
    params
        .iter()
        .map(|v| match v {
            Value::Null => spin_sdk::sqlite::Value::Null,
            Value::Integer(i) => spin_sdk::sqlite::Value::Integer(*i),
            Value::Real(f) => spin_sdk::sqlite::Value::Real(*f),
            Value::Text(s) => spin_sdk::sqlite::Value::Text(s.clone()),
            Value::Blob(b) => spin_sdk::sqlite::Value::Blob(b.clone()),
        })
        .collect()
}

#[cfg(target_arch = "wasm32")]
fn map_spin_value(v: &spin_sdk::sqlite::Value) -> Value {
    match v {
        spin_sdk::sqlite::Value::Null => Value::Null,
        spin_sdk::sqlite::Value::Integer(i) => Value::Integer(*i),
        spin_sdk::sqlite::Value::Real(f) => Value::Real(*f),
        spin_sdk::sqlite::Value::Text(s) => Value::Text(s.clone()),
        spin_sdk::sqlite::Value::Blob(b) => Value::Blob(b.clone()),
    }
}

// Non-WASM stubs for development/testing
#[cfg(not(target_arch = "wasm32"))]
impl Db {
    pub fn open_default() -> Result<Self, DbError> {
        Ok(Self {
            _phantom: std::marker::PhantomData,
        })
    }

    pub fn open(_name: &str) -> Result<Self, DbError> {
        Ok(Self {
            _phantom: std::marker::PhantomData,
        })
    }

    pub fn execute(&self, _sql: &str, _params: &[Value]) -> Result<(), DbError> {
        Ok(())
    }

    pub fn query(&self, _sql: &str, _params: &[Value]) -> Result<QueryResult, DbError> {
        Ok(QueryResult::new(vec![], vec![]))
    }

    pub fn changes(&self) -> Result<i64, DbError> {
        Ok(0)
    }
}

impl Db {
    /// Execute a SQL query and deserialize results into a vector.
    pub fn query_as<T: DeserializeOwned>(
        &self,
        sql: &str,
        params: &[Value],
    ) -> Result<Vec<T>, DbError> {
        let result = self.query(sql, params)?;
        result.deserialize_all()
    }

    /// Execute a SQL query and return a single row.
    ///
    /// Returns an error if no rows are returned.
    pub fn query_one<T: DeserializeOwned>(&self, sql: &str, params: &[Value]) -> Result<T, DbError> {
        let result = self.query(sql, params)?;
        result.first().ok_or(DbError::NotFound)?.deserialize()
    }

    /// Execute a SQL query and return an optional single row.
    pub fn query_optional<T: DeserializeOwned>(
        &self,
        sql: &str,
        params: &[Value],
    ) -> Result<Option<T>, DbError> {
        let result = self.query(sql, params)?;
        match result.first() {
            Some(row) => Ok(Some(row.deserialize()?)),
            None => Ok(None),
        }
    }
}
