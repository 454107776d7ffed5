use indexmap::IndexMap;
use serde::{Serialize, de::DeserializeOwned};

use crate::{Result, bind::Bind, dialect::Dialect};

/// Outcome of a statement that does not return rows.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ExecuteResult {
    pub rows_affected: u64,
    /// Set by drivers for inserts only.
    pub last_insert_id: Option<i64>,
}

/// One fetched row, column name to value, in select order.
#[derive(Debug, Default, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Record(IndexMap<String, Bind>);

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert<K: Into<String>>(&mut self, column: K, value: Bind) {
        self.0.insert(column.into(), value);
    }

    pub fn get(&self, column: &str) -> Option<&Bind> {
        self.0.get(column)
    }

    pub fn get_index(&self, index: usize) -> Option<(&str, &Bind)> {
        self.0
            .get_index(index)
            .map(|(column, value)| (column.as_str(), value))
    }

    pub fn remove(&mut self, column: &str) -> Option<Bind> {
        self.0.shift_remove(column)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Bind)> {
        self.0.iter().map(|(column, value)| (column.as_str(), value))
    }

    pub fn into_inner(self) -> IndexMap<String, Bind> {
        self.0
    }

    /// Maps the record onto `T` by column name.
    pub fn deserialize<T: DeserializeOwned>(&self) -> Result<T> {
        let value = serde_json::to_value(self)?;
        Ok(serde_json::from_value(value)?)
    }
}

impl<K: Into<String>> FromIterator<(K, Bind)> for Record {
    fn from_iter<I: IntoIterator<Item = (K, Bind)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(column, value)| (column.into(), value))
                .collect(),
        )
    }
}

/// Whatever actually talks to the database. Placeholders in `sql` are `?`
/// and line up one to one with `bindings`.
pub trait Connection {
    fn dialect(&self) -> Dialect;

    fn execute(&mut self, sql: &str, bindings: &[Bind]) -> Result<ExecuteResult>;

    fn fetch_row(&mut self, sql: &str, bindings: &[Bind]) -> Result<Option<Record>>;

    fn fetch_rows(&mut self, sql: &str, bindings: &[Bind]) -> Result<Vec<Record>>;

    /// First column of the first row.
    fn fetch_column(&mut self, sql: &str, bindings: &[Bind]) -> Result<Option<Bind>> {
        let row = self.fetch_row(sql, bindings)?;
        Ok(row.and_then(|record| record.get_index(0).map(|(_, value)| value.clone())))
    }

    fn begin_transaction(&mut self) -> Result<()>;

    fn commit(&mut self) -> Result<()>;

    fn rollback(&mut self) -> Result<()>;
}

impl<C: Connection + ?Sized> Connection for Box<C> {
    fn dialect(&self) -> Dialect {
        (**self).dialect()
    }

    fn execute(&mut self, sql: &str, bindings: &[Bind]) -> Result<ExecuteResult> {
        (**self).execute(sql, bindings)
    }

    fn fetch_row(&mut self, sql: &str, bindings: &[Bind]) -> Result<Option<Record>> {
        (**self).fetch_row(sql, bindings)
    }

    fn fetch_rows(&mut self, sql: &str, bindings: &[Bind]) -> Result<Vec<Record>> {
        (**self).fetch_rows(sql, bindings)
    }

    fn fetch_column(&mut self, sql: &str, bindings: &[Bind]) -> Result<Option<Bind>> {
        (**self).fetch_column(sql, bindings)
    }

    fn begin_transaction(&mut self) -> Result<()> {
        (**self).begin_transaction()
    }

    fn commit(&mut self) -> Result<()> {
        (**self).commit()
    }

    fn rollback(&mut self) -> Result<()> {
        (**self).rollback()
    }
}
