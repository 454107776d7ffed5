use indexmap::IndexMap;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::{
    Error, Result,
    bind::Bind,
    bindings::BindingKind,
    builder::Builder,
    col::{Columns, IntoColumns},
    connection::{Connection, ExecuteResult, Record},
    expr::{Aggregate, AggregateFunction},
    ident::{Ident, IntoIdent},
    state::QueryKind,
};

impl Builder {
    /// Runs an insert, update or delete.
    ///
    /// An insert without rows succeeds without reaching the connection.
    pub fn execute<C>(&self, conn: &mut C) -> Result<ExecuteResult>
    where
        C: Connection + ?Sized,
    {
        match self.state.kind() {
            QueryKind::Select => {
                return Err(Error::precondition(
                    "execute requires an insert, update or delete",
                ));
            }
            QueryKind::Insert if self.state.inserts.is_empty() => {
                debug!("insert without rows, nothing to execute");
                return Ok(ExecuteResult::default());
            }
            _ => {}
        }
        let sql = self.to_sql()?;
        let bindings = self.execution_bindings();
        debug!(%sql, bindings = bindings.len(), "execute");
        conn.execute(&sql, &bindings)
    }

    pub fn insert_get_id<C>(&self, conn: &mut C) -> Result<Option<i64>>
    where
        C: Connection + ?Sized,
    {
        Ok(self.execute(conn)?.last_insert_id)
    }

    fn prepare_fetch(&self) -> Result<(String, Vec<Bind>)> {
        let sql = self.to_sql()?;
        let bindings = self.get_bindings();
        debug!(%sql, bindings = bindings.len(), "fetch");
        Ok((sql, bindings))
    }

    pub fn fetch_row<C>(&self, conn: &mut C) -> Result<Option<Record>>
    where
        C: Connection + ?Sized,
    {
        let (sql, bindings) = self.prepare_fetch()?;
        conn.fetch_row(&sql, &bindings)
    }

    pub fn fetch_rows<C>(&self, conn: &mut C) -> Result<Vec<Record>>
    where
        C: Connection + ?Sized,
    {
        let (sql, bindings) = self.prepare_fetch()?;
        conn.fetch_rows(&sql, &bindings)
    }

    /// First column of every row.
    pub fn fetch_all_column<C>(&self, conn: &mut C) -> Result<Vec<Bind>>
    where
        C: Connection + ?Sized,
    {
        let rows = self.fetch_rows(conn)?;
        Ok(rows
            .into_iter()
            .filter_map(|record| record.get_index(0).map(|(_, value)| value.clone()))
            .collect())
    }

    /// First column of the first row.
    pub fn fetch_value<C>(&self, conn: &mut C) -> Result<Option<Bind>>
    where
        C: Connection + ?Sized,
    {
        let (sql, bindings) = self.prepare_fetch()?;
        conn.fetch_column(&sql, &bindings)
    }

    /// Rows keyed by the text of their `key` column. Later rows replace
    /// earlier ones sharing a key. The key column is selected in front when
    /// an explicit column list leaves it out.
    pub fn fetch_rows_with_column_key<K, C>(&mut self, key: K, conn: &mut C) -> Result<IndexMap<String, Record>>
    where
        K: IntoIdent,
        C: Connection + ?Sized,
    {
        let key = key.into_ident();
        let columns = self.state.columns.clone();
        let listed = columns.is_wildcard() || columns.iter().any(|column| column.label() == key.label());
        if !listed {
            let mut with_key = Columns::One(key.clone());
            with_key.append(columns.clone());
            self.state.columns = with_key;
        }
        let rows = self.fetch_rows(conn);
        self.state.columns = columns;

        let mut keyed = IndexMap::new();
        for record in rows? {
            let value = record.get(key.label()).ok_or_else(|| {
                Error::invalid_argument(format!("column `{}` missing from result", key.label()))
            })?;
            keyed.insert(value.to_string(), record);
        }
        Ok(keyed)
    }

    /// `key => value` map built from two columns.
    pub fn fetch_key_value_pair<K, V, C>(&mut self, key: K, value: V, conn: &mut C) -> Result<IndexMap<String, Bind>>
    where
        K: IntoIdent,
        V: IntoIdent,
        C: Connection + ?Sized,
    {
        let pair = Columns::from(vec![key.into_ident(), value.into_ident()]);
        let columns = std::mem::replace(&mut self.state.columns, pair);
        let rows = self.fetch_rows(conn);
        self.state.columns = columns;

        Ok(rows?
            .into_iter()
            .filter_map(|record| {
                let (_, key) = record.get_index(0)?;
                let (_, value) = record.get_index(1)?;
                Some((key.to_string(), value.clone()))
            })
            .collect())
    }

    pub fn fetch_object<T, C>(&self, conn: &mut C) -> Result<Option<T>>
    where
        T: DeserializeOwned,
        C: Connection + ?Sized,
    {
        self.fetch_row(conn)?
            .map(|record| record.deserialize())
            .transpose()
    }

    pub fn fetch_objects<T, C>(&self, conn: &mut C) -> Result<Vec<T>>
    where
        T: DeserializeOwned,
        C: Connection + ?Sized,
    {
        self.fetch_rows(conn)?
            .iter()
            .map(Record::deserialize::<T>)
            .collect()
    }

    pub fn count<T, C>(&mut self, columns: T, conn: &mut C) -> Result<i64>
    where
        T: IntoColumns,
        C: Connection + ?Sized,
    {
        let value = self.aggregate(AggregateFunction::Count, columns, conn)?;
        Ok(value.as_i64().unwrap_or(0))
    }

    /// Zero when nothing matches.
    pub fn sum<T, C>(&mut self, column: T, conn: &mut C) -> Result<Bind>
    where
        T: IntoIdent,
        C: Connection + ?Sized,
    {
        let value = self.aggregate(AggregateFunction::Sum, column.into_ident(), conn)?;
        if value.is_null() {
            return Ok(Bind::I64(0));
        }
        Ok(value)
    }

    pub fn min<T, C>(&mut self, column: T, conn: &mut C) -> Result<Bind>
    where
        T: IntoIdent,
        C: Connection + ?Sized,
    {
        self.aggregate(AggregateFunction::Min, column.into_ident(), conn)
    }

    pub fn max<T, C>(&mut self, column: T, conn: &mut C) -> Result<Bind>
    where
        T: IntoIdent,
        C: Connection + ?Sized,
    {
        self.aggregate(AggregateFunction::Max, column.into_ident(), conn)
    }

    pub fn avg<T, C>(&mut self, column: T, conn: &mut C) -> Result<Bind>
    where
        T: IntoIdent,
        C: Connection + ?Sized,
    {
        self.aggregate(AggregateFunction::Avg, column.into_ident(), conn)
    }

    /// Runs `select function(columns) as aggregate` and returns that value,
    /// `Null` when no row comes back.
    ///
    /// The select list and the select bindings are cleared for the query
    /// and put back afterwards, whether or not the fetch succeeded.
    pub fn aggregate<T, C>(&mut self, function: AggregateFunction, columns: T, conn: &mut C) -> Result<Bind>
    where
        T: IntoColumns,
        C: Connection + ?Sized,
    {
        let mut columns = columns.into_columns();
        if columns.is_empty() {
            columns = Columns::One(Ident::new_static("*"));
        }

        let previous_columns = self.state.columns.take();
        let previous_select = self.state.bindings.take(BindingKind::Select);
        self.state.maybe_aggregate = Some(Aggregate::new(function, columns));

        let result = self.fetch_row(conn);

        self.state.maybe_aggregate = None;
        self.state.columns = previous_columns;
        self.state.bindings.set(BindingKind::Select, previous_select);

        Ok(result?
            .and_then(|mut record| record.remove("aggregate"))
            .unwrap_or(Bind::Null))
    }

    /// Column names of the target table.
    pub fn get_column_listing<C>(&self, conn: &mut C) -> Result<Vec<String>>
    where
        C: Connection + ?Sized,
    {
        let (sql, bindings) = self.compile_column_listing()?;
        debug!(%sql, bindings = bindings.len(), "column listing");
        let rows = conn.fetch_rows(&sql, &bindings)?;
        Ok(rows
            .into_iter()
            .filter_map(|record| record.get_index(0).map(|(_, value)| value.to_string()))
            .collect())
    }
}
