use rusqlite::{
    Row, params_from_iter,
    types::{FromSql, FromSqlResult, ToSql, ToSqlOutput, Value, ValueRef},
};

use crate::{
    Result,
    bind::Bind,
    connection::{Connection, ExecuteResult, Record},
    dialect::Dialect,
};

impl ToSql for Bind {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        let value = match self {
            Bind::Null => Value::Null,
            Bind::String(value) => return Ok(ToSqlOutput::Borrowed(ValueRef::Text(value.as_bytes()))),
            Bind::Bool(value) => Value::Integer(i64::from(*value)),
            Bind::F32(value) => Value::Real(f64::from(*value)),
            Bind::F64(value) => Value::Real(*value),
            Bind::I8(value) => Value::Integer(i64::from(*value)),
            Bind::I16(value) => Value::Integer(i64::from(*value)),
            Bind::I32(value) => Value::Integer(i64::from(*value)),
            Bind::I64(value) => Value::Integer(*value),
            Bind::U8(value) => Value::Integer(i64::from(*value)),
            Bind::U16(value) => Value::Integer(i64::from(*value)),
            Bind::U32(value) => Value::Integer(i64::from(*value)),
            Bind::U64(value) => Value::Integer(
                i64::try_from(*value).map_err(|err| rusqlite::Error::ToSqlConversionFailure(Box::new(err)))?,
            ),
        };
        Ok(ToSqlOutput::Owned(value))
    }
}

impl FromSql for Bind {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        let bind = match value {
            ValueRef::Null => Bind::Null,
            ValueRef::Integer(value) => Bind::I64(value),
            ValueRef::Real(value) => Bind::F64(value),
            ValueRef::Text(bytes) | ValueRef::Blob(bytes) => {
                Bind::String(String::from_utf8_lossy(bytes).into_owned())
            }
        };
        Ok(bind)
    }
}

/// [`Connection`] over a rusqlite handle.
#[derive(Debug)]
pub struct SqliteConnection {
    conn: rusqlite::Connection,
}

impl SqliteConnection {
    /// `:memory:` opens a private in-memory database.
    pub fn open(path: &str) -> Result<Self> {
        let conn = if path == ":memory:" {
            rusqlite::Connection::open_in_memory()?
        } else {
            rusqlite::Connection::open(path)?
        };
        Ok(Self { conn })
    }

    pub fn open_in_memory() -> Result<Self> {
        Self::open(":memory:")
    }

    pub fn from_connection(conn: rusqlite::Connection) -> Self {
        Self { conn }
    }

    /// Runs raw statements, separated by `;`, without bindings.
    pub fn execute_batch(&self, sql: &str) -> Result<()> {
        self.conn.execute_batch(sql)?;
        Ok(())
    }
}

fn read_record(row: &Row<'_>, columns: &[String]) -> rusqlite::Result<Record> {
    let mut record = Record::new();
    for (index, column) in columns.iter().enumerate() {
        record.insert(column.as_str(), row.get::<_, Bind>(index)?);
    }
    Ok(record)
}

impl Connection for SqliteConnection {
    fn dialect(&self) -> Dialect {
        Dialect::Sqlite
    }

    fn execute(&mut self, sql: &str, bindings: &[Bind]) -> Result<ExecuteResult> {
        let rows_affected = self.conn.execute(sql, params_from_iter(bindings))?;
        let is_insert = sql
            .trim_start()
            .get(..6)
            .is_some_and(|keyword| keyword.eq_ignore_ascii_case("insert"));
        Ok(ExecuteResult {
            rows_affected: rows_affected as u64,
            last_insert_id: is_insert.then(|| self.conn.last_insert_rowid()),
        })
    }

    fn fetch_row(&mut self, sql: &str, bindings: &[Bind]) -> Result<Option<Record>> {
        let mut statement = self.conn.prepare(sql)?;
        let columns: Vec<String> = statement.column_names().into_iter().map(String::from).collect();
        let mut rows = statement.query(params_from_iter(bindings))?;
        match rows.next()? {
            Some(row) => Ok(Some(read_record(row, &columns)?)),
            None => Ok(None),
        }
    }

    fn fetch_rows(&mut self, sql: &str, bindings: &[Bind]) -> Result<Vec<Record>> {
        let mut statement = self.conn.prepare(sql)?;
        let columns: Vec<String> = statement.column_names().into_iter().map(String::from).collect();
        let records = statement
            .query_map(params_from_iter(bindings), |row| read_record(row, &columns))?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(records)
    }

    fn begin_transaction(&mut self) -> Result<()> {
        self.conn.execute_batch("begin")?;
        Ok(())
    }

    fn commit(&mut self) -> Result<()> {
        self.conn.execute_batch("commit")?;
        Ok(())
    }

    fn rollback(&mut self) -> Result<()> {
        self.conn.execute_batch("rollback")?;
        Ok(())
    }
}
