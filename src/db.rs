use tracing::warn;

use crate::{
    Result,
    bind::Bind,
    builder::Builder,
    connection::{Connection, ExecuteResult, Record},
    dialect::Dialect,
    ident::IntoIdent,
};

/// Entry point tying a connection to the builders made for it.
///
/// A failed `execute` is remembered until the next
/// [`begin_transaction`](Connection::begin_transaction) so
/// [`commit_or_rollback`](Db::commit_or_rollback) can undo the whole
/// transaction.
pub struct Db {
    connection: Box<dyn Connection>,
    prefix: String,
    transaction_error: bool,
}

impl std::fmt::Debug for Db {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Db")
            .field("dialect", &self.connection.dialect())
            .field("prefix", &self.prefix)
            .field("transaction_error", &self.transaction_error)
            .finish()
    }
}

impl Db {
    pub fn new<C>(connection: C) -> Self
    where
        C: Connection + 'static,
    {
        Self {
            connection: Box::new(connection),
            prefix: String::new(),
            transaction_error: false,
        }
    }

    pub fn with_prefix<P: Into<String>>(mut self, prefix: P) -> Self {
        self.prefix = prefix.into();
        self
    }

    /// Opens the connection described by `config`.
    #[cfg(feature = "sqlite")]
    pub fn connect(config: &crate::DbConfig) -> Result<Self> {
        let connection = match config.driver {
            Dialect::Sqlite => crate::sqlite::SqliteConnection::open(&config.url)?,
            Dialect::MySql => {
                return Err(crate::Error::unsupported(
                    "no mysql driver is bundled, wrap one in a Connection and use Db::new",
                ));
            }
        };
        Ok(Self::new(connection).with_prefix(config.prefix.clone()))
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Builder over the prefixed table, compiled with this connection's
    /// dialect.
    pub fn table<T: IntoIdent>(&self, table: T) -> Builder {
        let table = table.into_ident().prefixed(&self.prefix);
        let mut builder = Builder::table(table);
        builder.with_dialect(self.connection.dialect());
        builder
    }

    pub fn has_transaction_error(&self) -> bool {
        self.transaction_error
    }

    /// Commits, unless `self_rollback` is set and an execute failed since
    /// the transaction began. In that case it rolls back and returns `false`.
    pub fn commit_or_rollback(&mut self, self_rollback: bool) -> Result<bool> {
        if self_rollback && self.transaction_error {
            warn!("rolling back transaction after a failed statement");
            self.connection.rollback()?;
            self.transaction_error = false;
            return Ok(false);
        }
        self.connection.commit()?;
        Ok(true)
    }
}

impl Connection for Db {
    fn dialect(&self) -> Dialect {
        self.connection.dialect()
    }

    fn execute(&mut self, sql: &str, bindings: &[Bind]) -> Result<ExecuteResult> {
        let result = self.connection.execute(sql, bindings);
        if result.is_err() {
            self.transaction_error = true;
        }
        result
    }

    fn fetch_row(&mut self, sql: &str, bindings: &[Bind]) -> Result<Option<Record>> {
        self.connection.fetch_row(sql, bindings)
    }

    fn fetch_rows(&mut self, sql: &str, bindings: &[Bind]) -> Result<Vec<Record>> {
        self.connection.fetch_rows(sql, bindings)
    }

    fn fetch_column(&mut self, sql: &str, bindings: &[Bind]) -> Result<Option<Bind>> {
        self.connection.fetch_column(sql, bindings)
    }

    fn begin_transaction(&mut self) -> Result<()> {
        self.transaction_error = false;
        self.connection.begin_transaction()
    }

    fn commit(&mut self) -> Result<()> {
        self.connection.commit()
    }

    fn rollback(&mut self) -> Result<()> {
        self.connection.rollback()
    }
}
