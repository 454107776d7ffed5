mod bind;
mod bindings;
mod builder;
mod col;
mod config;
mod connection;
mod db;
mod dialect;
mod error;
mod exec;
mod grammar;
mod ident;
mod join;
mod operator;
mod paginate;
mod row;
#[cfg(feature = "sqlite")]
mod sqlite;
mod state;
mod writer;

pub mod expr;

pub use bind::Array;
pub use bind::Bind;
pub use bind::Binds;
pub use bind::IntoBind;
pub use bind::IntoBinds;

pub use bindings::BindingKind;
pub use bindings::Bindings;
pub use bindings::IntoBindingKind;

pub use col::Columns;
pub use col::IntoColumns;

pub use ident::Ident;
pub use ident::IntoIdent;

pub use operator::IntoOperator;
pub use operator::Operator;

pub use dialect::Dialect;
pub use dialect::HasDialect;
pub use dialect::MySql;
pub use dialect::Sqlite;

pub use builder::Builder;
pub use join::JoinClause;
pub use join::JoinType;
pub use paginate::Paginator;
pub use row::IntoRows;
pub use row::Row;
pub use state::Lock;
pub use state::QueryKind;
pub use state::QueryState;

pub use config::DbConfig;
pub use connection::Connection;
pub use connection::ExecuteResult;
pub use connection::Record;
pub use db::Db;
#[cfg(feature = "sqlite")]
pub use sqlite::SqliteConnection;

pub use error::Error;
pub use error::Result;

pub fn ident_static(value: &'static str) -> Ident {
    Ident::new_static(value)
}

pub fn ident(value: &str) -> Ident {
    Ident::new(value)
}

#[cfg(test)]
pub(crate) mod tests {
    use std::collections::VecDeque;

    use crate::{
        Bind, Builder, Connection, Db, Dialect, Error, ExecuteResult, Record, Result, Row,
        dialect, expr::{DateUnit, Ordering}, join::JoinType, writer,
    };

    pub(crate) fn format_writer<W: writer::FormatWriter>(writer: W, dialect: dialect::Dialect) -> String {
        let mut str = String::new();
        let mut context = writer::FormatContext::new(&mut str, dialect);
        writer.format_writer(&mut context).unwrap();
        str
    }

    /// Remembers every statement and answers fetches from a queue.
    #[derive(Debug, Default)]
    pub(crate) struct RecordingConnection {
        pub(crate) dialect: Dialect,
        pub(crate) statements: Vec<(String, Vec<Bind>)>,
        pub(crate) rows: VecDeque<Vec<Record>>,
        pub(crate) fail_execute: bool,
    }

    impl RecordingConnection {
        pub(crate) fn returning(rows: Vec<Record>) -> Self {
            let mut conn = Self::default();
            conn.rows.push_back(rows);
            conn
        }
    }

    impl Connection for RecordingConnection {
        fn dialect(&self) -> Dialect {
            self.dialect
        }

        fn execute(&mut self, sql: &str, bindings: &[Bind]) -> Result<ExecuteResult> {
            self.statements.push((sql.to_owned(), bindings.to_vec()));
            if self.fail_execute {
                return Err(Error::Connection("execute failed".into()));
            }
            Ok(ExecuteResult {
                rows_affected: 1,
                last_insert_id: Some(self.statements.len() as i64),
            })
        }

        fn fetch_row(&mut self, sql: &str, bindings: &[Bind]) -> Result<Option<Record>> {
            Ok(self.fetch_rows(sql, bindings)?.into_iter().next())
        }

        fn fetch_rows(&mut self, sql: &str, bindings: &[Bind]) -> Result<Vec<Record>> {
            self.statements.push((sql.to_owned(), bindings.to_vec()));
            self.rows
                .pop_front()
                .ok_or_else(|| Error::Connection("no rows queued".into()))
        }

        fn begin_transaction(&mut self) -> Result<()> {
            Ok(())
        }

        fn commit(&mut self) -> Result<()> {
            Ok(())
        }

        fn rollback(&mut self) -> Result<()> {
            Ok(())
        }
    }

    fn record<const N: usize>(values: [(&str, Bind); N]) -> Record {
        values.into_iter().collect()
    }

    #[test]
    fn test_format_writers() {
        assert_eq!("left join", format_writer(JoinType::Left, Dialect::MySql));
        assert_eq!("desc", format_writer(Ordering::Desc, Dialect::MySql));
        assert_eq!("month", format_writer(DateUnit::Month, Dialect::Sqlite));
    }

    #[test]
    fn test_aggregate_restores_state() {
        let mut conn = RecordingConnection::returning(vec![record([("aggregate", Bind::I64(4))])]);
        let mut builder = Builder::table("users");
        builder.select(["id", "name"]).where_eq("active", true);
        builder.add_binding(7, "select").unwrap();
        let before = builder.to_sql().unwrap();

        assert_eq!(4, builder.count("*", &mut conn).unwrap());
        assert_eq!(
            (
                "select count(*) as aggregate from `users` where `active` = ?".to_owned(),
                vec![Bind::Bool(true)]
            ),
            conn.statements[0]
        );
        assert_eq!(before, builder.to_sql().unwrap());
        assert_eq!(vec![Bind::I32(7), Bind::Bool(true)], builder.get_bindings());
        assert!(builder.state().aggregate().is_none());
    }

    #[test]
    fn test_aggregate_restores_state_on_error() {
        let mut conn = RecordingConnection::default();
        let mut builder = Builder::table("users");
        builder.select("name").distinct();
        builder.add_binding("x", "select").unwrap();

        assert!(builder.max("age", &mut conn).is_err());
        assert_eq!("select distinct `name` from `users`", builder.to_sql().unwrap());
        assert_eq!(vec![Bind::String("x".into())], builder.get_bindings());
    }

    #[test]
    fn test_aggregate_without_row_is_null() {
        let mut conn = RecordingConnection::returning(Vec::new());
        let mut builder = Builder::table("users");
        assert_eq!(Bind::Null, builder.avg("age", &mut conn).unwrap());
        assert_eq!("select avg(`age`) as aggregate from `users`", conn.statements[0].0);
    }

    #[test]
    fn test_update_sends_assignments_before_wheres() {
        let mut conn = RecordingConnection::default();
        let mut builder = Builder::table("users");
        builder
            .update(Row::new().field("name", "bob").field("votes", 2))
            .where_in("id", [1, 2]);
        builder.execute(&mut conn).unwrap();
        assert_eq!(
            (
                "update `users` set `name` = ?, `votes` = ? where `id` in (?, ?)".to_owned(),
                vec![
                    Bind::String("bob".into()),
                    Bind::I32(2),
                    Bind::I32(1),
                    Bind::I32(2)
                ]
            ),
            conn.statements[0]
        );
    }

    #[test]
    fn test_insert_without_rows_is_a_no_op() {
        let mut conn = RecordingConnection::default();
        let mut builder = Builder::table("users");
        builder.insert(Vec::<Row>::new());
        assert_eq!(ExecuteResult::default(), builder.execute(&mut conn).unwrap());
        assert!(conn.statements.is_empty());
        assert!(builder.to_sql().is_err());
    }

    #[test]
    fn test_execute_select_is_rejected() {
        let mut conn = RecordingConnection::default();
        let builder = Builder::table("users");
        let err = builder.execute(&mut conn).unwrap_err();
        assert!(matches!(err, Error::CompilationPrecondition(_)));
        assert!(conn.statements.is_empty());
    }

    #[test]
    fn test_insert_get_id() {
        let mut conn = RecordingConnection::default();
        let mut builder = Builder::table("users");
        builder.insert(Row::new().field("name", "ann"));
        assert_eq!(Some(1), builder.insert_get_id(&mut conn).unwrap());
        assert_eq!(
            ("insert into `users` (`name`) values (?)".to_owned(), vec![Bind::String("ann".into())]),
            conn.statements[0]
        );
    }

    #[test]
    fn test_fetch_key_value_pair_restores_columns() {
        let mut conn = RecordingConnection::returning(vec![
            record([("id", Bind::I64(1)), ("name", Bind::String("ann".into()))]),
            record([("id", Bind::I64(2)), ("name", Bind::String("bob".into()))]),
        ]);
        let mut builder = Builder::table("users");
        builder.select("email");
        let pairs = builder.fetch_key_value_pair("id", "name", &mut conn).unwrap();
        assert_eq!("select `id`, `name` from `users`", conn.statements[0].0);
        assert_eq!(Some(&Bind::String("bob".into())), pairs.get("2"));
        assert_eq!("select `email` from `users`", builder.to_sql().unwrap());
    }

    #[test]
    fn test_fetch_rows_with_column_key() {
        let mut conn = RecordingConnection::returning(vec![
            record([("id", Bind::I64(5)), ("email", Bind::String("a@x".into()))]),
            record([("id", Bind::I64(9)), ("email", Bind::String("b@x".into()))]),
        ]);
        let mut builder = Builder::table("users");
        builder.select("email");
        let keyed = builder.fetch_rows_with_column_key("id", &mut conn).unwrap();
        assert_eq!("select `id`, `email` from `users`", conn.statements[0].0);
        assert_eq!(vec!["5", "9"], keyed.keys().map(String::as_str).collect::<Vec<_>>());
        assert_eq!(Some(&Bind::I64(9)), keyed["9"].get("id"));
        assert_eq!("select `email` from `users`", builder.to_sql().unwrap());

        let mut conn = RecordingConnection::returning(vec![record([("name", Bind::Null)])]);
        let err = builder.fetch_rows_with_column_key("id", &mut conn).unwrap_err();
        assert!(err.is_invalid_argument());
    }

    #[test]
    fn test_db_prefix_and_dialect() {
        let conn = RecordingConnection {
            dialect: Dialect::Sqlite,
            ..Default::default()
        };
        let db = Db::new(conn).with_prefix("app_");
        let mut builder = db.table("users as u");
        builder.where_clause("u.meta->a", "=", 1);
        assert_eq!(Dialect::Sqlite, builder.dialect());
        assert_eq!(
            "select * from `app_users` as `u` where json_extract(`u`.`meta`, '$.\"a\"') = ?",
            builder.to_sql().unwrap()
        );
    }

    #[test]
    fn test_db_commit_or_rollback() {
        let mut db = Db::new(RecordingConnection {
            fail_execute: true,
            ..Default::default()
        });
        db.begin_transaction().unwrap();
        assert!(db.commit_or_rollback(true).unwrap());

        db.begin_transaction().unwrap();
        let mut builder = db.table("users");
        builder.delete_id(1);
        assert!(builder.execute(&mut db).is_err());
        assert!(db.has_transaction_error());
        assert!(!db.commit_or_rollback(true).unwrap());

        db.begin_transaction().unwrap();
        assert!(!db.has_transaction_error());
        assert!(builder.execute(&mut db).is_err());
        assert!(db.commit_or_rollback(false).unwrap());
    }
}
