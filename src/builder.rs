use quarry_derive::or_variant;
use tracing::{trace, warn};

use crate::{
    Error, Result,
    bind::{Bind, Binds, IntoBind, IntoBinds},
    bindings::{BindingKind, IntoBindingKind},
    col::IntoColumns,
    dialect::{Dialect, HasDialect},
    expr::{Conjunction, DateUnit, IntoOrdering, OrderBy, WhereClause},
    grammar,
    ident::{Ident, IntoIdent},
    join::{JoinClause, JoinType},
    operator::{IntoOperator, Operator},
    row::{IntoRows, Row},
    state::{Lock, QueryKind, QueryState},
    writer::FormatContext,
};

/// Fluent query builder. Every call appends to the underlying
/// [`QueryState`]; `select`, `from` and `limit` are the only setters that
/// replace what was there.
#[derive(Debug, Default, Clone)]
pub struct Builder {
    dialect: Dialect,
    pub(crate) state: QueryState,
}

impl Builder {
    pub fn new(dialect: Dialect) -> Self {
        Self {
            dialect,
            state: QueryState::default(),
        }
    }

    pub fn table<T>(table: T) -> Self
    where
        T: IntoIdent,
    {
        let mut builder = Self::default();
        builder.state.maybe_from = Some(table.into_ident());
        builder
    }

    pub fn with_dialect(&mut self, dialect: Dialect) -> &mut Self {
        self.dialect = dialect;
        self
    }

    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    pub fn state(&self) -> &QueryState {
        &self.state
    }

    /// The first initiating call decides the statement kind.
    fn set_kind(&mut self, kind: QueryKind) {
        match self.state.maybe_kind {
            None => self.state.maybe_kind = Some(kind),
            Some(current) if current != kind => {
                warn!(?current, requested = ?kind, "query kind already set, ignoring");
            }
            Some(_) => {}
        }
    }

    // statement kinds

    pub fn select<T>(&mut self, cols: T) -> &mut Self
    where
        T: IntoColumns,
    {
        self.set_kind(QueryKind::Select);
        self.state.columns = cols.into_columns();
        self
    }

    pub fn add_select<T>(&mut self, cols: T) -> &mut Self
    where
        T: IntoColumns,
    {
        self.state.columns.append(cols.into_columns());
        self
    }

    pub fn distinct(&mut self) -> &mut Self {
        self.state.distinct = true;
        self
    }

    pub fn from<T: IntoIdent>(&mut self, table: T) -> &mut Self {
        self.state.maybe_from = Some(table.into_ident());
        self
    }

    /// Rows are expected to share the first row's columns.
    pub fn insert<R>(&mut self, rows: R) -> &mut Self
    where
        R: IntoRows,
    {
        self.set_kind(QueryKind::Insert);
        for row in rows.into_rows() {
            self.state
                .bindings
                .add(BindingKind::Inserts, row.to_binds());
            self.state.inserts.push(row);
        }
        self
    }

    pub fn update(&mut self, values: Row) -> &mut Self {
        self.set_kind(QueryKind::Update);
        self.state.updates = values;
        self
    }

    /// Adds one assignment to an update.
    pub fn set<C, V>(&mut self, column: C, value: V) -> &mut Self
    where
        C: IntoIdent,
        V: IntoBind,
    {
        self.set_kind(QueryKind::Update);
        self.state.updates.set(column, value);
        self
    }

    pub fn delete(&mut self) -> &mut Self {
        self.set_kind(QueryKind::Delete);
        self
    }

    pub fn delete_id<V: IntoBind>(&mut self, id: V) -> &mut Self {
        self.delete();
        self.where_expr(
            Conjunction::And,
            Ident::new_static("id"),
            Operator::Eq,
            id.into_bind(),
        )
    }

    // joins

    pub fn join<T, C, O, CC>(&mut self, table: T, first: C, operator: O, second: CC) -> &mut Self
    where
        T: IntoIdent,
        C: IntoIdent,
        O: IntoOperator,
        CC: IntoIdent,
    {
        self.join_columns(JoinType::Inner, table, first, operator, second)
    }

    pub fn left_join<T, C, O, CC>(&mut self, table: T, first: C, operator: O, second: CC) -> &mut Self
    where
        T: IntoIdent,
        C: IntoIdent,
        O: IntoOperator,
        CC: IntoIdent,
    {
        self.join_columns(JoinType::Left, table, first, operator, second)
    }

    pub fn right_join<T, C, O, CC>(&mut self, table: T, first: C, operator: O, second: CC) -> &mut Self
    where
        T: IntoIdent,
        C: IntoIdent,
        O: IntoOperator,
        CC: IntoIdent,
    {
        self.join_columns(JoinType::Right, table, first, operator, second)
    }

    pub fn join_where<T, C, O, V>(&mut self, table: T, column: C, operator: O, value: V) -> &mut Self
    where
        T: IntoIdent,
        C: IntoIdent,
        O: IntoOperator,
        V: IntoBind,
    {
        self.join_value(JoinType::Inner, table, column, operator, value)
    }

    pub fn left_join_where<T, C, O, V>(&mut self, table: T, column: C, operator: O, value: V) -> &mut Self
    where
        T: IntoIdent,
        C: IntoIdent,
        O: IntoOperator,
        V: IntoBind,
    {
        self.join_value(JoinType::Left, table, column, operator, value)
    }

    pub fn right_join_where<T, C, O, V>(&mut self, table: T, column: C, operator: O, value: V) -> &mut Self
    where
        T: IntoIdent,
        C: IntoIdent,
        O: IntoOperator,
        V: IntoBind,
    {
        self.join_value(JoinType::Right, table, column, operator, value)
    }

    pub fn join_with<T, F>(&mut self, table: T, closure: F) -> &mut Self
    where
        T: IntoIdent,
        F: FnOnce(&mut JoinClause),
    {
        self.join_closure(JoinType::Inner, table, closure)
    }

    pub fn left_join_with<T, F>(&mut self, table: T, closure: F) -> &mut Self
    where
        T: IntoIdent,
        F: FnOnce(&mut JoinClause),
    {
        self.join_closure(JoinType::Left, table, closure)
    }

    pub fn right_join_with<T, F>(&mut self, table: T, closure: F) -> &mut Self
    where
        T: IntoIdent,
        F: FnOnce(&mut JoinClause),
    {
        self.join_closure(JoinType::Right, table, closure)
    }

    /// Values bound by the join move to this query's `join` bucket.
    pub fn add_join_clause(&mut self, mut join: JoinClause) -> &mut Self {
        self.state
            .bindings
            .add(BindingKind::Join, join.take_bindings());
        self.state.joins.push(join);
        self
    }

    fn join_columns<T, C, O, CC>(
        &mut self,
        ty: JoinType,
        table: T,
        first: C,
        operator: O,
        second: CC,
    ) -> &mut Self
    where
        T: IntoIdent,
        C: IntoIdent,
        O: IntoOperator,
        CC: IntoIdent,
    {
        let mut join = JoinClause::new(ty, table);
        join.on(first, operator, second);
        self.add_join_clause(join)
    }

    fn join_value<T, C, O, V>(&mut self, ty: JoinType, table: T, column: C, operator: O, value: V) -> &mut Self
    where
        T: IntoIdent,
        C: IntoIdent,
        O: IntoOperator,
        V: IntoBind,
    {
        let mut join = JoinClause::new(ty, table);
        join.where_clause(column, operator, value);
        self.add_join_clause(join)
    }

    fn join_closure<T, F>(&mut self, ty: JoinType, table: T, closure: F) -> &mut Self
    where
        T: IntoIdent,
        F: FnOnce(&mut JoinClause),
    {
        let mut join = JoinClause::new(ty, table);
        closure(&mut join);
        self.add_join_clause(join)
    }

    // where stuff

    fn push_where(&mut self, conjunction: Conjunction, clause: WhereClause, binds: Binds) -> &mut Self {
        self.state.bindings.add(BindingKind::Where, binds);
        self.state.wheres.push(conjunction, clause);
        self
    }

    /// A null value turns into `is null`, or `is not null` for any operator
    /// other than `=`.
    fn where_expr(&mut self, conjunction: Conjunction, column: Ident, operator: Operator, value: Bind) -> &mut Self {
        if value.is_null() {
            let not = operator != Operator::Eq;
            return self.push_where(conjunction, WhereClause::Null { column, not }, Binds::None);
        }
        let binds = Binds::One(value.clone());
        let clause = WhereClause::Basic {
            column,
            operator,
            value,
        };
        self.push_where(conjunction, clause, binds)
    }

    #[or_variant(or_where)]
    pub fn where_clause<C, O, V>(&mut self, column: C, operator: O, value: V) -> &mut Self
    where
        C: IntoIdent,
        O: IntoOperator,
        V: IntoBind,
    {
        self.where_expr(
            Conjunction::And,
            column.into_ident(),
            operator.into_operator(),
            value.into_bind(),
        )
    }

    #[or_variant]
    pub fn where_eq<C, V>(&mut self, column: C, value: V) -> &mut Self
    where
        C: IntoIdent,
        V: IntoBind,
    {
        self.where_expr(
            Conjunction::And,
            column.into_ident(),
            Operator::Eq,
            value.into_bind(),
        )
    }

    /// One `column = value` clause per entry, all joined the same way.
    #[or_variant]
    pub fn where_map<I, K, V>(&mut self, values: I) -> &mut Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: IntoIdent,
        V: IntoBind,
    {
        for (column, value) in values {
            self.where_expr(
                Conjunction::And,
                column.into_ident(),
                Operator::Eq,
                value.into_bind(),
            );
        }
        self
    }

    /// Parenthesized group built on a fresh query over the same table. An
    /// empty closure adds nothing.
    #[or_variant]
    pub fn where_nested<F>(&mut self, closure: F) -> &mut Self
    where
        F: FnOnce(&mut Self),
    {
        let mut inner = Self::new(self.dialect);
        inner.state.maybe_from = self.state.maybe_from.clone();
        closure(&mut inner);
        if inner.state.wheres.is_empty() {
            return self;
        }
        let binds = inner.state.bindings.take_all();
        let clause = WhereClause::Nested {
            query: Box::new(inner.state),
        };
        self.push_where(Conjunction::And, clause, binds)
    }

    fn between_expr(&mut self, conjunction: Conjunction, column: Ident, low: Bind, high: Bind, not: bool) -> &mut Self {
        let binds = Binds::Many(vec![low, high]);
        self.push_where(conjunction, WhereClause::Between { column, not }, binds)
    }

    #[or_variant]
    pub fn where_between<C, L, H>(&mut self, column: C, low: L, high: H) -> &mut Self
    where
        C: IntoIdent,
        L: IntoBind,
        H: IntoBind,
    {
        self.between_expr(
            Conjunction::And,
            column.into_ident(),
            low.into_bind(),
            high.into_bind(),
            false,
        )
    }

    #[or_variant]
    pub fn where_not_between<C, L, H>(&mut self, column: C, low: L, high: H) -> &mut Self
    where
        C: IntoIdent,
        L: IntoBind,
        H: IntoBind,
    {
        self.between_expr(
            Conjunction::And,
            column.into_ident(),
            low.into_bind(),
            high.into_bind(),
            true,
        )
    }

    fn in_expr(&mut self, conjunction: Conjunction, column: Ident, values: Binds, not: bool) -> &mut Self {
        let binds = values.clone();
        self.push_where(conjunction, WhereClause::In { column, values, not }, binds)
    }

    /// An empty list compiles to `0 = 1` and binds nothing.
    #[or_variant]
    pub fn where_in<C, V>(&mut self, column: C, values: V) -> &mut Self
    where
        C: IntoIdent,
        V: IntoBinds,
    {
        self.in_expr(Conjunction::And, column.into_ident(), values.into_binds(), false)
    }

    /// An empty list compiles to `1 = 1` and binds nothing.
    #[or_variant]
    pub fn where_not_in<C, V>(&mut self, column: C, values: V) -> &mut Self
    where
        C: IntoIdent,
        V: IntoBinds,
    {
        self.in_expr(Conjunction::And, column.into_ident(), values.into_binds(), true)
    }

    #[or_variant]
    pub fn where_null<C: IntoIdent>(&mut self, column: C) -> &mut Self {
        let clause = WhereClause::Null {
            column: column.into_ident(),
            not: false,
        };
        self.push_where(Conjunction::And, clause, Binds::None)
    }

    #[or_variant]
    pub fn where_not_null<C: IntoIdent>(&mut self, column: C) -> &mut Self {
        let clause = WhereClause::Null {
            column: column.into_ident(),
            not: true,
        };
        self.push_where(Conjunction::And, clause, Binds::None)
    }

    fn date_expr(
        &mut self,
        conjunction: Conjunction,
        unit: DateUnit,
        column: Ident,
        operator: Operator,
        value: Bind,
    ) -> &mut Self {
        let binds = Binds::One(value.clone());
        let clause = WhereClause::DateUnit {
            unit,
            column,
            operator,
            value,
        };
        self.push_where(conjunction, clause, binds)
    }

    #[or_variant]
    pub fn where_date<C, O, V>(&mut self, column: C, operator: O, value: V) -> &mut Self
    where
        C: IntoIdent,
        O: IntoOperator,
        V: IntoBind,
    {
        self.date_expr(
            Conjunction::And,
            DateUnit::Date,
            column.into_ident(),
            operator.into_operator(),
            value.into_bind(),
        )
    }

    #[or_variant]
    pub fn where_day<C, O, V>(&mut self, column: C, operator: O, value: V) -> &mut Self
    where
        C: IntoIdent,
        O: IntoOperator,
        V: IntoBind,
    {
        self.date_expr(
            Conjunction::And,
            DateUnit::Day,
            column.into_ident(),
            operator.into_operator(),
            value.into_bind(),
        )
    }

    #[or_variant]
    pub fn where_month<C, O, V>(&mut self, column: C, operator: O, value: V) -> &mut Self
    where
        C: IntoIdent,
        O: IntoOperator,
        V: IntoBind,
    {
        self.date_expr(
            Conjunction::And,
            DateUnit::Month,
            column.into_ident(),
            operator.into_operator(),
            value.into_bind(),
        )
    }

    #[or_variant]
    pub fn where_year<C, O, V>(&mut self, column: C, operator: O, value: V) -> &mut Self
    where
        C: IntoIdent,
        O: IntoOperator,
        V: IntoBind,
    {
        self.date_expr(
            Conjunction::And,
            DateUnit::Year,
            column.into_ident(),
            operator.into_operator(),
            value.into_bind(),
        )
    }

    #[or_variant]
    pub fn where_time<C, O, V>(&mut self, column: C, operator: O, value: V) -> &mut Self
    where
        C: IntoIdent,
        O: IntoOperator,
        V: IntoBind,
    {
        self.date_expr(
            Conjunction::And,
            DateUnit::Time,
            column.into_ident(),
            operator.into_operator(),
            value.into_bind(),
        )
    }

    fn json_contains_expr(&mut self, conjunction: Conjunction, column: Ident, value: serde_json::Value, not: bool) -> &mut Self {
        // bound as encoded json text
        let value = Bind::String(value.to_string());
        let binds = Binds::One(value.clone());
        let clause = WhereClause::JsonContains { column, value, not };
        self.push_where(conjunction, clause, binds)
    }

    #[or_variant]
    pub fn where_json_contains<C, V>(&mut self, column: C, value: V) -> &mut Self
    where
        C: IntoIdent,
        V: Into<serde_json::Value>,
    {
        self.json_contains_expr(Conjunction::And, column.into_ident(), value.into(), false)
    }

    #[or_variant]
    pub fn where_json_doesnt_contain<C, V>(&mut self, column: C, value: V) -> &mut Self
    where
        C: IntoIdent,
        V: Into<serde_json::Value>,
    {
        self.json_contains_expr(Conjunction::And, column.into_ident(), value.into(), true)
    }

    #[or_variant]
    pub fn where_json_length<C, O, V>(&mut self, column: C, operator: O, value: V) -> &mut Self
    where
        C: IntoIdent,
        O: IntoOperator,
        V: IntoBind,
    {
        let value = value.into_bind();
        let binds = Binds::One(value.clone());
        let clause = WhereClause::JsonLength {
            column: column.into_ident(),
            operator: operator.into_operator(),
            value,
        };
        self.push_where(Conjunction::And, clause, binds)
    }

    // grouping, ordering and pagination

    pub fn group_by<T>(&mut self, cols: T) -> &mut Self
    where
        T: IntoColumns,
    {
        self.state.groups.append(cols.into_columns());
        self
    }

    /// Anything but `asc` (any case) sorts descending.
    pub fn order_by<C, O>(&mut self, column: C, ordering: O) -> &mut Self
    where
        C: IntoIdent,
        O: IntoOrdering,
    {
        self.state
            .orders
            .push(OrderBy::new(column.into_ident(), ordering.into_ordering()));
        self
    }

    /// Non-positive values leave the limit untouched.
    pub fn limit(&mut self, value: i64) -> &mut Self {
        self.state.paginator.limit(value);
        self
    }

    pub fn limit_offset(&mut self, value: i64, offset: i64) -> &mut Self {
        self.limit(value).offset(offset)
    }

    /// Clamped to zero.
    pub fn offset(&mut self, value: i64) -> &mut Self {
        self.state.paginator.offset(value);
        self
    }

    pub fn for_page(&mut self, page: i64, per_page: i64) -> &mut Self {
        self.state.paginator.for_page(page, per_page);
        self
    }

    pub fn lock_for_update(&mut self) -> &mut Self {
        self.state.maybe_lock = Some(Lock::ForUpdate);
        self
    }

    pub fn shared_lock(&mut self) -> &mut Self {
        self.state.maybe_lock = Some(Lock::Shared);
        self
    }

    // bindings

    pub fn add_binding<V, K>(&mut self, value: V, kind: K) -> Result<&mut Self>
    where
        V: IntoBinds,
        K: IntoBindingKind,
    {
        let kind = kind.into_binding_kind()?;
        self.state.bindings.add(kind, value.into_binds());
        Ok(self)
    }

    pub fn set_bindings<V, K>(&mut self, values: V, kind: K) -> Result<&mut Self>
    where
        V: IntoBinds,
        K: IntoBindingKind,
    {
        let kind = kind.into_binding_kind()?;
        self.state.bindings.set(kind, values.into_binds());
        Ok(self)
    }

    /// Every bucket flattened as select, join, where, having, order, inserts.
    pub fn get_bindings(&self) -> Vec<Bind> {
        self.state.bindings.flatten()
    }

    /// Values in the order the compiled statement consumes them. Updates
    /// put their assignments right after the join values.
    pub fn execution_bindings(&self) -> Vec<Bind> {
        if self.state.kind() != QueryKind::Update {
            return self.get_bindings();
        }
        let bindings = &self.state.bindings;
        let mut values = Vec::with_capacity(bindings.len() + self.state.updates.len());
        for kind in BindingKind::ALL {
            values.extend(bindings.bucket(kind).iter().cloned());
            if kind == BindingKind::Join {
                values.extend(self.state.updates.iter().map(|(_, value)| value.clone()));
            }
        }
        values
    }

    // building the builder

    pub fn to_sql(&self) -> Result<String> {
        self.compile(self.dialect)
    }

    pub fn to_sql_as<D: HasDialect>(&self) -> Result<String> {
        self.compile(D::DIALECT)
    }

    fn compile(&self, dialect: Dialect) -> Result<String> {
        let mut sql = String::with_capacity(64);
        let mut context = FormatContext::new(&mut sql, dialect);
        grammar::compile(&mut context, &self.state)?;
        let placeholders = context.placeholder;
        trace!(?dialect, %sql, placeholders, "compiled query");
        Ok(sql)
    }

    /// Sql and bindings listing the columns of the target table.
    pub fn compile_column_listing(&self) -> Result<(String, Vec<Bind>)> {
        let table = self
            .state
            .table()
            .ok_or_else(|| Error::precondition("column listing requires a table"))?;
        let (base, _) = table.split_alias();
        grammar::column_listing(self.dialect, base.trim())
    }
}

#[cfg(test)]
mod tests {
    use crate::dialect::{MySql, Sqlite};

    use super::*;

    fn placeholders(sql: &str) -> usize {
        sql.matches('?').count()
    }

    #[test]
    fn test_basic_select() {
        let mut builder = Builder::table("users");
        assert_eq!("select * from `users`", builder.to_sql().unwrap());
        builder.select("username");
        assert_eq!("select `username` from `users`", builder.to_sql().unwrap());
        builder.add_select(["id", "email as mail"]);
        assert_eq!(
            "select `username`, `id`, `email` as `mail` from `users`",
            builder.to_sql().unwrap()
        );
        builder.distinct();
        assert_eq!(
            "select distinct `username`, `id`, `email` as `mail` from `users`",
            builder.to_sql().unwrap()
        );
    }

    #[test]
    fn test_leading_boolean_is_stripped() {
        let mut builder = Builder::new(Dialect::MySql);
        builder
            .select("*")
            .from("users")
            .where_clause("id", "=", 1)
            .or_where("email", "=", "foo");
        assert_eq!(
            "select * from `users` where `id` = ? or `email` = ?",
            builder.to_sql().unwrap()
        );
        assert_eq!(
            vec![Bind::I32(1), Bind::String("foo".into())],
            builder.get_bindings()
        );
    }

    #[test]
    fn test_or_first_clause_is_stripped() {
        let mut builder = Builder::table("users");
        builder.or_where("id", "=", 1).where_eq("active", true);
        assert_eq!(
            "select * from `users` where `id` = ? and `active` = ?",
            builder.to_sql().unwrap()
        );
    }

    #[test]
    fn test_nested_where() {
        let mut builder = Builder::table("users");
        builder.where_clause("email", "=", "foo").or_where_nested(|query| {
            query.where_clause("name", "=", "bar").where_clause("age", "=", 25);
        });
        assert_eq!(
            "select * from `users` where `email` = ? or (`name` = ? and `age` = ?)",
            builder.to_sql().unwrap()
        );
        assert_eq!(
            vec![
                Bind::String("foo".into()),
                Bind::String("bar".into()),
                Bind::I32(25)
            ],
            builder.get_bindings()
        );
    }

    #[test]
    fn test_deeply_nested_where() {
        let mut builder = Builder::table("users");
        builder.where_nested(|query| {
            query.where_eq("a", 1).or_where_nested(|query| {
                query.where_eq("b", 2).where_in("c", [3, 4]);
            });
        });
        assert_eq!(
            "select * from `users` where (`a` = ? or (`b` = ? and `c` in (?, ?)))",
            builder.to_sql().unwrap()
        );
        let flat: Vec<i64> = builder
            .get_bindings()
            .iter()
            .filter_map(Bind::as_i64)
            .collect();
        assert_eq!(vec![1, 2, 3, 4], flat);
    }

    #[test]
    fn test_empty_nested_where_is_skipped() {
        let mut builder = Builder::table("users");
        builder.where_nested(|_| {}).where_eq("id", 1);
        assert_eq!(
            "select * from `users` where `id` = ?",
            builder.to_sql().unwrap()
        );
    }

    #[test]
    fn test_alias_wrapping() {
        let mut builder = Builder::new(Dialect::MySql);
        builder.select("x.y as foo.bar").from("baz");
        assert_eq!(
            "select `x`.`y` as `foo.bar` from `baz`",
            builder.to_sql().unwrap()
        );
        let mut builder = Builder::table("users as u");
        builder.select("u.id");
        assert_eq!(
            "select `u`.`id` from `users` as `u`",
            builder.to_sql().unwrap()
        );
    }

    #[test]
    fn test_empty_in_tautology() {
        let mut builder = Builder::table("users");
        builder.where_in("id", Vec::<i64>::new());
        assert_eq!("select * from `users` where 0 = 1", builder.to_sql().unwrap());
        assert!(builder.get_bindings().is_empty());

        let mut builder = Builder::table("users");
        builder.where_not_in("id", Vec::<i64>::new());
        assert_eq!("select * from `users` where 1 = 1", builder.to_sql().unwrap());
        assert!(builder.get_bindings().is_empty());
    }

    #[test]
    fn test_where_in() {
        let mut builder = Builder::table("users");
        builder
            .where_in("id", [1, 2, 3])
            .or_where_not_in("role", vec!["guest"]);
        assert_eq!(
            "select * from `users` where `id` in (?, ?, ?) or `role` not in (?)",
            builder.to_sql().unwrap()
        );
        assert_eq!(4, builder.get_bindings().len());
    }

    #[test]
    fn test_null_shorthand() {
        let mut builder = Builder::table("users");
        builder.where_clause("deleted_at", "!=", None::<i32>);
        assert_eq!(
            "select * from `users` where `deleted_at` is not null",
            builder.to_sql().unwrap()
        );
        assert!(builder.get_bindings().is_empty());

        let mut builder = Builder::table("users");
        builder
            .where_eq("deleted_at", None::<i32>)
            .or_where("banned_at", "=", Bind::Null);
        assert_eq!(
            "select * from `users` where `deleted_at` is null or `banned_at` is null",
            builder.to_sql().unwrap()
        );
    }

    #[test]
    fn test_null_shorthand_with_any_other_operator_is_not_null() {
        // `>` with a null value still reads as "is not null"
        let mut builder = Builder::table("users");
        builder.where_clause("score", ">", None::<i32>);
        assert_eq!(
            "select * from `users` where `score` is not null",
            builder.to_sql().unwrap()
        );
    }

    #[test]
    fn test_where_null_and_not_null() {
        let mut builder = Builder::table("users");
        builder.where_null("deleted_at").or_where_not_null("archived_at");
        assert_eq!(
            "select * from `users` where `deleted_at` is null or `archived_at` is not null",
            builder.to_sql().unwrap()
        );
    }

    #[test]
    fn test_where_map() {
        let mut builder = Builder::table("users");
        builder
            .where_eq("active", true)
            .or_where_map([("name", "bob"), ("email", "bob@ovior.ca")]);
        assert_eq!(
            "select * from `users` where `active` = ? or `name` = ? or `email` = ?",
            builder.to_sql().unwrap()
        );
        assert_eq!(3, builder.get_bindings().len());
    }

    #[test]
    fn test_between() {
        let mut builder = Builder::table("orders");
        builder
            .where_between("total", 10, 20)
            .or_where_not_between("id", 1, 5);
        assert_eq!(
            "select * from `orders` where `total` between ? and ? or `id` not between ? and ?",
            builder.to_sql().unwrap()
        );
        let flat: Vec<i64> = builder
            .get_bindings()
            .iter()
            .filter_map(Bind::as_i64)
            .collect();
        assert_eq!(vec![10, 20, 1, 5], flat);
    }

    #[test]
    fn test_date_wheres() {
        let mut builder = Builder::table("posts");
        builder
            .where_date("created_at", "=", "2024-05-01")
            .where_day("created_at", ">", 3)
            .or_where_month("created_at", "<", 6)
            .where_year("created_at", ">=", 2020)
            .where_time("created_at", "<=", "12:00:00");
        assert_eq!(
            "select * from `posts` where date(`created_at`) = ? and day(`created_at`) > ? or month(`created_at`) < ? and year(`created_at`) >= ? and time(`created_at`) <= ?",
            builder.to_sql().unwrap()
        );
        assert_eq!(5, builder.get_bindings().len());
    }

    #[test]
    fn test_group_order_limit_offset() {
        let mut builder = Builder::table("orders");
        builder
            .select(["user_id", "count(id) as total"])
            .group_by("user_id")
            .order_by("total", "DESC")
            .order_by("user_id", "ASC")
            .limit(10)
            .offset(20);
        assert_eq!(
            "select `user_id`, count(`id`) as `total` from `orders` group by `user_id` order by `total` desc, `user_id` asc limit 10 offset 20",
            builder.to_sql().unwrap()
        );
    }

    #[test]
    fn test_order_by_unknown_direction_is_desc() {
        let mut builder = Builder::table("users");
        builder.order_by("name", "sideways");
        assert_eq!(
            "select * from `users` order by `name` desc",
            builder.to_sql().unwrap()
        );
    }

    #[test]
    fn test_limit_and_offset_edges() {
        let mut builder = Builder::table("users");
        builder.limit(0).limit(-1).offset(-10);
        assert_eq!("select * from `users` offset 0", builder.to_sql().unwrap());
        builder.limit_offset(5, 15);
        assert_eq!(
            "select * from `users` limit 5 offset 15",
            builder.to_sql().unwrap()
        );
        builder.for_page(2, 25);
        assert_eq!(
            "select * from `users` limit 25 offset 25",
            builder.to_sql().unwrap()
        );
    }

    #[test]
    fn test_joins() {
        let mut builder = Builder::table("users");
        builder
            .select(["users.id", "contacts.phone"])
            .join("contacts", "users.id", "=", "contacts.user_id")
            .left_join_where("orders", "orders.status", "=", "paid")
            .right_join_with("roles", |join| {
                join.on("roles.id", "=", "users.role_id")
                    .or_on("roles.fallback", "=", "users.role_id");
            })
            .where_clause("users.id", ">", 5);
        assert_eq!(
            "select `users`.`id`, `contacts`.`phone` from `users` inner join `contacts` on `users`.`id` = `contacts`.`user_id` left join `orders` on `orders`.`status` = ? right join `roles` on `roles`.`id` = `users`.`role_id` or `roles`.`fallback` = `users`.`role_id` where `users`.`id` > ?",
            builder.to_sql().unwrap()
        );
        assert_eq!(
            vec![Bind::String("paid".into()), Bind::I32(5)],
            builder.get_bindings()
        );
    }

    #[test]
    fn test_join_bindings_precede_where_bindings() {
        // joins added after wheres still bind first
        let mut builder = Builder::table("users");
        builder
            .where_eq("users.active", true)
            .join_where("accounts", "accounts.kind", "=", "pro");
        assert_eq!(
            vec![Bind::String("pro".into()), Bind::Bool(true)],
            builder.get_bindings()
        );
        let sql = builder.to_sql().unwrap();
        assert_eq!(
            "select * from `users` inner join `accounts` on `accounts`.`kind` = ? where `users`.`active` = ?",
            sql
        );
    }

    #[test]
    fn test_insert() {
        let mut builder = Builder::table("users");
        builder.insert([
            Row::new().field("email", "a@ovior.ca").field("votes", 0),
            Row::new().field("email", "b@ovior.ca").field("votes", 2),
        ]);
        assert_eq!(
            "insert into `users` (`email`, `votes`) values (?, ?), (?, ?)",
            builder.to_sql().unwrap()
        );
        assert_eq!(
            vec![
                Bind::String("a@ovior.ca".into()),
                Bind::I32(0),
                Bind::String("b@ovior.ca".into()),
                Bind::I32(2)
            ],
            builder.get_bindings()
        );
    }

    #[test]
    fn test_insert_without_rows() {
        let mut builder = Builder::table("users");
        builder.insert(Vec::<Row>::new());
        let err = builder.to_sql().unwrap_err();
        assert!(matches!(err, Error::CompilationPrecondition(_)));
    }

    #[test]
    fn test_update() {
        let mut builder = Builder::table("users");
        builder
            .update(Row::new().field("name", "bob"))
            .set("votes", 3)
            .where_clause("id", "=", 1);
        assert_eq!(
            "update `users` set `name` = ?, `votes` = ? where `id` = ?",
            builder.to_sql().unwrap()
        );
        assert_eq!(vec![Bind::I32(1)], builder.get_bindings());
        assert_eq!(
            vec![Bind::String("bob".into()), Bind::I32(3), Bind::I32(1)],
            builder.execution_bindings()
        );
    }

    #[test]
    fn test_update_without_assignments() {
        let mut builder = Builder::table("users");
        builder.update(Row::new());
        assert!(matches!(
            builder.to_sql().unwrap_err(),
            Error::CompilationPrecondition(_)
        ));
    }

    #[test]
    fn test_delete() {
        let mut builder = Builder::table("users");
        builder.delete_id(7);
        assert_eq!(
            "delete from `users` where `id` = ?",
            builder.to_sql().unwrap()
        );
        assert_eq!(vec![Bind::I32(7)], builder.get_bindings());
    }

    #[test]
    fn test_kind_is_first_wins() {
        let mut builder = Builder::table("users");
        builder.delete().select("id").where_eq("id", 1);
        assert_eq!(QueryKind::Delete, builder.state().kind());
        assert_eq!(
            "delete from `users` where `id` = ?",
            builder.to_sql().unwrap()
        );
    }

    #[test]
    fn test_sounds_like_operator() {
        let mut builder = Builder::table("users");
        builder.where_clause("name", "sounds like", "John Doe");
        assert_eq!(
            "select * from `users` where `name` sounds like ?",
            builder.to_sql().unwrap()
        );
        assert_eq!(vec![Bind::String("John Doe".into())], builder.get_bindings());

        let mut builder = Builder::table("users");
        builder.where_clause("votes", "<=>", 3).or_where("name", "RLIKE", "^b");
        assert_eq!(
            "select * from `users` where `votes` <=> ? or `name` rlike ?",
            builder.to_sql().unwrap()
        );
    }

    #[test]
    fn test_placeholder_in_operator_fails_at_compile() {
        let mut builder = Builder::table("users");
        builder.where_clause("name", "= ? or 1 =", "bob");
        assert!(builder.to_sql().unwrap_err().is_invalid_argument());
    }

    #[test]
    fn test_binding_buckets() {
        let mut builder = Builder::table("users");
        builder.where_eq("id", 1);
        builder.add_binding(9, "select").unwrap();
        builder.add_binding([7, 8], BindingKind::Order).unwrap();
        let flat: Vec<i64> = builder
            .get_bindings()
            .iter()
            .filter_map(Bind::as_i64)
            .collect();
        assert_eq!(vec![9, 1, 7, 8], flat);

        builder.set_bindings(Binds::None, "order").unwrap();
        assert_eq!(2, builder.get_bindings().len());

        assert!(builder.add_binding(1, "group").unwrap_err().is_invalid_argument());
        assert!(builder.set_bindings(1, "nope").unwrap_err().is_invalid_argument());
        assert_eq!(2, builder.get_bindings().len());
    }

    #[test]
    fn test_to_sql_is_idempotent() {
        let mut builder = Builder::table("users");
        builder
            .join_where("accounts", "accounts.kind", "=", "pro")
            .where_in("id", [1, 2])
            .or_where_nested(|query| {
                query.where_eq("a", 1);
            });
        let first = builder.to_sql().unwrap();
        let second = builder.to_sql().unwrap();
        assert_eq!(first, second);
        assert_eq!(builder.get_bindings(), builder.get_bindings());
    }

    #[test]
    fn test_placeholder_binding_parity() {
        let mut builder = Builder::table("users as u");
        builder
            .select(["u.id", "u.meta->name"])
            .join_with("accounts as a", |join| {
                join.on("a.user_id", "=", "u.id")
                    .where_clause("a.kind", "=", "pro")
                    .or_where_in("a.level", [1, 2, 3])
                    .where_not_in("a.flag", Vec::<i32>::new());
            })
            .where_eq("u.active", true)
            .where_in("u.role", ["admin", "staff"])
            .where_not_in("u.id", Vec::<i32>::new())
            .or_where_nested(|query| {
                query
                    .where_between("u.age", 18, 65)
                    .where_null("u.deleted_at")
                    .or_where_date("u.created_at", ">", "2024-01-01");
            })
            .where_json_contains("u.meta->tags", "vip")
            .where_json_length("u.meta->tags", ">", 1)
            .order_by("u.id", "asc")
            .limit(10);
        for dialect in [Dialect::MySql, Dialect::Sqlite] {
            builder.with_dialect(dialect);
            let sql = builder.to_sql().unwrap();
            assert_eq!(placeholders(&sql), builder.get_bindings().len(), "{sql}");
        }
        assert_eq!(12, builder.get_bindings().len());
    }

    #[test]
    fn test_update_parity_uses_execution_bindings() {
        let mut builder = Builder::table("users");
        builder
            .update(Row::new().field("a", 1).field("meta->b", 2))
            .join_where("x", "x.k", "=", 3)
            .where_in("id", [4, 5]);
        let sql = builder.to_sql_as::<MySql>().unwrap();
        assert_eq!(placeholders(&sql), builder.execution_bindings().len());
        let flat: Vec<i64> = builder
            .execution_bindings()
            .iter()
            .filter_map(Bind::as_i64)
            .collect();
        assert_eq!(vec![3, 1, 2, 4, 5], flat);
    }

    #[test]
    fn test_to_sql_as_overrides_dialect() {
        let mut builder = Builder::new(Dialect::Sqlite);
        builder.from("users").where_clause("meta->a", "=", 1);
        assert_eq!(
            "select * from `users` where json_extract(`meta`, '$.\"a\"') = ?",
            builder.to_sql_as::<Sqlite>().unwrap()
        );
        assert_eq!(
            builder.to_sql().unwrap(),
            builder.to_sql_as::<Sqlite>().unwrap()
        );
    }
}
