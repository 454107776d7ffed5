use std::fmt::Write;

use crate::{
    Error, Result,
    bind::Bind,
    col::Columns,
    dialect::Dialect,
    expr::{Aggregate, Conditions, OrderBy, WhereClause},
    ident::{Ident, split_alias},
    join::{JoinClause, OnClause, OnCondition},
    operator::Operator,
    state::{Lock, QueryKind, QueryState},
    writer::{FormatContext, FormatWriter},
};

mod mysql;
mod sqlite;

pub(crate) use mysql::MySqlGrammar;
pub(crate) use sqlite::SqliteGrammar;

/// Function calls whose argument is wrapped instead of the whole call.
const AGGREGATE_FUNCTIONS: [&str; 6] = ["count", "sum", "min", "max", "avg", "date"];

/// Renders `state` with the grammar of the context's dialect.
pub(crate) fn compile<W: Write>(ctx: &mut FormatContext<'_, W>, state: &QueryState) -> Result<()> {
    match ctx.dialect {
        Dialect::MySql => MySqlGrammar.compile(ctx, state),
        Dialect::Sqlite => SqliteGrammar.compile(ctx, state),
    }
}

/// Sql and bindings listing the columns of `table`.
pub(crate) fn column_listing(dialect: Dialect, table: &str) -> Result<(String, Vec<Bind>)> {
    match dialect {
        Dialect::MySql => MySqlGrammar.compile_column_listing(table),
        Dialect::Sqlite => SqliteGrammar.compile_column_listing(table),
    }
}

/// Stateless compiler from a [`QueryState`] to sql text with `?`
/// placeholders. Provided methods hold the rules both dialects share;
/// dialects override the json and capability hooks.
pub(crate) trait Grammar {
    fn compile<W: Write>(&self, ctx: &mut FormatContext<'_, W>, state: &QueryState) -> Result<()> {
        match state.kind() {
            QueryKind::Select => self.compile_select(ctx, state),
            QueryKind::Insert => self.compile_insert(ctx, state),
            QueryKind::Update => self.compile_update(ctx, state),
            QueryKind::Delete => self.compile_delete(ctx, state),
        }
    }

    // dialect hooks

    fn wrap_json_selector<W: Write>(&self, ctx: &mut FormatContext<'_, W>, value: &str) -> Result<()> {
        let _ = ctx;
        Err(Error::unsupported(format!(
            "this database engine does not support JSON operations: {value}"
        )))
    }

    fn where_json_contains<W: Write>(
        &self,
        ctx: &mut FormatContext<'_, W>,
        column: &Ident,
        not: bool,
    ) -> Result<()> {
        let _ = (ctx, not);
        Err(Error::unsupported(format!(
            "this database engine does not support JSON contains: {column}"
        )))
    }

    fn where_json_length<W: Write>(
        &self,
        ctx: &mut FormatContext<'_, W>,
        column: &Ident,
        operator: &Operator,
    ) -> Result<()> {
        let _ = (ctx, operator);
        Err(Error::unsupported(format!(
            "this database engine does not support JSON length: {column}"
        )))
    }

    fn compile_lock<W: Write>(&self, ctx: &mut FormatContext<'_, W>, lock: Lock) -> Result<()> {
        let _ = (ctx, lock);
        Ok(())
    }

    /// Whether `update`/`delete` may carry joins.
    fn supports_join_mutations(&self) -> bool {
        true
    }

    fn compile_column_exists(&self) -> Result<&'static str> {
        Err(Error::unsupported(
            "this database engine does not support column listing",
        ))
    }

    fn compile_column_listing(&self, table: &str) -> Result<(String, Vec<Bind>)> {
        let sql = self.compile_column_exists()?;
        Ok((sql.to_owned(), vec![Bind::String(table.to_owned())]))
    }

    // statements

    fn compile_select<W: Write>(&self, ctx: &mut FormatContext<'_, W>, state: &QueryState) -> Result<()> {
        match state.maybe_aggregate {
            Some(ref aggregate) => self.compile_aggregate(ctx, state, aggregate)?,
            None => self.compile_columns(ctx, state)?,
        }
        if let Some(table) = state.table() {
            ctx.writer.write_str(" from ")?;
            self.wrap(ctx, table.as_str())?;
        }
        self.compile_joins(ctx, &state.joins)?;
        self.compile_wheres(ctx, &state.wheres)?;
        if !state.groups.is_empty() {
            ctx.writer.write_str(" group by ")?;
            self.columnize(ctx, state.groups.iter())?;
        }
        self.compile_orders(ctx, &state.orders)?;
        self.compile_limit(ctx, state)?;
        if let Some(offset) = state.paginator.get_offset() {
            write!(ctx.writer, " offset {offset}")?;
        }
        if let Some(lock) = state.maybe_lock {
            self.compile_lock(ctx, lock)?;
        }
        Ok(())
    }

    fn compile_insert<W: Write>(&self, ctx: &mut FormatContext<'_, W>, state: &QueryState) -> Result<()> {
        let table = require_table(state, "insert")?;
        let first = state
            .inserts
            .first()
            .ok_or_else(|| Error::precondition("insert requires at least one row"))?;

        ctx.writer.write_str("insert into ")?;
        self.wrap(ctx, table.as_str())?;
        ctx.writer.write_str(" (")?;
        self.columnize(ctx, first.columns())?;
        ctx.writer.write_str(") values ")?;
        // every row is assumed to carry the first row's columns
        for index in 0..state.inserts.len() {
            if index > 0 {
                ctx.writer.write_str(", ")?;
            }
            ctx.writer.write_char('(')?;
            ctx.parameterize(first.len())?;
            ctx.writer.write_char(')')?;
        }
        Ok(())
    }

    fn compile_update<W: Write>(&self, ctx: &mut FormatContext<'_, W>, state: &QueryState) -> Result<()> {
        if state.has_joins() && !self.supports_join_mutations() {
            return Err(Error::unsupported(
                "this grammar does not support update with join clauses",
            ));
        }
        let table = require_table(state, "update")?;
        if state.updates.is_empty() {
            return Err(Error::precondition("update requires at least one assignment"));
        }

        ctx.writer.write_str("update ")?;
        self.wrap(ctx, table.as_str())?;
        self.compile_joins(ctx, &state.joins)?;
        ctx.writer.write_str(" set ")?;
        for (index, column) in state.updates.columns().enumerate() {
            if index > 0 {
                ctx.writer.write_str(", ")?;
            }
            if is_json_selector(column.as_str()) {
                let (field, path) = self.json_field_and_path(ctx.dialect, column.as_str(), "->")?;
                write!(ctx.writer, "{field} = json_set({field}{path}, ")?;
                ctx.write_placeholder()?;
                ctx.writer.write_char(')')?;
            } else {
                self.wrap(ctx, column.as_str())?;
                ctx.writer.write_str(" = ")?;
                ctx.write_placeholder()?;
            }
        }
        self.compile_wheres(ctx, &state.wheres)?;
        self.compile_orders(ctx, &state.orders)?;
        self.compile_limit(ctx, state)
    }

    fn compile_delete<W: Write>(&self, ctx: &mut FormatContext<'_, W>, state: &QueryState) -> Result<()> {
        if state.has_joins() && !self.supports_join_mutations() {
            return Err(Error::unsupported(
                "this grammar does not support delete with join clauses",
            ));
        }
        let table = require_table(state, "delete")?;

        if state.has_joins() {
            ctx.writer.write_str("delete ")?;
            match table.split_alias() {
                (_, Some(alias)) => ctx.write_ident(alias.trim())?,
                (base, None) => self.wrap(ctx, base)?,
            }
            ctx.writer.write_str(" from ")?;
            self.wrap(ctx, table.as_str())?;
            self.compile_joins(ctx, &state.joins)?;
            return self.compile_wheres(ctx, &state.wheres);
        }

        ctx.writer.write_str("delete from ")?;
        self.wrap(ctx, table.as_str())?;
        self.compile_wheres(ctx, &state.wheres)?;
        self.compile_orders(ctx, &state.orders)?;
        self.compile_limit(ctx, state)
    }

    // components

    fn compile_aggregate<W: Write>(
        &self,
        ctx: &mut FormatContext<'_, W>,
        state: &QueryState,
        aggregate: &Aggregate,
    ) -> Result<()> {
        ctx.writer.write_str("select ")?;
        aggregate.function.format_writer(ctx)?;
        ctx.writer.write_char('(')?;
        let wildcard = aggregate.columns.len() <= 1 && aggregate.columns.is_wildcard();
        if state.distinct && !wildcard {
            ctx.writer.write_str("distinct ")?;
        }
        self.columnize(ctx, aggregate.columns.iter())?;
        ctx.writer.write_str(") as aggregate")?;
        Ok(())
    }

    fn compile_columns<W: Write>(&self, ctx: &mut FormatContext<'_, W>, state: &QueryState) -> Result<()> {
        if state.distinct {
            ctx.writer.write_str("select distinct ")?;
        } else {
            ctx.writer.write_str("select ")?;
        }
        self.columnize_unquote(ctx, &state.columns)
    }

    fn compile_joins<W: Write>(&self, ctx: &mut FormatContext<'_, W>, joins: &[JoinClause]) -> Result<()> {
        for join in joins {
            ctx.writer.write_char(' ')?;
            join.join_type.format_writer(ctx)?;
            ctx.writer.write_char(' ')?;
            self.wrap(ctx, join.table.as_str())?;
            if !join.clauses.is_empty() {
                ctx.writer.write_str(" on ")?;
                self.compile_on_conditions(ctx, &join.clauses)?;
            }
        }
        Ok(())
    }

    fn compile_on_conditions<W: Write>(
        &self,
        ctx: &mut FormatContext<'_, W>,
        conditions: &[OnCondition],
    ) -> Result<()> {
        // the first connector never reaches the output
        for (index, condition) in conditions.iter().enumerate() {
            if index > 0 {
                ctx.writer.write_char(' ')?;
                condition.conjunction.format_writer(ctx)?;
                ctx.writer.write_char(' ')?;
            }
            self.compile_on_clause(ctx, &condition.clause)?;
        }
        Ok(())
    }

    fn compile_on_clause<W: Write>(&self, ctx: &mut FormatContext<'_, W>, clause: &OnClause) -> Result<()> {
        match clause {
            OnClause::Column {
                first,
                operator,
                second,
            } => {
                self.wrap(ctx, first.as_str())?;
                write!(ctx.writer, " {} ", operator.as_sql()?)?;
                self.wrap(ctx, second.as_str())
            }
            OnClause::Value { column, operator } => {
                self.wrap(ctx, column.as_str())?;
                write!(ctx.writer, " {} ", operator.as_sql()?)?;
                if operator.is_list() {
                    ctx.writer.write_char('(')?;
                    ctx.write_placeholder()?;
                    ctx.writer.write_char(')')?;
                } else {
                    ctx.write_placeholder()?;
                }
                Ok(())
            }
            OnClause::In { column, values, not } => self.compile_in(ctx, column, values.len(), *not),
            OnClause::Null { column, not } => self.compile_null(ctx, column, *not),
            OnClause::Nested { clauses } => {
                ctx.writer.write_char('(')?;
                self.compile_on_conditions(ctx, clauses)?;
                ctx.writer.write_char(')')?;
                Ok(())
            }
        }
    }

    fn compile_wheres<W: Write>(&self, ctx: &mut FormatContext<'_, W>, wheres: &Conditions) -> Result<()> {
        if wheres.is_empty() {
            return Ok(());
        }
        ctx.writer.write_str(" where ")?;
        self.compile_conditions(ctx, wheres)
    }

    fn compile_conditions<W: Write>(&self, ctx: &mut FormatContext<'_, W>, wheres: &Conditions) -> Result<()> {
        // the first connector never reaches the output
        for (index, condition) in wheres.iter().enumerate() {
            if index > 0 {
                ctx.writer.write_char(' ')?;
                condition.conjunction.format_writer(ctx)?;
                ctx.writer.write_char(' ')?;
            }
            self.compile_where(ctx, &condition.clause)?;
        }
        Ok(())
    }

    fn compile_where<W: Write>(&self, ctx: &mut FormatContext<'_, W>, clause: &WhereClause) -> Result<()> {
        match clause {
            WhereClause::Basic {
                column, operator, ..
            } => {
                self.wrap(ctx, column.as_str())?;
                write!(ctx.writer, " {} ", operator.as_sql()?)?;
                ctx.write_placeholder()?;
            }
            WhereClause::Nested { query } => {
                ctx.writer.write_char('(')?;
                self.compile_conditions(ctx, &query.wheres)?;
                ctx.writer.write_char(')')?;
            }
            WhereClause::Between { column, not } => {
                self.wrap(ctx, column.as_str())?;
                ctx.writer
                    .write_str(if *not { " not between " } else { " between " })?;
                ctx.write_placeholder()?;
                ctx.writer.write_str(" and ")?;
                ctx.write_placeholder()?;
            }
            WhereClause::In { column, values, not } => {
                self.compile_in(ctx, column, values.len(), *not)?;
            }
            WhereClause::Null { column, not } => {
                self.compile_null(ctx, column, *not)?;
            }
            WhereClause::DateUnit {
                unit,
                column,
                operator,
                ..
            } => {
                unit.format_writer(ctx)?;
                ctx.writer.write_char('(')?;
                self.wrap(ctx, column.as_str())?;
                write!(ctx.writer, ") {} ", operator.as_sql()?)?;
                ctx.write_placeholder()?;
            }
            WhereClause::JsonContains { column, not, .. } => {
                self.where_json_contains(ctx, column, *not)?;
            }
            WhereClause::JsonLength {
                column, operator, ..
            } => {
                self.where_json_length(ctx, column, operator)?;
            }
        }
        Ok(())
    }

    /// An empty list renders a tautology and binds nothing.
    fn compile_in<W: Write>(
        &self,
        ctx: &mut FormatContext<'_, W>,
        column: &Ident,
        count: usize,
        not: bool,
    ) -> Result<()> {
        if count == 0 {
            ctx.writer.write_str(if not { "1 = 1" } else { "0 = 1" })?;
            return Ok(());
        }
        self.wrap(ctx, column.as_str())?;
        ctx.writer.write_str(if not { " not in (" } else { " in (" })?;
        ctx.parameterize(count)?;
        ctx.writer.write_char(')')?;
        Ok(())
    }

    fn compile_null<W: Write>(&self, ctx: &mut FormatContext<'_, W>, column: &Ident, not: bool) -> Result<()> {
        self.wrap(ctx, column.as_str())?;
        ctx.writer
            .write_str(if not { " is not null" } else { " is null" })?;
        Ok(())
    }

    fn compile_orders<W: Write>(&self, ctx: &mut FormatContext<'_, W>, orders: &[OrderBy]) -> Result<()> {
        if orders.is_empty() {
            return Ok(());
        }
        ctx.writer.write_str(" order by ")?;
        ctx.write_list(orders, |ctx, order| {
            self.wrap(ctx, order.column.as_str())?;
            ctx.writer.write_char(' ')?;
            order.ordering.format_writer(ctx)?;
            Ok(())
        })
    }

    fn compile_limit<W: Write>(&self, ctx: &mut FormatContext<'_, W>, state: &QueryState) -> Result<()> {
        if let Some(limit) = state.paginator.get_limit() {
            write!(ctx.writer, " limit {limit}")?;
        }
        Ok(())
    }

    // wrapping

    /// Quotes a column or table reference.
    ///
    /// Anything mentioning `null` passes through untouched, aliases keep
    /// their alias as one identifier, aggregate calls only wrap their
    /// argument, json selectors go to the dialect and the rest is quoted
    /// segment by segment.
    fn wrap<W: Write>(&self, ctx: &mut FormatContext<'_, W>, value: &str) -> Result<()> {
        if value.to_ascii_lowercase().contains("null") {
            ctx.writer.write_str(value)?;
            return Ok(());
        }

        if let (base, Some(alias)) = split_alias(value) {
            self.wrap(ctx, base.trim())?;
            ctx.writer.write_str(" as ")?;
            ctx.write_ident(alias.trim())?;
            return Ok(());
        }

        if let Some((name, argument)) = split_function_call(value) {
            if AGGREGATE_FUNCTIONS.contains(&name.to_ascii_lowercase().as_str()) {
                ctx.writer.write_str(name)?;
                ctx.writer.write_char('(')?;
                self.wrap(ctx, argument)?;
                ctx.writer.write_char(')')?;
                return Ok(());
            }
        }

        if is_json_selector(value) {
            return self.wrap_json_selector(ctx, value);
        }

        ctx.write_table(value)?;
        Ok(())
    }

    fn wrap_to_string(&self, dialect: Dialect, value: &str) -> Result<String> {
        let mut out = String::with_capacity(value.len() + 2);
        let mut ctx = FormatContext::new(&mut out, dialect);
        self.wrap(&mut ctx, value)?;
        Ok(out)
    }

    /// Splits `field->a->b` once on `delimiter` and returns the wrapped
    /// field plus `, '$."a"."b"'`, or an empty path when there is none.
    fn json_field_and_path(&self, dialect: Dialect, column: &str, delimiter: &str) -> Result<(String, String)> {
        let (field, path) = match column.split_once(delimiter) {
            Some((field, path)) => (field, Some(path)),
            None => (column, None),
        };
        let field = self.wrap_to_string(dialect, field)?;
        let path = match path {
            Some(path) => format!(", {}", json_path(path, "->")),
            None => String::new(),
        };
        Ok((field, path))
    }

    /// Column list, `*` when empty.
    fn columnize<'a, W, I>(&self, ctx: &mut FormatContext<'_, W>, columns: I) -> Result<()>
    where
        W: Write,
        I: IntoIterator<Item = &'a Ident>,
    {
        let mut written = false;
        for column in columns {
            if written {
                ctx.writer.write_str(", ")?;
            }
            self.wrap(ctx, column.as_str())?;
            written = true;
        }
        if !written {
            ctx.writer.write_char('*')?;
        }
        Ok(())
    }

    /// Select list where `col->path` reads the unquoted json value.
    fn columnize_unquote<W: Write>(&self, ctx: &mut FormatContext<'_, W>, columns: &Columns) -> Result<()> {
        if columns.is_empty() {
            ctx.writer.write_char('*')?;
            return Ok(());
        }
        for (index, column) in columns.iter().enumerate() {
            if index > 0 {
                ctx.writer.write_str(", ")?;
            }
            let value = column.as_str();
            if is_json_selector(value) && !value.contains("->>") {
                self.wrap(ctx, &value.replacen("->", "->>", 1))?;
            } else {
                self.wrap(ctx, value)?;
            }
        }
        Ok(())
    }
}

fn require_table<'a>(state: &'a QueryState, statement: &str) -> Result<&'a Ident> {
    state
        .table()
        .ok_or_else(|| Error::precondition(format!("{statement} requires a table")))
}

pub(crate) fn is_json_selector(value: &str) -> bool {
    value.contains("->")
}

/// `name(argument)` split on the last `(` that still has a `)` after it;
/// the argument runs to the last `)`.
fn split_function_call(value: &str) -> Option<(&str, &str)> {
    let close = value.rfind(')')?;
    let open = value[..close].rfind('(')?;
    Some((&value[..open], &value[open + 1..close]))
}

/// `'$."a"."b"'` for the path `a->b`. A quote, with any backslashes right
/// before it, is re-escaped as `\'`.
fn json_path(value: &str, delimiter: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    let mut backslashes = 0;
    for char in value.chars() {
        match char {
            '\\' => backslashes += 1,
            '\'' => {
                backslashes = 0;
                escaped.push_str("\\'");
            }
            other => {
                for _ in 0..backslashes {
                    escaped.push('\\');
                }
                backslashes = 0;
                escaped.push(other);
            }
        }
    }
    for _ in 0..backslashes {
        escaped.push('\\');
    }
    format!("'$.\"{}\"'", escaped.replace(delimiter, "\".\""))
}
