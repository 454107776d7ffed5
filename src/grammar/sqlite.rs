use std::fmt::Write;

use crate::{
    Result,
    bind::Bind,
    ident::Ident,
    operator::Operator,
    writer::FormatContext,
};

use super::Grammar;

pub(crate) struct SqliteGrammar;

impl Grammar for SqliteGrammar {
    /// `json_extract` already unquotes scalars, so `->` and `->>` render
    /// the same.
    fn wrap_json_selector<W: Write>(&self, ctx: &mut FormatContext<'_, W>, value: &str) -> Result<()> {
        let delimiter = if value.contains("->>") { "->>" } else { "->" };
        let (field, path) = self.json_field_and_path(ctx.dialect, value, delimiter)?;
        write!(ctx.writer, "json_extract({field}{path})")?;
        Ok(())
    }

    /// The value is bound as json text; `json_extract(?, '$')` decodes it
    /// to the scalar `json_each` yields.
    fn where_json_contains<W: Write>(
        &self,
        ctx: &mut FormatContext<'_, W>,
        column: &Ident,
        not: bool,
    ) -> Result<()> {
        let (field, path) = self.json_field_and_path(ctx.dialect, column.as_str(), "->")?;
        if not {
            ctx.writer.write_str("not ")?;
        }
        write!(
            ctx.writer,
            "exists (select 1 from json_each({field}{path}) where json_each.value = json_extract("
        )?;
        ctx.write_placeholder()?;
        ctx.writer.write_str(", '$'))")?;
        Ok(())
    }

    fn where_json_length<W: Write>(
        &self,
        ctx: &mut FormatContext<'_, W>,
        column: &Ident,
        operator: &Operator,
    ) -> Result<()> {
        let (field, path) = self.json_field_and_path(ctx.dialect, column.as_str(), "->")?;
        write!(
            ctx.writer,
            "json_array_length({field}{path}) {} ",
            operator.as_sql()?
        )?;
        ctx.write_placeholder()?;
        Ok(())
    }

    fn supports_join_mutations(&self) -> bool {
        false
    }

    /// `pragma_table_info` does not take a bound table name reliably, so the
    /// name is inlined as an escaped literal. Nothing else inlines values.
    fn compile_column_listing(&self, table: &str) -> Result<(String, Vec<Bind>)> {
        let table = table.replace('\0', "").replace('\'', "''");
        Ok((format!("select name from pragma_table_info('{table}')"), Vec::new()))
    }
}
