use std::fmt::Write;

use crate::{
    Result,
    ident::Ident,
    operator::Operator,
    state::Lock,
    writer::FormatContext,
};

use super::Grammar;

pub(crate) struct MySqlGrammar;

impl Grammar for MySqlGrammar {
    /// `->>` unquotes the extracted value, `->` keeps it as json.
    fn wrap_json_selector<W: Write>(&self, ctx: &mut FormatContext<'_, W>, value: &str) -> Result<()> {
        let delimiter = if value.contains("->>") { "->>" } else { "->" };
        let (field, path) = self.json_field_and_path(ctx.dialect, value, delimiter)?;
        if delimiter == "->>" {
            write!(ctx.writer, "json_unquote(json_extract({field}{path}))")?;
        } else {
            write!(ctx.writer, "json_extract({field}{path})")?;
        }
        Ok(())
    }

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
        write!(ctx.writer, "json_contains({field}, ")?;
        ctx.write_placeholder()?;
        write!(ctx.writer, "{path})")?;
        Ok(())
    }

    fn where_json_length<W: Write>(
        &self,
        ctx: &mut FormatContext<'_, W>,
        column: &Ident,
        operator: &Operator,
    ) -> Result<()> {
        let (field, path) = self.json_field_and_path(ctx.dialect, column.as_str(), "->")?;
        write!(ctx.writer, "json_length({field}{path}) {} ", operator.as_sql()?)?;
        ctx.write_placeholder()?;
        Ok(())
    }

    fn compile_lock<W: Write>(&self, ctx: &mut FormatContext<'_, W>, lock: Lock) -> Result<()> {
        match lock {
            Lock::ForUpdate => ctx.writer.write_str(" for update")?,
            Lock::Shared => ctx.writer.write_str(" lock in share mode")?,
        }
        Ok(())
    }

    fn compile_column_exists(&self) -> Result<&'static str> {
        Ok("select column_name from information_schema.columns where table_name = ?")
    }
}
