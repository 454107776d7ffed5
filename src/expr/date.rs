use crate::writer::FormatWriter;

/// Sql function a date based where applies to its column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateUnit {
    Date,
    Day,
    Month,
    Year,
    Time,
}

impl FormatWriter for DateUnit {
    fn format_writer<W: std::fmt::Write>(
        &self,
        context: &mut crate::writer::FormatContext<'_, W>,
    ) -> std::fmt::Result {
        match self {
            DateUnit::Date => context.writer.write_str("date"),
            DateUnit::Day => context.writer.write_str("day"),
            DateUnit::Month => context.writer.write_str("month"),
            DateUnit::Year => context.writer.write_str("year"),
            DateUnit::Time => context.writer.write_str("time"),
        }
    }
}
