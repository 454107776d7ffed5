use crate::{col::Columns, writer::FormatWriter};

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum AggregateFunction {
    Count,
    Sum,
    Min,
    Max,
    Avg,
}

impl FormatWriter for AggregateFunction {
    fn format_writer<W: std::fmt::Write>(
        &self,
        context: &mut crate::writer::FormatContext<'_, W>,
    ) -> std::fmt::Result {
        match self {
            AggregateFunction::Count => context.writer.write_str("count"),
            AggregateFunction::Sum => context.writer.write_str("sum"),
            AggregateFunction::Min => context.writer.write_str("min"),
            AggregateFunction::Max => context.writer.write_str("max"),
            AggregateFunction::Avg => context.writer.write_str("avg"),
        }
    }
}

/// `select fn(columns) as aggregate` in place of the column list.
#[derive(Debug, Clone)]
pub struct Aggregate {
    pub(crate) function: AggregateFunction,
    pub(crate) columns: Columns,
}

impl Aggregate {
    pub fn new(function: AggregateFunction, columns: Columns) -> Self {
        Self { function, columns }
    }
}
