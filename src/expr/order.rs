use std::fmt;

use crate::{
    ident::Ident,
    writer::{self, FormatWriter},
};

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum Ordering {
    #[default]
    Asc,
    Desc,
}

impl FormatWriter for Ordering {
    fn format_writer<W: fmt::Write>(
        &self,
        context: &mut writer::FormatContext<'_, W>,
    ) -> std::fmt::Result {
        match self {
            Ordering::Asc => context.writer.write_str("asc"),
            Ordering::Desc => context.writer.write_str("desc"),
        }
    }
}

pub trait IntoOrdering {
    fn into_ordering(self) -> Ordering;
}

impl IntoOrdering for Ordering {
    fn into_ordering(self) -> Ordering {
        self
    }
}

/// Anything but a case-insensitive `asc` sorts descending.
impl IntoOrdering for &str {
    fn into_ordering(self) -> Ordering {
        if self.eq_ignore_ascii_case("asc") {
            Ordering::Asc
        } else {
            Ordering::Desc
        }
    }
}

impl IntoOrdering for String {
    fn into_ordering(self) -> Ordering {
        self.as_str().into_ordering()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderBy {
    pub(crate) column: Ident,
    pub(crate) ordering: Ordering,
}

impl OrderBy {
    pub fn new(column: Ident, ordering: Ordering) -> Self {
        Self { column, ordering }
    }
}
