use std::fmt::Write;

use crate::dialect::Dialect;

pub(crate) trait FormatWriter {
    fn format_writer<W: Write>(&self, context: &mut FormatContext<'_, W>) -> std::fmt::Result;
}

pub(crate) struct FormatContext<'a, W: Write> {
    pub(crate) writer: &'a mut W,
    pub(crate) dialect: Dialect,
    pub(crate) placeholder: usize,
}

impl<'a, W: Write> FormatContext<'a, W> {
    pub fn new(writer: &'a mut W, dialect: Dialect) -> Self {
        Self {
            writer,
            dialect,
            placeholder: 0,
        }
    }

    /// Quotes each dot separated segment on its own.
    pub(crate) fn write_table(&mut self, ident: &str) -> std::fmt::Result {
        for (i, part) in ident.split('.').enumerate() {
            if i > 0 {
                self.writer.write_char('.')?;
            }
            self.write_ident(part)?;
        }
        Ok(())
    }

    /// Both grammars quote with backticks; embedded backticks are dropped
    /// rather than doubled.
    pub(crate) fn write_ident(&mut self, part: &str) -> std::fmt::Result {
        if part == "*" {
            return self.writer.write_char('*');
        }

        self.writer.write_char('`')?;
        let mut last = 0;
        for (index, char) in part.char_indices() {
            if char == '`' {
                if index != last {
                    self.writer.write_str(&part[last..index])?;
                }
                last = index + char.len_utf8();
            }
        }

        // write trailing slice
        if last < part.len() {
            self.writer.write_str(&part[last..])?;
        }

        self.writer.write_char('`')
    }

    pub(crate) fn write_placeholder(&mut self) -> std::fmt::Result {
        self.placeholder += 1;
        self.writer.write_char('?')
    }

    /// `?, ?, ?` for `count` values.
    pub(crate) fn parameterize(&mut self, count: usize) -> std::fmt::Result {
        for index in 0..count {
            if index > 0 {
                self.writer.write_str(", ")?;
            }
            self.write_placeholder()?;
        }
        Ok(())
    }

    pub(crate) fn write_list<T, F>(&mut self, items: &[T], mut write_item: F) -> crate::Result<()>
    where
        F: FnMut(&mut Self, &T) -> crate::Result<()>,
    {
        for (index, item) in items.iter().enumerate() {
            if index > 0 {
                self.writer.write_str(", ")?;
            }
            write_item(self, item)?;
        }
        Ok(())
    }
}
