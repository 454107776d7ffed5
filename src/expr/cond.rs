use crate::{
    bind::{Bind, Binds},
    expr::date::DateUnit,
    ident::Ident,
    operator::Operator,
    state::QueryState,
    writer::FormatWriter,
};

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum Conjunction {
    #[default]
    And,
    Or,
}

impl FormatWriter for Conjunction {
    fn format_writer<W: std::fmt::Write>(
        &self,
        context: &mut crate::writer::FormatContext<'_, W>,
    ) -> std::fmt::Result {
        match self {
            Conjunction::And => context.writer.write_str("and"),
            Conjunction::Or => context.writer.write_str("or"),
        }
    }
}

/// One predicate of a where list. Bound values live in the owning query's
/// `where` bucket; the clause only keeps what the grammar needs to render
/// its placeholders.
#[derive(Debug, Clone)]
pub enum WhereClause {
    Basic {
        column: Ident,
        operator: Operator,
        value: Bind,
    },
    Nested {
        query: Box<QueryState>,
    },
    Between {
        column: Ident,
        not: bool,
    },
    In {
        column: Ident,
        values: Binds,
        not: bool,
    },
    Null {
        column: Ident,
        not: bool,
    },
    DateUnit {
        unit: DateUnit,
        column: Ident,
        operator: Operator,
        value: Bind,
    },
    JsonContains {
        column: Ident,
        value: Bind,
        not: bool,
    },
    JsonLength {
        column: Ident,
        operator: Operator,
        value: Bind,
    },
}

#[derive(Debug, Clone)]
pub struct Condition {
    pub(crate) conjunction: Conjunction,
    pub(crate) clause: WhereClause,
}

impl Condition {
    pub fn new(conjunction: Conjunction, clause: WhereClause) -> Self {
        Self {
            conjunction,
            clause,
        }
    }

    pub fn conjunction(&self) -> Conjunction {
        self.conjunction
    }

    pub fn clause(&self) -> &WhereClause {
        &self.clause
    }
}

#[derive(Debug, Default, Clone)]
pub struct Conditions(pub(crate) Vec<Condition>);

impl Conditions {
    pub fn push(&mut self, conjunction: Conjunction, clause: WhereClause) {
        self.0.push(Condition::new(conjunction, clause));
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Condition> {
        self.0.iter()
    }
}
