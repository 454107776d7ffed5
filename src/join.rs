use quarry_derive::or_variant;

use crate::{
    bind::{Binds, IntoBind, IntoBinds},
    expr::Conjunction,
    ident::{Ident, IntoIdent},
    operator::{IntoOperator, Operator},
    writer::FormatWriter,
};

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum JoinType {
    #[default]
    Inner,
    Left,
    Right,
}

impl FormatWriter for JoinType {
    fn format_writer<W: std::fmt::Write>(
        &self,
        context: &mut crate::writer::FormatContext<'_, W>,
    ) -> std::fmt::Result {
        match self {
            JoinType::Inner => context.writer.write_str("inner join"),
            JoinType::Left => context.writer.write_str("left join"),
            JoinType::Right => context.writer.write_str("right join"),
        }
    }
}

/// One constraint of a join's `on` list.
#[derive(Debug, Clone)]
pub enum OnClause {
    /// `first op second`, both sides are columns.
    Column {
        first: Ident,
        operator: Operator,
        second: Ident,
    },
    /// `column op ?`, the value goes to the join bucket.
    Value { column: Ident, operator: Operator },
    In {
        column: Ident,
        values: Binds,
        not: bool,
    },
    Null {
        column: Ident,
        not: bool,
    },
    Nested {
        clauses: Vec<OnCondition>,
    },
}

#[derive(Debug, Clone)]
pub struct OnCondition {
    pub(crate) conjunction: Conjunction,
    pub(crate) clause: OnClause,
}

#[derive(Debug, Clone)]
pub struct JoinClause {
    pub(crate) join_type: JoinType,
    pub(crate) table: Ident,
    pub(crate) clauses: Vec<OnCondition>,
    binds: Binds,
}

impl JoinClause {
    pub fn new<T: IntoIdent>(join_type: JoinType, table: T) -> Self {
        Self {
            join_type,
            table: table.into_ident(),
            clauses: Vec::new(),
            binds: Binds::None,
        }
    }

    pub fn inner<T: IntoIdent>(table: T) -> Self {
        Self::new(JoinType::Inner, table)
    }

    pub fn left<T: IntoIdent>(table: T) -> Self {
        Self::new(JoinType::Left, table)
    }

    pub fn right<T: IntoIdent>(table: T) -> Self {
        Self::new(JoinType::Right, table)
    }

    pub fn join_type(&self) -> JoinType {
        self.join_type
    }

    pub fn table(&self) -> &Ident {
        &self.table
    }

    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }

    /// Values bound by the `where` style constraints, in clause order.
    pub fn bindings(&self) -> &Binds {
        &self.binds
    }

    pub(crate) fn take_bindings(&mut self) -> Binds {
        self.binds.take()
    }

    fn push(&mut self, conjunction: Conjunction, clause: OnClause) -> &mut Self {
        self.clauses.push(OnCondition {
            conjunction,
            clause,
        });
        self
    }

    #[or_variant]
    pub fn on<C, O, CC>(&mut self, column: C, operator: O, other_column: CC) -> &mut Self
    where
        C: IntoIdent,
        O: IntoOperator,
        CC: IntoIdent,
    {
        let clause = OnClause::Column {
            first: column.into_ident(),
            operator: operator.into_operator(),
            second: other_column.into_ident(),
        };
        self.push(Conjunction::And, clause)
    }

    #[or_variant(or_where)]
    pub fn where_clause<C, O, V>(&mut self, column: C, operator: O, value: V) -> &mut Self
    where
        C: IntoIdent,
        O: IntoOperator,
        V: IntoBind,
    {
        self.binds.push(value.into_bind());
        let clause = OnClause::Value {
            column: column.into_ident(),
            operator: operator.into_operator(),
        };
        self.push(Conjunction::And, clause)
    }

    #[or_variant]
    pub fn where_null<C: IntoIdent>(&mut self, column: C) -> &mut Self {
        let clause = OnClause::Null {
            column: column.into_ident(),
            not: false,
        };
        self.push(Conjunction::And, clause)
    }

    #[or_variant]
    pub fn where_not_null<C: IntoIdent>(&mut self, column: C) -> &mut Self {
        let clause = OnClause::Null {
            column: column.into_ident(),
            not: true,
        };
        self.push(Conjunction::And, clause)
    }

    #[or_variant]
    pub fn where_in<C, V>(&mut self, column: C, values: V) -> &mut Self
    where
        C: IntoIdent,
        V: IntoBinds,
    {
        let values = values.into_binds();
        self.binds.append(values.clone());
        let clause = OnClause::In {
            column: column.into_ident(),
            values,
            not: false,
        };
        self.push(Conjunction::And, clause)
    }

    #[or_variant]
    pub fn where_not_in<C, V>(&mut self, column: C, values: V) -> &mut Self
    where
        C: IntoIdent,
        V: IntoBinds,
    {
        let values = values.into_binds();
        self.binds.append(values.clone());
        let clause = OnClause::In {
            column: column.into_ident(),
            values,
            not: true,
        };
        self.push(Conjunction::And, clause)
    }

    /// Parenthesized group of constraints. An empty closure adds nothing.
    #[or_variant]
    pub fn where_nested<F>(&mut self, closure: F) -> &mut Self
    where
        F: FnOnce(&mut Self),
    {
        let mut inner = Self::new(self.join_type, self.table.clone());
        closure(&mut inner);
        if inner.clauses.is_empty() {
            return self;
        }
        self.binds.append(inner.take_bindings());
        let clause = OnClause::Nested {
            clauses: inner.clauses,
        };
        self.push(Conjunction::And, clause)
    }
}
