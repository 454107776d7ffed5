use crate::{
    bindings::Bindings,
    col::Columns,
    expr::{Aggregate, Conditions, OrderBy},
    ident::Ident,
    join::JoinClause,
    paginate::Paginator,
    row::Row,
};

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum QueryKind {
    #[default]
    Select,
    Insert,
    Update,
    Delete,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lock {
    ForUpdate,
    Shared,
}

/// Everything a grammar needs to render one statement.
#[derive(Debug, Default, Clone)]
pub struct QueryState {
    /// `None` until an initiating call picks the statement kind; renders
    /// as a select.
    pub(crate) maybe_kind: Option<QueryKind>,
    pub(crate) columns: Columns,
    pub(crate) distinct: bool,
    pub(crate) maybe_from: Option<Ident>,
    pub(crate) joins: Vec<JoinClause>,
    pub(crate) wheres: Conditions,
    pub(crate) groups: Columns,
    pub(crate) orders: Vec<OrderBy>,
    pub(crate) paginator: Paginator,
    pub(crate) maybe_aggregate: Option<Aggregate>,
    pub(crate) maybe_lock: Option<Lock>,
    pub(crate) inserts: Vec<Row>,
    pub(crate) updates: Row,
    pub(crate) bindings: Bindings,
}

impl QueryState {
    pub fn kind(&self) -> QueryKind {
        self.maybe_kind.unwrap_or_default()
    }

    pub fn table(&self) -> Option<&Ident> {
        self.maybe_from.as_ref()
    }

    pub fn has_joins(&self) -> bool {
        !self.joins.is_empty()
    }

    pub fn columns(&self) -> &Columns {
        &self.columns
    }

    pub fn wheres(&self) -> &Conditions {
        &self.wheres
    }

    pub fn joins(&self) -> &[JoinClause] {
        &self.joins
    }

    pub fn aggregate(&self) -> Option<&Aggregate> {
        self.maybe_aggregate.as_ref()
    }

    pub fn bindings(&self) -> &Bindings {
        &self.bindings
    }

    pub fn updates(&self) -> &Row {
        &self.updates
    }
}
