use indexmap::IndexMap;

use crate::{
    bind::{Bind, Binds, IntoBind},
    ident::{Ident, IntoIdent},
};

/// Ordered column => value map used for inserted rows and update
/// assignments.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Row {
    values: IndexMap<Ident, Bind>,
}

impl Row {
    pub fn new() -> Self {
        Self {
            values: IndexMap::new(),
        }
    }

    pub fn field<K, V>(mut self, column: K, value: V) -> Self
    where
        K: IntoIdent,
        V: IntoBind,
    {
        self.set(column, value);
        self
    }

    pub fn set<K, V>(&mut self, column: K, value: V) -> &mut Self
    where
        K: IntoIdent,
        V: IntoBind,
    {
        self.values.insert(column.into_ident(), value.into_bind());
        self
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn columns(&self) -> impl Iterator<Item = &Ident> {
        self.values.keys()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Ident, &Bind)> {
        self.values.iter()
    }

    pub fn to_binds(&self) -> Binds {
        Binds::from(self.values.values().cloned().collect::<Vec<_>>())
    }
}

impl<K, V> FromIterator<(K, V)> for Row
where
    K: IntoIdent,
    V: IntoBind,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let values = iter
            .into_iter()
            .map(|(column, value)| (column.into_ident(), value.into_bind()))
            .collect();
        Self { values }
    }
}

pub trait IntoRows {
    fn into_rows(self) -> Vec<Row>;
}

impl IntoRows for Row {
    fn into_rows(self) -> Vec<Row> {
        vec![self]
    }
}

impl IntoRows for Vec<Row> {
    fn into_rows(self) -> Vec<Row> {
        self
    }
}

impl<const N: usize> IntoRows for [Row; N] {
    fn into_rows(self) -> Vec<Row> {
        self.into_iter().collect()
    }
}
