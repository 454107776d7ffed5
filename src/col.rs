use crate::{
    bind::Array,
    ident::{Ident, IntoIdent},
};

pub type Columns = Array<Ident>;

impl Columns {
    /// `true` when the list renders as `*`.
    pub fn is_wildcard(&self) -> bool {
        match self {
            Columns::None => true,
            Columns::One(ident) => ident.is_wildcard(),
            Columns::Many(idents) => idents.first().is_some_and(Ident::is_wildcard),
        }
    }
}

pub trait IntoColumns {
    fn into_columns(self) -> Columns;
}

impl IntoColumns for Columns {
    fn into_columns(self) -> Columns {
        self
    }
}

impl IntoColumns for &str {
    fn into_columns(self) -> Columns {
        Columns::One(self.into_ident())
    }
}

impl IntoColumns for String {
    fn into_columns(self) -> Columns {
        Columns::One(self.into_ident())
    }
}

impl IntoColumns for Ident {
    fn into_columns(self) -> Columns {
        Columns::One(self)
    }
}

impl<T, const N: usize> IntoColumns for [T; N]
where
    T: IntoIdent,
{
    fn into_columns(self) -> Columns {
        Columns::from(self.into_iter().map(IntoIdent::into_ident).collect::<Vec<_>>())
    }
}

impl<T> IntoColumns for Vec<T>
where
    T: IntoIdent,
{
    fn into_columns(self) -> Columns {
        Columns::from(self.into_iter().map(IntoIdent::into_ident).collect::<Vec<_>>())
    }
}

impl IntoColumns for &[&str] {
    fn into_columns(self) -> Columns {
        Columns::from(self.iter().map(|col| col.into_ident()).collect::<Vec<_>>())
    }
}
