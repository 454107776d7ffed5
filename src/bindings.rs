use std::{fmt, str::FromStr};

use crate::{
    Error, Result,
    bind::{Bind, Binds},
};

/// Category a bound value belongs to. Flattening follows the declaration
/// order, which is also the order placeholders appear in compiled sql.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BindingKind {
    Select,
    Join,
    Where,
    Having,
    Order,
    Inserts,
}

impl BindingKind {
    pub const ALL: [BindingKind; 6] = [
        BindingKind::Select,
        BindingKind::Join,
        BindingKind::Where,
        BindingKind::Having,
        BindingKind::Order,
        BindingKind::Inserts,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            BindingKind::Select => "select",
            BindingKind::Join => "join",
            BindingKind::Where => "where",
            BindingKind::Having => "having",
            BindingKind::Order => "order",
            BindingKind::Inserts => "inserts",
        }
    }
}

impl fmt::Display for BindingKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BindingKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        BindingKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| Error::invalid_argument(format!("invalid binding type: {s}")))
    }
}

pub trait IntoBindingKind {
    fn into_binding_kind(self) -> Result<BindingKind>;
}

impl IntoBindingKind for BindingKind {
    fn into_binding_kind(self) -> Result<BindingKind> {
        Ok(self)
    }
}

impl IntoBindingKind for &str {
    fn into_binding_kind(self) -> Result<BindingKind> {
        self.parse()
    }
}

impl IntoBindingKind for String {
    fn into_binding_kind(self) -> Result<BindingKind> {
        self.parse()
    }
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct Bindings {
    select: Binds,
    join: Binds,
    wheres: Binds,
    having: Binds,
    order: Binds,
    inserts: Binds,
}

impl Bindings {
    pub fn bucket(&self, kind: BindingKind) -> &Binds {
        match kind {
            BindingKind::Select => &self.select,
            BindingKind::Join => &self.join,
            BindingKind::Where => &self.wheres,
            BindingKind::Having => &self.having,
            BindingKind::Order => &self.order,
            BindingKind::Inserts => &self.inserts,
        }
    }

    fn bucket_mut(&mut self, kind: BindingKind) -> &mut Binds {
        match kind {
            BindingKind::Select => &mut self.select,
            BindingKind::Join => &mut self.join,
            BindingKind::Where => &mut self.wheres,
            BindingKind::Having => &mut self.having,
            BindingKind::Order => &mut self.order,
            BindingKind::Inserts => &mut self.inserts,
        }
    }

    pub fn add(&mut self, kind: BindingKind, binds: Binds) {
        self.bucket_mut(kind).append(binds);
    }

    pub fn set(&mut self, kind: BindingKind, binds: Binds) {
        *self.bucket_mut(kind) = binds;
    }

    pub fn take(&mut self, kind: BindingKind) -> Binds {
        self.bucket_mut(kind).take()
    }

    /// Drains every bucket into one list, in flattening order.
    pub fn take_all(&mut self) -> Binds {
        let mut all = Binds::None;
        for kind in BindingKind::ALL {
            all.append(self.take(kind));
        }
        all
    }

    pub fn len(&self) -> usize {
        BindingKind::ALL
            .iter()
            .map(|kind| self.bucket(*kind).len())
            .sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn flatten(&self) -> Vec<Bind> {
        let mut values = Vec::with_capacity(self.len());
        for kind in BindingKind::ALL {
            values.extend(self.bucket(kind).iter().cloned());
        }
        values
    }
}

#[cfg(test)]
mod tests {
    use crate::bind::IntoBinds;

    use super::*;

    #[test]
    fn test_flatten_order() {
        let mut bindings = Bindings::default();
        bindings.add(BindingKind::Inserts, 6.into_binds());
        bindings.add(BindingKind::Where, [3, 4].into_binds());
        bindings.add(BindingKind::Select, 1.into_binds());
        bindings.add(BindingKind::Order, 5.into_binds());
        bindings.add(BindingKind::Join, 2.into_binds());
        let flat: Vec<i64> = bindings
            .flatten()
            .iter()
            .filter_map(Bind::as_i64)
            .collect();
        assert_eq!(vec![1, 2, 3, 4, 5, 6], flat);
    }

    #[test]
    fn test_parse_kind() {
        assert_eq!(BindingKind::Having, "having".into_binding_kind().unwrap());
        let err = "wherever".into_binding_kind().unwrap_err();
        assert!(err.is_invalid_argument());
        assert_eq!(
            "invalid argument: invalid binding type: wherever",
            err.to_string()
        );
    }

    #[test]
    fn test_take_all_drains() {
        let mut bindings = Bindings::default();
        bindings.add(BindingKind::Where, "a".into_binds());
        bindings.add(BindingKind::Join, "b".into_binds());
        let all = bindings.take_all();
        assert_eq!(
            vec![Bind::String("b".into()), Bind::String("a".into())],
            all.into_vec()
        );
        assert!(bindings.is_empty());
    }
}
