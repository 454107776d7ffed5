use std::fmt;

use serde::{Serialize, Serializer};
use smol_str::SmolStr;

// max size is 32 bytes
#[derive(Debug, Clone, PartialEq)]
pub enum Bind {
    Null,
    String(String),
    Bool(bool),
    F32(f32),
    F64(f64),
    I8(i8),
    I16(i16),
    I32(i32),
    I64(i64),

    // unsigned not so sure about it ?
    U8(u8),
    U16(u16),
    U32(u32),
    U64(u64),
}

impl Bind {
    pub fn is_null(&self) -> bool {
        matches!(self, Bind::Null)
    }

    /// Integer view of the value, following how drivers hand numbers back.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Bind::Bool(value) => Some(i64::from(*value)),
            Bind::I8(value) => Some(i64::from(*value)),
            Bind::I16(value) => Some(i64::from(*value)),
            Bind::I32(value) => Some(i64::from(*value)),
            Bind::I64(value) => Some(*value),
            Bind::U8(value) => Some(i64::from(*value)),
            Bind::U16(value) => Some(i64::from(*value)),
            Bind::U32(value) => Some(i64::from(*value)),
            Bind::U64(value) => i64::try_from(*value).ok(),
            Bind::F32(value) => Some(*value as i64),
            Bind::F64(value) => Some(*value as i64),
            Bind::String(value) => value.trim().parse().ok(),
            Bind::Null => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Bind::String(value) => Some(value.as_str()),
            _ => None,
        }
    }
}

impl fmt::Display for Bind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Bind::Null => Ok(()),
            Bind::String(value) => f.write_str(value),
            Bind::Bool(value) => write!(f, "{value}"),
            Bind::F32(value) => write!(f, "{value}"),
            Bind::F64(value) => write!(f, "{value}"),
            Bind::I8(value) => write!(f, "{value}"),
            Bind::I16(value) => write!(f, "{value}"),
            Bind::I32(value) => write!(f, "{value}"),
            Bind::I64(value) => write!(f, "{value}"),
            Bind::U8(value) => write!(f, "{value}"),
            Bind::U16(value) => write!(f, "{value}"),
            Bind::U32(value) => write!(f, "{value}"),
            Bind::U64(value) => write!(f, "{value}"),
        }
    }
}

impl Serialize for Bind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Bind::Null => serializer.serialize_none(),
            Bind::String(value) => serializer.serialize_str(value),
            Bind::Bool(value) => serializer.serialize_bool(*value),
            Bind::F32(value) => serializer.serialize_f32(*value),
            Bind::F64(value) => serializer.serialize_f64(*value),
            Bind::I8(value) => serializer.serialize_i8(*value),
            Bind::I16(value) => serializer.serialize_i16(*value),
            Bind::I32(value) => serializer.serialize_i32(*value),
            Bind::I64(value) => serializer.serialize_i64(*value),
            Bind::U8(value) => serializer.serialize_u8(*value),
            Bind::U16(value) => serializer.serialize_u16(*value),
            Bind::U32(value) => serializer.serialize_u32(*value),
            Bind::U64(value) => serializer.serialize_u64(*value),
        }
    }
}

pub type Binds = Array<Bind>;

impl IntoBinds for Binds {
    fn into_binds(self) -> Binds {
        self
    }
}

impl IntoBinds for () {
    fn into_binds(self) -> Binds {
        Binds::None
    }
}

// if T <= 32 bytes we are good and it's a free data structure.
#[derive(Debug, Clone, PartialEq)]
pub enum Array<T> {
    None,
    One(T),
    Many(Vec<T>),
}

impl<T> Default for Array<T> {
    fn default() -> Self {
        Self::None
    }
}

impl<T> Array<T> {
    pub fn append(&mut self, other: Self) {
        let combined = match (std::mem::replace(self, Self::None), other) {
            (Self::None, cols) | (cols, Self::None) => cols,
            (Self::One(a), Self::One(b)) => Self::Many(vec![a, b]),
            (Self::One(a), Self::Many(mut b)) => {
                b.insert(0, a);
                Self::Many(b)
            }
            (Self::Many(mut a), Self::One(b)) => {
                a.push(b);
                Self::Many(a)
            }
            (Self::Many(mut a), Self::Many(mut b)) => {
                a.append(&mut b);
                Self::Many(a)
            }
        };
        *self = combined;
    }

    pub fn push(&mut self, value: T) {
        self.append(Self::One(value));
    }

    pub fn len(&self) -> usize {
        match self {
            Array::None => 0,
            Array::One(_) => 1,
            Array::Many(items) => items.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn reset(&mut self) {
        *self = Self::None;
    }

    pub fn take(&mut self) -> Self {
        std::mem::replace(self, Self::None)
    }

    pub fn first(&self) -> Option<&T> {
        match self {
            Array::None => None,
            Array::One(one) => Some(one),
            Array::Many(many) => many.first(),
        }
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.as_slice().iter()
    }

    pub fn as_slice(&self) -> &[T] {
        match self {
            Array::None => &[],
            Array::One(one) => std::slice::from_ref(one),
            Array::Many(many) => many.as_slice(),
        }
    }

    pub fn into_vec(self) -> Vec<T> {
        match self {
            Self::None => Vec::new(),
            Self::One(one) => Vec::from([one]),
            Self::Many(many) => many,
        }
    }
}

impl<T> From<Vec<T>> for Array<T> {
    fn from(mut value: Vec<T>) -> Self {
        match value.len() {
            0 => Self::None,
            1 => match value.pop() {
                Some(one) => Self::One(one),
                None => Self::None,
            },
            _ => Self::Many(value),
        }
    }
}

impl<T> IntoIterator for Array<T> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.into_vec().into_iter()
    }
}

impl<'a, T> IntoIterator for &'a Array<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

pub trait IntoBind {
    fn into_bind(self) -> Bind;
}

pub trait IntoBinds {
    fn into_binds(self) -> Binds;
}

impl<T> IntoBinds for T
where
    T: IntoBind,
{
    fn into_binds(self) -> Binds {
        Binds::One(self.into_bind())
    }
}

impl<T> IntoBinds for Vec<T>
where
    T: IntoBind,
{
    fn into_binds(self) -> Binds {
        Binds::from(self.into_iter().map(IntoBind::into_bind).collect::<Vec<_>>())
    }
}

impl<T> IntoBinds for &[T]
where
    T: IntoBind + Clone,
{
    fn into_binds(self) -> Binds {
        Binds::from(self.iter().cloned().map(IntoBind::into_bind).collect::<Vec<_>>())
    }
}

impl<T, const N: usize> IntoBinds for [T; N]
where
    T: IntoBind,
{
    fn into_binds(self) -> Binds {
        Binds::from(self.into_iter().map(IntoBind::into_bind).collect::<Vec<_>>())
    }
}

impl IntoBind for Bind {
    fn into_bind(self) -> Bind {
        self
    }
}

impl<T> IntoBind for Option<T>
where
    T: IntoBind,
{
    fn into_bind(self) -> Bind {
        if let Some(value) = self {
            value.into_bind()
        } else {
            Bind::Null
        }
    }
}

macro_rules! impl_scalar_bind {
    ($($ty:ty => $variant:ident),+ $(,)?) => {
        $(
            impl IntoBind for $ty {
                #[inline]
                fn into_bind(self) -> Bind {
                    Bind::$variant(self)
                }
            }

            impl From<$ty> for Bind {
                #[inline]
                fn from(value: $ty) -> Self {
                    Bind::$variant(value)
                }
            }
        )+
    };
}

impl_scalar_bind!(
    bool => Bool,
    f32 => F32,
    f64 => F64,
    i8 => I8,
    i16 => I16,
    i32 => I32,
    i64 => I64,
    u8 => U8,
    u16 => U16,
    u32 => U32,
    u64 => U64,
    String => String,
);

impl IntoBind for usize {
    fn into_bind(self) -> Bind {
        Bind::U64(self as u64)
    }
}

impl IntoBind for &str {
    fn into_bind(self) -> Bind {
        Bind::String(self.to_owned())
    }
}

impl From<&str> for Bind {
    fn from(value: &str) -> Self {
        Bind::String(value.to_owned())
    }
}

impl IntoBind for &String {
    fn into_bind(self) -> Bind {
        Bind::String(self.clone())
    }
}

impl IntoBind for SmolStr {
    fn into_bind(self) -> Bind {
        Bind::String(self.to_string())
    }
}

impl IntoBind for char {
    fn into_bind(self) -> Bind {
        Bind::String(self.to_string())
    }
}

#[cfg(feature = "chrono")]
mod chrono_binds {
    use super::{Bind, IntoBind};

    impl IntoBind for chrono::NaiveDate {
        fn into_bind(self) -> Bind {
            Bind::String(self.format("%Y-%m-%d").to_string())
        }
    }

    impl IntoBind for chrono::NaiveTime {
        fn into_bind(self) -> Bind {
            Bind::String(self.format("%H:%M:%S").to_string())
        }
    }

    impl IntoBind for chrono::NaiveDateTime {
        fn into_bind(self) -> Bind {
            Bind::String(self.format("%Y-%m-%d %H:%M:%S").to_string())
        }
    }

    impl IntoBind for chrono::DateTime<chrono::Utc> {
        fn into_bind(self) -> Bind {
            self.naive_utc().into_bind()
        }
    }
}

#[cfg(feature = "uuid")]
impl IntoBind for uuid::Uuid {
    fn into_bind(self) -> Bind {
        Bind::String(self.hyphenated().to_string())
    }
}
