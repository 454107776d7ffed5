use smol_str::SmolStr;

use crate::{Error, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operator {
    Eq,
    NotEq,
    Lt,
    Lte,
    Gt,
    Gte,
    Like,
    NotLike,
    Ilike,
    NotIlike,
    Regexp,
    NotRegexp,
    In,
    NotIn,
    Is,
    IsNot,
    /// Any other operator, trimmed and lowercased. Rendered verbatim.
    Unknown(SmolStr),
}

impl Operator {
    pub fn parse(value: &str) -> Self {
        let value = value.trim().to_ascii_lowercase();
        match value.as_str() {
            "=" => Operator::Eq,
            "!=" | "<>" => Operator::NotEq,
            "<" => Operator::Lt,
            "<=" => Operator::Lte,
            ">" => Operator::Gt,
            ">=" => Operator::Gte,
            "like" => Operator::Like,
            "not like" => Operator::NotLike,
            "ilike" => Operator::Ilike,
            "not ilike" => Operator::NotIlike,
            "regexp" => Operator::Regexp,
            "not regexp" => Operator::NotRegexp,
            "in" => Operator::In,
            "not in" => Operator::NotIn,
            "is" => Operator::Is,
            "is not" => Operator::IsNot,
            _ => Operator::Unknown(SmolStr::new(&value)),
        }
    }

    /// Sql text of the operator. Neither grammar has `ilike`, so it folds
    /// into `like`. Other operators are written as given, unless they are
    /// empty or carry a `?` that would shift the placeholders.
    pub fn as_sql(&self) -> Result<&str> {
        let sql = match self {
            Operator::Eq => "=",
            Operator::NotEq => "!=",
            Operator::Lt => "<",
            Operator::Lte => "<=",
            Operator::Gt => ">",
            Operator::Gte => ">=",
            Operator::Like | Operator::Ilike => "like",
            Operator::NotLike | Operator::NotIlike => "not like",
            Operator::Regexp => "regexp",
            Operator::NotRegexp => "not regexp",
            Operator::In => "in",
            Operator::NotIn => "not in",
            Operator::Is => "is",
            Operator::IsNot => "is not",
            Operator::Unknown(op) if op.is_empty() => {
                return Err(Error::invalid_argument("empty operator"));
            }
            Operator::Unknown(op) if op.contains('?') => {
                return Err(Error::invalid_argument(format!("operator `{op}` contains a placeholder")));
            }
            Operator::Unknown(op) => op.as_str(),
        };
        Ok(sql)
    }

    pub fn is_list(&self) -> bool {
        matches!(self, Operator::In | Operator::NotIn)
    }
}

pub trait IntoOperator {
    fn into_operator(self) -> Operator;
}

impl IntoOperator for Operator {
    fn into_operator(self) -> Operator {
        self
    }
}

impl IntoOperator for &str {
    fn into_operator(self) -> Operator {
        Operator::parse(self)
    }
}

impl IntoOperator for String {
    fn into_operator(self) -> Operator {
        Operator::parse(&self)
    }
}

impl IntoOperator for char {
    fn into_operator(self) -> Operator {
        let mut buf = [0; 4];
        Operator::parse(self.encode_utf8(&mut buf))
    }
}
