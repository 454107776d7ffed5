pub mod cond;
pub mod date;
pub mod fncall;
pub mod order;

pub use cond::{Condition, Conditions, Conjunction, WhereClause};
pub use date::DateUnit;
pub use fncall::{Aggregate, AggregateFunction};
pub use order::{IntoOrdering, OrderBy, Ordering};
