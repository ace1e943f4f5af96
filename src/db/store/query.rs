//! Ordered, limited, cursored queries
//!
//! Ordering follows the usual document-store type ranking:
//! null/missing < bool < number < string < array < object.
//! Ties on the order field break by document id in the same direction, so
//! every query has a total order and a cursor position is unambiguous.

use std::cmp::Ordering;

use serde_json::Value;

use super::{field_value, Snapshot};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Ascending,
    Descending,
}

impl Direction {
    fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            Direction::Ascending => ordering,
            Direction::Descending => ordering.reverse(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderBy {
    /// Field path, dots address nested fields
    pub field: String,
    pub direction: Direction,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Query {
    pub order_by: OrderBy,
    pub limit: Option<usize>,
    /// Resume strictly after this document's position
    pub start_after: Option<Snapshot>,
}

impl Query {
    pub fn order_by(field: impl Into<String>, direction: Direction) -> Self {
        Self {
            order_by: OrderBy {
                field: field.into(),
                direction,
            },
            limit: None,
            start_after: None,
        }
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn start_after(mut self, cursor: Snapshot) -> Self {
        self.start_after = Some(cursor);
        self
    }
}

fn type_rank(value: Option<&Value>) -> u8 {
    match value {
        None | Some(Value::Null) => 0,
        Some(Value::Bool(_)) => 1,
        Some(Value::Number(_)) => 2,
        Some(Value::String(_)) => 3,
        Some(Value::Array(_)) => 4,
        Some(Value::Object(_)) => 5,
    }
}

/// Total order over wire values; a missing field sorts like null
pub fn compare_values(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    let rank = type_rank(a).cmp(&type_rank(b));
    if rank != Ordering::Equal {
        return rank;
    }
    match (a, b) {
        (Some(Value::Bool(x)), Some(Value::Bool(y))) => x.cmp(y),
        (Some(Value::Number(x)), Some(Value::Number(y))) => {
            let x = x.as_f64().unwrap_or(f64::NAN);
            let y = y.as_f64().unwrap_or(f64::NAN);
            x.total_cmp(&y)
        }
        (Some(Value::String(x)), Some(Value::String(y))) => x.cmp(y),
        (Some(Value::Array(x)), Some(Value::Array(y))) => x
            .iter()
            .zip(y.iter())
            .map(|(l, r)| compare_values(Some(l), Some(r)))
            .find(|o| *o != Ordering::Equal)
            .unwrap_or_else(|| x.len().cmp(&y.len())),
        (Some(Value::Object(x)), Some(Value::Object(y))) => x
            .iter()
            .zip(y.iter())
            .map(|((lk, lv), (rk, rv))| lk.cmp(rk).then_with(|| compare_values(Some(lv), Some(rv))))
            .find(|o| *o != Ordering::Equal)
            .unwrap_or_else(|| x.len().cmp(&y.len())),
        _ => Ordering::Equal,
    }
}

fn compare_position(a: &Snapshot, b: &Snapshot, order_by: &OrderBy) -> Ordering {
    let by_field = compare_values(
        field_value(&a.data, &order_by.field),
        field_value(&b.data, &order_by.field),
    )
    .then_with(|| a.id.cmp(&b.id));
    order_by.direction.apply(by_field)
}

impl Query {
    /// Whether `doc` lies strictly after the cursor, if there is one
    pub(crate) fn admits(&self, doc: &Snapshot) -> bool {
        match &self.start_after {
            Some(cursor) => compare_position(doc, cursor, &self.order_by) == Ordering::Greater,
            None => true,
        }
    }
}

/// Order `docs` and keep the first `limit`.
///
/// Only the kept documents are fully sorted; the rest are partitioned away.
pub(crate) fn take_ordered(mut docs: Vec<Snapshot>, query: &Query) -> Vec<Snapshot> {
    let by_position = |a: &Snapshot, b: &Snapshot| compare_position(a, b, &query.order_by);
    match query.limit {
        Some(0) => return Vec::new(),
        Some(limit) if limit < docs.len() => {
            docs.select_nth_unstable_by(limit - 1, by_position);
            docs.truncate(limit);
        }
        _ => {}
    }
    docs.sort_by(by_position);
    docs
}

/// Evaluate a query over a full, unordered collection read
pub(crate) fn run_query(docs: Vec<Snapshot>, query: &Query) -> Vec<Snapshot> {
    let docs = docs.into_iter().filter(|doc| query.admits(doc)).collect();
    take_ordered(docs, query)
}
