//! Store-agnostic query model.
//!
//! A [`Filter`] is a conjunction of per-field conditions and of
//! alternative groups, each satisfied when any member holds. Adapters translate
//! it into their native query language; the in-memory store evaluates it
//! directly through [`Filter::matches`].

use std::cmp::Ordering;

use serde_json::{Map, Value};

/// Schemaless document body as exchanged with the document store.
pub type Document = Map<String, Value>;

/// Condition applied to a single document field.
#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    /// Field equals the given JSON value.
    Equals(Value),
    /// Field is a string containing the needle, ignoring case.
    Contains(String),
    /// Field is a number within the inclusive bounds.
    Range {
        /// Lower bound, if any.
        min: Option<f64>,
        /// Upper bound, if any.
        max: Option<f64>,
    },
}

impl Condition {
    fn accepts(&self, value: Option<&Value>) -> bool {
        match (self, value) {
            (Self::Equals(expected), Some(actual)) => expected == actual,
            (Self::Contains(needle), Some(Value::String(haystack))) => haystack
                .to_lowercase()
                .contains(needle.to_lowercase().as_str()),
            (Self::Range { min, max }, Some(actual)) => actual.as_f64().is_some_and(|number| {
                min.is_none_or(|bound| number >= bound) && max.is_none_or(|bound| number <= bound)
            }),
            _ => false,
        }
    }
}

/// A condition bound to the field it applies to.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldCondition {
    /// Top-level document field name.
    pub field: String,
    /// Condition the field must satisfy.
    pub condition: Condition,
}

/// Conjunction of field conditions and alternative groups. The empty filter
/// matches everything.
///
/// # Examples
/// ```
/// use backend::domain::Filter;
/// use serde_json::json;
///
/// let filter = Filter::new()
///     .equals("zona", json!("ZC1"))
///     .range("area", Some(100.0), None);
/// let doc = json!({ "zona": "ZC1", "area": 250.0 });
/// assert!(filter.matches(doc.as_object().expect("object")));
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Filter {
    conditions: Vec<FieldCondition>,
    alternatives: Vec<Vec<FieldCondition>>,
}

impl Filter {
    /// Create an empty filter.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Require an exact match on `field`.
    #[must_use]
    pub fn equals(self, field: impl Into<String>, value: Value) -> Self {
        self.with(field, Condition::Equals(value))
    }

    /// Require `field` to contain `needle`, case-insensitively.
    #[must_use]
    pub fn contains(self, field: impl Into<String>, needle: impl Into<String>) -> Self {
        self.with(field, Condition::Contains(needle.into()))
    }

    /// Require `field` to fall within the inclusive range. A range with no
    /// bounds is ignored.
    #[must_use]
    pub fn range(self, field: impl Into<String>, min: Option<f64>, max: Option<f64>) -> Self {
        if min.is_none() && max.is_none() {
            return self;
        }
        self.with(field, Condition::Range { min, max })
    }

    /// Require at least one of `fields` to contain `needle`, ignoring case.
    /// An empty field list is ignored.
    #[must_use]
    pub fn contains_any(mut self, fields: &[&str], needle: &str) -> Self {
        if fields.is_empty() {
            return self;
        }
        let group = fields
            .iter()
            .map(|field| FieldCondition {
                field: (*field).to_owned(),
                condition: Condition::Contains(needle.to_owned()),
            })
            .collect();
        self.alternatives.push(group);
        self
    }

    fn with(mut self, field: impl Into<String>, condition: Condition) -> Self {
        self.conditions.push(FieldCondition {
            field: field.into(),
            condition,
        });
        self
    }

    /// Conditions in insertion order.
    pub fn conditions(&self) -> &[FieldCondition] {
        &self.conditions
    }

    /// Alternative groups; each must have at least one accepting member.
    pub fn alternatives(&self) -> &[Vec<FieldCondition>] {
        &self.alternatives
    }

    /// Whether the filter has no conditions.
    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty() && self.alternatives.is_empty()
    }

    /// Evaluate the filter against a document body.
    pub fn matches(&self, document: &Document) -> bool {
        let accepts = |c: &FieldCondition| c.condition.accepts(document.get(&c.field));
        self.conditions.iter().all(accepts)
            && self
                .alternatives
                .iter()
                .all(|group| group.iter().any(accepts))
    }
}

/// Sort direction for [`SortKey`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    /// Smallest first.
    Ascending,
    /// Largest first.
    Descending,
}

/// Single-field ordering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortKey {
    /// Field to order by.
    pub field: String,
    /// Ordering direction.
    pub direction: SortDirection,
}

impl SortDirection {
    /// Orient an ascending comparison in this direction.
    #[must_use]
    pub fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            Self::Ascending => ordering,
            Self::Descending => ordering.reverse(),
        }
    }
}

impl SortKey {
    /// Order by `field`, largest first.
    pub fn descending(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            direction: SortDirection::Descending,
        }
    }

    /// Compare two documents by this key. Missing fields sort lowest; ties
    /// compare equal, so stores break them on their own insertion order.
    pub fn compare(&self, left: &Document, right: &Document) -> Ordering {
        self.direction
            .apply(compare_values(left.get(&self.field), right.get(&self.field)))
    }
}

fn compare_values(left: Option<&Value>, right: Option<&Value>) -> Ordering {
    match (left, right) {
        (None | Some(Value::Null), None | Some(Value::Null)) => Ordering::Equal,
        (Some(Value::String(a)), Some(Value::String(b))) => a.cmp(b),
        (Some(Value::Number(a)), Some(Value::Number(b))) => a
            .as_f64()
            .partial_cmp(&b.as_f64())
            .unwrap_or(Ordering::Equal),
        (None | Some(Value::Null), Some(_)) => Ordering::Less,
        (Some(_), None | Some(Value::Null)) => Ordering::Greater,
        _ => Ordering::Equal,
    }
}

/// Result window for `find_many` calls.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FindWindow {
    /// Optional ordering applied before skipping.
    pub sort: Option<SortKey>,
    /// Number of matching documents to skip.
    pub skip: u64,
    /// Maximum number of documents to return; `None` returns all.
    pub limit: Option<u64>,
}

impl FindWindow {
    /// Every matching document in the given order.
    pub fn all(sort: SortKey) -> Self {
        Self {
            sort: Some(sort),
            skip: 0,
            limit: None,
        }
    }

    /// A page of matching documents in the given order.
    pub fn page(sort: SortKey, skip: u64, limit: u64) -> Self {
        Self {
            sort: Some(sort),
            skip,
            limit: Some(limit),
        }
    }
}
