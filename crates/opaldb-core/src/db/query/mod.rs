mod sort;
#[cfg(test)]
mod tests;
mod window;

use crate::{error::StoreError, value::Value};
use std::{cmp::Ordering, fmt, rc::Rc};

///
/// SortDirective
///
/// One link in a multi-key sort chain: the dotted property to compare,
/// direction, and optional case folding for text values.
///

#[derive(Clone, Debug, Eq, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct SortDirective {
    pub property: String,
    pub descending: bool,
    pub ignore_case: bool,
}

impl SortDirective {
    #[must_use]
    pub fn new(property: impl Into<String>) -> Self {
        Self {
            property: property.into(),
            descending: false,
            ignore_case: false,
        }
    }

    #[must_use]
    pub const fn descending(mut self) -> Self {
        self.descending = true;
        self
    }

    #[must_use]
    pub const fn ignore_case(mut self) -> Self {
        self.ignore_case = true;
        self
    }
}

///
/// SortSpec
///
/// Either a directive chain evaluated in order, or a caller comparator used
/// as-is.
///

#[derive(Clone)]
pub enum SortSpec {
    Directives(Vec<SortDirective>),
    Comparator(Rc<dyn Fn(&Value, &Value) -> Ordering>),
}

impl fmt::Debug for SortSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Directives(directives) => f.debug_tuple("Directives").field(directives).finish(),
            Self::Comparator(_) => f.write_str("Comparator(..)"),
        }
    }
}

///
/// Filter
///
/// Conjunction of property-equality clauses and an optional caller
/// predicate, applied before sorting.
///

#[derive(Clone, Default)]
pub struct Filter {
    clauses: Vec<(String, Value)>,
    predicate: Option<Rc<dyn Fn(&Value) -> bool>>,
}

impl Filter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Require `property == value`.
    #[must_use]
    pub fn eq(mut self, property: impl Into<String>, value: Value) -> Self {
        self.clauses.push((property.into(), value));
        self
    }

    /// Require an arbitrary predicate over the whole row.
    #[must_use]
    pub fn matching(mut self, predicate: impl Fn(&Value) -> bool + 'static) -> Self {
        self.predicate = Some(Rc::new(predicate));
        self
    }

    pub(crate) fn matches(&self, row: &Value) -> bool {
        let clauses_hold = self
            .clauses
            .iter()
            .all(|(property, expected)| row.get_path(property) == Some(expected));

        clauses_hold
            && self
                .predicate
                .as_ref()
                .is_none_or(|predicate| predicate(row))
    }
}

impl fmt::Debug for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Filter")
            .field("clauses", &self.clauses)
            .field("predicate", &self.predicate.as_ref().map(|_| ".."))
            .finish()
    }
}

///
/// QueryOptions
///
/// The query shape consumed by the engine: filter, sort, and a start/count
/// pagination window. `count` absent or zero means no limit.
///

#[derive(Clone, Debug, Default)]
pub struct QueryOptions {
    pub filter: Option<Filter>,
    pub sort: Option<SortSpec>,
    pub start: u32,
    pub count: Option<u32>,
}

impl QueryOptions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn filter(mut self, filter: Filter) -> Self {
        self.filter = Some(filter);
        self
    }

    #[must_use]
    pub fn sort_by(mut self, directives: Vec<SortDirective>) -> Self {
        self.sort = Some(SortSpec::Directives(directives));
        self
    }

    #[must_use]
    pub fn sort_with(mut self, comparator: impl Fn(&Value, &Value) -> Ordering + 'static) -> Self {
        self.sort = Some(SortSpec::Comparator(Rc::new(comparator)));
        self
    }

    #[must_use]
    pub const fn start(mut self, start: u32) -> Self {
        self.start = start;
        self
    }

    #[must_use]
    pub const fn count(mut self, count: u32) -> Self {
        self.count = Some(count);
        self
    }
}

/// Run a query over a materialized row set, in place.
///
/// Filter, then sort (skipped entirely when no directives are present), then
/// slice the pagination window. Destructive: callers needing the original
/// order must copy first.
pub fn apply(rows: &mut Vec<Value>, options: &QueryOptions) -> Result<(), StoreError> {
    if let Some(filter) = &options.filter {
        rows.retain(|row| filter.matches(row));
    }

    match &options.sort {
        Some(SortSpec::Directives(directives)) if !directives.is_empty() => {
            sort::validate_directives(directives)?;
            rows.sort_by(|a, b| sort::chained_cmp(directives, a, b));
        }
        Some(SortSpec::Comparator(comparator)) => {
            rows.sort_by(|a, b| comparator(a, b));
        }
        _ => {}
    }

    window::apply_window(rows, options.start, options.count);

    Ok(())
}
