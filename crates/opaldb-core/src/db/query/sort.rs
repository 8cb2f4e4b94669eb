use crate::{
    db::query::SortDirective,
    error::{ErrorOrigin, StoreError},
    value::{Value, compare::canonical_cmp},
};
use std::cmp::Ordering;

/// Reject directives that cannot address a property.
pub(crate) fn validate_directives(directives: &[SortDirective]) -> Result<(), StoreError> {
    for directive in directives {
        if directive.property.is_empty() {
            return Err(StoreError::data(
                ErrorOrigin::Query,
                "sort directive has an empty property",
            ));
        }
    }

    Ok(())
}

/// Evaluate the directive chain in order, falling through on equality.
pub(crate) fn chained_cmp(directives: &[SortDirective], left: &Value, right: &Value) -> Ordering {
    for directive in directives {
        let cmp = directive_cmp(directive, left, right);
        if cmp != Ordering::Equal {
            return cmp;
        }
    }

    Ordering::Equal
}

// Missing properties and explicit nulls rank greater than any defined value;
// `descending` inverts the whole sense, nulls included.
fn directive_cmp(directive: &SortDirective, left: &Value, right: &Value) -> Ordering {
    let left = defined(left.get_path(&directive.property));
    let right = defined(right.get_path(&directive.property));

    let cmp = match (left, right) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Greater,
        (Some(_), None) => Ordering::Less,
        (Some(left), Some(right)) => property_cmp(directive, left, right),
    };

    if directive.descending { cmp.reverse() } else { cmp }
}

const fn defined(value: Option<&Value>) -> Option<&Value> {
    match value {
        Some(Value::Null) | None => None,
        defined => defined,
    }
}

fn property_cmp(directive: &SortDirective, left: &Value, right: &Value) -> Ordering {
    if directive.ignore_case
        && let (Value::Text(left), Value::Text(right)) = (left, right)
    {
        return left.to_lowercase().cmp(&right.to_lowercase());
    }

    canonical_cmp(left, right)
}
