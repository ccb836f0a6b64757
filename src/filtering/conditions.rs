use sea_orm::{
    Condition, DatabaseBackend, Order,
    sea_query::{Alias, Expr, Func, SimpleExpr},
};

use super::expression::{Field, FilterExpression, RangeBounds, SetMode};
use super::sort::{Direction, SortSpec};
use crate::restaurant::{Column, Entity, encoded_element};

/// Escape character for LIKE patterns. Not a backslash, so the same SQL text is
/// valid on every backend regardless of string-literal escaping rules.
const LIKE_ESCAPE: char = '!';

/// Escape LIKE wildcards so the pattern is matched literally
/// Escapes: % (match any) and _ (match single char)
fn escape_like_wildcards(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for c in input.chars() {
        if matches!(c, LIKE_ESCAPE | '%' | '_') {
            escaped.push(LIKE_ESCAPE);
        }
        escaped.push(c);
    }
    escaped
}

/// `%value%` with wildcards escaped
fn contains_pattern(value: &str) -> String {
    format!("%{}%", escape_like_wildcards(value))
}

/// Rewrite `$N` placeholders for backends that bind with `?`.
/// Templates number their placeholders in order of appearance.
fn bind_placeholders(template: &str, backend: DatabaseBackend) -> String {
    match backend {
        DatabaseBackend::Postgres => template.to_string(),
        _ => template.replace("$1", "?").replace("$2", "?"),
    }
}

/// Table column backing a catalog field
#[must_use]
pub const fn column(field: Field) -> Column {
    match field {
        Field::Name => Column::Name,
        Field::City => Column::City,
        Field::Cuisine => Column::Cuisine,
        Field::AvgRating => Column::AvgRating,
        Field::PriceLevel => Column::PriceLevel,
        Field::Tags => Column::Tags,
        Field::CreatedAt => Column::CreatedAt,
    }
}

#[must_use]
pub const fn order(direction: Direction) -> Order {
    match direction {
        Direction::Ascending => Order::Asc,
        Direction::Descending => Order::Desc,
    }
}

/// Primary ordering column and direction for a resolved sort
#[must_use]
pub const fn sort_order(spec: &SortSpec) -> (Column, Order) {
    (column(spec.field), order(spec.direction))
}

/// Substring match on a scalar column.
///
/// Case-insensitive matching folds both sides in the database,
/// `UPPER(column) LIKE UPPER('%value%') ESCAPE '!'`, so the column and the
/// pattern always get the same case mapping.
#[must_use]
pub fn build_like_condition(
    field: Field,
    value: &str,
    case_insensitive: bool,
    backend: DatabaseBackend,
) -> SimpleExpr {
    let template = if case_insensitive {
        "UPPER($1) LIKE UPPER($2) ESCAPE '!'"
    } else {
        "$1 LIKE $2 ESCAPE '!'"
    };
    Expr::cust_with_exprs(
        bind_placeholders(template, backend),
        [
            Expr::col((Entity, column(field))).into(),
            Expr::val(contains_pattern(value)).into(),
        ],
    )
}

/// Substring match against each element of an array column.
///
/// The stored JSON array is unpacked by the database, so the pattern never
/// sees brackets, quotes, commas or escape sequences of the encoding.
#[must_use]
pub fn build_element_like_condition(
    field: Field,
    value: &str,
    case_insensitive: bool,
    backend: DatabaseBackend,
) -> SimpleExpr {
    let compare = if case_insensitive {
        "UPPER(elements.value) LIKE UPPER($2) ESCAPE '!'"
    } else {
        "elements.value LIKE $2 ESCAPE '!'"
    };
    let source = match backend {
        DatabaseBackend::Postgres => "json_array_elements_text(CAST($1 AS json)) AS elements(value)",
        DatabaseBackend::MySql => {
            "JSON_TABLE($1, '$[*]' COLUMNS (value TEXT PATH '$')) AS elements"
        }
        _ => "json_each($1) AS elements",
    };
    let template = format!("EXISTS (SELECT 1 FROM {source} WHERE {compare})");
    Expr::cust_with_exprs(
        bind_placeholders(&template, backend),
        [
            Expr::col((Entity, column(field))).into(),
            Expr::val(contains_pattern(value)).into(),
        ],
    )
}

/// Free-text predicate for one field, per element on array fields
#[must_use]
pub fn build_text_condition(
    field: Field,
    value: &str,
    case_insensitive: bool,
    backend: DatabaseBackend,
) -> SimpleExpr {
    if field.is_array() {
        build_element_like_condition(field, value, case_insensitive, backend)
    } else {
        build_like_condition(field, value, case_insensitive, backend)
    }
}

/// Case-sensitive "array column contains exactly this element".
///
/// Looks for the JSON-encoded element (quotes included) inside the encoded
/// array, so `"thai"` never matches `"thai-fusion"`.
#[must_use]
pub fn build_element_condition(field: Field, value: &str, backend: DatabaseBackend) -> SimpleExpr {
    let function = match backend {
        DatabaseBackend::Postgres => "strpos",
        _ => "instr",
    };
    let call = Func::cust(Alias::new(function))
        .arg(Expr::col(column(field)))
        .arg(Expr::val(encoded_element(value)));
    Expr::expr(call).gt(0)
}

fn build_range_condition(field: Field, bounds: RangeBounds) -> Condition {
    let mut condition = Condition::all();
    if let Some(min) = bounds.gte {
        condition = condition.add(Expr::col(column(field)).gte(min));
    }
    if let Some(max) = bounds.lte {
        condition = condition.add(Expr::col(column(field)).lte(max));
    }
    condition
}

/// Translate a compiled filter into a sea-orm condition.
///
/// `And(vec![])` becomes an empty `Condition::all()`, which sea-orm renders as
/// no WHERE clause at all.
#[must_use]
pub fn build_condition(filter: &FilterExpression, backend: DatabaseBackend) -> Condition {
    match filter {
        FilterExpression::TextMatch {
            fields,
            pattern,
            case_insensitive,
        } => fields.iter().fold(Condition::any(), |any, field| {
            any.add(build_text_condition(*field, pattern, *case_insensitive, backend))
        }),
        FilterExpression::Equals { field, value } => {
            Condition::all().add(Expr::col(column(*field)).eq(value.clone()))
        }
        FilterExpression::SetIntersects {
            field,
            values,
            mode,
        } => {
            let base = match mode {
                SetMode::AllOf => Condition::all(),
                SetMode::AnyOf => Condition::any(),
            };
            values.iter().fold(base, |condition, value| {
                condition.add(build_element_condition(*field, value, backend))
            })
        }
        FilterExpression::Range { field, bounds } => build_range_condition(*field, *bounds),
        FilterExpression::And(children) => children
            .iter()
            .fold(Condition::all(), |all, child| {
                all.add(build_condition(child, backend))
            }),
    }
}
