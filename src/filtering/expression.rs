//! Storage-agnostic predicate tree and the compiler that builds it.
//!
//! [`compile`] turns a validated [`SearchRequest`] into a [`FilterExpression`].
//! The tree says nothing about SQL; `conditions` translates it for sea-orm and
//! [`FilterExpression::matches`] evaluates it against an in-memory record.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;

use crate::models::SearchRequest;
use crate::restaurant::Restaurant;

/// Catalog fields a predicate or a sort can refer to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    Name,
    City,
    Cuisine,
    AvgRating,
    PriceLevel,
    Tags,
    CreatedAt,
}

impl Field {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::City => "city",
            Self::Cuisine => "cuisine",
            Self::AvgRating => "avg_rating",
            Self::PriceLevel => "price_level",
            Self::Tags => "tags",
            Self::CreatedAt => "created_at",
        }
    }

    /// Whether the field holds a sequence of strings
    #[must_use]
    pub const fn is_array(self) -> bool {
        matches!(self, Self::Cuisine | Self::Tags)
    }

    fn value(self, record: &Restaurant) -> FieldValue<'_> {
        match self {
            Self::Name => FieldValue::Text(&record.name),
            Self::City => FieldValue::Text(&record.city),
            Self::Cuisine => FieldValue::List(&record.cuisine),
            Self::Tags => FieldValue::List(&record.tags),
            Self::AvgRating => FieldValue::Number(record.avg_rating),
            Self::PriceLevel => FieldValue::Number(f64::from(record.price_level)),
            Self::CreatedAt => FieldValue::Timestamp(record.created_at),
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

enum FieldValue<'a> {
    Text(&'a str),
    List(&'a [String]),
    Number(f64),
    Timestamp(DateTime<Utc>),
}

/// How a set predicate combines its values
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum SetMode {
    /// Every requested value must be present
    AllOf,
    /// At least one requested value must be present
    AnyOf,
}

/// Inclusive numeric bounds
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct RangeBounds {
    pub gte: Option<f64>,
    pub lte: Option<f64>,
}

impl RangeBounds {
    #[must_use]
    pub const fn gte(value: f64) -> Self {
        Self {
            gte: Some(value),
            lte: None,
        }
    }

    #[must_use]
    pub const fn lte(value: f64) -> Self {
        Self {
            gte: None,
            lte: Some(value),
        }
    }

    /// Overlay `other` onto these bounds; bounds `other` sets win
    #[must_use]
    pub fn merge(self, other: Self) -> Self {
        Self {
            gte: other.gte.or(self.gte),
            lte: other.lte.or(self.lte),
        }
    }

    #[must_use]
    pub fn contains(&self, value: f64) -> bool {
        self.gte.is_none_or(|min| value >= min) && self.lte.is_none_or(|max| value <= max)
    }
}

/// A predicate tree. `And(vec![])` is the identity filter.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum FilterExpression {
    /// Substring match of `pattern` against any of `fields`
    TextMatch {
        fields: Vec<Field>,
        pattern: String,
        case_insensitive: bool,
    },
    /// Exact, case-sensitive equality
    Equals { field: Field, value: String },
    /// Array field membership test
    SetIntersects {
        field: Field,
        values: Vec<String>,
        mode: SetMode,
    },
    Range { field: Field, bounds: RangeBounds },
    And(Vec<FilterExpression>),
}

impl FilterExpression {
    /// Filter that accepts every record
    #[must_use]
    pub const fn all() -> Self {
        Self::And(Vec::new())
    }

    #[must_use]
    pub fn is_identity(&self) -> bool {
        matches!(self, Self::And(children) if children.iter().all(Self::is_identity))
    }

    /// Evaluate against a single record
    #[must_use]
    pub fn matches(&self, record: &Restaurant) -> bool {
        match self {
            Self::TextMatch {
                fields,
                pattern,
                case_insensitive,
            } => {
                let needle = fold(pattern, *case_insensitive);
                fields.iter().any(|field| match field.value(record) {
                    FieldValue::Text(text) => fold(text, *case_insensitive).contains(&needle),
                    FieldValue::List(items) => items
                        .iter()
                        .any(|item| fold(item, *case_insensitive).contains(&needle)),
                    FieldValue::Number(_) | FieldValue::Timestamp(_) => false,
                })
            }
            Self::Equals { field, value } => match field.value(record) {
                FieldValue::Text(text) => text == value,
                FieldValue::List(items) => items.contains(value),
                FieldValue::Number(number) => value.parse::<f64>().is_ok_and(|v| v == number),
                FieldValue::Timestamp(at) => {
                    DateTime::parse_from_rfc3339(value).is_ok_and(|v| v == at)
                }
            },
            Self::SetIntersects {
                field,
                values,
                mode,
            } => {
                let present = |wanted: &String| match field.value(record) {
                    FieldValue::Text(text) => text == wanted,
                    FieldValue::List(items) => items.contains(wanted),
                    FieldValue::Number(_) | FieldValue::Timestamp(_) => false,
                };
                match mode {
                    SetMode::AllOf => values.iter().all(present),
                    SetMode::AnyOf => values.iter().any(present),
                }
            }
            Self::Range { field, bounds } => match field.value(record) {
                FieldValue::Number(number) => bounds.contains(number),
                FieldValue::Text(_) | FieldValue::List(_) | FieldValue::Timestamp(_) => false,
            },
            Self::And(children) => children.iter().all(|child| child.matches(record)),
        }
    }

    /// Node kinds and field names only, never the client's values.
    ///
    /// ```rust,ignore
    /// "and(text[name,tags], eq[city], range[avg_rating])"
    /// ```
    #[must_use]
    pub fn shape(&self) -> String {
        match self {
            Self::TextMatch { fields, .. } => format!("text[{}]", join_fields(fields)),
            Self::Equals { field, .. } => format!("eq[{field}]"),
            Self::SetIntersects { field, mode, .. } => match mode {
                SetMode::AllOf => format!("all_of[{field}]"),
                SetMode::AnyOf => format!("any_of[{field}]"),
            },
            Self::Range { field, .. } => format!("range[{field}]"),
            Self::And(children) if children.is_empty() => "all".to_string(),
            Self::And(children) => format!(
                "and({})",
                children
                    .iter()
                    .map(Self::shape)
                    .collect::<Vec<_>>()
                    .join(", ")
            ),
        }
    }
}

/// ASCII-only case folding, the same mapping SQLite's `UPPER` applies
fn fold(text: &str, case_insensitive: bool) -> String {
    if case_insensitive {
        text.to_ascii_uppercase()
    } else {
        text.to_string()
    }
}

fn join_fields(fields: &[Field]) -> String {
    fields
        .iter()
        .map(|field| field.as_str())
        .collect::<Vec<_>>()
        .join(",")
}

/// Fields free text is matched against
pub const TEXT_SEARCH_FIELDS: [Field; 2] = [Field::Name, Field::Tags];

/// Compile a validated request into its predicate tree.
///
/// Each present criterion contributes one predicate; numeric bounds on the same
/// field are merged into a single `Range`. Never fails.
#[must_use]
pub fn compile(request: &SearchRequest) -> FilterExpression {
    let mut predicates = Vec::new();

    if let Some(text) = request.text() {
        predicates.push(FilterExpression::TextMatch {
            fields: TEXT_SEARCH_FIELDS.to_vec(),
            pattern: text.to_string(),
            case_insensitive: true,
        });
    }

    if let Some(city) = request.city() {
        predicates.push(FilterExpression::Equals {
            field: Field::City,
            value: city.to_string(),
        });
    }

    if !request.cuisines().is_empty() {
        predicates.push(FilterExpression::SetIntersects {
            field: Field::Cuisine,
            values: request.cuisines().to_vec(),
            mode: SetMode::AllOf,
        });
    }

    let mut ranges: Vec<(Field, RangeBounds)> = Vec::new();
    let mut merge_range = |field: Field, bounds: RangeBounds| {
        match ranges.iter_mut().find(|(existing, _)| *existing == field) {
            Some((_, current)) => *current = current.merge(bounds),
            None => ranges.push((field, bounds)),
        }
    };
    if let Some(min_rating) = request.min_rating() {
        merge_range(Field::AvgRating, RangeBounds::gte(min_rating));
    }
    if let Some(max_price) = request.max_price() {
        merge_range(Field::PriceLevel, RangeBounds::lte(f64::from(max_price)));
    }
    predicates.extend(
        ranges
            .into_iter()
            .map(|(field, bounds)| FilterExpression::Range { field, bounds }),
    );

    FilterExpression::And(predicates)
}
