//! Declarative search parameter schema and the validator built on it.
//!
//! Every recognised parameter is listed once in [`SEARCH_SCHEMA`] with its
//! expected type, bounds and default. [`validate`] makes a single pass over
//! that table and over the received names, so "reject unknown parameters" and
//! "report every violation" fall out of the same loop.

use std::borrow::Cow;
use std::fmt;

use super::normalize::{self, RawQuery, RawValue};
use super::sort::SortToken;
use crate::models::SearchRequest;
use crate::validation::{ValidationError, ValidationErrors};

pub const DEFAULT_PAGE: u64 = 1;
pub const DEFAULT_LIMIT: u64 = 10;
pub const MAX_LIMIT: i64 = 50;

/// Recognised query parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SearchParam {
    Q,
    City,
    Cuisine,
    MinRating,
    MaxPrice,
    Sort,
    Page,
    Limit,
}

impl SearchParam {
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Q => "q",
            Self::City => "city",
            Self::Cuisine => "cuisine",
            Self::MinRating => "min_rating",
            Self::MaxPrice => "max_price",
            Self::Sort => "sort",
            Self::Page => "page",
            Self::Limit => "limit",
        }
    }

    /// Schema entry for a received parameter name, if it is recognised
    #[must_use]
    pub fn lookup(name: &str) -> Option<&'static ParamSpec> {
        SEARCH_SCHEMA.iter().find(|spec| spec.param.name() == name)
    }
}

impl fmt::Display for SearchParam {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Expected type and bounds of a parameter, together with the request field
/// a checked value is written to
#[derive(Clone, Copy)]
pub enum Rule {
    /// Trimmed string that must not be empty
    Text(fn(&mut SearchRequest, String)),
    /// Single, comma-joined or repeated strings
    List(fn(&mut SearchRequest, Vec<String>)),
    /// Inclusive numeric range
    Number {
        min: f64,
        max: f64,
        set: fn(&mut SearchRequest, f64),
    },
    /// Inclusive integer range, optionally open-ended
    Integer {
        min: i64,
        max: Option<i64>,
        set: fn(&mut SearchRequest, i64),
    },
    /// One of the whitelisted sort tokens
    Sort(fn(&mut SearchRequest, SortToken)),
}

impl fmt::Debug for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(_) => f.write_str("Text"),
            Self::List(_) => f.write_str("List"),
            Self::Number { min, max, .. } => write!(f, "Number({min}..={max})"),
            Self::Integer { min, max: Some(max), .. } => write!(f, "Integer({min}..={max})"),
            Self::Integer { min, max: None, .. } => write!(f, "Integer({min}..)"),
            Self::Sort(_) => f.write_str("Sort"),
        }
    }
}

impl Rule {
    /// Check `raw` and, if it passes, store the typed value in `request`
    fn apply(self, raw: &RawValue, request: &mut SearchRequest) -> Result<(), String> {
        match self {
            Self::Text(set) => {
                let text = scalar_text(raw);
                if text.is_empty() {
                    return Err("must not be empty".to_string());
                }
                set(request, text.to_string());
            }
            Self::List(set) => set(request, normalize::list(raw)),
            Self::Number { min, max, set } => {
                let value = normalize::number(scalar_text(raw))?;
                if value < min {
                    return Err(format!("must be greater than or equal to {min}"));
                }
                if value > max {
                    return Err(format!("must be less than or equal to {max}"));
                }
                set(request, value);
            }
            Self::Integer { min, max, set } => {
                let value = normalize::integer(scalar_text(raw))?;
                if value < min {
                    return Err(format!("must be greater than or equal to {min}"));
                }
                if let Some(max) = max.filter(|max| value > *max) {
                    return Err(format!("must be less than or equal to {max}"));
                }
                set(request, value);
            }
            Self::Sort(set) => set(request, scalar_text(raw).parse()?),
        }
        Ok(())
    }
}

fn scalar_text(raw: &RawValue) -> &str {
    normalize::scalar(raw).unwrap_or_default()
}

fn set_text(request: &mut SearchRequest, text: String) {
    request.text = Some(text);
}

fn set_city(request: &mut SearchRequest, city: String) {
    request.city = Some(city);
}

fn set_cuisines(request: &mut SearchRequest, cuisines: Vec<String>) {
    request.cuisines = cuisines;
}

fn set_min_rating(request: &mut SearchRequest, rating: f64) {
    request.min_rating = Some(rating);
}

// Bounded to 1..=5 by the rule
fn set_max_price(request: &mut SearchRequest, price: i64) {
    request.max_price = u8::try_from(price).ok();
}

fn set_sort(request: &mut SearchRequest, token: SortToken) {
    request.sort = token;
}

fn set_page(request: &mut SearchRequest, page: i64) {
    request.page = page.unsigned_abs();
}

fn set_limit(request: &mut SearchRequest, limit: i64) {
    request.limit = limit.unsigned_abs();
}

/// One row of the schema
#[derive(Debug, Clone, Copy)]
pub struct ParamSpec {
    pub param: SearchParam,
    pub rule: Rule,
    /// Raw value checked in place of an absent parameter
    pub default: Option<&'static str>,
}

/// The complete set of recognised parameters, in reporting order
pub static SEARCH_SCHEMA: [ParamSpec; 8] = [
    ParamSpec {
        param: SearchParam::Q,
        rule: Rule::Text(set_text),
        default: None,
    },
    ParamSpec {
        param: SearchParam::City,
        rule: Rule::Text(set_city),
        default: None,
    },
    ParamSpec {
        param: SearchParam::Cuisine,
        rule: Rule::List(set_cuisines),
        default: None,
    },
    ParamSpec {
        param: SearchParam::MinRating,
        rule: Rule::Number {
            min: 0.0,
            max: 5.0,
            set: set_min_rating,
        },
        default: None,
    },
    ParamSpec {
        param: SearchParam::MaxPrice,
        rule: Rule::Integer {
            min: 1,
            max: Some(5),
            set: set_max_price,
        },
        default: None,
    },
    ParamSpec {
        param: SearchParam::Sort,
        rule: Rule::Sort(set_sort),
        default: Some("-created_at"),
    },
    ParamSpec {
        param: SearchParam::Page,
        rule: Rule::Integer {
            min: 1,
            max: None,
            set: set_page,
        },
        default: Some("1"),
    },
    ParamSpec {
        param: SearchParam::Limit,
        rule: Rule::Integer {
            min: 1,
            max: Some(MAX_LIMIT),
            set: set_limit,
        },
        default: Some("10"),
    },
];

/// Validate raw query input into a [`SearchRequest`].
///
/// Every schema entry is checked against the received value, or against its
/// default when the parameter is absent; then every received name that the
/// schema does not know is reported. Present but invalid parameters are
/// reported, never defaulted.
///
/// # Errors
///
/// Returns all field violations, in schema order followed by unrecognised
/// names in order of first appearance.
pub fn validate(raw: &RawQuery) -> Result<SearchRequest, ValidationErrors> {
    let mut request = SearchRequest::default();
    let mut errors = ValidationErrors::new();

    for spec in &SEARCH_SCHEMA {
        let name = spec.param.name();
        let value = match (raw.get(name), spec.default) {
            (Some(value), _) => Cow::Borrowed(value),
            (None, Some(default)) => Cow::Owned(RawValue::from(default)),
            (None, None) => continue,
        };
        if let Err(message) = spec.rule.apply(&value, &mut request) {
            errors.add(ValidationError::new(name, message));
        }
    }

    for name in raw.names() {
        if SearchParam::lookup(name).is_none() {
            errors.add(ValidationError::new(name, "is not allowed"));
        }
    }

    errors.result().map(|()| request)
}
