//! Parameter normalisation
//!
//! Query strings are loosely typed: a parameter may be missing, appear once,
//! appear several times, or carry a comma-joined list. Everything in this
//! module turns that raw input into one canonical shape before any validation
//! rule looks at it.

use indexmap::{IndexMap, map::Entry};

/// Largest integer that survives a round-trip through an IEEE-754 double.
pub const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_991.0;

/// Separator accepted inside a single list-valued parameter
const LIST_SEPARATOR: char = ',';

/// A parameter value exactly as it was received
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawValue {
    /// The parameter appeared once
    Single(String),
    /// The parameter was repeated (`?a=1&a=2`)
    Many(Vec<String>),
}

impl RawValue {
    /// First received value. Scalars resolve repeated input with this policy.
    #[must_use]
    pub fn first(&self) -> Option<&str> {
        match self {
            Self::Single(value) => Some(value.as_str()),
            Self::Many(values) => values.first().map(String::as_str),
        }
    }

    fn push(&mut self, value: String) {
        match self {
            Self::Single(existing) => {
                let first = std::mem::take(existing);
                *self = Self::Many(vec![first, value]);
            }
            Self::Many(values) => values.push(value),
        }
    }
}

impl From<&str> for RawValue {
    fn from(value: &str) -> Self {
        Self::Single(value.to_string())
    }
}

impl From<String> for RawValue {
    fn from(value: String) -> Self {
        Self::Single(value)
    }
}

impl From<Vec<String>> for RawValue {
    fn from(values: Vec<String>) -> Self {
        Self::Many(values)
    }
}

impl From<Vec<&str>> for RawValue {
    fn from(values: Vec<&str>) -> Self {
        Self::Many(values.into_iter().map(str::to_string).collect())
    }
}

/// Mapping from parameter name to raw value, in order of first appearance
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawQuery {
    params: IndexMap<String, RawValue>,
}

impl RawQuery {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode an `application/x-www-form-urlencoded` query string.
    ///
    /// Repeated names are collected into [`RawValue::Many`]; `+` and
    /// percent-escapes are decoded.
    #[must_use]
    pub fn from_query_string(query: &str) -> Self {
        let mut raw = Self::new();
        for (name, value) in url::form_urlencoded::parse(query.as_bytes()) {
            raw.push(name.into_owned(), value.into_owned());
        }
        raw
    }

    /// Record one occurrence of `name`
    pub fn push(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let value = value.into();
        match self.params.entry(name.into()) {
            Entry::Occupied(mut entry) => entry.get_mut().push(value),
            Entry::Vacant(entry) => {
                entry.insert(RawValue::Single(value));
            }
        }
    }

    /// Replace whatever was recorded for `name`
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<RawValue>) {
        self.params.insert(name.into(), value.into());
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&RawValue> {
        self.params.get(name)
    }

    /// Parameter names in order of first appearance
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.params.keys().map(String::as_str)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.params.len()
    }
}

impl<K, V> FromIterator<(K, V)> for RawQuery
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut raw = Self::new();
        for (name, value) in iter {
            raw.push(name, value);
        }
        raw
    }
}

/// Scalar policy: a repeated scalar resolves to its first value, trimmed.
#[must_use]
pub fn scalar(raw: &RawValue) -> Option<&str> {
    raw.first().map(str::trim)
}

/// Normalise a list-valued parameter into an ordered sequence.
///
/// - a single value without a comma becomes a one-element sequence
/// - a single comma-joined value is split on `,`
/// - a repeated parameter keeps one element per occurrence
///
/// Every element is trimmed and empty elements are dropped. Duplicates and
/// order of first appearance are preserved.
#[must_use]
pub fn list(raw: &RawValue) -> Vec<String> {
    let parts: Vec<&str> = match raw {
        RawValue::Single(value) => value.split(LIST_SEPARATOR).collect(),
        RawValue::Many(values) => values.iter().map(String::as_str).collect(),
    };

    parts
        .into_iter()
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(str::to_string)
        .collect()
}

/// Coerce numeric text into a finite, safe number.
///
/// # Errors
///
/// Returns the field message for non-numeric, non-finite or unsafe input.
pub fn number(text: &str) -> Result<f64, &'static str> {
    let value: f64 = text.trim().parse().map_err(|_| "must be a number")?;
    if !value.is_finite() {
        return Err("must be a number");
    }
    if value.abs() > MAX_SAFE_INTEGER {
        return Err("must be a safe number");
    }
    Ok(value)
}

/// Coerce numeric text into an integer. Integral decimals (`3.0`) are accepted.
///
/// # Errors
///
/// Returns the field message for anything [`number`] rejects, and for
/// fractional values.
#[allow(clippy::cast_possible_truncation)]
pub fn integer(text: &str) -> Result<i64, &'static str> {
    let value = number(text)?;
    if value.fract() != 0.0 {
        return Err("must be an integer");
    }
    // Bounded by MAX_SAFE_INTEGER, so the cast is exact.
    Ok(value as i64)
}
