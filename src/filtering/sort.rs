use serde::Serialize;
use std::fmt;
use std::str::FromStr;

use super::expression::Field;

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Direction {
    Ascending,
    Descending,
}

/// Resolved ordering for a search: one catalog field and a direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct SortSpec {
    pub field: Field,
    pub direction: Direction,
}

impl fmt::Display for SortSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let direction = match self.direction {
            Direction::Ascending => "asc",
            Direction::Descending => "desc",
        };
        write!(f, "{} {direction}", self.field)
    }
}

/// Whitelisted `sort` tokens. A leading `-` means descending.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SortToken {
    Rating,
    RatingDesc,
    Price,
    PriceDesc,
    Name,
    NameDesc,
    CreatedAt,
    /// Newest first
    #[default]
    CreatedAtDesc,
}

const SORT_TOKENS: [(&str, SortToken); 8] = [
    ("rating", SortToken::Rating),
    ("-rating", SortToken::RatingDesc),
    ("price", SortToken::Price),
    ("-price", SortToken::PriceDesc),
    ("name", SortToken::Name),
    ("-name", SortToken::NameDesc),
    ("created_at", SortToken::CreatedAt),
    ("-created_at", SortToken::CreatedAtDesc),
];

impl SortToken {
    /// Look a token up in the whitelist; anything else is `None`
    #[must_use]
    pub fn parse(token: &str) -> Option<Self> {
        SORT_TOKENS
            .iter()
            .find(|&&(name, _)| name == token)
            .map(|&(_, sort)| sort)
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        SORT_TOKENS
            .iter()
            .find(|&&(_, sort)| sort == self)
            .map_or("-created_at", |&(name, _)| name)
    }

    /// Map the token to the field and direction it stands for
    #[must_use]
    pub const fn resolve(self) -> SortSpec {
        let (field, direction) = match self {
            Self::Rating => (Field::AvgRating, Direction::Ascending),
            Self::RatingDesc => (Field::AvgRating, Direction::Descending),
            Self::Price => (Field::PriceLevel, Direction::Ascending),
            Self::PriceDesc => (Field::PriceLevel, Direction::Descending),
            Self::Name => (Field::Name, Direction::Ascending),
            Self::NameDesc => (Field::Name, Direction::Descending),
            Self::CreatedAt => (Field::CreatedAt, Direction::Ascending),
            Self::CreatedAtDesc => (Field::CreatedAt, Direction::Descending),
        };
        SortSpec { field, direction }
    }

    /// Comma-separated whitelist, in table order, for error messages
    #[must_use]
    pub fn whitelist() -> String {
        SORT_TOKENS
            .iter()
            .map(|&(name, _)| name)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl FromStr for SortToken {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("must be one of {}", Self::whitelist()))
    }
}

impl fmt::Display for SortToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Resolve an optional raw token. Absent means the default (`-created_at`).
///
/// # Errors
///
/// Returns the field message when the token is not whitelisted.
pub fn resolve_sort(token: Option<&str>) -> Result<SortSpec, String> {
    token
        .map_or(Ok(SortToken::default()), str::parse::<SortToken>)
        .map(SortToken::resolve)
}
