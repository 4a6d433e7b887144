//! The closed set of spending categories the classifier can predict.
//!
//! Shared as a contract with the request layer: any label outside this set
//! is rejected before it can reach the feedback ledger or a training run.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::CategoryError;

/// A spending-category identifier, serialized as its kebab-case slug.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CategorySlug {
    FoodDining,
    Transport,
    Social,
    Entertainment,
    Utilities,
    Health,
    Education,
    Clothing,
    RentHousing,
    Savings,
    Income,
    Other,
}

impl CategorySlug {
    /// Every category, in declaration order.
    pub const ALL: [CategorySlug; 12] = [
        CategorySlug::FoodDining,
        CategorySlug::Transport,
        CategorySlug::Social,
        CategorySlug::Entertainment,
        CategorySlug::Utilities,
        CategorySlug::Health,
        CategorySlug::Education,
        CategorySlug::Clothing,
        CategorySlug::RentHousing,
        CategorySlug::Savings,
        CategorySlug::Income,
        CategorySlug::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::FoodDining => "food-dining",
            Self::Transport => "transport",
            Self::Social => "social",
            Self::Entertainment => "entertainment",
            Self::Utilities => "utilities",
            Self::Health => "health",
            Self::Education => "education",
            Self::Clothing => "clothing",
            Self::RentHousing => "rent-housing",
            Self::Savings => "savings",
            Self::Income => "income",
            Self::Other => "other",
        }
    }

    /// Returns true if `slug` names a member of the enumeration.
    pub fn is_valid(slug: &str) -> bool {
        slug.parse::<CategorySlug>().is_ok()
    }

    /// Sorted list of every slug string, for error messages.
    pub fn valid_slugs() -> Vec<&'static str> {
        let mut slugs: Vec<&'static str> = Self::ALL.iter().map(|c| c.as_str()).collect();
        slugs.sort_unstable();
        slugs
    }
}

impl fmt::Display for CategorySlug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CategorySlug {
    type Err = CategoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| CategoryError::UnknownSlug {
                slug: s.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_display_agree_for_every_slug() {
        for slug in CategorySlug::ALL {
            assert_eq!(slug.as_str().parse::<CategorySlug>().unwrap(), slug);
            assert_eq!(slug.to_string(), slug.as_str());
        }
    }

    #[test]
    fn unknown_slug_rejected() {
        let err = "not-a-real-slug".parse::<CategorySlug>().unwrap_err();
        assert!(err.to_string().contains("not-a-real-slug"));
        assert!(!CategorySlug::is_valid("Food-Dining"));
        assert!(!CategorySlug::is_valid(""));
    }

    #[test]
    fn serde_uses_slug_strings() {
        let json = serde_json::to_string(&CategorySlug::RentHousing).unwrap();
        assert_eq!(json, "\"rent-housing\"");
        let back: CategorySlug = serde_json::from_str("\"food-dining\"").unwrap();
        assert_eq!(back, CategorySlug::FoodDining);
    }

    #[test]
    fn valid_slugs_sorted() {
        let slugs = CategorySlug::valid_slugs();
        assert_eq!(slugs.len(), 12);
        assert!(slugs.windows(2).all(|w| w[0] < w[1]));
    }
}
