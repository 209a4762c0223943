use rust_decimal::Decimal;
use serde::Deserialize;
use std::collections::HashMap;
use std::fmt;

/// A product whose weight is checked against the allowance of its
/// (group, category).
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Product {
    pub group: String,
    pub category: String,
    #[serde(with = "rust_decimal::serde::str")]
    pub weight: Decimal,
    #[serde(default)]
    pub exempt: bool,
}

impl Product {
    pub fn new(group: impl Into<String>, category: impl Into<String>, weight: Decimal) -> Self {
        Self {
            group: group.into(),
            category: category.into(),
            weight,
            exempt: false,
        }
    }

    /// Exempt products are never looked up and never appear in results.
    pub fn exempt(mut self) -> Self {
        self.exempt = true;
        self
    }

    pub fn lookup_key(&self) -> LookupKey {
        LookupKey::new(&self.group, &self.category)
    }
}

/// Position of a product in the batch handed to the calculator.
///
/// Products are identified by where they sit in the input, not by their
/// attributes, so two identical products still get separate results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ProductId(pub usize);

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LookupKey {
    pub group: String,
    pub category: String,
}

impl LookupKey {
    pub fn new(group: impl Into<String>, category: impl Into<String>) -> Self {
        Self {
            group: group.into(),
            category: category.into(),
        }
    }
}

impl fmt::Display for LookupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.group, self.category)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AllowanceRequest {
    pub key: LookupKey,
}

impl AllowanceRequest {
    pub fn new(key: LookupKey) -> Self {
        Self { key }
    }

    pub fn group(&self) -> &str {
        &self.key.group
    }

    pub fn category(&self) -> &str {
        &self.key.category
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AllowanceResponse {
    #[serde(with = "rust_decimal::serde::arbitrary_precision")]
    pub max_weight: Decimal,
}

/// A response paired with the key of the request that produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct KeyedResponse {
    pub key: LookupKey,
    pub response: AllowanceResponse,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CalculationResult {
    pub allowed_weight: Decimal,
    pub excess: Decimal,
}

pub type ResultSet = HashMap<ProductId, CalculationResult>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_response_keeps_full_precision() {
        let response: AllowanceResponse =
            serde_json::from_str(r#"{"maxWeight": 7.999999999999999999}"#).unwrap();

        assert_eq!(
            response.max_weight,
            Decimal::from_str("7.999999999999999999").unwrap()
        );
    }

    #[test]
    fn test_response_accepts_integer() {
        let response: AllowanceResponse = serde_json::from_str(r#"{"maxWeight": 1000}"#).unwrap();
        assert_eq!(response.max_weight, Decimal::from(1000));
    }
}
