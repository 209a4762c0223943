use crate::core::dedup::eligible_products;
use crate::core::{
    AllowanceResponse, CalculationResult, KeyedResponse, LookupKey, Product, ResultSet,
};
use rust_decimal::Decimal;
use std::collections::HashMap;

/// Margin added to the allowed weight before a product counts as over.
pub const DEFAULT_TOLERANCE: Decimal = Decimal::from_parts(5, 0, 0, false, 0);

/// Maps allowance responses back onto the products that asked for them.
///
/// Products with no matching response, or whose weight does not exceed
/// `max_weight + tolerance`, are left out of the result set. When several
/// responses share a key, the first one wins.
pub fn map_results(
    products: &[Product],
    responses: &[KeyedResponse],
    tolerance: Decimal,
) -> ResultSet {
    let mut by_key: HashMap<&LookupKey, &AllowanceResponse> =
        HashMap::with_capacity(responses.len());
    for keyed in responses {
        by_key.entry(&keyed.key).or_insert(&keyed.response);
    }

    let mut results = ResultSet::new();
    for (id, product) in eligible_products(products) {
        let key = product.lookup_key();
        let Some(response) = by_key.get(&key) else {
            tracing::debug!("No allowance response for product {} {}", id, key);
            continue;
        };

        if let Some(result) = excess_weight(product.weight, response.max_weight, tolerance) {
            results.insert(id, result);
        }
    }

    results
}

fn excess_weight(
    weight: Decimal,
    max_weight: Decimal,
    tolerance: Decimal,
) -> Option<CalculationResult> {
    (weight > max_weight + tolerance).then(|| CalculationResult {
        allowed_weight: max_weight,
        excess: weight - max_weight,
    })
}
