use crate::core::{AllowanceRequest, Product, ProductId};
use std::collections::HashSet;

/// Whether a product takes part in allowance lookups at all.
pub fn is_eligible(product: &Product) -> bool {
    !product.exempt
}

/// Non-exempt products paired with their position in the batch.
pub fn eligible_products(products: &[Product]) -> impl Iterator<Item = (ProductId, &Product)> {
    products
        .iter()
        .enumerate()
        .filter(|(_, product)| is_eligible(product))
        .map(|(index, product)| (ProductId(index), product))
}

/// One request per distinct (group, category) among eligible products,
/// in first-seen order.
pub fn prepare_requests(products: &[Product]) -> Vec<AllowanceRequest> {
    let mut seen = HashSet::new();
    let requests: Vec<AllowanceRequest> = eligible_products(products)
        .map(|(_, product)| product.lookup_key())
        .filter(|key| seen.insert(key.clone()))
        .map(AllowanceRequest::new)
        .collect();

    tracing::debug!(
        "Prepared {} allowance requests from {} products",
        requests.len(),
        products.len()
    );

    requests
}
