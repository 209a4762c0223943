use crate::core::{Product, ProductId, ResultSet};
use crate::utils::error::{CalcError, Result};
use rust_decimal::Decimal;
use serde::Serialize;
use std::io::{Read, Write};

/// Reads `group,category,weight[,exempt]` rows; negative weights are rejected.
pub fn read_products<R: Read>(reader: R) -> Result<Vec<Product>> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut products = Vec::new();
    for (index, row) in csv_reader.deserialize().enumerate() {
        let product: Product = row?;
        if product.weight.is_sign_negative() && !product.weight.is_zero() {
            return Err(CalcError::ValidationError {
                message: format!(
                    "product {} ({}, {}) has negative weight {}",
                    index, product.group, product.category, product.weight
                ),
            });
        }
        products.push(product);
    }

    tracing::debug!("Read {} products", products.len());
    Ok(products)
}

#[derive(Debug, Serialize)]
struct ResultRow<'a> {
    product: usize,
    group: &'a str,
    category: &'a str,
    weight: Decimal,
    allowed_weight: Decimal,
    excess: Decimal,
}

/// Writes one row per flagged product, ordered by position in the batch.
pub fn write_results<W: Write>(
    writer: W,
    products: &[Product],
    results: &ResultSet,
) -> Result<()> {
    let mut ids: Vec<&ProductId> = results.keys().collect();
    ids.sort();

    let mut csv_writer = csv::Writer::from_writer(writer);
    for id in ids {
        let (Some(product), Some(result)) = (products.get(id.0), results.get(id)) else {
            continue;
        };
        csv_writer.serialize(ResultRow {
            product: id.0,
            group: &product.group,
            category: &product.category,
            weight: product.weight,
            allowed_weight: result.allowed_weight,
            excess: result.excess,
        })?;
    }
    csv_writer.flush()?;
    Ok(())
}
