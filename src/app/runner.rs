use crate::adapters::csv_io::{read_products, write_results};
use crate::adapters::{HttpAllowanceApi, LookupTable};
use crate::core::calculator::Calculator;
use crate::core::{ConfigProvider, Product, ResultSet};
use crate::utils::error::{CalcError, Result};
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub products: usize,
    pub flagged: usize,
    pub output: Option<String>,
}

/// Picks the allowance source from the configuration: an HTTP endpoint when
/// one is set, otherwise the lookup CSV files.
pub fn build_calculator<C: ConfigProvider>(config: &C) -> Result<Calculator> {
    let builder = Calculator::builder().tolerance(config.tolerance());

    let builder = if config.api_endpoint().is_some() {
        let api = HttpAllowanceApi::from_config(config)?;
        tracing::info!("Using allowance API at {}", api.endpoint());
        builder.api(api)
    } else if !config.lookup_files().is_empty() {
        let table = LookupTable::from_files(config.lookup_files())?;
        tracing::info!(
            "Using {} allowances from {} lookup files",
            table.len(),
            config.lookup_files().len()
        );
        builder.api(table)
    } else {
        builder
    };

    builder.build()
}

pub fn load_products<C: ConfigProvider>(config: &C) -> Result<Vec<Product>> {
    let path = config
        .products_path()
        .ok_or_else(|| CalcError::MissingConfigError {
            field: "products".to_string(),
        })?;
    let file = std::fs::File::open(path)?;
    read_products(file)
}

/// Reads the product batch, runs the calculation, and writes the flagged
/// products either to the configured output path or to stdout.
pub async fn run<C: ConfigProvider>(config: &C) -> Result<RunSummary> {
    let calculator = build_calculator(config)?;
    let products = load_products(config)?;

    let results = calculator.calculate(&products).await?;
    let output = write_output(config.output_path(), &products, &results)?;

    Ok(RunSummary {
        products: products.len(),
        flagged: results.len(),
        output,
    })
}

fn write_output(
    output_path: Option<&str>,
    products: &[Product],
    results: &ResultSet,
) -> Result<Option<String>> {
    match output_path {
        Some(path) => {
            if let Some(parent) = Path::new(path).parent() {
                std::fs::create_dir_all(parent)?;
            }
            let file = std::fs::File::create(path)?;
            write_results(file, products, results)?;
            tracing::debug!("Results written to {}", path);
            Ok(Some(path.to_string()))
        }
        None => {
            write_results(std::io::stdout().lock(), products, results)?;
            Ok(None)
        }
    }
}
