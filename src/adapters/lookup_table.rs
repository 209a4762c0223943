use crate::core::{AllowanceApi, AllowanceRequest, AllowanceResponse, LookupKey};
use crate::utils::error::{CalcError, Result};
use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::Deserialize;
use std::collections::HashMap;
use std::io::Read;
use std::path::Path;

#[derive(Debug, Deserialize)]
struct AllowanceRow {
    group: String,
    category: String,
    #[serde(with = "rust_decimal::serde::str")]
    max_weight: Decimal,
}

/// Allowances held in memory, typically loaded from `group,category,max_weight` CSV files.
#[derive(Debug, Clone, Default)]
pub struct LookupTable {
    allowances: HashMap<LookupKey, Decimal>,
}

impl LookupTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_allowance(
        mut self,
        group: impl Into<String>,
        category: impl Into<String>,
        max_weight: Decimal,
    ) -> Self {
        self.insert(LookupKey::new(group, category), max_weight);
        self
    }

    /// Later entries for the same key replace earlier ones.
    pub fn insert(&mut self, key: LookupKey, max_weight: Decimal) {
        self.allowances.insert(key, max_weight);
    }

    pub fn len(&self) -> usize {
        self.allowances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.allowances.is_empty()
    }

    pub fn load_csv<R: Read>(&mut self, reader: R) -> Result<usize> {
        let mut csv_reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
        let mut loaded = 0;
        for row in csv_reader.deserialize() {
            let row: AllowanceRow = row?;
            self.insert(LookupKey::new(row.group, row.category), row.max_weight);
            loaded += 1;
        }
        Ok(loaded)
    }

    pub fn from_files<P: AsRef<Path>>(paths: &[P]) -> Result<Self> {
        let mut table = Self::new();
        for path in paths {
            let file = std::fs::File::open(path)?;
            let loaded = table.load_csv(file)?;
            tracing::debug!(
                "Loaded {} allowances from {}",
                loaded,
                path.as_ref().display()
            );
        }
        Ok(table)
    }
}

#[async_trait]
impl AllowanceApi for LookupTable {
    async fn get(&self, request: &AllowanceRequest) -> Result<AllowanceResponse> {
        self.allowances
            .get(&request.key)
            .map(|max_weight| AllowanceResponse {
                max_weight: *max_weight,
            })
            .ok_or_else(|| {
                CalcError::lookup(request.group(), request.category(), "no allowance configured")
            })
    }
}
