use crate::core::dedup::prepare_requests;
use crate::core::fan_out::combine_calls;
use crate::core::mapper::{map_results, DEFAULT_TOLERANCE};
use crate::core::{AllowanceApi, Product, Result, ResultSet};
use crate::utils::error::CalcError;
use crate::utils::validation::validate_non_negative;
use rust_decimal::Decimal;
use std::sync::Arc;

/// Flags products heavier than the allowance of their (group, category).
///
/// Every call to [`Calculator::calculate`] is independent: requests are
/// deduplicated, looked up concurrently, and mapped back onto the batch.
#[derive(Clone)]
pub struct Calculator {
    api: Arc<dyn AllowanceApi>,
    tolerance: Decimal,
}

impl std::fmt::Debug for Calculator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Calculator")
            .field("tolerance", &self.tolerance)
            .finish_non_exhaustive()
    }
}

impl Calculator {
    pub fn new(api: Arc<dyn AllowanceApi>) -> Self {
        Self {
            api,
            tolerance: DEFAULT_TOLERANCE,
        }
    }

    pub fn builder() -> CalculatorBuilder {
        CalculatorBuilder::default()
    }

    pub fn tolerance(&self) -> Decimal {
        self.tolerance
    }

    pub async fn calculate(&self, products: &[Product]) -> Result<ResultSet> {
        let requests = prepare_requests(products);
        tracing::info!(
            "Looking up {} distinct allowances for {} products",
            requests.len(),
            products.len()
        );

        let responses = combine_calls(requests, |request| {
            let api = Arc::clone(&self.api);
            async move { api.get(&request).await }
        })
        .await?;

        let results = map_results(products, &responses, self.tolerance);
        tracing::info!(
            "{} of {} products exceed their allowance",
            results.len(),
            products.len()
        );

        Ok(results)
    }
}

#[derive(Default)]
pub struct CalculatorBuilder {
    api: Option<Arc<dyn AllowanceApi>>,
    tolerance: Option<Decimal>,
}

impl CalculatorBuilder {
    pub fn api<A: AllowanceApi + 'static>(mut self, api: A) -> Self {
        self.api = Some(Arc::new(api));
        self
    }

    pub fn shared_api(mut self, api: Arc<dyn AllowanceApi>) -> Self {
        self.api = Some(api);
        self
    }

    pub fn tolerance(mut self, tolerance: Decimal) -> Self {
        self.tolerance = Some(tolerance);
        self
    }

    /// 缺少 API 時立即失敗，不延後到第一次計算
    pub fn build(self) -> Result<Calculator> {
        let api = self.api.ok_or(CalcError::MissingCollaborator)?;
        let tolerance = self.tolerance.unwrap_or(DEFAULT_TOLERANCE);
        validate_non_negative("tolerance", tolerance)?;

        Ok(Calculator { api, tolerance })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{AllowanceRequest, AllowanceResponse, ProductId};
    use async_trait::async_trait;

    struct FixedApi(Decimal);

    #[async_trait]
    impl AllowanceApi for FixedApi {
        async fn get(&self, _request: &AllowanceRequest) -> Result<AllowanceResponse> {
            Ok(AllowanceResponse { max_weight: self.0 })
        }
    }

    #[test]
    fn test_builder_rejects_missing_api() {
        let err = Calculator::builder().build().unwrap_err();
        assert!(matches!(err, CalcError::MissingCollaborator));
    }

    #[test]
    fn test_builder_rejects_negative_tolerance() {
        let err = Calculator::builder()
            .api(FixedApi(Decimal::ONE))
            .tolerance(Decimal::from(-1))
            .build()
            .unwrap_err();
        assert!(matches!(err, CalcError::InvalidConfigValueError { .. }));
    }

    #[test]
    fn test_builder_defaults_tolerance() {
        let calculator = Calculator::builder()
            .api(FixedApi(Decimal::ONE))
            .build()
            .unwrap();
        assert_eq!(calculator.tolerance(), DEFAULT_TOLERANCE);
    }

    #[tokio::test]
    async fn test_calculate_with_fixed_allowance() {
        let calculator = Calculator::new(Arc::new(FixedApi(Decimal::from(8))));
        let products = vec![
            Product::new("Ducks", "Birds", Decimal::from(15)),
            Product::new("Ducks", "Birds", Decimal::from(5)),
        ];

        let results = calculator.calculate(&products).await.unwrap();

        assert_eq!(results.len(), 1);
        assert_eq!(results[&ProductId(0)].excess, Decimal::from(7));
    }

    #[tokio::test]
    async fn test_empty_batch() {
        let calculator = Calculator::new(Arc::new(FixedApi(Decimal::ZERO)));
        assert!(calculator.calculate(&[]).await.unwrap().is_empty());
    }
}
