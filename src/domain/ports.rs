use crate::domain::model::{AllowanceRequest, AllowanceResponse};
use crate::utils::error::Result;
use async_trait::async_trait;
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

/// The remote service that knows the max weight for a (group, category).
///
/// Implementations must tolerate concurrent calls; the calculator issues
/// one call per distinct key at the same time.
#[async_trait]
pub trait AllowanceApi: Send + Sync {
    async fn get(&self, request: &AllowanceRequest) -> Result<AllowanceResponse>;
}

#[async_trait]
impl<T: AllowanceApi + ?Sized> AllowanceApi for Arc<T> {
    async fn get(&self, request: &AllowanceRequest) -> Result<AllowanceResponse> {
        (**self).get(request).await
    }
}

pub trait ConfigProvider: Send + Sync {
    fn api_endpoint(&self) -> Option<&str>;
    fn api_headers(&self) -> HashMap<String, String>;
    fn request_timeout(&self) -> Duration;
    fn lookup_files(&self) -> &[String];
    fn products_path(&self) -> Option<&str>;
    fn output_path(&self) -> Option<&str>;
    fn tolerance(&self) -> Decimal;
}
