use crate::core::{AllowanceApi, AllowanceRequest, AllowanceResponse, ConfigProvider};
use crate::utils::error::{CalcError, Result};
use crate::utils::validation::validate_url;
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::Client;
use std::collections::HashMap;
use std::time::Duration;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Allowance lookups over HTTP: `GET {endpoint}?group=..&category=..`
/// answered with `{"maxWeight": <number>}`.
#[derive(Debug, Clone)]
pub struct HttpAllowanceApi {
    client: Client,
    endpoint: String,
}

impl HttpAllowanceApi {
    pub fn new(endpoint: impl Into<String>) -> Result<Self> {
        Self::with_options(endpoint, &HashMap::new(), DEFAULT_TIMEOUT)
    }

    pub fn with_options(
        endpoint: impl Into<String>,
        headers: &HashMap<String, String>,
        timeout: Duration,
    ) -> Result<Self> {
        let endpoint = endpoint.into();
        validate_url("api_endpoint", &endpoint)?;

        let mut header_map = HeaderMap::new();
        for (name, value) in headers {
            let header_name = HeaderName::from_bytes(name.as_bytes()).map_err(|e| {
                CalcError::InvalidConfigValueError {
                    field: "api.headers".to_string(),
                    value: name.clone(),
                    reason: e.to_string(),
                }
            })?;
            let header_value =
                HeaderValue::from_str(value).map_err(|e| CalcError::InvalidConfigValueError {
                    field: format!("api.headers.{}", name),
                    value: value.clone(),
                    reason: e.to_string(),
                })?;
            header_map.insert(header_name, header_value);
        }

        let client = Client::builder()
            .default_headers(header_map)
            .timeout(timeout)
            .build()?;

        Ok(Self { client, endpoint })
    }

    pub fn from_config<C: ConfigProvider>(config: &C) -> Result<Self> {
        let endpoint = config
            .api_endpoint()
            .ok_or_else(|| CalcError::MissingConfigError {
                field: "api.endpoint".to_string(),
            })?;
        Self::with_options(endpoint, &config.api_headers(), config.request_timeout())
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl AllowanceApi for HttpAllowanceApi {
    async fn get(&self, request: &AllowanceRequest) -> Result<AllowanceResponse> {
        tracing::debug!("GET {} for {}", self.endpoint, request.key);

        let response = self
            .client
            .get(&self.endpoint)
            .query(&[("group", request.group()), ("category", request.category())])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!("Allowance API returned {} for {}", status, request.key);
            return Err(CalcError::lookup(
                request.group(),
                request.category(),
                format!("HTTP {}", status),
            ));
        }

        let body = response.bytes().await?;
        let allowance: AllowanceResponse = serde_json::from_slice(&body)?;
        Ok(allowance)
    }
}
