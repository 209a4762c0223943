pub mod toml_config;

use crate::adapters::http::DEFAULT_TIMEOUT;
use crate::core::mapper::DEFAULT_TOLERANCE;
use crate::core::ConfigProvider;
use crate::utils::error::Result;
use crate::utils::validation::{
    validate_file_extensions, validate_non_negative, validate_path, validate_positive_number,
    validate_url, Validate,
};
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::time::Duration;

pub use toml_config::TomlConfig;

#[cfg_attr(feature = "cli", derive(clap::Parser))]
#[cfg_attr(feature = "cli", command(name = "weight-check"))]
#[cfg_attr(
    feature = "cli",
    command(about = "Flag products heavier than the allowance for their group and category")
)]
#[derive(Debug, Clone, Default)]
pub struct CliConfig {
    #[cfg_attr(
        feature = "cli",
        arg(long, help = "TOML config file; command line options take precedence")
    )]
    pub config: Option<String>,

    #[cfg_attr(feature = "cli", arg(long, help = "CSV file with group,category,weight[,exempt]"))]
    pub products: Option<String>,

    #[cfg_attr(feature = "cli", arg(long, help = "Allowance API endpoint"))]
    pub api_endpoint: Option<String>,

    #[cfg_attr(
        feature = "cli",
        arg(long, value_delimiter = ',', help = "CSV files with group,category,max_weight")
    )]
    pub lookup_files: Vec<String>,

    #[cfg_attr(feature = "cli", arg(long, help = "Margin added to the allowed weight (default 5)"))]
    pub tolerance: Option<Decimal>,

    #[cfg_attr(feature = "cli", arg(long, help = "Allowance API request timeout in seconds"))]
    pub timeout_seconds: Option<u64>,

    #[cfg_attr(feature = "cli", arg(long, help = "Write results CSV here instead of stdout"))]
    pub output_path: Option<String>,

    #[cfg_attr(feature = "cli", arg(long, help = "Enable verbose output"))]
    pub verbose: bool,

    #[cfg_attr(feature = "cli", arg(long, help = "Emit logs as JSON"))]
    pub log_json: bool,

    #[cfg_attr(feature = "cli", arg(skip))]
    pub headers: HashMap<String, String>,
}

impl CliConfig {
    /// 以 TOML 設定補上命令列未指定的欄位
    ///
    /// 命令列若已指定 API 端點或查詢檔，整個查詢來源都以命令列為準
    pub fn with_file_defaults(mut self, file: &TomlConfig) -> Self {
        if self.products.is_none() {
            self.products = file.input.as_ref().and_then(|i| i.products.clone());
        }
        if self.api_endpoint.is_none() && self.lookup_files.is_empty() {
            self.api_endpoint = file.api.as_ref().map(|a| a.endpoint.clone());
            self.lookup_files = file
                .input
                .as_ref()
                .and_then(|i| i.lookup_files.clone())
                .unwrap_or_default();
        }
        if self.timeout_seconds.is_none() {
            self.timeout_seconds = file.api.as_ref().and_then(|a| a.timeout_seconds);
        }
        if self.tolerance.is_none() {
            self.tolerance = file.calculation.as_ref().and_then(|c| c.tolerance);
        }
        if self.output_path.is_none() {
            self.output_path = file.output.as_ref().and_then(|o| o.path.clone());
        }
        if let Some(headers) = file.api.as_ref().and_then(|a| a.headers.clone()) {
            for (name, value) in headers {
                self.headers.entry(name).or_insert(value);
            }
        }
        self
    }
}

impl ConfigProvider for CliConfig {
    fn api_endpoint(&self) -> Option<&str> {
        self.api_endpoint.as_deref()
    }

    fn api_headers(&self) -> HashMap<String, String> {
        self.headers.clone()
    }

    fn request_timeout(&self) -> Duration {
        self.timeout_seconds
            .map(Duration::from_secs)
            .unwrap_or(DEFAULT_TIMEOUT)
    }

    fn lookup_files(&self) -> &[String] {
        &self.lookup_files
    }

    fn products_path(&self) -> Option<&str> {
        self.products.as_deref()
    }

    fn output_path(&self) -> Option<&str> {
        self.output_path.as_deref()
    }

    fn tolerance(&self) -> Decimal {
        self.tolerance.unwrap_or(DEFAULT_TOLERANCE)
    }
}

impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        if let Some(endpoint) = &self.api_endpoint {
            validate_url("api_endpoint", endpoint)?;
        }
        if let Some(products) = &self.products {
            validate_path("products", products)?;
        }
        if let Some(output) = &self.output_path {
            validate_path("output_path", output)?;
        }
        validate_file_extensions("lookup_files", &self.lookup_files, &["csv"])?;
        if let Some(timeout) = self.timeout_seconds {
            validate_positive_number("timeout_seconds", timeout, 1)?;
        }
        validate_non_negative("tolerance", self.tolerance())?;
        Ok(())
    }
}
