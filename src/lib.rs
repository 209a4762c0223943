pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

pub use adapters::{HttpAllowanceApi, LookupTable};
pub use config::{CliConfig, TomlConfig};
pub use crate::core::calculator::{Calculator, CalculatorBuilder};
pub use crate::core::mapper::DEFAULT_TOLERANCE;
pub use domain::model::{
    AllowanceRequest, AllowanceResponse, CalculationResult, KeyedResponse, LookupKey, Product,
    ProductId, ResultSet,
};
pub use domain::ports::{AllowanceApi, ConfigProvider};
pub use utils::error::{CalcError, Result};
