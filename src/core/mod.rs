pub mod calculator;
pub mod dedup;
pub mod fan_out;
pub mod mapper;

pub use crate::domain::model::{
    AllowanceRequest, AllowanceResponse, CalculationResult, KeyedResponse, LookupKey, Product,
    ProductId, ResultSet,
};
pub use crate::domain::ports::{AllowanceApi, ConfigProvider};
pub use crate::utils::error::Result;
