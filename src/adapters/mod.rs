// Adapters layer: concrete allowance APIs and CSV input/output.

pub mod csv_io;
pub mod http;
pub mod lookup_table;

pub use http::HttpAllowanceApi;
pub use lookup_table::LookupTable;
