//! SQL output: dialects and CREATE TABLE generation.

mod ddl;
mod dialect;

pub use ddl::generate;
pub use dialect::Dialect;
