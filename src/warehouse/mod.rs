mod schema;
mod writer;

pub use schema::{WAREHOUSE_INDICES, WAREHOUSE_TABLES};
pub use writer::{IndexFailure, TableWrite, Warehouse, WriteReport};
