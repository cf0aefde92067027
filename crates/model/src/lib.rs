pub mod core;
pub mod pagination;
pub mod records;
pub mod schema;
pub mod transform;
