pub mod error;
pub mod transform;
pub mod worker;
