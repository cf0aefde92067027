pub mod batch_size;
pub mod convert;
pub mod indexes;
pub mod partition;
pub mod progress;
