pub mod destination;
pub mod error;
pub mod mongo;
pub mod source;
pub mod sql;
