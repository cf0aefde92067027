pub mod destination;
pub mod encode;
