pub mod error;
pub mod execution;
pub mod progress;

#[cfg(test)]
mod tests;
