// ChatBuddy Core
// Pattern, sentiment and default routing for a line-oriented chat buddy

pub mod brain;
pub mod config;
pub mod error;
pub mod session;
pub mod session_log;
pub mod telemetry;

#[cfg(test)]
mod tests;

pub use error::ChatError;
