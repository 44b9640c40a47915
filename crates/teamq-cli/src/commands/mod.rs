pub mod backends;
pub mod check;
pub mod config;
pub mod generate;
pub mod query_loader;
pub mod resolve;

#[cfg(test)]
mod resolve_tests;
