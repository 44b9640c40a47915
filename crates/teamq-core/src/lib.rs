#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Helpers shared by the teamq compiler and CLI.
//!
//! - `utils`: identifier case conversion and sanitizing for target languages
//! - `Colors`: ANSI palette for terminal output

mod colors;
pub mod utils;

#[cfg(test)]
mod utils_tests;

pub use colors::Colors;
