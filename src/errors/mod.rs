//! Error types and error handling for the compiler.
//!
//! This module defines the error types used throughout the front end:
//!
//! - Error structures with optional source position information
//! - Specific error variants for lexing, parsing and semantic analysis
//! - Error formatting and display functionality
//! - Helpful error messages and suggestions

pub mod errors;

#[cfg(test)]
mod tests;
