//! Configuration loader and schema types.
//!
//! This module exposes the settings schema (bot prefix, cache folder, catalogue
//! endpoint, audio polling, logging) and helpers to load it from disk.

mod load;
mod schema;

pub use schema::*;

#[cfg(test)]
mod tests;
