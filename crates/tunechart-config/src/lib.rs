//! # Tunechart Config
//!
//! Type-safe configuration management for Tunechart.
//!
//! This crate provides the configuration schema with defaults for every
//! field, loading from YAML, TOML or JSON files, and validation.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod defaults;
pub mod loader;
pub mod schema;
pub mod validator;

pub use defaults::*;
pub use loader::*;
pub use schema::*;
pub use validator::*;
