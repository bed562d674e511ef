//! # Tunechart
//!
//! Command line front end that renders stream trend, top track, top artist
//! and genre charts from a music streaming CSV dataset.
//!
//! This is the main binary crate: it parses the command line, loads and
//! validates the configuration, loads the dataset and drives the update
//! coordinator once for the selected year and country.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod app;
pub mod cli;
pub mod error;

pub use app::*;
pub use cli::*;
pub use error::*;
