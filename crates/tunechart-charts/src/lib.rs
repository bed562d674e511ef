//! # Tunechart Charts
//!
//! Record parsing, filtering, aggregation and chart rendering for Tunechart.
//!
//! The pipeline runs CSV rows through the parser into an immutable
//! [`Dataset`], narrows it with [`filter_records`], reduces it with an
//! [`Aggregator`] per chart kind, and draws SVG charts with `plotters`. The
//! [`UpdateCoordinator`] drives every registered [`ChartRenderer`] whenever
//! the selection changes.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod aggregator;
pub mod coordinator;
pub mod dataset;
pub mod filter;
pub mod parser;
pub mod plan;
pub mod style;
pub mod svg_chart;
pub mod traits;
pub mod utils;

// Chart kinds
pub mod daily_trend;
pub mod genre_bubbles;
pub mod ranked_bars;

pub use aggregator::*;
pub use coordinator::*;
pub use dataset::*;
pub use filter::*;
pub use parser::*;
pub use plan::*;
pub use style::*;
pub use svg_chart::*;
pub use traits::*;
