//! Core library for the `temprecords` CLI.
//!
//! This crate defines:
//! - Parsing of the ASOS archive's CSV payload into observation records
//! - Timeframe and validity filters over those records
//! - Max/min aggregation and the end-to-end query pipeline
//! - The archive data source and configuration handling
//!
//! It is used by `temprecords-cli`, but can also be reused by other binaries or services.

pub mod aggregate;
pub mod config;
pub mod error;
pub mod filter;
pub mod model;
pub mod parser;
pub mod pipeline;
pub mod source;

pub use config::{Config, SourceConfig};
pub use error::{FetchError, ParseError, QueryError, RequestError};
pub use model::{
    AggregationMode, Extremum, ObservationRecord, QueryOutcome, QueryRequest, TimeframeKind,
    TimeframeSpec, Unit,
};
pub use pipeline::{evaluate, run_query};
pub use source::{ObservationSource, RetryPolicy, SourceQuery};
