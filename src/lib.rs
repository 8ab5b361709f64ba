//! Rainfall prediction dashboard.
//!
//! Read-only presentation layer over pre-computed ConvLSTM rainfall
//! predictions: loads the results CSV once, derives category counts, an
//! actual-vs-predicted contingency table and a short-horizon forecast slice,
//! and shapes them into chart/table specs for a display shell.

pub mod analysis;
pub mod config;
pub mod controls;
pub mod ingest;
pub mod logging;
pub mod model;
pub mod present;
