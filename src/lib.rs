//! # Cricket Stats
//!
//! Team statistics from a per-match stats CSV: roster-reconciled player
//! aggregates, top-5 leaderboards, spotlight reports and photo analysis.
//!
//! ## Architecture
//!
//! - **ingest**: Stats CSV loading and cell parsing
//! - **names**: Name normalization and roster reconciliation
//! - **calculate**: Aggregation, derived metrics, leaderboards and spotlights
//! - **photos**: Photo discovery, inspection and categorization
//! - **report**: Markdown/HTML summaries and PNG charts
//! - **storage**: Output directory layout and table writers
//! - **pipeline**: End-to-end runs used by the CLI
//! - **config**: Configuration loading and validation

pub mod calculate;
pub mod config;
pub mod ingest;
pub mod models;
pub mod names;
pub mod photos;
pub mod pipeline;
pub mod report;
pub mod storage;

pub use models::*;
