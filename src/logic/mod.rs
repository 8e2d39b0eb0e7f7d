//! Logic Module - client-side core
//!
//! - `normalize/` - raw service payload -> canonical result
//! - `history/` - bounded, persisted ledger of past results
//! - `analytics` - dashboard statistics over the ledger
//! - `session/` - single-slot submission lifecycle
//! - `assistant` - chat context pinned to the latest result
//! - `service/` - HTTP boundary to the analysis service
//! - `report` - downloadable text report

pub mod analytics;
pub mod assistant;
pub mod history;
pub mod normalize;
pub mod report;
pub mod service;
pub mod session;
