//! Interactive paper-trading market simulator: a synthetic tick walk, a
//! scrolling bar chart and a single-keystroke trading loop.

pub mod chart;
pub mod config;
pub mod error;
pub mod input;
pub mod ledger;
pub mod market;
pub mod report;
pub mod session;
pub mod ui;
