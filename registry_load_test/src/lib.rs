//! Load testing for the digital twin shell descriptor registry.
//!
//! Each simulated user repeatedly runs a three step journey against the
//! registry: create a freshly generated shell descriptor, read it back by id,
//! and look it up by its specific asset ids. Statistics are collected per
//! named endpoint so that per-iteration identifiers never leak into the
//! metric labels.

pub mod cli;
pub mod config;
pub mod encoding;
pub mod error;
pub mod journey;
pub mod metrics;
pub mod pacing;
pub mod payload;
pub mod scenarios;
pub mod transport;
