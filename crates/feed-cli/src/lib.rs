//! CLI library components for the catalog feed converter.

pub mod config;
pub mod logging;
pub mod pipeline;
