//! Data models for pay statements and pipeline configuration.

pub mod config;
pub mod statement;
