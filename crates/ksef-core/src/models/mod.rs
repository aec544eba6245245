//! Data models: the normalized invoice record and pipeline configuration.

pub mod config;
pub mod invoice;
