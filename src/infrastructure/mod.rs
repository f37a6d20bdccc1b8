//! Infrastructure layer: configuration and process-level plumbing.

pub mod config;
