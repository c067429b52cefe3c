//! Unit tests for configuration loading and precedence.
//!
//! Tests are organised into modules by functional area:
//! - `helpers`: Shared test utilities
//! - `precedence`: Layer precedence tests
//! - `operation_mode`: Operation mode determination tests
//! - `field_resolution`: Token, time filter and API base resolution tests
//! - `ttl_loading`: Cache lifetime loading tests
//! - `settings`: Conversion into `StatsSettings`

mod helpers;
mod settings;
mod ttl_loading;
