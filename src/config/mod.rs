//! Application configuration.
//!
//! Each submodule handles one aspect of configuration, loaded from
//! environment variables with sensible development defaults.
//!
//! - [`cors`]: allowed origins for the panel frontend
//! - [`database`]: PostgreSQL connection pool initialization
//! - [`jwt`]: token secret and expiries
//! - [`rate_limit`]: per-IP rate limiting for auth endpoints

pub mod cors;
pub mod database;
pub mod jwt;
pub mod rate_limit;
