//! Shared types and plumbing for the ReviewPulse feedback service
//!
//! Holds the error taxonomy, configuration resolution, and database
//! initialization used by the service crate.

pub mod config;
pub mod db;
pub mod error;

pub use error::{Error, Result};
