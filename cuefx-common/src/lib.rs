//! Shared foundation for the cuefx panel workspace

pub mod config;
pub mod error;
pub mod time;

pub use error::{Error, Result};
