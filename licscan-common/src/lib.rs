//! # licscan Common Library
//!
//! Shared code for the licscan services:
//! - Error and result types
//! - Configuration loading (TOML file, compiled defaults, data folder)
//! - Input validation (candidate manifest files, credential forms)
//!
//! Everything here is framework-free. The web service wraps these with
//! its own HTTP handlers.

pub mod config;
pub mod error;
pub mod validation;

pub use error::{Error, Result};
pub use validation::{CandidateFile, FileRejection, FormError};
