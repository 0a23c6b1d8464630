//! Test Helper Utilities
//!
//! Shared utilities for testing licscan-ui

#![allow(dead_code)]

pub mod backend;
pub mod fixtures;

pub use backend::ScriptedBackend;
