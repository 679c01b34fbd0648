//! Common test utilities for fabric-wall CLI tests.
//!
//! This module provides:
//! - `TestEnv`: isolated project and home directories plus CLI helpers
//! - `MockApi`: wiremock routes standing in for the REST APIs

#![allow(dead_code)]

pub mod env;
pub mod mock_api;

pub use env::*;
pub use mock_api::*;
