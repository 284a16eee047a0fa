//! CLI command implementations
//!
//! This module contains all CLI command implementations.

pub mod factor;
pub mod init;
pub mod validate;
