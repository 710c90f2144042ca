//! Shared utilities for pomsmith.
//!
//! This crate provides cross-cutting concerns used by all other pomsmith
//! crates: the unified error type and Cargo-style terminal status output.

pub mod errors;
pub mod progress;
