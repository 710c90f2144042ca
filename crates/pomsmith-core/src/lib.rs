//! Core data types for pomsmith.
//!
//! This crate defines the types shared by the resolver and the Maven layer:
//! dependency coordinates and scopes, the declaration that gets written into
//! a build manifest, global configuration, and the document-tree capability
//! used for ordered insertion.
//!
//! This crate is intentionally free of network I/O.

pub mod config;
pub mod dependency;
pub mod tree;
