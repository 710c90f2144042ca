//! Maven repository protocol and `pom.xml` editing: repository layout,
//! metadata download and cache, the remote version catalog, a
//! format-preserving XML tree, the POM model derived from it, and the
//! editor that places new dependency declarations.

pub mod cache;
pub mod catalog;
pub mod download;
pub mod editor;
pub mod metadata;
pub mod order;
pub mod pom;
pub mod repository;
pub mod xml;
