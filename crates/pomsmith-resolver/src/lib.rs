//! Version resolution engine: Maven-style version ordering, interval range
//! matching, depth-annotated requirement chains with nearest-wins
//! resolution, and the managed/family/requested strategy pipeline that
//! decides which version (if any) a new dependency declaration carries.

pub mod cache;
pub mod range;
pub mod requirement;
pub mod session;
pub mod source;
pub mod version;
