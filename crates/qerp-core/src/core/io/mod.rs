//! Provides input/output functionality for geometry file formats.
//!
//! Readers return unvalidated atom records; validation into a
//! [`Geometry`](crate::core::models::geometry::Geometry) is a separate step so that in-memory
//! and file-based inputs share one set of checks.

pub mod source;
pub mod traits;
pub mod xyz;
