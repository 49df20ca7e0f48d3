//! # Core Models Module
//!
//! Data structures describing the molecular system a fragment is built from.
//!
//! - [`element`] - Chemical elements and symbol lookup
//! - [`geometry`] - Validated, order-preserving atomic geometries in the input unit
//! - [`molecule`] - Geometry in atomic units with charge and spin bookkeeping

pub mod element;
pub mod geometry;
pub mod molecule;
