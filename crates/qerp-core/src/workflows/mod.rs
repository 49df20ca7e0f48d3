//! # Workflows Module
//!
//! The public entry points of the library. [`fragment::FragmentAssembler`] runs geometry
//! normalization, the reference calculation, active-space selection and qubit encoding
//! in a fixed order and returns a complete [`fragment::DMETFragment`] or the first error.

pub mod fragment;
