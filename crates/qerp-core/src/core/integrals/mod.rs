//! Molecular integrals over contracted Cartesian Gaussians, evaluated with the
//! McMurchie-Davidson scheme.

pub mod boys;
pub mod hermite;
pub mod one_electron;
mod pair;
pub mod two_electron;
