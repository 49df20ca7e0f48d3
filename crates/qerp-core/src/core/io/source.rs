use super::traits::GeometryFile;
use super::xyz::XyzFile;
use crate::core::models::geometry::{Geometry, RawAtom};
use crate::engine::error::FormatError;
use std::path::PathBuf;

/// Where a fragment geometry comes from.
#[derive(Debug, Clone, PartialEq)]
pub enum GeometrySource {
    Atoms(Vec<RawAtom>),
    XyzFile(PathBuf),
}

impl GeometrySource {
    /// Produces the raw atom records without validating them.
    pub fn parse(&self) -> Result<Vec<RawAtom>, FormatError> {
        match self {
            GeometrySource::Atoms(atoms) => Ok(atoms.clone()),
            GeometrySource::XyzFile(path) => XyzFile::read_from_path(path).map(|(atoms, _)| atoms),
        }
    }

    pub fn load(&self) -> Result<Geometry, FormatError> {
        Geometry::normalize(self.parse()?)
    }
}

impl From<PathBuf> for GeometrySource {
    fn from(path: PathBuf) -> Self {
        GeometrySource::XyzFile(path)
    }
}

impl From<Vec<RawAtom>> for GeometrySource {
    fn from(atoms: Vec<RawAtom>) -> Self {
        GeometrySource::Atoms(atoms)
    }
}
