use crate::core::models::geometry::{Geometry, RawAtom};
use crate::engine::error::FormatError;
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

/// Defines the interface for reading and writing geometry file formats.
///
/// Reading yields unvalidated [`RawAtom`] records so that the caller decides when to
/// normalize; writing always starts from a validated [`Geometry`].
pub trait GeometryFile {
    /// Format-specific data that is not part of the geometry (e.g. a comment line).
    type Metadata;

    /// Reads raw atom records and metadata from a buffered reader.
    ///
    /// # Errors
    ///
    /// Returns a [`FormatError`] if the content is malformed or the reader fails.
    fn read_from(reader: &mut impl BufRead) -> Result<(Vec<RawAtom>, Self::Metadata), FormatError>;

    /// Writes a geometry and its metadata to a writer.
    fn write_to(
        geometry: &Geometry,
        metadata: &Self::Metadata,
        writer: &mut impl Write,
    ) -> Result<(), FormatError>;

    /// Reads a geometry file from disk.
    ///
    /// Every error, including I/O failures, is annotated with the file path.
    fn read_from_path<P: AsRef<Path>>(
        path: P,
    ) -> Result<(Vec<RawAtom>, Self::Metadata), FormatError> {
        let path = path.as_ref();
        let result = File::open(path)
            .map_err(FormatError::from)
            .and_then(|file| Self::read_from(&mut BufReader::new(file)));
        result.map_err(|e| e.in_file(path))
    }

    /// Writes a geometry and its metadata to a file path.
    fn write_to_path<P: AsRef<Path>>(
        geometry: &Geometry,
        metadata: &Self::Metadata,
        path: P,
    ) -> Result<(), FormatError> {
        let path = path.as_ref();
        let result = File::create(path).map_err(FormatError::from).and_then(|file| {
            let mut writer = BufWriter::new(file);
            Self::write_to(geometry, metadata, &mut writer)?;
            writer.flush().map_err(FormatError::from)
        });
        result.map_err(|e| e.in_file(path))
    }
}
