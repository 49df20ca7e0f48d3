use super::traits::GeometryFile;
use crate::core::models::geometry::{Geometry, RawAtom};
use crate::engine::error::{FormatError, FormatErrorKind};
use std::io::{BufRead, Write};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct XyzMetadata {
    pub comment: String,
}

/// The plain XYZ format: an atom count, a comment line, then `symbol x y z` records.
///
/// Blank lines between records are skipped. The comment line is the line directly after
/// the count and may itself be blank. Records beyond the declared count are ignored.
pub struct XyzFile;

impl GeometryFile for XyzFile {
    type Metadata = XyzMetadata;

    fn read_from(reader: &mut impl BufRead) -> Result<(Vec<RawAtom>, Self::Metadata), FormatError> {
        let lines = reader.lines().collect::<Result<Vec<String>, _>>()?;

        let non_empty = lines.iter().filter(|l| !l.trim().is_empty()).count();
        if non_empty < 2 {
            return Err(FormatError::TooShort { found: non_empty });
        }

        let (count_idx, count_line) = lines
            .iter()
            .enumerate()
            .find(|(_, l)| !l.trim().is_empty())
            .ok_or(FormatError::TooShort { found: 0 })?;
        let count_str = count_line.trim();
        let declared: usize = count_str.parse().map_err(|_| FormatError::Parse {
            line: count_idx + 1,
            kind: FormatErrorKind::InvalidCount {
                value: count_str.into(),
            },
        })?;

        let metadata = XyzMetadata {
            comment: lines
                .get(count_idx + 1)
                .map(|l| l.trim().to_string())
                .unwrap_or_default(),
        };

        let mut atoms = Vec::with_capacity(declared.min(lines.len()));
        let records = lines
            .iter()
            .enumerate()
            .skip(count_idx + 2)
            .filter(|(_, l)| !l.trim().is_empty())
            .take(declared);

        for (idx, line) in records {
            let line_num = idx + 1;
            let fields: Vec<&str> = line.split_whitespace().collect();
            if fields.len() < 4 {
                return Err(FormatError::Parse {
                    line: line_num,
                    kind: FormatErrorKind::MissingFields {
                        found: fields.len(),
                    },
                });
            }
            let coordinates = fields[1..4]
                .iter()
                .map(|value| {
                    value.parse::<f64>().map_err(|_| FormatError::Parse {
                        line: line_num,
                        kind: FormatErrorKind::InvalidFloat {
                            value: (*value).into(),
                        },
                    })
                })
                .collect::<Result<Vec<f64>, _>>()?;
            atoms.push(RawAtom::new(fields[0], coordinates));
        }

        if atoms.len() != declared {
            return Err(FormatError::AtomCountMismatch {
                declared,
                found: atoms.len(),
            });
        }

        Ok((atoms, metadata))
    }

    fn write_to(
        geometry: &Geometry,
        metadata: &Self::Metadata,
        writer: &mut impl Write,
    ) -> Result<(), FormatError> {
        writeln!(writer, "{}", geometry.len())?;
        writeln!(writer, "{}", metadata.comment.lines().next().unwrap_or(""))?;
        for atom in geometry.atoms() {
            writeln!(
                writer,
                "{:<2} {} {} {}",
                atom.symbol(),
                atom.position.x,
                atom.position.y,
                atom.position.z
            )?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::io::BufReader;
    use tempfile::tempdir;

    fn read_str(content: &str) -> Result<(Vec<RawAtom>, XyzMetadata), FormatError> {
        XyzFile::read_from(&mut BufReader::new(content.as_bytes()))
    }

    #[test]
    fn read_from_parses_water() {
        let content = "3\nwater molecule\nO 0.0 0.0 0.1173\nH 0.0 0.7572 -0.4692\nH 0.0 -0.7572 -0.4692\n";
        let (atoms, metadata) = read_str(content).unwrap();

        assert_eq!(metadata.comment, "water molecule");
        assert_eq!(atoms.len(), 3);
        assert_eq!(atoms[0], RawAtom::new("O", [0.0, 0.0, 0.1173]));
        assert_eq!(atoms[2], RawAtom::new("H", [0.0, -0.7572, -0.4692]));
    }

    #[test]
    fn read_from_accepts_blank_comment_and_blank_separator_lines() {
        let content = "2\n\nH 0 0 -0.3675\n\nH 0 0 0.3675\n";
        let (atoms, metadata) = read_str(content).unwrap();
        assert_eq!(metadata.comment, "");
        assert_eq!(atoms.len(), 2);
    }

    #[test]
    fn read_from_ignores_records_beyond_declared_count() {
        let content = "1\ncomment\nH 0 0 0\nH 0 0 1\n";
        let (atoms, _) = read_str(content).unwrap();
        assert_eq!(atoms.len(), 1);
    }

    #[test]
    fn read_from_fails_when_fewer_than_two_non_empty_lines() {
        let err = read_str("1\n\n\n").unwrap_err();
        assert!(matches!(err, FormatError::TooShort { found: 1 }));
    }

    #[test]
    fn read_from_fails_when_count_is_not_an_integer() {
        let err = read_str("two\ncomment\nH 0 0 0\n").unwrap_err();
        assert!(matches!(
            err,
            FormatError::Parse {
                line: 1,
                kind: FormatErrorKind::InvalidCount { .. }
            }
        ));
    }

    #[test]
    fn read_from_fails_when_record_has_too_few_fields() {
        let err = read_str("1\ncomment\nH 0 0\n").unwrap_err();
        assert!(matches!(
            err,
            FormatError::Parse {
                line: 3,
                kind: FormatErrorKind::MissingFields { found: 3 }
            }
        ));
    }

    #[test]
    fn read_from_fails_on_non_numeric_coordinate() {
        let err = read_str("1\ncomment\nH 0 zero 0\n").unwrap_err();
        assert!(matches!(
            err,
            FormatError::Parse {
                line: 3,
                kind: FormatErrorKind::InvalidFloat { .. }
            }
        ));
    }

    #[test]
    fn parse_fails_when_declared_count_exceeds_data_lines() {
        let err = read_str("3\ncomment\nH 0 0 0\nH 0 0 1\n").unwrap_err();
        assert!(matches!(
            err,
            FormatError::AtomCountMismatch {
                declared: 3,
                found: 2
            }
        ));
    }

    #[test]
    fn parse_fails_cleanly_when_declared_count_is_enormous() {
        let err = read_str("18446744073709551615\ncomment\nH 0 0 0\n").unwrap_err();
        assert!(matches!(
            err,
            FormatError::AtomCountMismatch {
                declared: usize::MAX,
                found: 1
            }
        ));

        let err = read_str("1000000000000\ncomment\nH 0 0 0\n").unwrap_err();
        assert!(matches!(err, FormatError::AtomCountMismatch { found: 1, .. }));
    }

    #[test]
    fn read_from_path_annotates_errors_with_path() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("broken.xyz");
        fs::write(&path, "3\ncomment\nH 0 0 0\nH 0 0 1\n").unwrap();

        let err = XyzFile::read_from_path(&path).unwrap_err();
        assert!(matches!(err, FormatError::InFile { .. }));
        assert!(err.to_string().contains("broken.xyz"));
    }

    #[test]
    fn read_from_path_reports_missing_file() {
        let dir = tempdir().unwrap();
        let err = XyzFile::read_from_path(dir.path().join("missing.xyz")).unwrap_err();
        match err {
            FormatError::InFile { source, .. } => assert!(matches!(*source, FormatError::Io(_))),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn written_file_normalizes_back_to_the_same_geometry() {
        let geometry = Geometry::normalize(vec![
            ("C", vec![0.0, 0.0, 0.0]),
            ("O", vec![0.0, 0.0, 1.128]),
            ("H", vec![-0.123456789012345, 1e-9, 7.25]),
        ])
        .unwrap();
        let dir = tempdir().unwrap();
        let path = dir.path().join("out.xyz");
        let metadata = XyzMetadata {
            comment: "round trip".into(),
        };

        XyzFile::write_to_path(&geometry, &metadata, &path).unwrap();
        let (atoms, read_metadata) = XyzFile::read_from_path(&path).unwrap();

        assert_eq!(read_metadata, metadata);
        assert_eq!(Geometry::normalize(atoms).unwrap(), geometry);
    }
}
