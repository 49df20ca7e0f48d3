use super::element::Element;
use crate::engine::error::FormatError;
use nalgebra::Point3;

/// An atom as supplied by a caller or a file, before validation.
///
/// The coordinate list may have any length; [`Geometry::normalize`] enforces exactly three.
#[derive(Debug, Clone, PartialEq)]
pub struct RawAtom {
    pub symbol: String,
    pub coordinates: Vec<f64>,
}

impl RawAtom {
    pub fn new(symbol: impl Into<String>, coordinates: impl Into<Vec<f64>>) -> Self {
        Self {
            symbol: symbol.into(),
            coordinates: coordinates.into(),
        }
    }
}

impl<S: Into<String>, C: Into<Vec<f64>>> From<(S, C)> for RawAtom {
    fn from((symbol, coordinates): (S, C)) -> Self {
        Self::new(symbol, coordinates)
    }
}

/// A validated atom with a canonical element symbol and a position in the input unit.
#[derive(Debug, Clone, PartialEq)]
pub struct Atom {
    pub element: Element,
    pub position: Point3<f64>,
}

impl Atom {
    pub fn symbol(&self) -> &'static str {
        self.element.symbol()
    }
}

/// An ordered, non-empty list of atoms.
///
/// Atom order is physically meaningful (it fixes the order of basis functions) and is
/// preserved exactly from the input.
#[derive(Debug, Clone, PartialEq)]
pub struct Geometry {
    atoms: Vec<Atom>,
}

impl Geometry {
    pub fn normalize<I>(raw: I) -> Result<Self, FormatError>
    where
        I: IntoIterator,
        I::Item: Into<RawAtom>,
    {
        let mut atoms = Vec::new();
        for (index, item) in raw.into_iter().enumerate() {
            let RawAtom {
                symbol,
                coordinates,
            } = item.into();

            if coordinates.len() != 3 {
                return Err(FormatError::CoordinateArity {
                    index,
                    symbol,
                    found: coordinates.len(),
                });
            }
            if let Some(axis) = coordinates.iter().position(|c| !c.is_finite()) {
                return Err(FormatError::NonFiniteCoordinate {
                    index,
                    symbol,
                    axis,
                });
            }
            let element = Element::from_symbol(&symbol)
                .ok_or_else(|| FormatError::UnknownElement { index, symbol })?;

            atoms.push(Atom {
                element,
                position: Point3::new(coordinates[0], coordinates[1], coordinates[2]),
            });
        }

        if atoms.is_empty() {
            return Err(FormatError::EmptyGeometry);
        }
        Ok(Self { atoms })
    }

    /// Two atoms on the z axis, centred on the origin and `bond_length` apart.
    pub fn diatomic(first: Element, second: Element, bond_length: f64) -> Self {
        let half = bond_length / 2.0;
        Self {
            atoms: vec![
                Atom {
                    element: first,
                    position: Point3::new(0.0, 0.0, -half),
                },
                Atom {
                    element: second,
                    position: Point3::new(0.0, 0.0, half),
                },
            ],
        }
    }

    pub fn atoms(&self) -> &[Atom] {
        &self.atoms
    }

    pub fn len(&self) -> usize {
        self.atoms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.atoms.is_empty()
    }

    pub fn to_raw(&self) -> Vec<RawAtom> {
        self.atoms
            .iter()
            .map(|a| RawAtom::new(a.symbol(), [a.position.x, a.position.y, a.position.z]))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_preserves_order_and_coordinates() {
        let geometry = Geometry::normalize(vec![
            ("O", vec![0.0, 0.0, 0.1173]),
            ("H", vec![0.0, 0.7572, -0.4692]),
            ("h", vec![0.0, -0.7572, -0.4692]),
        ])
        .unwrap();

        let symbols: Vec<_> = geometry.atoms().iter().map(Atom::symbol).collect();
        assert_eq!(symbols, vec!["O", "H", "H"]);
        assert_eq!(geometry.atoms()[2].position, Point3::new(0.0, -0.7572, -0.4692));
    }

    #[test]
    fn normalize_accepts_fixed_size_arrays() {
        let geometry = Geometry::normalize([("H", [0.0, 0.0, -0.3675]), ("H", [0.0, 0.0, 0.3675])])
            .unwrap();
        assert_eq!(geometry.len(), 2);
    }

    #[test]
    fn normalize_rejects_coordinates_with_wrong_arity() {
        let err = Geometry::normalize(vec![("H", vec![0.0, 0.0])]).unwrap_err();
        assert!(matches!(
            err,
            FormatError::CoordinateArity {
                index: 0,
                found: 2,
                ..
            }
        ));
    }

    #[test]
    fn normalize_rejects_non_finite_coordinates() {
        let err = Geometry::normalize(vec![("H", vec![0.0, f64::NAN, 0.0])]).unwrap_err();
        assert!(matches!(err, FormatError::NonFiniteCoordinate { axis: 1, .. }));
    }

    #[test]
    fn normalize_rejects_unknown_elements() {
        let err = Geometry::normalize(vec![("Qq", vec![0.0, 0.0, 0.0])]).unwrap_err();
        assert!(matches!(err, FormatError::UnknownElement { index: 0, .. }));
    }

    #[test]
    fn normalize_rejects_empty_geometry() {
        let err = Geometry::normalize(Vec::<RawAtom>::new()).unwrap_err();
        assert!(matches!(err, FormatError::EmptyGeometry));
    }

    #[test]
    fn diatomic_is_centred_on_origin() {
        let hydrogen = Element::from_symbol("H").unwrap();
        let geometry = Geometry::diatomic(hydrogen, hydrogen, 0.735);
        assert_eq!(geometry.atoms()[0].position.z, -0.3675);
        assert_eq!(geometry.atoms()[1].position.z, 0.3675);
    }

    #[test]
    fn to_raw_round_trips_through_normalize() {
        let geometry = Geometry::normalize(vec![("Li", vec![0.1, 0.2, 0.3])]).unwrap();
        let again = Geometry::normalize(geometry.to_raw()).unwrap();
        assert_eq!(geometry, again);
    }
}
