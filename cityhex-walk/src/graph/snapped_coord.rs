use geo::Coord;

/// a coordinate expressed as integer multiples of the snapping precision, so
/// that endpoints closer than half the precision hash to the same key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SnappedCoord {
    x: i64,
    y: i64,
}

/// largest grid index that survives the round trip through f64.
const MAX_GRID_INDEX: f64 = (1_i64 << 53) as f64;

impl SnappedCoord {
    /// snaps a coordinate to the precision grid. non-finite coordinates, and
    /// coordinates too far out to be represented on the grid, have no key.
    pub fn new(coord: Coord<f64>, precision: f64) -> Option<SnappedCoord> {
        let x = (coord.x / precision).round();
        let y = (coord.y / precision).round();
        if !(x.abs() <= MAX_GRID_INDEX && y.abs() <= MAX_GRID_INDEX) {
            return None;
        }
        Some(SnappedCoord {
            x: x as i64,
            y: y as i64,
        })
    }

    /// the coordinate this key represents.
    pub fn to_coord(self, precision: f64) -> Coord<f64> {
        Coord {
            x: self.x as f64 * precision,
            y: self.y as f64 * precision,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::SnappedCoord;
    use geo::coord;

    fn snap(x: f64, y: f64) -> SnappedCoord {
        SnappedCoord::new(coord! {x: x, y: y}, 0.1).expect("finite coordinate")
    }

    #[test]
    fn test_near_duplicates_collapse() {
        let a = snap(100.04, 20.01);
        let b = snap(99.96, 19.99);
        let c = snap(100.2, 20.0);
        assert_eq!(a, b);
        assert_ne!(a, c);
        let snapped = a.to_coord(0.1);
        assert!((snapped.x - 100.0).abs() < 1e-9);
        assert!((snapped.y - 20.0).abs() < 1e-9);
    }

    #[test]
    fn test_non_finite_has_no_key() {
        assert!(SnappedCoord::new(coord! {x: f64::NAN, y: 0.0}, 0.1).is_none());
        assert!(SnappedCoord::new(coord! {x: 0.0, y: f64::INFINITY}, 0.1).is_none());
        assert!(SnappedCoord::new(coord! {x: 1e300, y: 0.0}, 0.1).is_none());
    }
}
