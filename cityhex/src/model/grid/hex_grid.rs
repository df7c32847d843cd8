use super::{GridConfig, MetricProjection};
use crate::EngineError;
use cityhex_core::{model::HexCell, util::geo_utils};
use geo::{Area, Geometry, MultiPolygon};
use h3o::geom::TilerBuilder;
use itertools::Itertools;
use rayon::prelude::*;
use wkt::ToWkt;

/// the hexagonal discretization of a city, sorted by H3 index.
#[derive(Debug, Clone)]
pub struct HexGrid {
    resolution: h3o::Resolution,
    projection: MetricProjection,
    cells: Vec<HexCell>,
}

impl HexGrid {
    /// covers a city boundary with H3 cells.
    ///
    /// # Arguments
    ///
    /// * `boundary` - WGS84 polygonal boundary (Polygon, MultiPolygon or a GeometryCollection of them)
    /// * `config`   - resolution, containment rule and metric projection
    ///
    /// # Returns
    ///
    /// the de-duplicated grid sorted by cell index, with cell geometry in the
    /// metric CRS. an empty covering is not an error.
    pub fn build(boundary: &Geometry<f64>, config: &GridConfig) -> Result<HexGrid, EngineError> {
        config
            .validate()
            .map_err(EngineError::InvalidConfiguration)?;
        let resolution = h3o::Resolution::try_from(config.resolution)
            .map_err(|e| EngineError::InvalidConfiguration(e.to_string()))?;
        let polygons = validate_boundary(boundary)?;
        log::info!(
            "covering boundary of {} polygon(s) with h3({}) cells using '{}' containment",
            polygons.0.len(),
            resolution,
            config.containment
        );

        let mut tiler = TilerBuilder::new(resolution)
            .containment_mode(config.containment.into())
            .build();
        for polygon in polygons.0.into_iter() {
            tiler
                .add(polygon)
                .map_err(|e| EngineError::GridError(format!("failure adding boundary to h3 tiler: {e}")))?;
        }
        let indices = tiler.into_coverage().sorted().dedup().collect_vec();

        let projection = config.projection;
        let cells = indices
            .into_par_iter()
            .map(|cell| {
                let line: geo::LineString = cell.boundary().into();
                let polygon = projection.project_polygon(&geo::Polygon::new(line, vec![]));
                HexCell::from_polygon(cell.to_string(), polygon).map_err(|e| {
                    EngineError::GridError(format!("failure creating cell {cell}: {e}"))
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        if cells.is_empty() {
            log::warn!("boundary covering produced no cells");
        } else {
            log::info!("created grid with {} cells", cells.len());
        }
        Ok(HexGrid {
            resolution,
            projection,
            cells,
        })
    }

    pub fn from_cells(
        resolution: h3o::Resolution,
        projection: MetricProjection,
        cells: Vec<HexCell>,
    ) -> HexGrid {
        let cells = cells
            .into_iter()
            .sorted_by(|a, b| a.id().cmp(b.id()))
            .dedup_by(|a, b| a.id() == b.id())
            .collect_vec();
        HexGrid {
            resolution,
            projection,
            cells,
        }
    }

    pub fn cells(&self) -> &[HexCell] {
        &self.cells
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn resolution(&self) -> h3o::Resolution {
        self.resolution
    }

    pub fn projection(&self) -> MetricProjection {
        self.projection
    }
}

fn validate_boundary(boundary: &Geometry<f64>) -> Result<MultiPolygon<f64>, EngineError> {
    let polygons = geo_utils::collect_polygons(boundary)
        .map_err(|e| EngineError::InvalidBoundary(e.to_string()))?;
    if polygons.0.is_empty() {
        return Err(EngineError::InvalidBoundary(String::from(
            "boundary contains no polygons",
        )));
    }
    let area = polygons.unsigned_area();
    if !area.is_finite() || area <= 0.0 {
        return Err(EngineError::InvalidBoundary(format!(
            "boundary has no area: {}",
            polygons.to_wkt()
        )));
    }
    Ok(polygons)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::grid::{Containment, Hemisphere};
    use geo::{polygon, LineString};

    fn stuttgart_center() -> Geometry<f64> {
        Geometry::Polygon(polygon![
            (x: 9.16, y: 48.77),
            (x: 9.20, y: 48.77),
            (x: 9.20, y: 48.79),
            (x: 9.16, y: 48.79),
        ])
    }

    fn config(containment: Containment) -> GridConfig {
        GridConfig {
            resolution: 8,
            containment,
            projection: MetricProjection::Utm {
                zone: 32,
                hemisphere: Hemisphere::North,
            },
        }
    }

    #[test]
    fn test_grid_is_sorted_and_deterministic() {
        let a = HexGrid::build(&stuttgart_center(), &config(Containment::IntersectsBoundary))
            .expect("grid builds");
        let b = HexGrid::build(&stuttgart_center(), &config(Containment::IntersectsBoundary))
            .expect("grid builds");
        assert!(!a.is_empty());
        let ids_a = a.cells().iter().map(|c| c.id().to_string()).collect_vec();
        let ids_b = b.cells().iter().map(|c| c.id().to_string()).collect_vec();
        assert_eq!(ids_a, ids_b);
        let mut sorted = ids_a.clone();
        sorted.sort();
        sorted.dedup();
        assert_eq!(ids_a, sorted);
    }

    #[test]
    fn test_cells_are_metric() {
        let grid = HexGrid::build(&stuttgart_center(), &config(Containment::IntersectsBoundary))
            .expect("grid builds");
        // resolution 8 hexagons average ~0.737 km2
        for cell in grid.cells() {
            assert!(
                cell.area_m2() > 400_000.0 && cell.area_m2() < 1_100_000.0,
                "unexpected area {} for cell {}",
                cell.area_m2(),
                cell.id()
            );
            assert!(cell.centroid().x() > 400_000.0 && cell.centroid().x() < 600_000.0);
        }
    }

    #[test]
    fn test_intersects_covers_more_than_centroid() {
        let intersects =
            HexGrid::build(&stuttgart_center(), &config(Containment::IntersectsBoundary))
                .expect("grid builds");
        let centroid = HexGrid::build(&stuttgart_center(), &config(Containment::ContainsCentroid))
            .expect("grid builds");
        assert!(intersects.len() >= centroid.len());
    }

    #[test]
    fn test_invalid_boundaries() {
        let line = Geometry::LineString(LineString::from(vec![(9.0, 48.0), (9.1, 48.1)]));
        let empty = Geometry::MultiPolygon(MultiPolygon::new(vec![]));
        let flat = Geometry::Polygon(polygon![
            (x: 9.0, y: 48.0),
            (x: 9.1, y: 48.0),
            (x: 9.2, y: 48.0),
        ]);
        for boundary in [line, empty, flat] {
            match HexGrid::build(&boundary, &config(Containment::IntersectsBoundary)) {
                Err(EngineError::InvalidBoundary(_)) => {}
                other => panic!("expected InvalidBoundary, found {other:?}"),
            }
        }
    }

    #[test]
    fn test_invalid_resolution() {
        let mut c = config(Containment::IntersectsBoundary);
        c.resolution = 16;
        assert!(HexGrid::build(&stuttgart_center(), &c).is_err());
    }
}
