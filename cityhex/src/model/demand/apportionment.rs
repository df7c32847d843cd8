use crate::{model::grid::HexGrid, model::scorer, EngineError};
use cityhex_core::{model::PolygonFeature, util::geo_utils};
use geo::{Area, BooleanOps, MultiPolygon};
use rstar::{
    primitives::{GeomWithData, Rectangle},
    RTree, AABB,
};

const M2_PER_KM2: f64 = 1_000_000.0;

/// demand values distributed onto the grid.
#[derive(Debug, Clone, PartialEq)]
pub struct Apportionment {
    /// apportioned total per cell, in grid order
    pub totals: Vec<f64>,
    /// apportioned total per km² of cell area, in grid order
    pub densities: Vec<f64>,
    /// polygons skipped because they carry no value or have no area
    pub skipped: usize,
}

/// distributes the value carried by each demand polygon onto the cells it
/// overlaps, in proportion to the share of the polygon's area that falls in
/// each cell.
///
/// # Arguments
///
/// * `grid`    - the hex grid
/// * `demand`  - polygons carrying a value (e.g. district population)
///
/// # Returns
///
/// per-cell totals and densities. cells overlapping no polygon receive 0
pub fn apportion(grid: &HexGrid, demand: &[PolygonFeature]) -> Result<Apportionment, EngineError> {
    let mut skipped = 0;
    let mut entries: Vec<GeomWithData<Rectangle<[f64; 2]>, (usize, f64, f64)>> = vec![];
    for (idx, polygon) in demand.iter().enumerate() {
        let value = match polygon.value {
            Some(v) if v.is_finite() => v,
            _ => {
                skipped += 1;
                continue;
            }
        };
        let area = polygon.area_m2();
        let envelope = geo_utils::get_multipolygon_envelope(polygon.geometry());
        match envelope {
            Some(env) if area > 0.0 => {
                let rect = Rectangle::from_corners(env.lower(), env.upper());
                entries.push(GeomWithData::new(rect, (idx, value, area)));
            }
            _ => skipped += 1,
        }
    }
    if skipped > 0 {
        log::warn!("skipped {skipped} demand polygons without a value or an area");
    }
    let rtree = RTree::bulk_load(entries);

    let totals = scorer::map_grid(grid, "apportion demand", |cell| {
        let cell_polygon = MultiPolygon::new(vec![cell.polygon().clone()]);
        let query = match geo_utils::get_multipolygon_envelope(&cell_polygon) {
            Some(e) => AABB::from_corners(e.lower(), e.upper()),
            None => return 0.0,
        };
        let mut hits = rtree
            .locate_in_envelope_intersecting(&query)
            .map(|obj| obj.data)
            .collect::<Vec<_>>();
        hits.sort_by_key(|(idx, _, _)| *idx);
        hits.into_iter()
            .map(|(idx, value, area)| {
                let shared = cell_polygon
                    .intersection(demand[idx].geometry())
                    .unsigned_area();
                value * shared / area
            })
            .sum::<f64>()
    })?;

    let densities = grid
        .cells()
        .iter()
        .zip(totals.iter())
        .map(|(cell, total)| {
            let km2 = cell.area_m2() / M2_PER_KM2;
            if km2 > 0.0 {
                total / km2
            } else {
                f64::NAN
            }
        })
        .collect();

    Ok(Apportionment {
        totals,
        densities,
        skipped,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::grid::MetricProjection;
    use cityhex_core::model::HexCell;
    use geo::polygon;

    fn square_cell(id: &str, x0: f64, size: f64) -> HexCell {
        let p = polygon![
            (x: x0, y: 0.0),
            (x: x0 + size, y: 0.0),
            (x: x0 + size, y: size),
            (x: x0, y: size),
        ];
        HexCell::from_polygon(id.to_string(), p).expect("valid cell")
    }

    fn grid() -> HexGrid {
        let resolution = h3o::Resolution::try_from(8_u8).expect("valid resolution");
        HexGrid::from_cells(
            resolution,
            MetricProjection::WebMercator,
            vec![square_cell("a", 0.0, 1000.0), square_cell("b", 1000.0, 1000.0)],
        )
    }

    #[test]
    fn test_area_share() {
        // a district straddling both cells, 3/4 of it inside cell "a"
        let district = polygon![
            (x: 250.0, y: 0.0),
            (x: 1250.0, y: 0.0),
            (x: 1250.0, y: 1000.0),
            (x: 250.0, y: 1000.0),
        ];
        let demand = vec![PolygonFeature::new(
            "district",
            MultiPolygon::new(vec![district]),
            Some(1000.0),
        )];
        let result = apportion(&grid(), &demand).expect("apportionment succeeds");
        assert!((result.totals[0] - 750.0).abs() < 1e-6);
        assert!((result.totals[1] - 250.0).abs() < 1e-6);
        assert!((result.densities[0] - 750.0).abs() < 1e-6);
        let sum: f64 = result.totals.iter().sum();
        assert!((sum - 1000.0).abs() < 1e-6);
    }

    #[test]
    fn test_missing_values_skipped() {
        let district = polygon![
            (x: 0.0, y: 0.0),
            (x: 100.0, y: 0.0),
            (x: 100.0, y: 100.0),
        ];
        let demand = vec![PolygonFeature::new(
            "district",
            MultiPolygon::new(vec![district]),
            None,
        )];
        let result = apportion(&grid(), &demand).expect("apportionment succeeds");
        assert_eq!(result.skipped, 1);
        assert_eq!(result.totals, vec![0.0, 0.0]);
    }
}
