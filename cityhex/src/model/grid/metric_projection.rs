use geo::{Coord, LineString, Polygon};
use serde::{Deserialize, Serialize};
use std::{f64::consts::PI, fmt::Display};

/// WGS84 semi-major axis in meters
const WGS84_A: f64 = 6378137.0;
/// WGS84 flattening
const WGS84_F: f64 = 1.0 / 298.257223563;
const UTM_K0: f64 = 0.9996;
const UTM_FALSE_EASTING: f64 = 500000.0;
const UTM_FALSE_NORTHING_SOUTH: f64 = 10000000.0;
/// latitude limit of the web mercator square
const WEB_MERCATOR_MAX_LAT: f64 = 85.051_128_779_806_59;

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Hemisphere {
    North,
    South,
}

/// projected CRS, in meters, that every distance and area is computed in.
/// input layers other than the city boundary must already be in this CRS.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case", tag = "type")]
pub enum MetricProjection {
    /// spherical mercator, EPSG:3857
    #[default]
    WebMercator,
    /// transverse mercator on the WGS84 ellipsoid, e.g. zone 32 north is EPSG:32632 / EPSG:25832
    Utm { zone: u8, hemisphere: Hemisphere },
}

impl Display for MetricProjection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MetricProjection::WebMercator => write!(f, "web mercator"),
            MetricProjection::Utm { zone, hemisphere } => {
                let h = match hemisphere {
                    Hemisphere::North => "N",
                    Hemisphere::South => "S",
                };
                write!(f, "utm {zone}{h}")
            }
        }
    }
}

impl MetricProjection {
    pub fn validate(&self) -> Result<(), String> {
        match self {
            MetricProjection::WebMercator => Ok(()),
            MetricProjection::Utm { zone, .. } if (1..=60).contains(zone) => Ok(()),
            MetricProjection::Utm { zone, .. } => {
                Err(format!("utm zone must be in [1, 60], found {zone}"))
            }
        }
    }

    /// projects a WGS84 coordinate (x = longitude, y = latitude, degrees).
    pub fn project(&self, coord: Coord<f64>) -> Coord<f64> {
        match self {
            MetricProjection::WebMercator => web_mercator(coord),
            MetricProjection::Utm { zone, hemisphere } => utm(coord, *zone, *hemisphere),
        }
    }

    pub fn project_polygon(&self, polygon: &Polygon<f64>) -> Polygon<f64> {
        let exterior = self.project_line(polygon.exterior());
        let interiors = polygon
            .interiors()
            .iter()
            .map(|ring| self.project_line(ring))
            .collect();
        Polygon::new(exterior, interiors)
    }

    fn project_line(&self, line: &LineString<f64>) -> LineString<f64> {
        line.coords().map(|c| self.project(*c)).collect()
    }
}

fn web_mercator(coord: Coord<f64>) -> Coord<f64> {
    let lat = coord
        .y
        .clamp(-WEB_MERCATOR_MAX_LAT, WEB_MERCATOR_MAX_LAT)
        .to_radians();
    Coord {
        x: WGS84_A * coord.x.to_radians(),
        y: WGS84_A * (PI / 4.0 + lat / 2.0).tan().ln(),
    }
}

/// forward transverse mercator series (Snyder, Map Projections: A Working Manual, eq. 8-9 to 8-10)
fn utm(coord: Coord<f64>, zone: u8, hemisphere: Hemisphere) -> Coord<f64> {
    let e2 = WGS84_F * (2.0 - WGS84_F);
    let e4 = e2 * e2;
    let e6 = e4 * e2;
    let ep2 = e2 / (1.0 - e2);

    let phi = coord.y.to_radians();
    let lambda = coord.x.to_radians();
    let lambda0 = (zone as f64 * 6.0 - 183.0).to_radians();

    let (sin_phi, cos_phi) = phi.sin_cos();
    let tan_phi = phi.tan();
    let n = WGS84_A / (1.0 - e2 * sin_phi * sin_phi).sqrt();
    let t = tan_phi * tan_phi;
    let c = ep2 * cos_phi * cos_phi;
    let a = cos_phi * (lambda - lambda0);
    let m = WGS84_A
        * ((1.0 - e2 / 4.0 - 3.0 * e4 / 64.0 - 5.0 * e6 / 256.0) * phi
            - (3.0 * e2 / 8.0 + 3.0 * e4 / 32.0 + 45.0 * e6 / 1024.0) * (2.0 * phi).sin()
            + (15.0 * e4 / 256.0 + 45.0 * e6 / 1024.0) * (4.0 * phi).sin()
            - (35.0 * e6 / 3072.0) * (6.0 * phi).sin());

    let a2 = a * a;
    let a3 = a2 * a;
    let a4 = a3 * a;
    let a5 = a4 * a;
    let a6 = a5 * a;

    let x = UTM_K0
        * n
        * (a + (1.0 - t + c) * a3 / 6.0
            + (5.0 - 18.0 * t + t * t + 72.0 * c - 58.0 * ep2) * a5 / 120.0)
        + UTM_FALSE_EASTING;
    let mut y = UTM_K0
        * (m + n
            * tan_phi
            * (a2 / 2.0
                + (5.0 - t + 9.0 * c + 4.0 * c * c) * a4 / 24.0
                + (61.0 - 58.0 * t + t * t + 600.0 * c - 330.0 * ep2) * a6 / 720.0));
    if hemisphere == Hemisphere::South {
        y += UTM_FALSE_NORTHING_SOUTH;
    }
    Coord { x, y }
}
