//! WGS-84 conversions between ECEF coordinates and geodetic positions.
//!
//! Ground-station samples are passed through a geodetic round trip before
//! they enter a trajectory, optionally with the height clamped to the
//! ellipsoid surface.

use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

use crate::model::Coordinate;

/// WGS-84 semi-major axis (meters)
pub const WGS84_A: f64 = 6_378_137.0;
/// WGS-84 flattening
pub const WGS84_F: f64 = 1.0 / 298.257_223_563;
/// First eccentricity squared
pub const WGS84_E2: f64 = WGS84_F * (2.0 - WGS84_F);

/// Points closer than this to the Earth's center have no usable geodetic form
const CENTER_TOLERANCE_M: f64 = 1.0;
const MAX_ITERATIONS: usize = 25;
const LATITUDE_EPSILON: f64 = 1e-15;

/// Longitude/latitude in radians, height in meters above the ellipsoid
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Geodetic {
    pub longitude: f64,
    pub latitude: f64,
    pub height: f64,
}

impl Geodetic {
    pub fn from_degrees(longitude_deg: f64, latitude_deg: f64, height: f64) -> Self {
        Self {
            longitude: longitude_deg.to_radians(),
            latitude: latitude_deg.to_radians(),
            height,
        }
    }

    pub fn longitude_deg(&self) -> f64 {
        self.longitude.to_degrees()
    }

    pub fn latitude_deg(&self) -> f64 {
        self.latitude.to_degrees()
    }
}

fn prime_vertical_radius(sin_lat: f64) -> f64 {
    WGS84_A / (1.0 - WGS84_E2 * sin_lat * sin_lat).sqrt()
}

/// Convert an ECEF position to geodetic coordinates.
///
/// Returns `None` for non-finite input or points at the Earth's center.
pub fn to_geodetic(ecef: &Coordinate) -> Option<Geodetic> {
    let (x, y, z) = (ecef.x, ecef.y, ecef.z);
    if !(x.is_finite() && y.is_finite() && z.is_finite()) || ecef.norm() < CENTER_TOLERANCE_M {
        return None;
    }

    let p = x.hypot(y);
    let longitude = y.atan2(x);

    let mut latitude = z.atan2(p * (1.0 - WGS84_E2));
    for _ in 0..MAX_ITERATIONS {
        let n = prime_vertical_radius(latitude.sin());
        let next = (z + WGS84_E2 * n * latitude.sin()).atan2(p);
        let delta = (next - latitude).abs();
        latitude = next;
        if delta < LATITUDE_EPSILON {
            break;
        }
    }

    let (sin_lat, cos_lat) = latitude.sin_cos();
    let n = prime_vertical_radius(sin_lat);
    let height = if cos_lat.abs() > 1e-10 {
        p / cos_lat - n
    } else {
        z.abs() - n * (1.0 - WGS84_E2)
    };

    if !(latitude.is_finite() && height.is_finite()) {
        return None;
    }

    Some(Geodetic {
        longitude,
        latitude,
        height,
    })
}

/// Convert geodetic coordinates back to ECEF
pub fn from_geodetic(geodetic: &Geodetic) -> Coordinate {
    let (sin_lat, cos_lat) = geodetic.latitude.sin_cos();
    let (sin_lon, cos_lon) = geodetic.longitude.sin_cos();
    let n = prime_vertical_radius(sin_lat);

    Vector3::new(
        (n + geodetic.height) * cos_lat * cos_lon,
        (n + geodetic.height) * cos_lat * sin_lon,
        (n * (1.0 - WGS84_E2) + geodetic.height) * sin_lat,
    )
}

/// Re-derive a ground-station sample from its own longitude/latitude/height.
///
/// With `clamp_height` the sample is placed on the ellipsoid surface. Samples
/// that cannot be converted are returned unchanged.
pub fn normalize_ground_sample(ecef: Coordinate, clamp_height: bool) -> Coordinate {
    match to_geodetic(&ecef) {
        Some(mut geodetic) => {
            if clamp_height {
                geodetic.height = 0.0;
            }
            from_geodetic(&geodetic)
        }
        None => {
            log::warn!(
                "Ground sample ({:.2}, {:.2}, {:.2}) has no geodetic form, keeping raw position",
                ecef.x,
                ecef.y,
                ecef.z
            );
            ecef
        }
    }
}
