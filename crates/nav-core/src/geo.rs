//! Geographic coordinate type and great-circle helpers.
//!
//! `GeoPoint` stores double-precision degrees.  Route lengths are sums of
//! many short haversine legs, and the instruction builder must reproduce the
//! same sum leg by leg, so `f64` is used throughout.

use crate::{CoreError, CoreResult};

/// Mean Earth radius in metres used by every distance computation.
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// A WGS-84 geographic coordinate in degrees.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

impl GeoPoint {
    #[inline]
    pub const fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Checked constructor for coordinates arriving from outside the process.
    pub fn try_new(lat: f64, lon: f64) -> CoreResult<Self> {
        let ok = lat.is_finite()
            && lon.is_finite()
            && (-90.0..=90.0).contains(&lat)
            && (-180.0..=180.0).contains(&lon);
        if ok {
            Ok(Self { lat, lon })
        } else {
            Err(CoreError::InvalidCoordinate { lat, lon })
        }
    }

    /// Haversine great-circle distance in metres.
    #[inline]
    pub fn distance_m(self, other: GeoPoint) -> f64 {
        haversine_m(self.lat, self.lon, other.lat, other.lon)
    }

    /// Initial bearing from `self` towards `other`, in `[0, 360)` degrees
    /// clockwise from true north.
    #[inline]
    pub fn bearing_deg(self, other: GeoPoint) -> f64 {
        bearing_deg(self.lat, self.lon, other.lat, other.lon)
    }
}

impl std::fmt::Display for GeoPoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:.6}, {:.6})", self.lat, self.lon)
    }
}

/// Haversine distance in metres between two `(lat, lon)` pairs in degrees.
pub fn haversine_m(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let d_lat = (lat2 - lat1).to_radians();
    let d_lon = (lon2 - lon1).to_radians();

    let phi1 = lat1.to_radians();
    let phi2 = lat2.to_radians();

    let a = (d_lat * 0.5).sin().powi(2) + phi1.cos() * phi2.cos() * (d_lon * 0.5).sin().powi(2);

    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
    EARTH_RADIUS_M * c
}

/// Forward azimuth from `(lat1, lon1)` to `(lat2, lon2)`, normalised to
/// `[0, 360)`.
pub fn bearing_deg(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let phi1 = lat1.to_radians();
    let phi2 = lat2.to_radians();
    let d_lon = (lon2 - lon1).to_radians();

    let y = d_lon.sin() * phi2.cos();
    let x = phi1.cos() * phi2.sin() - phi1.sin() * phi2.cos() * d_lon.cos();

    let deg = y.atan2(x).to_degrees().rem_euclid(360.0);
    // rem_euclid can round a tiny negative up to exactly 360.
    if deg >= 360.0 { 0.0 } else { deg }
}

/// Fold an angle in degrees into `(-180, 180]`.
///
/// Positive results are clockwise (rightward) turns.
pub fn normalize_angle(deg: f64) -> f64 {
    let mut a = deg % 360.0;
    if a <= -180.0 {
        a += 360.0;
    } else if a > 180.0 {
        a -= 360.0;
    }
    a
}
