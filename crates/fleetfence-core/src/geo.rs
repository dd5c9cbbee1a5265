//! Geographic coordinates and the small amount of spherical math geofences need.

use kurbo::Point;
use serde::{Deserialize, Serialize};

/// Mean Earth radius in meters (IUGG).
pub const EARTH_RADIUS_M: f64 = 6_371_008.8;

/// A WGS84 coordinate in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl LatLng {
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Great-circle distance to `other` in meters.
    pub fn distance_to(&self, other: LatLng) -> f64 {
        let (lat1, lat2) = (self.lat.to_radians(), other.lat.to_radians());
        let dlat = lat2 - lat1;
        let dlng = (other.lng - self.lng).to_radians();
        let a = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlng / 2.0).sin().powi(2);
        2.0 * EARTH_RADIUS_M * a.sqrt().atan2((1.0 - a).sqrt())
    }

    /// Shift by a delta in degrees. Used for whole-shape drags.
    pub fn offset(&self, delta: LatLngDelta) -> LatLng {
        LatLng::new(self.lat + delta.dlat, self.lng + delta.dlng)
    }

    /// Project onto a local tangent plane around `origin`, in meters.
    ///
    /// Equirectangular; accurate enough at geofence scale (a few km).
    pub fn to_local(&self, origin: LatLng) -> Point {
        let cos_lat = origin.lat.to_radians().cos();
        Point::new(
            (self.lng - origin.lng).to_radians() * EARTH_RADIUS_M * cos_lat,
            (self.lat - origin.lat).to_radians() * EARTH_RADIUS_M,
        )
    }

    /// Finite and within WGS84 bounds.
    pub fn is_valid(&self) -> bool {
        self.lat.is_finite()
            && self.lng.is_finite()
            && (-90.0..=90.0).contains(&self.lat)
            && (-180.0..=180.0).contains(&self.lng)
    }
}

impl From<(f64, f64)> for LatLng {
    fn from((lat, lng): (f64, f64)) -> Self {
        Self::new(lat, lng)
    }
}

/// A translation in degrees, as reported by a drag event.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct LatLngDelta {
    pub dlat: f64,
    pub dlng: f64,
}

impl LatLngDelta {
    pub const fn new(dlat: f64, dlng: f64) -> Self {
        Self { dlat, dlng }
    }

    /// Delta that carries `from` onto `to`.
    pub fn between(from: LatLng, to: LatLng) -> Self {
        Self::new(to.lat - from.lat, to.lng - from.lng)
    }
}

/// Arithmetic mean of a set of coordinates. `None` for an empty slice.
pub fn centroid(points: &[LatLng]) -> Option<LatLng> {
    if points.is_empty() {
        return None;
    }
    let n = points.len() as f64;
    let (lat, lng) = points
        .iter()
        .fold((0.0, 0.0), |(lat, lng), p| (lat + p.lat, lng + p.lng));
    Some(LatLng::new(lat / n, lng / n))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_centroid_of_triangle() {
        let pts = [
            LatLng::new(30.0, -90.0),
            LatLng::new(31.0, -91.0),
            LatLng::new(29.0, -92.0),
        ];
        let c = centroid(&pts).unwrap();
        assert!((c.lat - 30.0).abs() < 1e-12);
        assert!((c.lng + 91.0).abs() < 1e-12);
    }

    #[test]
    fn test_centroid_empty() {
        assert!(centroid(&[]).is_none());
    }

    #[test]
    fn test_distance_one_degree_latitude() {
        let a = LatLng::new(0.0, 0.0);
        let b = LatLng::new(1.0, 0.0);
        let d = a.distance_to(b);
        // ~111.2 km
        assert!((d - 111_195.0).abs() < 100.0, "got {d}");
    }

    #[test]
    fn test_to_local_origin_is_zero() {
        let origin = LatLng::new(32.7767, -96.7970);
        let p = origin.to_local(origin);
        assert!(p.x.abs() < f64::EPSILON && p.y.abs() < f64::EPSILON);
    }

    #[test]
    fn test_delta_between_round_trips() {
        let a = LatLng::new(10.0, 20.0);
        let b = LatLng::new(10.5, 19.25);
        let delta = LatLngDelta::between(a, b);
        assert_eq!(delta, LatLngDelta::new(0.5, -0.75));
        let moved = a.offset(delta);
        assert!((moved.lat - b.lat).abs() < 1e-12);
        assert!((moved.lng - b.lng).abs() < 1e-12);
    }

    #[test]
    fn test_validity() {
        assert!(LatLng::new(45.0, 170.0).is_valid());
        assert!(!LatLng::new(91.0, 0.0).is_valid());
        assert!(!LatLng::new(f64::NAN, 0.0).is_valid());
    }
}
