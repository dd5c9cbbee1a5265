//! Circle geofence geometry.

use super::GeometryTrait;
use crate::geo::{LatLng, LatLngDelta};
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// A circle on the Earth's surface.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Circle {
    /// Center coordinate.
    pub center: LatLng,
    /// Radius in meters.
    pub radius: f64,
}

impl Circle {
    /// Create a new circle. Negative radii are clamped to zero.
    pub fn new(center: LatLng, radius: f64) -> Self {
        Self {
            center,
            radius: radius.max(0.0),
        }
    }

    /// Move the circle.
    pub fn set_center(&mut self, center: LatLng) {
        self.center = center;
    }

    /// Set the radius in meters. Negative values clamp to zero.
    pub fn set_radius(&mut self, radius: f64) {
        self.radius = radius.max(0.0);
    }
}

impl GeometryTrait for Circle {
    fn center(&self) -> LatLng {
        self.center
    }

    fn area(&self) -> f64 {
        PI * self.radius * self.radius
    }

    fn contains(&self, point: LatLng) -> bool {
        self.center.distance_to(point) <= self.radius
    }

    fn translate(&mut self, delta: LatLngDelta) {
        self.center = self.center.offset(delta);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_circle_creation() {
        let circle = Circle::new(LatLng::new(32.7767, -96.7970), 500.0);
        assert!((circle.radius - 500.0).abs() < f64::EPSILON);
        assert_eq!(circle.center(), LatLng::new(32.7767, -96.7970));
    }

    #[test]
    fn test_negative_radius_clamped() {
        let mut circle = Circle::new(LatLng::default(), -5.0);
        assert_eq!(circle.radius, 0.0);
        circle.set_radius(-1.0);
        assert_eq!(circle.radius, 0.0);
    }

    #[test]
    fn test_area() {
        let circle = Circle::new(LatLng::default(), 10.0);
        assert!((circle.area() - 100.0 * PI).abs() < 1e-9);
    }

    #[test]
    fn test_contains() {
        let circle = Circle::new(LatLng::new(0.0, 0.0), 1_000.0);
        assert!(circle.contains(LatLng::new(0.0, 0.0)));
        // ~556 m north
        assert!(circle.contains(LatLng::new(0.005, 0.0)));
        // ~1.1 km north
        assert!(!circle.contains(LatLng::new(0.01, 0.0)));
    }

    #[test]
    fn test_translate_moves_center_only() {
        let mut circle = Circle::new(LatLng::new(1.0, 1.0), 50.0);
        circle.translate(LatLngDelta::new(0.5, -0.5));
        assert_eq!(circle.center, LatLng::new(1.5, 0.5));
        assert!((circle.radius - 50.0).abs() < f64::EPSILON);
    }
}
