//! Polygon geofence geometry.

use super::GeometryTrait;
use crate::geo::{LatLng, LatLngDelta, centroid};
use kurbo::{BezPath, Shape as KurboShape};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A polygon was given no vertices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("Polygon has no vertices")]
pub struct EmptyPolygonError;

/// A closed polygon given by its vertices in drawing order.
///
/// Always holds at least one vertex, including when deserialized.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "PolygonData")]
pub struct Polygon {
    vertices: Vec<LatLng>,
}

#[derive(Deserialize)]
struct PolygonData {
    vertices: Vec<LatLng>,
}

impl TryFrom<PolygonData> for Polygon {
    type Error = EmptyPolygonError;

    fn try_from(data: PolygonData) -> Result<Self, Self::Error> {
        Polygon::new(data.vertices).ok_or(EmptyPolygonError)
    }
}

impl Polygon {
    /// Create a polygon. Returns `None` when `vertices` is empty.
    pub fn new(vertices: Vec<LatLng>) -> Option<Self> {
        if vertices.is_empty() {
            return None;
        }
        Some(Self { vertices })
    }

    /// Vertices in drawing order.
    pub fn vertices(&self) -> &[LatLng] {
        &self.vertices
    }

    /// Number of vertices.
    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    /// Always false for a constructed polygon.
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Insert a vertex before `index` (clamped to the end).
    pub fn insert_vertex(&mut self, index: usize, vertex: LatLng) {
        let index = index.min(self.vertices.len());
        self.vertices.insert(index, vertex);
    }

    /// Remove a vertex. Refuses to remove the last remaining one.
    pub fn remove_vertex(&mut self, index: usize) -> Option<LatLng> {
        if index >= self.vertices.len() || self.vertices.len() == 1 {
            return None;
        }
        Some(self.vertices.remove(index))
    }

    /// Move an existing vertex. Returns false if `index` is out of range.
    pub fn move_vertex(&mut self, index: usize, vertex: LatLng) -> bool {
        match self.vertices.get_mut(index) {
            Some(v) => {
                *v = vertex;
                true
            }
            None => false,
        }
    }

    /// Closed path in local meters around `origin`.
    pub fn local_path(&self, origin: LatLng) -> BezPath {
        let mut path = BezPath::new();
        let mut iter = self.vertices.iter();
        if let Some(first) = iter.next() {
            path.move_to(first.to_local(origin));
            for v in iter {
                path.line_to(v.to_local(origin));
            }
            path.close_path();
        }
        path
    }
}

impl GeometryTrait for Polygon {
    fn center(&self) -> LatLng {
        centroid(&self.vertices).unwrap_or_default()
    }

    fn area(&self) -> f64 {
        if self.vertices.len() < 3 {
            return 0.0;
        }
        self.local_path(self.center()).area().abs()
    }

    fn contains(&self, point: LatLng) -> bool {
        if self.vertices.len() < 3 {
            return false;
        }
        let origin = self.center();
        self.local_path(origin).winding(point.to_local(origin)) != 0
    }

    fn translate(&mut self, delta: LatLngDelta) {
        for v in &mut self.vertices {
            *v = v.offset(delta);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square() -> Polygon {
        Polygon::new(vec![
            LatLng::new(0.0, 0.0),
            LatLng::new(0.0, 0.01),
            LatLng::new(0.01, 0.01),
            LatLng::new(0.01, 0.0),
        ])
        .unwrap()
    }

    #[test]
    fn test_empty_rejected() {
        assert!(Polygon::new(Vec::new()).is_none());
    }

    #[test]
    fn test_deserialize_rejects_empty() {
        let result = serde_json::from_str::<Polygon>(r#"{"vertices":[]}"#);
        let err = result.unwrap_err();
        assert!(err.to_string().contains("no vertices"), "got {err}");

        let poly: Polygon =
            serde_json::from_str(r#"{"vertices":[{"lat":1.0,"lng":2.0}]}"#).unwrap();
        assert_eq!(poly.vertices(), &[LatLng::new(1.0, 2.0)]);
    }

    #[test]
    fn test_center_is_vertex_mean() {
        let poly = Polygon::new(vec![
            LatLng::new(30.0, -90.0),
            LatLng::new(31.0, -91.0),
            LatLng::new(29.0, -92.0),
        ])
        .unwrap();
        let c = poly.center();
        assert!((c.lat - 30.0).abs() < 1e-12);
        assert!((c.lng + 91.0).abs() < 1e-12);
    }

    #[test]
    fn test_area_of_small_square() {
        // 0.01 deg at the equator is ~1112 m on each side.
        let area = square().area();
        let expected = 1_111.95_f64.powi(2);
        assert!((area - expected).abs() / expected < 0.01, "got {area}");
    }

    #[test]
    fn test_area_degenerate() {
        let line = Polygon::new(vec![LatLng::new(0.0, 0.0), LatLng::new(1.0, 1.0)]).unwrap();
        assert_eq!(line.area(), 0.0);
    }

    #[test]
    fn test_contains() {
        let poly = square();
        assert!(poly.contains(LatLng::new(0.005, 0.005)));
        assert!(!poly.contains(LatLng::new(0.02, 0.005)));
    }

    #[test]
    fn test_vertex_edits() {
        let mut poly = square();
        poly.insert_vertex(99, LatLng::new(0.005, -0.001));
        assert_eq!(poly.len(), 5);
        assert_eq!(poly.vertices()[4], LatLng::new(0.005, -0.001));

        assert!(poly.move_vertex(0, LatLng::new(-0.001, -0.001)));
        assert!(!poly.move_vertex(10, LatLng::default()));

        assert_eq!(poly.remove_vertex(4), Some(LatLng::new(0.005, -0.001)));
        assert_eq!(poly.remove_vertex(10), None);
    }

    #[test]
    fn test_last_vertex_is_kept() {
        let mut poly = Polygon::new(vec![LatLng::new(1.0, 1.0)]).unwrap();
        assert_eq!(poly.remove_vertex(0), None);
        assert_eq!(poly.len(), 1);
    }

    #[test]
    fn test_translate_moves_all_vertices() {
        let mut poly = square();
        poly.translate(LatLngDelta::new(1.0, 2.0));
        assert_eq!(poly.vertices()[0], LatLng::new(1.0, 2.0));
        assert_eq!(poly.vertices()[2], LatLng::new(1.01, 2.01));
    }
}
