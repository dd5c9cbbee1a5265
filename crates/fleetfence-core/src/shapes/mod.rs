//! Drawn shapes: the draft geometry a user sketches on the map.

mod circle;
mod polygon;

pub use circle::Circle;
pub use polygon::{EmptyPolygonError, Polygon};

use crate::geo::{LatLng, LatLngDelta};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for shapes.
pub type ShapeId = Uuid;

/// Behavior shared by every geometry variant.
pub trait GeometryTrait {
    /// Representative point used for labelling: circle center or vertex mean.
    fn center(&self) -> LatLng;

    /// Area in square meters.
    fn area(&self) -> f64;

    /// Whether a coordinate lies inside the geometry.
    fn contains(&self, point: LatLng) -> bool;

    /// Move the whole geometry by a delta in degrees.
    fn translate(&mut self, delta: LatLngDelta);
}

/// Which geometry variant a shape carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShapeKind {
    Circle,
    Polygon,
}

/// Geometry of a shape. Exactly one variant is ever populated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Geometry {
    Circle(Circle),
    Polygon(Polygon),
}

impl Geometry {
    /// Which variant this is.
    pub fn kind(&self) -> ShapeKind {
        match self {
            Geometry::Circle(_) => ShapeKind::Circle,
            Geometry::Polygon(_) => ShapeKind::Polygon,
        }
    }

    /// Every coordinate is a valid WGS84 position.
    pub fn is_valid(&self) -> bool {
        match self {
            Geometry::Circle(c) => c.center.is_valid(),
            Geometry::Polygon(p) => p.vertices().iter().all(LatLng::is_valid),
        }
    }

    /// Borrow as a circle.
    pub fn as_circle(&self) -> Option<&Circle> {
        match self {
            Geometry::Circle(c) => Some(c),
            _ => None,
        }
    }

    /// Mutably borrow as a circle.
    pub fn as_circle_mut(&mut self) -> Option<&mut Circle> {
        match self {
            Geometry::Circle(c) => Some(c),
            _ => None,
        }
    }

    /// Borrow as a polygon.
    pub fn as_polygon(&self) -> Option<&Polygon> {
        match self {
            Geometry::Polygon(p) => Some(p),
            _ => None,
        }
    }

    /// Mutably borrow as a polygon.
    pub fn as_polygon_mut(&mut self) -> Option<&mut Polygon> {
        match self {
            Geometry::Polygon(p) => Some(p),
            _ => None,
        }
    }
}

impl GeometryTrait for Geometry {
    fn center(&self) -> LatLng {
        match self {
            Geometry::Circle(c) => c.center(),
            Geometry::Polygon(p) => p.center(),
        }
    }

    fn area(&self) -> f64 {
        match self {
            Geometry::Circle(c) => c.area(),
            Geometry::Polygon(p) => p.area(),
        }
    }

    fn contains(&self, point: LatLng) -> bool {
        match self {
            Geometry::Circle(c) => c.contains(point),
            Geometry::Polygon(p) => p.contains(point),
        }
    }

    fn translate(&mut self, delta: LatLngDelta) {
        match self {
            Geometry::Circle(c) => c.translate(delta),
            Geometry::Polygon(p) => p.translate(delta),
        }
    }
}

/// A drawn shape pending confirmation as a geofence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Shape {
    pub(crate) id: ShapeId,
    /// Current geometry.
    pub geometry: Geometry,
    /// Resolved address. Absent until the first lookup lands and may lag
    /// behind geometry edits.
    #[serde(default)]
    pub label: Option<String>,
    /// Map zoom level when the shape was drawn.
    pub zoom: f64,
}

impl Shape {
    /// Create a new shape with a fresh id and no label.
    pub fn new(geometry: Geometry, zoom: f64) -> Self {
        Self {
            id: Uuid::new_v4(),
            geometry,
            label: None,
            zoom,
        }
    }

    /// Shape id.
    pub fn id(&self) -> ShapeId {
        self.id
    }

    /// Geometry variant.
    pub fn kind(&self) -> ShapeKind {
        self.geometry.kind()
    }

    /// Coordinate sent to the reverse geocoder for this shape.
    pub fn label_point(&self) -> LatLng {
        self.geometry.center()
    }

    /// Area in square meters.
    pub fn area(&self) -> f64 {
        self.geometry.area()
    }
}
