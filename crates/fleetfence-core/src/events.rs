//! Events coming from the mapping provider, and the geometry changes they cause.

use crate::geo::{LatLng, LatLngDelta};
use crate::shapes::{Geometry, ShapeId};

/// A shape the user has just finished drawing.
#[derive(Debug, Clone, PartialEq)]
pub enum CompletedShape {
    Circle {
        center: LatLng,
        /// Radius in meters.
        radius: f64,
        zoom: Option<f64>,
    },
    Polygon {
        vertices: Vec<LatLng>,
        zoom: Option<f64>,
    },
}

impl CompletedShape {
    pub fn circle(center: LatLng, radius: f64) -> Self {
        Self::Circle {
            center,
            radius,
            zoom: None,
        }
    }

    pub fn polygon(vertices: Vec<LatLng>) -> Self {
        Self::Polygon {
            vertices,
            zoom: None,
        }
    }

    /// Record the map zoom at completion time.
    pub fn at_zoom(mut self, level: f64) -> Self {
        match &mut self {
            Self::Circle { zoom, .. } | Self::Polygon { zoom, .. } => *zoom = Some(level),
        }
        self
    }
}

/// An edit the provider reports on an already-completed shape.
#[derive(Debug, Clone, PartialEq)]
pub enum ProviderEvent {
    /// Circle center moved.
    CenterChanged { shape: ShapeId, center: LatLng },
    /// Circle radius changed (meters).
    RadiusChanged { shape: ShapeId, radius: f64 },
    /// A polygon vertex was inserted before `index`.
    VertexInserted {
        shape: ShapeId,
        index: usize,
        vertex: LatLng,
    },
    /// A polygon vertex was removed.
    VertexRemoved { shape: ShapeId, index: usize },
    /// A polygon vertex was moved.
    VertexMoved {
        shape: ShapeId,
        index: usize,
        vertex: LatLng,
    },
    /// The whole shape was dragged.
    Dragged { shape: ShapeId, delta: LatLngDelta },
}

impl ProviderEvent {
    pub fn shape(&self) -> ShapeId {
        match self {
            ProviderEvent::CenterChanged { shape, .. }
            | ProviderEvent::RadiusChanged { shape, .. }
            | ProviderEvent::VertexInserted { shape, .. }
            | ProviderEvent::VertexRemoved { shape, .. }
            | ProviderEvent::VertexMoved { shape, .. }
            | ProviderEvent::Dragged { shape, .. } => *shape,
        }
    }

    pub fn change_kind(&self) -> ChangeKind {
        match self {
            ProviderEvent::CenterChanged { .. } => ChangeKind::Center,
            ProviderEvent::RadiusChanged { .. } => ChangeKind::Radius,
            ProviderEvent::VertexInserted { index, .. } => ChangeKind::VertexInserted(*index),
            ProviderEvent::VertexRemoved { index, .. } => ChangeKind::VertexRemoved(*index),
            ProviderEvent::VertexMoved { index, .. } => ChangeKind::VertexMoved(*index),
            ProviderEvent::Dragged { .. } => ChangeKind::Dragged,
        }
    }
}

/// What part of a shape's geometry changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    Center,
    Radius,
    VertexInserted(usize),
    VertexRemoved(usize),
    VertexMoved(usize),
    Dragged,
}

/// Notification delivered to geometry subscribers after an edit is applied.
#[derive(Debug, Clone, PartialEq)]
pub struct GeometryChange {
    pub shape: ShapeId,
    pub kind: ChangeKind,
    /// Geometry after the edit.
    pub geometry: Geometry,
}

/// Identifies a geometry subscription.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(pub(crate) u64);

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn test_at_zoom() {
        let shape = CompletedShape::circle(LatLng::default(), 10.0).at_zoom(14.0);
        assert!(matches!(shape, CompletedShape::Circle { zoom: Some(z), .. } if z == 14.0));
    }

    #[test]
    fn test_event_shape_and_kind() {
        let id = Uuid::new_v4();
        let event = ProviderEvent::VertexMoved {
            shape: id,
            index: 2,
            vertex: LatLng::default(),
        };
        assert_eq!(event.shape(), id);
        assert_eq!(event.change_kind(), ChangeKind::VertexMoved(2));
    }
}
