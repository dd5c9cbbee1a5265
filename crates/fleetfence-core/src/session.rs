//! Shape Session Manager.
//!
//! Bridges the mapping provider's drawing events into [`Shape`] values and
//! keeps each shape's label in step with its geometry. A session owns its
//! draft shapes and their in-flight label lookups; confirmed shapes leave the
//! session and become records in a [`GeofenceStore`].

use crate::config::SessionConfig;
use crate::events::{CompletedShape, GeometryChange, ProviderEvent, SubscriptionId};
use crate::geo::LatLng;
use crate::geocode::Geocoder;
use crate::labels::{LabelTicket, LabelTracker, LabelUpdate};
use crate::shapes::{Circle, Geometry, GeometryTrait, Polygon, Shape, ShapeId, ShapeKind};
use crate::store::{GeofenceDraft, GeofenceId, GeofenceRecord, GeofenceStore};
use futures_util::task::noop_waker_ref;
use log::{debug, info, warn};
use std::collections::HashMap;
use std::sync::Arc;
use std::task::Context;
use thiserror::Error;

/// Session errors.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SessionError {
    #[error("Unknown shape: {0}")]
    UnknownShape(ShapeId),
    #[error("Polygon has no vertices")]
    EmptyPolygon,
    #[error("Polygon exceeds {max} vertices")]
    TooManyVertices { max: usize },
    #[error("Invalid radius: {0}")]
    InvalidRadius(f64),
    #[error("Invalid coordinate: ({lat}, {lng})")]
    InvalidCoordinate { lat: f64, lng: f64 },
    #[error("Shape {shape} is a {actual:?}, event expects a {expected:?}")]
    WrongKind {
        shape: ShapeId,
        expected: ShapeKind,
        actual: ShapeKind,
    },
    #[error("Vertex {index} out of range for shape {shape}")]
    VertexOutOfRange { shape: ShapeId, index: usize },
}

/// Result type for session operations.
pub type SessionResult<T> = Result<T, SessionError>;

fn check_coordinate(at: LatLng) -> SessionResult<()> {
    if at.is_valid() {
        Ok(())
    } else {
        Err(SessionError::InvalidCoordinate {
            lat: at.lat,
            lng: at.lng,
        })
    }
}

type GeometryHandler = Box<dyn FnMut(&GeometryChange)>;

/// Owns the draft shapes of one drawing session.
pub struct ShapeSession {
    config: SessionConfig,
    geocoder: Arc<dyn Geocoder>,
    shapes: HashMap<ShapeId, Shape>,
    /// Completion order.
    order: Vec<ShapeId>,
    labels: LabelTracker,
    subscribers: Vec<(SubscriptionId, GeometryHandler)>,
    next_subscription: u64,
}

impl ShapeSession {
    /// Create a session with the default configuration.
    pub fn new(geocoder: Arc<dyn Geocoder>) -> Self {
        Self::with_config(geocoder, SessionConfig::default())
    }

    /// Create a session with an explicit configuration.
    pub fn with_config(geocoder: Arc<dyn Geocoder>, config: SessionConfig) -> Self {
        let labels = LabelTracker::new(config.label_policy, config.fallback_label.clone());
        Self {
            config,
            geocoder,
            shapes: HashMap::new(),
            order: Vec::new(),
            labels,
            subscribers: Vec::new(),
            next_subscription: 1,
        }
    }

    /// Active configuration.
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Register a finished circle or polygon and start resolving its label.
    pub fn on_shape_completed(&mut self, completed: CompletedShape) -> SessionResult<ShapeId> {
        let (geometry, zoom) = match completed {
            CompletedShape::Circle {
                center,
                radius,
                zoom,
            } => {
                check_coordinate(center)?;
                if !radius.is_finite() || radius < 0.0 {
                    return Err(SessionError::InvalidRadius(radius));
                }
                (Geometry::Circle(Circle::new(center, radius)), zoom)
            }
            CompletedShape::Polygon { vertices, zoom } => {
                if vertices.len() > self.config.max_polygon_vertices {
                    return Err(SessionError::TooManyVertices {
                        max: self.config.max_polygon_vertices,
                    });
                }
                for vertex in &vertices {
                    check_coordinate(*vertex)?;
                }
                let polygon = Polygon::new(vertices).ok_or(SessionError::EmptyPolygon)?;
                (Geometry::Polygon(polygon), zoom)
            }
        };

        let shape = Shape::new(geometry, zoom.unwrap_or(self.config.default_zoom));
        let id = shape.id();
        info!("{:?} {} completed at zoom {}", shape.kind(), id, shape.zoom);
        self.order.push(id);
        self.shapes.insert(id, shape);
        self.resolve_label(id)?;
        Ok(id)
    }

    /// Issue a reverse-geocoding lookup for the shape's representative point.
    ///
    /// Returns immediately; the answer is applied by [`pump`](Self::pump) or
    /// [`settle`](Self::settle).
    pub fn resolve_label(&mut self, id: ShapeId) -> SessionResult<LabelTicket> {
        let shape = self.shapes.get(&id).ok_or(SessionError::UnknownShape(id))?;
        let at = shape.label_point();
        debug!("resolving label for {} at ({}, {})", id, at.lat, at.lng);
        Ok(self.labels.issue(id, at, self.geocoder.as_ref()))
    }

    /// Apply an edit reported by the provider, notify subscribers and
    /// re-resolve the label.
    pub fn handle_event(&mut self, event: ProviderEvent) -> SessionResult<()> {
        let id = event.shape();
        if let Err(e) = self.apply_event(&event) {
            warn!("ignoring provider event for {}: {}", id, e);
            return Err(e);
        }

        if let Some(shape) = self.shapes.get(&id) {
            let change = GeometryChange {
                shape: id,
                kind: event.change_kind(),
                geometry: shape.geometry.clone(),
            };
            for (_, handler) in &mut self.subscribers {
                handler(&change);
            }
        }

        self.resolve_label(id)?;
        Ok(())
    }

    fn apply_event(&mut self, event: &ProviderEvent) -> SessionResult<()> {
        let id = event.shape();
        let max_vertices = self.config.max_polygon_vertices;
        let shape = self
            .shapes
            .get_mut(&id)
            .ok_or(SessionError::UnknownShape(id))?;
        let actual = shape.kind();
        let wrong_kind = |expected| SessionError::WrongKind {
            shape: id,
            expected,
            actual,
        };

        match event {
            ProviderEvent::CenterChanged { center, .. } => {
                check_coordinate(*center)?;
                let circle = shape
                    .geometry
                    .as_circle_mut()
                    .ok_or_else(|| wrong_kind(ShapeKind::Circle))?;
                circle.set_center(*center);
            }
            ProviderEvent::RadiusChanged { radius, .. } => {
                if !radius.is_finite() || *radius < 0.0 {
                    return Err(SessionError::InvalidRadius(*radius));
                }
                let circle = shape
                    .geometry
                    .as_circle_mut()
                    .ok_or_else(|| wrong_kind(ShapeKind::Circle))?;
                circle.set_radius(*radius);
            }
            ProviderEvent::VertexInserted { index, vertex, .. } => {
                check_coordinate(*vertex)?;
                let polygon = shape
                    .geometry
                    .as_polygon_mut()
                    .ok_or_else(|| wrong_kind(ShapeKind::Polygon))?;
                if polygon.len() >= max_vertices {
                    return Err(SessionError::TooManyVertices { max: max_vertices });
                }
                polygon.insert_vertex(*index, *vertex);
            }
            ProviderEvent::VertexRemoved { index, .. } => {
                let polygon = shape
                    .geometry
                    .as_polygon_mut()
                    .ok_or_else(|| wrong_kind(ShapeKind::Polygon))?;
                polygon
                    .remove_vertex(*index)
                    .ok_or(SessionError::VertexOutOfRange {
                        shape: id,
                        index: *index,
                    })?;
            }
            ProviderEvent::VertexMoved { index, vertex, .. } => {
                check_coordinate(*vertex)?;
                let polygon = shape
                    .geometry
                    .as_polygon_mut()
                    .ok_or_else(|| wrong_kind(ShapeKind::Polygon))?;
                if !polygon.move_vertex(*index, *vertex) {
                    return Err(SessionError::VertexOutOfRange {
                        shape: id,
                        index: *index,
                    });
                }
            }
            ProviderEvent::Dragged { delta, .. } => {
                let mut moved = shape.geometry.clone();
                moved.translate(*delta);
                if !moved.is_valid() {
                    let at = moved.center();
                    return Err(SessionError::InvalidCoordinate {
                        lat: at.lat,
                        lng: at.lng,
                    });
                }
                shape.geometry = moved;
            }
        }
        Ok(())
    }

    /// Subscribe to geometry changes of any shape in the session.
    pub fn on_geometry_changed<F>(&mut self, handler: F) -> SubscriptionId
    where
        F: FnMut(&GeometryChange) + 'static,
    {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.subscribers.push((id, Box::new(handler)));
        id
    }

    /// Remove a subscription. Returns false if it was not registered.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|(sub, _)| *sub != id);
        self.subscribers.len() != before
    }

    /// Apply every label answer that is ready, without blocking.
    pub fn pump(&mut self) -> Vec<LabelUpdate> {
        let mut cx = Context::from_waker(noop_waker_ref());
        let updates = self.labels.poll_ready(&mut cx);
        for update in &updates {
            self.apply_label(update);
        }
        updates
    }

    /// Wait for every in-flight label lookup and apply the answers.
    pub async fn settle(&mut self) -> Vec<LabelUpdate> {
        let mut updates = Vec::new();
        while let Some(update) = self.labels.next_update().await {
            self.apply_label(&update);
            updates.push(update);
        }
        updates
    }

    fn apply_label(&mut self, update: &LabelUpdate) {
        match self.shapes.get_mut(&update.shape) {
            Some(shape) => {
                debug!("label for {} is now {:?}", update.shape, update.label);
                shape.label = Some(update.label.clone());
            }
            None => debug!("label for departed shape {} dropped", update.shape),
        }
    }

    /// Drop a draft without saving it.
    pub fn discard(&mut self, id: ShapeId) -> SessionResult<Shape> {
        let shape = self.shapes.remove(&id).ok_or(SessionError::UnknownShape(id))?;
        self.order.retain(|&s| s != id);
        self.labels.cancel(id);
        info!("discarded draft {}", id);
        Ok(shape)
    }

    /// Promote a draft into a geofence record. The record takes the draft's
    /// geometry and latest applied label as they are now; pending lookups
    /// for the draft are cancelled.
    pub fn confirm_draft(
        &mut self,
        id: ShapeId,
        draft: GeofenceDraft,
        store: &mut GeofenceStore,
    ) -> SessionResult<GeofenceId> {
        let shape = self.shapes.remove(&id).ok_or(SessionError::UnknownShape(id))?;
        self.order.retain(|&s| s != id);
        self.labels.cancel(id);
        let record = GeofenceRecord::from_shape(&shape, draft);
        let record_id = store.insert(record);
        info!("confirmed draft {} as geofence {}", id, record_id);
        Ok(record_id)
    }

    /// End the session: drop every draft and cancel every lookup.
    pub fn clear(&mut self) {
        self.labels.cancel_all();
        self.shapes.clear();
        self.order.clear();
    }

    /// Get a draft by id.
    pub fn shape(&self, id: ShapeId) -> Option<&Shape> {
        self.shapes.get(&id)
    }

    /// Drafts in completion order.
    pub fn shapes(&self) -> impl Iterator<Item = &Shape> {
        self.order.iter().filter_map(|id| self.shapes.get(id))
    }

    /// Latest applied label for a draft, if any has landed.
    pub fn label(&self, id: ShapeId) -> Option<&str> {
        self.shapes.get(&id).and_then(|s| s.label.as_deref())
    }

    /// Shape → label lookup for every draft with a resolved label.
    pub fn labels(&self) -> HashMap<ShapeId, &str> {
        self.shapes
            .iter()
            .filter_map(|(id, s)| s.label.as_deref().map(|l| (*id, l)))
            .collect()
    }

    /// Number of drafts.
    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    /// Whether the session holds no drafts.
    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    /// Number of label lookups still in flight.
    pub fn pending_labels(&self) -> usize {
        self.labels.in_flight()
    }
}
