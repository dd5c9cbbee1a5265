//! FleetFence Core Library
//!
//! Geofence drawing sessions, reverse-geocoded labels, the confirmed geofence
//! store and the UI-local state around them. Map rendering and the drawing
//! widget live in the host; this crate consumes their events.

pub mod config;
pub mod events;
pub mod fetch;
pub mod geo;
pub mod geocode;
pub mod labels;
pub mod session;
pub mod shapes;
pub mod store;
pub mod view;

pub use config::{ConfigError, SessionConfig, DEFAULT_FALLBACK_LABEL};
pub use events::{ChangeKind, CompletedShape, GeometryChange, ProviderEvent, SubscriptionId};
pub use fetch::{FetchAction, FetchState, reduce_fetch};
pub use geo::{LatLng, LatLngDelta};
pub use geocode::{GeocodeError, GeocodeResult, Geocoder, StaticGeocoder};
pub use labels::{LabelOutcome, LabelPolicy, LabelTicket, LabelUpdate};
pub use session::{SessionError, SessionResult, ShapeSession};
pub use shapes::{
    Circle, EmptyPolygonError, Geometry, GeometryTrait, Polygon, Shape, ShapeId, ShapeKind,
};
pub use store::{
    GeofenceDraft, GeofenceFilter, GeofenceId, GeofenceRecord, GeofenceStatus, GeofenceStore,
};
pub use view::{DraftRef, GeofenceTab, ViewAction, ViewMode, ViewState, reduce_view};

use std::future::Future;
use std::pin::Pin;

/// Boxed, non-`Send` future. Everything here runs on the UI event loop.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + 'a>>;
