//! Reverse-geocoding provider abstraction.

use crate::BoxFuture;
use crate::geo::LatLng;
use std::sync::{Arc, Mutex};
use thiserror::Error;

/// Reverse-geocoding errors.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GeocodeError {
    #[error("Invalid coordinate: ({lat}, {lng})")]
    InvalidCoordinate { lat: f64, lng: f64 },
    #[error("Geocoding provider error: {0}")]
    Provider(String),
}

/// Result type for geocoding operations.
pub type GeocodeResult<T> = Result<T, GeocodeError>;

/// Resolves a coordinate to a formatted address.
///
/// `Ok(None)` means the provider answered but had no result for the point.
/// Returned futures must not borrow the geocoder so that callers can keep
/// them in flight independently.
pub trait Geocoder {
    fn reverse(&self, at: LatLng) -> BoxFuture<'static, GeocodeResult<Option<String>>>;
}

impl<G: Geocoder + ?Sized> Geocoder for Arc<G> {
    fn reverse(&self, at: LatLng) -> BoxFuture<'static, GeocodeResult<Option<String>>> {
        (**self).reverse(at)
    }
}

/// Table-driven geocoder for tests and offline use.
///
/// Answers with the address of the first entry within `tolerance` degrees of
/// the requested point on both axes. Every request is recorded.
#[derive(Debug, Clone, Default)]
pub struct StaticGeocoder {
    entries: Vec<(LatLng, String)>,
    tolerance: f64,
    failure: Option<String>,
    requests: Arc<Mutex<Vec<LatLng>>>,
}

impl StaticGeocoder {
    /// Default matching tolerance in degrees (~1 m).
    pub const DEFAULT_TOLERANCE: f64 = 1e-5;

    /// Empty table with the default tolerance.
    pub fn new() -> Self {
        Self {
            tolerance: Self::DEFAULT_TOLERANCE,
            ..Self::default()
        }
    }

    /// Add an address for a coordinate.
    pub fn with_address(mut self, at: LatLng, address: impl Into<String>) -> Self {
        self.entries.push((at, address.into()));
        self
    }

    /// Set the matching tolerance in degrees.
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Make every request fail with a provider error.
    pub fn failing(mut self, message: impl Into<String>) -> Self {
        self.failure = Some(message.into());
        self
    }

    /// Coordinates requested so far, in request order.
    pub fn requests(&self) -> Vec<LatLng> {
        self.requests.lock().map(|r| r.clone()).unwrap_or_default()
    }

    fn lookup(&self, at: LatLng) -> Option<String> {
        self.entries
            .iter()
            .find(|(p, _)| {
                (p.lat - at.lat).abs() <= self.tolerance && (p.lng - at.lng).abs() <= self.tolerance
            })
            .map(|(_, address)| address.clone())
    }
}

impl Geocoder for StaticGeocoder {
    fn reverse(&self, at: LatLng) -> BoxFuture<'static, GeocodeResult<Option<String>>> {
        if let Ok(mut requests) = self.requests.lock() {
            requests.push(at);
        }
        let result = if !at.is_valid() {
            Err(GeocodeError::InvalidCoordinate {
                lat: at.lat,
                lng: at.lng,
            })
        } else if let Some(message) = &self.failure {
            Err(GeocodeError::Provider(message.clone()))
        } else {
            Ok(self.lookup(at))
        };
        Box::pin(async move { result })
    }
}
