//! Label resolution: in-flight reverse-geocoding lookups per shape.
//!
//! Every lookup is tagged with a generation number. Under
//! [`LabelPolicy::Supersede`] a new lookup aborts the older ones for the same
//! shape and a response is only accepted if it carries the newest generation,
//! so a slow early answer can never overwrite a label computed for a later
//! edit. [`LabelPolicy::Concurrent`] keeps every lookup alive and applies
//! answers in arrival order.

use crate::BoxFuture;
use crate::geo::LatLng;
use crate::geocode::{GeocodeError, GeocodeResult, Geocoder};
use crate::shapes::ShapeId;
use futures_util::future::{AbortHandle, Abortable, Aborted};
use futures_util::stream::{FuturesUnordered, StreamExt};
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::task::{Context, Poll};

/// How overlapping lookups for the same shape are reconciled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LabelPolicy {
    /// Cancel older lookups; only the newest answer is applied.
    #[default]
    Supersede,
    /// Run all lookups; answers apply in the order they arrive.
    Concurrent,
}

/// Handle to a lookup that has been issued.
#[derive(Debug, Clone)]
pub struct LabelTicket {
    pub shape: ShapeId,
    pub generation: u64,
    /// Coordinate sent to the geocoder.
    pub at: LatLng,
    abort: AbortHandle,
}

impl LabelTicket {
    /// Abort the lookup. Its answer, if any, is dropped.
    pub fn cancel(&self) {
        self.abort.abort();
    }
}

/// How a label was arrived at.
#[derive(Debug, Clone, PartialEq)]
pub enum LabelOutcome {
    /// The geocoder returned an address.
    Resolved,
    /// The geocoder had no result; the fallback label was used.
    NotFound,
    /// The lookup failed; the fallback label was used.
    Failed(GeocodeError),
}

/// A label ready to be applied to a shape.
#[derive(Debug, Clone, PartialEq)]
pub struct LabelUpdate {
    pub shape: ShapeId,
    pub generation: u64,
    pub at: LatLng,
    pub label: String,
    pub outcome: LabelOutcome,
}

struct Completion {
    shape: ShapeId,
    generation: u64,
    at: LatLng,
    result: Result<GeocodeResult<Option<String>>, Aborted>,
}

/// Owns every in-flight lookup of a drawing session.
pub struct LabelTracker {
    policy: LabelPolicy,
    fallback: String,
    next_generation: u64,
    /// Newest generation issued per live shape.
    latest: HashMap<ShapeId, u64>,
    in_flight: HashMap<ShapeId, Vec<(u64, AbortHandle)>>,
    pending: FuturesUnordered<BoxFuture<'static, Completion>>,
}

impl LabelTracker {
    /// Create a tracker with no lookups in flight.
    pub fn new(policy: LabelPolicy, fallback: impl Into<String>) -> Self {
        Self {
            policy,
            fallback: fallback.into(),
            next_generation: 1,
            latest: HashMap::new(),
            in_flight: HashMap::new(),
            pending: FuturesUnordered::new(),
        }
    }

    /// Active ordering policy.
    pub fn policy(&self) -> LabelPolicy {
        self.policy
    }

    /// Label applied when a lookup fails or finds nothing.
    pub fn fallback(&self) -> &str {
        &self.fallback
    }

    /// Start a lookup for `shape` at `at`.
    pub fn issue(&mut self, shape: ShapeId, at: LatLng, geocoder: &dyn Geocoder) -> LabelTicket {
        if self.policy == LabelPolicy::Supersede {
            if let Some(older) = self.in_flight.remove(&shape) {
                debug!("superseding {} label lookup(s) for {}", older.len(), shape);
                for (_, handle) in older {
                    handle.abort();
                }
            }
        }

        let generation = self.next_generation;
        self.next_generation += 1;
        self.latest.insert(shape, generation);

        let (abort, registration) = AbortHandle::new_pair();
        self.in_flight
            .entry(shape)
            .or_default()
            .push((generation, abort.clone()));

        let lookup = Abortable::new(geocoder.reverse(at), registration);
        self.pending.push(Box::pin(async move {
            Completion {
                shape,
                generation,
                at,
                result: lookup.await,
            }
        }));

        LabelTicket {
            shape,
            generation,
            at,
            abort,
        }
    }

    /// Abort every lookup for `shape` and forget it.
    pub fn cancel(&mut self, shape: ShapeId) {
        self.latest.remove(&shape);
        if let Some(handles) = self.in_flight.remove(&shape) {
            for (_, handle) in handles {
                handle.abort();
            }
        }
    }

    /// Abort everything.
    pub fn cancel_all(&mut self) {
        for (_, handles) in self.in_flight.drain() {
            for (_, handle) in handles {
                handle.abort();
            }
        }
        self.latest.clear();
    }

    /// Number of lookups still awaiting an answer.
    pub fn in_flight(&self) -> usize {
        self.in_flight.values().map(Vec::len).sum()
    }

    /// Number of lookups outstanding for one shape.
    pub fn in_flight_for(&self, shape: ShapeId) -> usize {
        self.in_flight.get(&shape).map_or(0, Vec::len)
    }

    /// Collect every answer that is ready now, without blocking.
    pub fn poll_ready(&mut self, cx: &mut Context<'_>) -> Vec<LabelUpdate> {
        let mut updates = Vec::new();
        while let Poll::Ready(Some(completion)) = self.pending.poll_next_unpin(cx) {
            if let Some(update) = self.accept(completion) {
                updates.push(update);
            }
        }
        updates
    }

    /// Wait for the next accepted answer. `None` once nothing is in flight.
    pub async fn next_update(&mut self) -> Option<LabelUpdate> {
        while let Some(completion) = self.pending.next().await {
            if let Some(update) = self.accept(completion) {
                return Some(update);
            }
        }
        None
    }

    fn accept(&mut self, completion: Completion) -> Option<LabelUpdate> {
        let Completion {
            shape,
            generation,
            at,
            result,
        } = completion;

        if let Some(handles) = self.in_flight.get_mut(&shape) {
            handles.retain(|(g, _)| *g != generation);
            if handles.is_empty() {
                self.in_flight.remove(&shape);
            }
        }

        let Ok(result) = result else {
            debug!("label lookup {} for {} was cancelled", generation, shape);
            return None;
        };

        let latest = self.latest.get(&shape).copied()?;
        if self.policy == LabelPolicy::Supersede && latest != generation {
            debug!(
                "dropping stale label lookup {} for {} (latest {})",
                generation, shape, latest
            );
            return None;
        }

        let (label, outcome) = match result {
            Ok(Some(address)) => (address, LabelOutcome::Resolved),
            Ok(None) => (self.fallback.clone(), LabelOutcome::NotFound),
            Err(e) => {
                warn!("reverse geocoding failed for {}: {}", shape, e);
                (self.fallback.clone(), LabelOutcome::Failed(e))
            }
        };

        Some(LabelUpdate {
            shape,
            generation,
            at,
            label,
            outcome,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geocode::StaticGeocoder;
    use futures_util::task::noop_waker_ref;
    use uuid::Uuid;

    fn drain(tracker: &mut LabelTracker) -> Vec<LabelUpdate> {
        let mut cx = Context::from_waker(noop_waker_ref());
        tracker.poll_ready(&mut cx)
    }

    #[test]
    fn test_resolved_label() {
        let at = LatLng::new(32.7767, -96.7970);
        let geocoder = StaticGeocoder::new().with_address(at, "Dallas, TX");
        let mut tracker = LabelTracker::new(LabelPolicy::Supersede, "Unknown Location");
        let shape = Uuid::new_v4();

        tracker.issue(shape, at, &geocoder);
        let updates = drain(&mut tracker);
        assert_eq!(updates.len(), 1);
        assert_eq!(updates[0].label, "Dallas, TX");
        assert_eq!(updates[0].outcome, LabelOutcome::Resolved);
        assert_eq!(tracker.in_flight(), 0);
    }

    #[test]
    fn test_not_found_uses_fallback() {
        let geocoder = StaticGeocoder::new();
        let mut tracker = LabelTracker::new(LabelPolicy::Supersede, "Unknown Location");
        tracker.issue(Uuid::new_v4(), LatLng::new(1.0, 1.0), &geocoder);

        let updates = drain(&mut tracker);
        assert_eq!(updates[0].label, "Unknown Location");
        assert_eq!(updates[0].outcome, LabelOutcome::NotFound);
    }

    #[test]
    fn test_failure_uses_fallback() {
        let geocoder = StaticGeocoder::new().failing("offline");
        let mut tracker = LabelTracker::new(LabelPolicy::Supersede, "Unknown Location");
        tracker.issue(Uuid::new_v4(), LatLng::new(1.0, 1.0), &geocoder);

        let updates = drain(&mut tracker);
        assert_eq!(updates[0].label, "Unknown Location");
        assert!(matches!(updates[0].outcome, LabelOutcome::Failed(_)));
    }

    #[test]
    fn test_supersede_keeps_only_latest() {
        let geocoder = StaticGeocoder::new()
            .with_address(LatLng::new(1.0, 1.0), "First")
            .with_address(LatLng::new(2.0, 2.0), "Second");
        let mut tracker = LabelTracker::new(LabelPolicy::Supersede, "Unknown Location");
        let shape = Uuid::new_v4();

        let first = tracker.issue(shape, LatLng::new(1.0, 1.0), &geocoder);
        let second = tracker.issue(shape, LatLng::new(2.0, 2.0), &geocoder);
        assert!(second.generation > first.generation);
        assert_eq!(tracker.in_flight_for(shape), 1);

        let updates = drain(&mut tracker);
        assert_eq!(updates.len(), 1);
        assert_eq!(updates[0].label, "Second");
    }

    #[test]
    fn test_concurrent_applies_all() {
        let geocoder = StaticGeocoder::new()
            .with_address(LatLng::new(1.0, 1.0), "First")
            .with_address(LatLng::new(2.0, 2.0), "Second");
        let mut tracker = LabelTracker::new(LabelPolicy::Concurrent, "Unknown Location");
        let shape = Uuid::new_v4();

        tracker.issue(shape, LatLng::new(1.0, 1.0), &geocoder);
        tracker.issue(shape, LatLng::new(2.0, 2.0), &geocoder);
        assert_eq!(tracker.in_flight_for(shape), 2);

        let mut labels: Vec<_> = drain(&mut tracker).into_iter().map(|u| u.label).collect();
        labels.sort();
        assert_eq!(labels, vec!["First".to_string(), "Second".to_string()]);
    }

    #[test]
    fn test_cancelled_shape_yields_nothing() {
        let geocoder = StaticGeocoder::new();
        let mut tracker = LabelTracker::new(LabelPolicy::Supersede, "Unknown Location");
        let shape = Uuid::new_v4();

        tracker.issue(shape, LatLng::new(1.0, 1.0), &geocoder);
        tracker.cancel(shape);
        assert_eq!(tracker.in_flight(), 0);
        assert!(drain(&mut tracker).is_empty());
    }

    #[test]
    fn test_ticket_cancel() {
        let geocoder = StaticGeocoder::new();
        let mut tracker = LabelTracker::new(LabelPolicy::Concurrent, "Unknown Location");
        let shape = Uuid::new_v4();

        let ticket = tracker.issue(shape, LatLng::new(1.0, 1.0), &geocoder);
        ticket.cancel();
        assert!(drain(&mut tracker).is_empty());
        assert_eq!(tracker.in_flight(), 0);
    }

    #[test]
    fn test_next_update_drains() {
        let geocoder = StaticGeocoder::new();
        let mut tracker = LabelTracker::new(LabelPolicy::Supersede, "Unknown Location");
        tracker.issue(Uuid::new_v4(), LatLng::new(1.0, 1.0), &geocoder);

        let update = pollster::block_on(tracker.next_update());
        assert!(update.is_some());
        assert!(pollster::block_on(tracker.next_update()).is_none());
    }
}
