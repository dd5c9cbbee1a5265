//! Geofence Store: the in-memory collection of confirmed geofences.
//!
//! The store is the single writer of confirmed records. It does no indexing;
//! lookups and filters scan the collection, which is sized for a customer's
//! own fleet rather than for bulk data.

mod filter;
mod record;

pub use filter::GeofenceFilter;
pub use record::{GeofenceDraft, GeofenceId, GeofenceRecord, GeofenceStatus};

use crate::geo::LatLng;
use crate::shapes::GeometryTrait;
use log::debug;

/// In-memory collection of confirmed geofences plus the detail-view target.
#[derive(Debug, Clone, Default)]
pub struct GeofenceStore {
    records: Vec<GeofenceRecord>,
    selected: Option<GeofenceId>,
}

impl GeofenceStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the whole collection. The selection survives only if the
    /// selected id is still present.
    pub fn set_all(&mut self, records: Vec<GeofenceRecord>) {
        debug!("replacing geofence collection with {} record(s)", records.len());
        self.records = records;
        if let Some(id) = self.selected {
            if self.get(id).is_none() {
                self.selected = None;
            }
        }
    }

    /// Set or clear the detail-view target. Unknown ids clear the selection.
    pub fn select(&mut self, id: Option<GeofenceId>) {
        self.selected = id.filter(|id| self.get(*id).is_some());
    }

    /// Clear the detail-view target.
    pub fn clear_selection(&mut self) {
        self.selected = None;
    }

    /// The selected record, if any.
    pub fn selected(&self) -> Option<&GeofenceRecord> {
        self.selected.and_then(|id| self.get(id))
    }

    /// Id of the selected record.
    pub fn selected_id(&self) -> Option<GeofenceId> {
        self.selected
    }

    /// Every record in collection order.
    pub fn all(&self) -> &[GeofenceRecord] {
        &self.records
    }

    /// Get a record by id.
    pub fn get(&self, id: GeofenceId) -> Option<&GeofenceRecord> {
        self.records.iter().find(|r| r.id == id)
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the store holds no records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Append a record, replacing any existing record with the same id.
    pub fn insert(&mut self, record: GeofenceRecord) -> GeofenceId {
        let id = record.id;
        match self.records.iter_mut().find(|r| r.id == id) {
            Some(existing) => *existing = record,
            None => self.records.push(record),
        }
        id
    }

    /// Edit a record in place. The record's id cannot be changed.
    /// Returns false if no record has `id`.
    pub fn update<F>(&mut self, id: GeofenceId, edit: F) -> bool
    where
        F: FnOnce(&mut GeofenceRecord),
    {
        match self.records.iter_mut().find(|r| r.id == id) {
            Some(record) => {
                edit(record);
                record.id = id;
                true
            }
            None => false,
        }
    }

    /// Remove a record. Clears the selection if it pointed at it.
    pub fn remove(&mut self, id: GeofenceId) -> Option<GeofenceRecord> {
        let index = self.records.iter().position(|r| r.id == id)?;
        if self.selected == Some(id) {
            self.selected = None;
        }
        Some(self.records.remove(index))
    }

    /// Records matching a filter, in collection order.
    pub fn filter<'a>(&'a self, filter: &'a GeofenceFilter) -> impl Iterator<Item = &'a GeofenceRecord> {
        self.records.iter().filter(move |r| filter.matches(r))
    }

    /// Records whose geometry contains `point`.
    pub fn containing(&self, point: LatLng) -> impl Iterator<Item = &GeofenceRecord> {
        self.records
            .iter()
            .filter(move |r| r.geometry.contains(point))
    }
}
