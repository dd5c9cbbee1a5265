//! Client-side filtering of geofence records.

use super::record::{GeofenceRecord, GeofenceStatus};

/// Criteria for narrowing a record listing. Empty criteria match everything.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GeofenceFilter {
    pub status: Option<GeofenceStatus>,
    pub group: Option<String>,
    /// Case-insensitive substring matched against name, label and description.
    pub search: Option<String>,
}

impl GeofenceFilter {
    /// A filter that matches every record.
    pub fn new() -> Self {
        Self::default()
    }

    /// Only records with this status.
    pub fn with_status(mut self, status: GeofenceStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// Only records in this group.
    pub fn with_group(mut self, group: impl Into<String>) -> Self {
        self.group = Some(group.into());
        self
    }

    /// Case-insensitive text search. Blank text matches everything.
    pub fn with_search(mut self, text: impl Into<String>) -> Self {
        let text = text.into();
        self.search = if text.trim().is_empty() { None } else { Some(text) };
        self
    }

    /// Whether a record passes every active criterion.
    pub fn matches(&self, record: &GeofenceRecord) -> bool {
        if self.status.is_some_and(|s| s != record.status) {
            return false;
        }
        if self.group.as_ref().is_some_and(|g| *g != record.group) {
            return false;
        }
        match &self.search {
            Some(text) => {
                let needle = text.trim().to_lowercase();
                [
                    Some(record.name.as_str()),
                    record.label.as_deref(),
                    record.description.as_deref(),
                ]
                .into_iter()
                .flatten()
                .any(|field| field.to_lowercase().contains(&needle))
            }
            None => true,
        }
    }
}
