//! Confirmed geofence records.

use crate::shapes::{Geometry, GeometryTrait, Shape, ShapeKind};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for geofence records.
pub type GeofenceId = Uuid;

/// Lifecycle status of a geofence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GeofenceStatus {
    #[default]
    Active,
    Inactive,
    Pending,
}

impl GeofenceStatus {
    /// Lowercase name, as serialized.
    pub fn as_str(&self) -> &'static str {
        match self {
            GeofenceStatus::Active => "active",
            GeofenceStatus::Inactive => "inactive",
            GeofenceStatus::Pending => "pending",
        }
    }
}

/// Business metadata supplied when a drawn shape is saved.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GeofenceDraft {
    pub name: String,
    pub status: GeofenceStatus,
    pub group: String,
    pub created_by: String,
    pub description: Option<String>,
    pub accounts: Vec<String>,
}

impl GeofenceDraft {
    /// Start a draft with a name and default metadata.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Set the status.
    pub fn with_status(mut self, status: GeofenceStatus) -> Self {
        self.status = status;
        self
    }

    /// Set the group.
    pub fn with_group(mut self, group: impl Into<String>) -> Self {
        self.group = group.into();
        self
    }

    /// Set the author.
    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.created_by = author.into();
        self
    }

    /// Set the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Set the linked accounts.
    pub fn with_accounts<I, S>(mut self, accounts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.accounts = accounts.into_iter().map(Into::into).collect();
        self
    }
}

/// A confirmed, named geofence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeofenceRecord {
    pub(crate) id: GeofenceId,
    pub name: String,
    pub status: GeofenceStatus,
    #[serde(default)]
    pub group: String,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub created_by: String,
    #[serde(default)]
    pub description: Option<String>,
    /// Associated account identifiers.
    #[serde(default)]
    pub accounts: Vec<String>,
    #[serde(default)]
    pub alert_count: u32,
    pub geometry: Geometry,
    /// Address resolved for the geometry, if any.
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub zoom: f64,
}

impl GeofenceRecord {
    /// Build a record from a drawn shape. Geometry, label and zoom are copied
    /// as they are at this moment.
    pub fn from_shape(shape: &Shape, draft: GeofenceDraft) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: draft.name,
            status: draft.status,
            group: draft.group,
            created_at: Utc::now(),
            created_by: draft.created_by,
            description: draft.description,
            accounts: draft.accounts,
            alert_count: 0,
            geometry: shape.geometry.clone(),
            label: shape.label.clone(),
            zoom: shape.zoom,
        }
    }

    /// Record id. Fixed at confirmation.
    pub fn id(&self) -> GeofenceId {
        self.id
    }

    /// Geometry variant.
    pub fn kind(&self) -> ShapeKind {
        self.geometry.kind()
    }

    /// Area in square meters.
    pub fn area(&self) -> f64 {
        self.geometry.area()
    }

    /// Label for display; falls back to the record name while unresolved.
    pub fn display_label(&self) -> &str {
        self.label.as_deref().unwrap_or(&self.name)
    }
}
