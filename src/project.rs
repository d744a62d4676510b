//! Project file: the JSON document a session saves and reopens.
//!
//! DESIGN
//! ======
//! Loading parses into a `serde_json::Value` first so syntax errors and a
//! missing `backings` array are reported before any placement is decoded.
//! Every placement is validated; the caller only mutates state once the whole
//! file has been accepted.

#[cfg(test)]
#[path = "project_test.rs"]
mod project_test;

use std::collections::HashSet;
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

use crate::doc::{BackingPlacement, EntityId, PlacementError};

/// Format version written by this crate.
pub const PROJECT_VERSION: &str = "1.0";

#[derive(Debug, thiserror::Error)]
pub enum ProjectError {
    #[error("project file is not valid JSON: {0}")]
    InvalidJson(#[source] serde_json::Error),
    #[error("project file has no `backings` array")]
    MissingBackings,
    #[error("project backings are malformed: {0}")]
    MalformedBackings(#[source] serde_json::Error),
    #[error("backing #{index} is invalid: {source}")]
    InvalidPlacement {
        index: usize,
        #[source]
        source: PlacementError,
    },
    #[error("duplicate backing id {0}")]
    DuplicateId(EntityId),
    #[error("failed to serialize project: {0}")]
    Serialize(#[source] serde_json::Error),
}

/// On-disk project document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectFile {
    pub backings: Vec<BackingPlacement>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub drawing_url: Option<String>,
    /// Save time, epoch milliseconds.
    #[serde(default)]
    pub timestamp: i64,
    #[serde(default = "default_version")]
    pub version: String,
}

fn default_version() -> String {
    PROJECT_VERSION.to_owned()
}

pub(crate) fn now_ms() -> i64 {
    let Ok(dur) = SystemTime::now().duration_since(UNIX_EPOCH) else {
        return 0;
    };
    i64::try_from(dur.as_millis()).unwrap_or(0)
}

impl ProjectFile {
    /// Project stamped with the current time and version.
    #[must_use]
    pub fn new(backings: Vec<BackingPlacement>, drawing_url: Option<String>) -> Self {
        Self { backings, drawing_url, timestamp: now_ms(), version: default_version() }
    }

    /// Parse and validate a project document.
    ///
    /// # Errors
    ///
    /// Returns [`ProjectError`] if the text is not JSON, lacks a `backings`
    /// array, or contains a placement that fails validation.
    pub fn from_json(text: &str) -> Result<Self, ProjectError> {
        let value: serde_json::Value = serde_json::from_str(text).map_err(ProjectError::InvalidJson)?;
        if !value.get("backings").is_some_and(serde_json::Value::is_array) {
            return Err(ProjectError::MissingBackings);
        }
        let project: Self = serde_json::from_value(value).map_err(ProjectError::MalformedBackings)?;
        project.validate()?;
        if project.version != PROJECT_VERSION {
            tracing::debug!(version = %project.version, "project file version differs from current");
        }
        Ok(project)
    }

    /// Validate every placement and reject duplicate ids.
    ///
    /// # Errors
    ///
    /// Returns the first [`ProjectError::InvalidPlacement`] or [`ProjectError::DuplicateId`].
    pub fn validate(&self) -> Result<(), ProjectError> {
        let mut seen = HashSet::with_capacity(self.backings.len());
        for (index, placement) in self.backings.iter().enumerate() {
            placement.validate().map_err(|source| ProjectError::InvalidPlacement { index, source })?;
            if !seen.insert(placement.id) {
                return Err(ProjectError::DuplicateId(placement.id));
            }
        }
        Ok(())
    }

    /// Pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns [`ProjectError::Serialize`] if serialization fails.
    pub fn to_json(&self) -> Result<String, ProjectError> {
        serde_json::to_string_pretty(self).map_err(ProjectError::Serialize)
    }
}
