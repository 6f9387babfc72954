//! Specification snapshots for undo history and save files.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::CalcResult;
use crate::specification::Specification;

/// A deep copy of a specification, stamped with an id and a time.
///
/// Restoring a snapshot regenerates exactly the same components,
/// violations and prices as when it was taken.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpecSnapshot {
    pub id: Uuid,
    pub taken_at: DateTime<Utc>,
    pub label: String,
    pub spec: Specification,
}

impl SpecSnapshot {
    pub fn capture(spec: &Specification, label: impl Into<String>) -> Self {
        SpecSnapshot {
            id: Uuid::new_v4(),
            taken_at: Utc::now(),
            label: label.into(),
            spec: spec.clone(),
        }
    }

    pub fn to_json(&self) -> CalcResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> CalcResult<Self> {
        Ok(serde_json::from_str(json)?)
    }
}
