use crate::error::StateError;
use crate::math::Transform;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::{SystemTime, UNIX_EPOCH};

pub const SNAPSHOT_VERSION: u32 = 1;

/// Live state of one part, owned by the interaction manager.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PartState {
    pub id: String,
    pub transform: Transform,
    /// Angle in degrees for hinge/ball, distance for slider/piston, 0 otherwise.
    pub value: f32,
    pub is_dragging: bool,
    pub is_animating: bool,
}

impl PartState {
    pub fn new(id: impl Into<String>, transform: Transform) -> Self {
        Self {
            id: id.into(),
            transform,
            value: 0.0,
            is_dragging: false,
            is_animating: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SerializedPart {
    pub value: f32,
    pub transform: Transform,
}

/// Versioned snapshot of every part's value and transform.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SerializedModelState {
    pub version: u32,
    /// Milliseconds since the Unix epoch.
    pub timestamp: u64,
    pub parts: BTreeMap<String, SerializedPart>,
}

impl SerializedModelState {
    pub fn new(parts: BTreeMap<String, SerializedPart>) -> Self {
        Self {
            version: SNAPSHOT_VERSION,
            timestamp: now_millis(),
            parts,
        }
    }

    pub fn to_json(&self) -> Result<String, StateError> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn to_json_pretty(&self) -> Result<String, StateError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self, StateError> {
        let state: Self = serde_json::from_str(json)?;
        state.check_version()?;
        Ok(state)
    }

    pub fn check_version(&self) -> Result<(), StateError> {
        if self.version != SNAPSHOT_VERSION {
            return Err(StateError::UnsupportedVersion {
                found: self.version,
                expected: SNAPSHOT_VERSION,
            });
        }
        Ok(())
    }
}

fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or_default()
}
