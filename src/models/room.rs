//! Room model.
//!
//! Rooms carry a seat capacity and a set of features drawn from a fixed
//! vocabulary. Feature names outside the vocabulary are rejected.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use super::error::check_len;
use super::ModelError;

/// Maximum room capacity.
pub const MAX_ROOM_CAPACITY: u32 = 1000;

/// Equipment or accessibility feature of a room.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoomFeature {
    Projector,
    Computers,
    Whiteboard,
    Smartboard,
    Audio,
    Video,
    LabEquipment,
    WheelchairAccessible,
}

impl RoomFeature {
    /// Every known feature.
    pub const ALL: [RoomFeature; 8] = [
        RoomFeature::Projector,
        RoomFeature::Computers,
        RoomFeature::Whiteboard,
        RoomFeature::Smartboard,
        RoomFeature::Audio,
        RoomFeature::Video,
        RoomFeature::LabEquipment,
        RoomFeature::WheelchairAccessible,
    ];

    /// Wire name of the feature.
    pub fn as_str(self) -> &'static str {
        match self {
            RoomFeature::Projector => "projector",
            RoomFeature::Computers => "computers",
            RoomFeature::Whiteboard => "whiteboard",
            RoomFeature::Smartboard => "smartboard",
            RoomFeature::Audio => "audio",
            RoomFeature::Video => "video",
            RoomFeature::LabEquipment => "lab_equipment",
            RoomFeature::WheelchairAccessible => "wheelchair_accessible",
        }
    }
}

impl fmt::Display for RoomFeature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RoomFeature {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|f| f.as_str() == s)
            .ok_or_else(|| ModelError::UnknownFeature {
                name: s.to_string(),
                valid: Self::ALL.map(RoomFeature::as_str).join(", "),
            })
    }
}

/// A teaching space.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Room {
    /// Unique room identifier.
    pub id: String,
    /// Seats, `1..=1000`.
    pub capacity: u32,
    /// Available features.
    pub features: BTreeSet<RoomFeature>,
}

impl Room {
    /// Creates a room without features.
    pub fn new(id: impl Into<String>, capacity: u32) -> Self {
        Self {
            id: id.into(),
            capacity,
            features: BTreeSet::new(),
        }
    }

    /// Adds a feature.
    pub fn with_feature(mut self, feature: RoomFeature) -> Self {
        self.features.insert(feature);
        self
    }

    /// Adds features by name.
    ///
    /// # Errors
    /// `ModelError::UnknownFeature` on the first name outside the vocabulary.
    pub fn with_feature_names<I, S>(mut self, names: I) -> Result<Self, ModelError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for name in names {
            self.features.insert(name.as_ref().parse()?);
        }
        Ok(self)
    }

    /// Checks id length and capacity range.
    pub fn validate(&self) -> Result<(), ModelError> {
        check_len("room id", &self.id, 1, 50)?;
        if self.capacity == 0 || self.capacity > MAX_ROOM_CAPACITY {
            return Err(ModelError::InvalidField {
                field: "capacity",
                reason: format!("{} outside 1..={MAX_ROOM_CAPACITY}", self.capacity),
            });
        }
        Ok(())
    }

    /// Whether the room offers a feature.
    pub fn has_feature(&self, feature: RoomFeature) -> bool {
        self.features.contains(&feature)
    }
}
