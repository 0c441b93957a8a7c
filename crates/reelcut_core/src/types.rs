use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, Div, Mul, Neg, Sub};
use uuid::Uuid;

// ---------------------------------------------------------------------------
// Frames
// ---------------------------------------------------------------------------

/// A count of frames, the atomic timeline unit. Offsets and durations are
/// both expressed in frames at the composition's frame rate.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Frames(pub i64);

impl Frames {
    pub const ZERO: Self = Self(0);
    pub const ONE: Self = Self(1);

    /// Convert seconds to the nearest whole frame at the given rate.
    pub fn from_seconds(seconds: f64, fps: f64) -> Self {
        Self((seconds * fps).round() as i64)
    }

    pub fn as_seconds(&self, fps: f64) -> f64 {
        self.0 as f64 / fps
    }

    /// Timecode string `MM:SS:FF` at the given rate.
    pub fn timecode(&self, fps: f64) -> String {
        let fps_whole = fps.round().max(1.0) as i64;
        let total = self.0.unsigned_abs() as i64;
        let frames = total % fps_whole;
        let total_secs = total / fps_whole;
        let secs = total_secs % 60;
        let mins = total_secs / 60;
        if self.0 < 0 {
            format!("-{:02}:{:02}:{:02}", mins, secs, frames)
        } else {
            format!("{:02}:{:02}:{:02}", mins, secs, frames)
        }
    }
}

impl Add for Frames {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Self(self.0 + rhs.0)
    }
}

impl Sub for Frames {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        Self(self.0 - rhs.0)
    }
}

impl Mul<i64> for Frames {
    type Output = Self;
    fn mul(self, rhs: i64) -> Self {
        Self(self.0 * rhs)
    }
}

impl Div<i64> for Frames {
    type Output = Self;
    fn div(self, rhs: i64) -> Self {
        Self(self.0 / rhs)
    }
}

impl Neg for Frames {
    type Output = Self;
    fn neg(self) -> Self {
        Self(-self.0)
    }
}

impl fmt::Display for Frames {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// Item
// ---------------------------------------------------------------------------

fn default_volume() -> f64 {
    1.0
}

/// A placed element on a track. The serialized shape is the plain tagged
/// object an external player consumes: `{"type":"video","from":0,...}`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Item {
    #[serde(rename_all = "camelCase")]
    Solid {
        id: Uuid,
        from: Frames,
        duration_in_frames: Frames,
        color: String,
    },
    #[serde(rename_all = "camelCase")]
    Text {
        id: Uuid,
        from: Frames,
        duration_in_frames: Frames,
        text: String,
        color: String,
    },
    #[serde(rename_all = "camelCase")]
    Video {
        id: Uuid,
        from: Frames,
        duration_in_frames: Frames,
        src: String,
        #[serde(default = "default_volume")]
        volume: f64,
    },
    #[serde(rename_all = "camelCase")]
    Audio {
        id: Uuid,
        from: Frames,
        duration_in_frames: Frames,
        src: String,
        #[serde(default = "default_volume")]
        volume: f64,
    },
}

impl Item {
    pub fn id(&self) -> Uuid {
        match self {
            Item::Solid { id, .. } => *id,
            Item::Text { id, .. } => *id,
            Item::Video { id, .. } => *id,
            Item::Audio { id, .. } => *id,
        }
    }

    pub fn from(&self) -> Frames {
        match self {
            Item::Solid { from, .. } => *from,
            Item::Text { from, .. } => *from,
            Item::Video { from, .. } => *from,
            Item::Audio { from, .. } => *from,
        }
    }

    pub fn duration_in_frames(&self) -> Frames {
        match self {
            Item::Solid {
                duration_in_frames, ..
            } => *duration_in_frames,
            Item::Text {
                duration_in_frames, ..
            } => *duration_in_frames,
            Item::Video {
                duration_in_frames, ..
            } => *duration_in_frames,
            Item::Audio {
                duration_in_frames, ..
            } => *duration_in_frames,
        }
    }

    /// Exclusive end frame, `from + duration_in_frames`.
    pub fn end(&self) -> Frames {
        self.from() + self.duration_in_frames()
    }

    /// Per-item volume for the audible variants.
    pub fn volume(&self) -> Option<f64> {
        match self {
            Item::Video { volume, .. } | Item::Audio { volume, .. } => Some(*volume),
            Item::Solid { .. } | Item::Text { .. } => None,
        }
    }

    /// Source reference for the media-backed variants.
    pub fn src(&self) -> Option<&str> {
        match self {
            Item::Video { src, .. } | Item::Audio { src, .. } => Some(src),
            Item::Solid { .. } | Item::Text { .. } => None,
        }
    }

    pub(crate) fn set_from(&mut self, new_from: Frames) {
        match self {
            Item::Solid { from, .. } => *from = new_from,
            Item::Text { from, .. } => *from = new_from,
            Item::Video { from, .. } => *from = new_from,
            Item::Audio { from, .. } => *from = new_from,
        }
    }

    pub(crate) fn set_bounds(&mut self, new_from: Frames, new_duration: Frames) {
        match self {
            Item::Solid {
                from,
                duration_in_frames,
                ..
            }
            | Item::Text {
                from,
                duration_in_frames,
                ..
            }
            | Item::Video {
                from,
                duration_in_frames,
                ..
            }
            | Item::Audio {
                from,
                duration_in_frames,
                ..
            } => {
                *from = new_from;
                *duration_in_frames = new_duration;
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Track
// ---------------------------------------------------------------------------

/// An ordered lane of non-overlapping items, kept sorted by `from`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Track {
    pub id: Uuid,
    pub name: String,
    #[serde(default = "default_volume")]
    pub volume: f64,
    pub items: Vec<Item>,
}

impl Track {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            volume: 1.0,
            items: vec![],
        }
    }
}

// ---------------------------------------------------------------------------
// CompositionSettings
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CompositionSettings {
    pub width: u32,
    pub height: u32,
    pub fps: f64,
}

// ---------------------------------------------------------------------------
// Composition
// ---------------------------------------------------------------------------

/// The whole editable model: an ordered sequence of tracks owning their
/// items exclusively. `duration_in_frames` is derived (max item end across
/// all tracks) and recomputed after every successful mutation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Composition {
    pub id: Uuid,
    pub name: String,
    pub settings: CompositionSettings,
    pub tracks: Vec<Track>,
    pub duration_in_frames: Frames,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
