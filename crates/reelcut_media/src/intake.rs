use reelcut_core::types::{CompositionSettings, Frames, Item};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{info, warn};
use uuid::Uuid;

use crate::error::{MediaError, Result};

// ---------------------------------------------------------------------------
// MediaKind
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum MediaKind {
    Video,
    Audio,
}

/// Detect media kind from the file extension. Returns `None` for files the
/// timeline cannot place.
pub fn detect_media_kind(path: &Path) -> Option<MediaKind> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();

    match ext.as_str() {
        "mp4" | "mkv" | "webm" | "avi" | "mov" | "m4v" => Some(MediaKind::Video),
        "mp3" | "wav" | "flac" | "aac" | "ogg" | "m4a" | "wma" => Some(MediaKind::Audio),
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// MediaProbe
// ---------------------------------------------------------------------------

/// Stream facts reported by the decoding collaborator.
#[derive(Debug, Clone, PartialEq)]
pub struct ProbedMedia {
    pub duration_seconds: f64,
    pub has_video: bool,
    pub audio_channels: u32,
}

/// The decoding seam. The timeline core never decodes media itself; a host
/// supplies whatever prober its runtime has (ffprobe, a browser element, a
/// WASM transcoder) and the intake only consumes the reported facts.
pub trait MediaProbe {
    fn probe(&self, path: &Path) -> impl std::future::Future<Output = Result<ProbedMedia>> + Send;
}

// ---------------------------------------------------------------------------
// MediaIntake
// ---------------------------------------------------------------------------

/// Turns an uploaded file into a populated timeline item descriptor.
pub struct MediaIntake<P> {
    probe: P,
}

impl<P: MediaProbe> MediaIntake<P> {
    pub fn new(probe: P) -> Self {
        Self { probe }
    }

    /// Import a media file as an item starting at `at`. Completes
    /// asynchronously once the prober reports back; the caller inserts the
    /// returned descriptor into its target track.
    pub async fn import(
        &self,
        path: impl AsRef<Path>,
        settings: &CompositionSettings,
        at: Frames,
    ) -> Result<Item> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(MediaError::FileNotFound(path.to_path_buf()));
        }

        let Some(kind) = detect_media_kind(path) else {
            let ext = path
                .extension()
                .and_then(|e| e.to_str())
                .unwrap_or("(none)")
                .to_string();
            warn!(path = %path.display(), ext, "rejected upload with unsupported extension");
            return Err(MediaError::UnsupportedFormat(ext));
        };

        let probed = self.probe.probe(path).await?;
        let kind = resolve_kind(kind, &probed);
        let duration_in_frames =
            Frames::from_seconds(probed.duration_seconds, settings.fps).max(Frames::ONE);
        let src = path.to_string_lossy().into_owned();

        info!(
            path = %path.display(),
            ?kind,
            frames = %duration_in_frames,
            "imported media file"
        );

        let item = match kind {
            MediaKind::Video => Item::Video {
                id: Uuid::new_v4(),
                from: at,
                duration_in_frames,
                src,
                volume: 1.0,
            },
            MediaKind::Audio => Item::Audio {
                id: Uuid::new_v4(),
                from: at,
                duration_in_frames,
                src,
                volume: 1.0,
            },
        };
        Ok(item)
    }
}

/// A video container without a video stream imports as audio.
fn resolve_kind(by_extension: MediaKind, probed: &ProbedMedia) -> MediaKind {
    match by_extension {
        MediaKind::Video if !probed.has_video && probed.audio_channels > 0 => MediaKind::Audio,
        other => other,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
