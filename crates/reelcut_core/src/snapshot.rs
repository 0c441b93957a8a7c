use crate::error::Result;
use crate::types::*;
use std::path::Path;
use uuid::Uuid;

impl Composition {
    /// Create a new empty composition with the given name and settings.
    pub fn new(name: impl Into<String>, settings: CompositionSettings) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            settings,
            tracks: vec![],
            duration_in_frames: Frames::ZERO,
        }
    }

    /// The current track/item sequence as a plain JSON snapshot, on demand.
    /// Importing an exported snapshot yields a field-for-field identical
    /// composition, given no intervening mutation.
    pub fn export_snapshot(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn import_snapshot(json: &str) -> Result<Self> {
        let comp: Composition = serde_json::from_str(json)?;
        Ok(comp)
    }

    /// Save the snapshot to a file, appending the `.reelcut` extension if
    /// not present.
    pub fn save_to_file(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = ensure_extension(path.as_ref());
        let json = self.export_snapshot()?;
        std::fs::write(path, json)?;
        Ok(())
    }

    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self> {
        let data = std::fs::read_to_string(path.as_ref())?;
        Self::import_snapshot(&data)
    }
}

/// 1920x1080 30fps preset.
pub fn preset_1080p() -> CompositionSettings {
    CompositionSettings {
        width: 1920,
        height: 1080,
        fps: 30.0,
    }
}

/// 1280x720 30fps preset.
pub fn preset_720p() -> CompositionSettings {
    CompositionSettings {
        width: 1280,
        height: 720,
        fps: 30.0,
    }
}

/// 1080x1920 30fps (vertical/shorts) preset.
pub fn preset_vertical() -> CompositionSettings {
    CompositionSettings {
        width: 1080,
        height: 1920,
        fps: 30.0,
    }
}

/// 1920x1080 60fps preset.
pub fn preset_1080p_60() -> CompositionSettings {
    CompositionSettings {
        width: 1920,
        height: 1080,
        fps: 60.0,
    }
}

fn ensure_extension(path: &Path) -> std::path::PathBuf {
    if path.extension().and_then(|e| e.to_str()) == Some("reelcut") {
        path.to_path_buf()
    } else {
        let mut p = path.to_path_buf();
        let mut name = p.file_name().unwrap_or_default().to_os_string();
        name.push(".reelcut");
        p.set_file_name(name);
        p
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn populated_composition() -> Composition {
        let mut comp = Composition::new("Snapshot Test", preset_1080p());
        comp.add_track("Main");
        comp.add_track("Captions");
        comp.insert_item(
            0,
            Item::Video {
                id: Uuid::new_v4(),
                from: Frames(0),
                duration_in_frames: Frames(150),
                src: "media/intro.mp4".into(),
                volume: 0.8,
            },
        )
        .unwrap();
        comp.insert_item(
            1,
            Item::Text {
                id: Uuid::new_v4(),
                from: Frames(30),
                duration_in_frames: Frames(60),
                text: "Welcome".into(),
                color: "#ffffff".into(),
            },
        )
        .unwrap();
        comp
    }

    #[test]
    fn snapshot_roundtrip_is_identity() {
        let comp = populated_composition();
        let json = comp.export_snapshot().unwrap();
        let back = Composition::import_snapshot(&json).unwrap();
        assert_eq!(comp, back);

        // Re-exporting without mutation yields the identical snapshot.
        assert_eq!(json, back.export_snapshot().unwrap());
    }

    #[test]
    fn snapshot_contains_player_shape() {
        let comp = populated_composition();
        let json: serde_json::Value =
            serde_json::from_str(&comp.export_snapshot().unwrap()).unwrap();
        assert_eq!(json["durationInFrames"], 150);
        assert_eq!(json["tracks"][0]["items"][0]["type"], "video");
        assert_eq!(json["tracks"][1]["items"][0]["durationInFrames"], 60);
    }

    #[test]
    fn save_load_roundtrip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("project.reelcut");

        let comp = populated_composition();
        comp.save_to_file(&path).unwrap();
        let loaded = Composition::load_from_file(&path).unwrap();
        assert_eq!(comp, loaded);
    }

    #[test]
    fn extension_appended_if_missing() {
        let dir = TempDir::new().unwrap();
        let comp = Composition::new("ExtTest", preset_720p());
        comp.save_to_file(dir.path().join("no_ext")).unwrap();

        let expected = dir.path().join("no_ext.reelcut");
        assert!(expected.exists());
        assert_eq!(Composition::load_from_file(&expected).unwrap(), comp);
    }

    #[test]
    fn load_nonexistent_file_returns_error() {
        let result = Composition::load_from_file("/tmp/does_not_exist_reelcut_test.reelcut");
        assert!(result.is_err());
    }

    #[test]
    fn preset_values() {
        assert_eq!(preset_1080p().width, 1920);
        assert_eq!(preset_720p().height, 720);
        assert_eq!(preset_vertical().width, 1080);
        assert_eq!(preset_vertical().height, 1920);
        assert_eq!(preset_1080p_60().fps, 60.0);
    }

    #[test]
    fn new_composition_is_empty() {
        let comp = Composition::new("Empty", preset_1080p());
        assert!(comp.tracks.is_empty());
        assert_eq!(comp.duration_in_frames, Frames::ZERO);
        assert_eq!(comp.content_end(), Frames::ZERO);
    }
}
