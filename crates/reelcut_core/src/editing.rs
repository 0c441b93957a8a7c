use crate::error::{CoreError, Result};
use crate::types::*;
use uuid::Uuid;

impl Composition {
    /// Append a new empty track and return its index.
    pub fn add_track(&mut self, name: impl Into<String>) -> usize {
        self.tracks.push(Track::new(name));
        self.tracks.len() - 1
    }

    /// Remove a track and everything on it. Returns the removed track.
    pub fn remove_track(&mut self, track_index: usize) -> Result<Track> {
        if track_index >= self.tracks.len() {
            return Err(CoreError::TrackOutOfRange(track_index));
        }
        let track = self.tracks.remove(track_index);
        self.recompute_duration();
        Ok(track)
    }

    pub fn track(&self, track_index: usize) -> Result<&Track> {
        self.tracks
            .get(track_index)
            .ok_or(CoreError::TrackOutOfRange(track_index))
    }

    pub fn item_at(&self, track_index: usize, item_index: usize) -> Result<&Item> {
        self.track(track_index)?
            .items
            .get(item_index)
            .ok_or(CoreError::ItemOutOfRange {
                track: track_index,
                index: item_index,
            })
    }

    /// Place an item on a track. Rejects placements that would overlap an
    /// existing item; neighbors are never shifted to make room.
    pub fn insert_item(&mut self, track_index: usize, item: Item) -> Result<()> {
        validate_span(item.from(), item.duration_in_frames())?;
        let track = self
            .tracks
            .get_mut(track_index)
            .ok_or(CoreError::TrackOutOfRange(track_index))?;

        for existing in &track.items {
            if intervals_overlap(existing.from(), existing.end(), item.from(), item.end()) {
                return Err(CoreError::Overlap);
            }
        }

        let pos = track.items.partition_point(|i| i.from() < item.from());
        track.items.insert(pos, item);
        self.recompute_duration();
        Ok(())
    }

    /// Move an item to `new_from` on `dest_track` (which may equal the source
    /// track). Ownership transfers atomically: on any failure the source
    /// track is left untouched.
    pub fn move_item(
        &mut self,
        src_track: usize,
        item_index: usize,
        dest_track: usize,
        new_from: Frames,
    ) -> Result<()> {
        if dest_track >= self.tracks.len() {
            return Err(CoreError::TrackOutOfRange(dest_track));
        }
        let item = self.item_at(src_track, item_index)?;
        let moving_id = item.id();
        let duration = item.duration_in_frames();
        validate_span(new_from, duration)?;

        let new_end = new_from + duration;
        for existing in &self.tracks[dest_track].items {
            if existing.id() == moving_id {
                continue;
            }
            if intervals_overlap(existing.from(), existing.end(), new_from, new_end) {
                return Err(CoreError::Overlap);
            }
        }

        let mut item = self.tracks[src_track].items.remove(item_index);
        item.set_from(new_from);
        let dest = &mut self.tracks[dest_track];
        let pos = dest.items.partition_point(|i| i.from() < new_from);
        dest.items.insert(pos, item);
        self.recompute_duration();
        Ok(())
    }

    /// Change an item's bounds in place. The new interval must keep at least
    /// one frame and stay clear of its neighbors.
    pub fn resize_item(
        &mut self,
        track_index: usize,
        item_index: usize,
        new_from: Frames,
        new_duration: Frames,
    ) -> Result<()> {
        self.item_at(track_index, item_index)?;
        validate_span(new_from, new_duration)?;

        let new_end = new_from + new_duration;
        for (i, existing) in self.tracks[track_index].items.iter().enumerate() {
            if i == item_index {
                continue;
            }
            if intervals_overlap(existing.from(), existing.end(), new_from, new_end) {
                return Err(CoreError::Overlap);
            }
        }

        let track = &mut self.tracks[track_index];
        track.items[item_index].set_bounds(new_from, new_duration);
        track.items.sort_by_key(|i| i.from());
        self.recompute_duration();
        Ok(())
    }

    /// Remove an item unconditionally. The caller is responsible for
    /// clearing any selection that referenced it.
    pub fn delete_item(&mut self, track_index: usize, item_index: usize) -> Result<Item> {
        self.item_at(track_index, item_index)?;
        let item = self.tracks[track_index].items.remove(item_index);
        self.recompute_duration();
        Ok(item)
    }

    /// Resolve an item id to its current `(track_index, item_index)`.
    pub fn locate_item(&self, item_id: Uuid) -> Option<(usize, usize)> {
        for (ti, track) in self.tracks.iter().enumerate() {
            for (ii, item) in track.items.iter().enumerate() {
                if item.id() == item_id {
                    return Some((ti, ii));
                }
            }
        }
        None
    }

    /// Largest `from + duration_in_frames` across all items, `ZERO` when
    /// the composition is empty.
    pub fn content_end(&self) -> Frames {
        self.tracks
            .iter()
            .flat_map(|t| t.items.iter())
            .map(|i| i.end())
            .max()
            .unwrap_or(Frames::ZERO)
    }

    fn recompute_duration(&mut self) {
        self.duration_in_frames = self.content_end();
    }
}

/// Half-open interval intersection test: `[a_start, a_end)` vs `[b_start, b_end)`.
fn intervals_overlap(a_start: Frames, a_end: Frames, b_start: Frames, b_end: Frames) -> bool {
    a_start < b_end && b_start < a_end
}

fn validate_span(from: Frames, duration: Frames) -> Result<()> {
    if duration < Frames::ONE {
        return Err(CoreError::InvalidDuration(duration.0));
    }
    if from < Frames::ZERO {
        return Err(CoreError::InvalidOperation(
            "item start must be non-negative".into(),
        ));
    }
    Ok(())
}
