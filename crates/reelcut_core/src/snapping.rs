use crate::types::*;

/// Find the nearest snap point within the threshold.
/// Returns the snapped position if within threshold, otherwise the original position.
pub fn find_snap_point(position: Frames, snap_points: &[Frames], threshold: Frames) -> Frames {
    let mut best = position;
    let mut best_dist = threshold.0 + 1; // start beyond threshold

    for &point in snap_points {
        let dist = (position.0 - point.0).abs();
        if dist < best_dist {
            best = point;
            best_dist = dist;
        }
    }

    if best_dist <= threshold.0 {
        best
    } else {
        position
    }
}

/// Collect all snap points from a composition: frame zero plus every item
/// edge, optionally excluding the item being dragged.
pub fn collect_snap_points(comp: &Composition, exclude_item: Option<uuid::Uuid>) -> Vec<Frames> {
    let mut points = vec![Frames::ZERO];

    for track in &comp.tracks {
        for item in &track.items {
            if Some(item.id()) == exclude_item {
                continue;
            }
            points.push(item.from());
            points.push(item.end());
        }
    }

    points.sort();
    points.dedup();
    points
}
