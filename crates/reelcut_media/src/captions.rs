use reelcut_core::selection::SelectionState;
use reelcut_core::types::{Composition, Frames, Item};
use serde::Serialize;

/// Timing and content of the selected text item, the contract surface for a
/// caption overlay renderer.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CaptionParams {
    pub text: String,
    pub color: String,
    pub from: Frames,
    pub duration_in_frames: Frames,
}

/// Caption parameters for the current selection, or `None` when nothing is
/// selected or the selected item is not a text item.
pub fn selected_caption(comp: &Composition, selection: &SelectionState) -> Option<CaptionParams> {
    match selection.resolve_item(comp)? {
        Item::Text {
            text,
            color,
            from,
            duration_in_frames,
            ..
        } => Some(CaptionParams {
            text: text.clone(),
            color: color.clone(),
            from: *from,
            duration_in_frames: *duration_in_frames,
        }),
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// Fade animation
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Default)]
#[serde(rename_all = "camelCase")]
pub enum FadeCurve {
    #[default]
    Linear,
    EqualPower,
    SCurve,
}

impl FadeCurve {
    /// Evaluate the curve at `t` in `[0, 1]`.
    pub fn apply(&self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            FadeCurve::Linear => t,
            FadeCurve::EqualPower => (t * std::f64::consts::FRAC_PI_2).sin(),
            FadeCurve::SCurve => (1.0 - (t * std::f64::consts::PI).cos()) * 0.5,
        }
    }
}

/// Fade-in/out ramps applied over a caption's local frame range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CaptionFade {
    pub fade_in_frames: Frames,
    pub fade_out_frames: Frames,
    pub curve: FadeCurve,
}

impl Default for CaptionFade {
    fn default() -> Self {
        Self {
            fade_in_frames: Frames(8),
            fade_out_frames: Frames(8),
            curve: FadeCurve::Linear,
        }
    }
}

impl CaptionFade {
    /// Opacity of the caption at an absolute composition frame: 0 outside
    /// the item's range, ramping through the fades, 1 in the middle. When
    /// the item is shorter than both fades combined, the dimmer ramp wins.
    pub fn opacity_at(&self, params: &CaptionParams, frame: Frames) -> f64 {
        let local = frame - params.from;
        if local < Frames::ZERO || local >= params.duration_in_frames {
            return 0.0;
        }

        let mut opacity = 1.0_f64;
        if self.fade_in_frames > Frames::ZERO && local < self.fade_in_frames {
            opacity = opacity.min(self.curve.apply(local.0 as f64 / self.fade_in_frames.0 as f64));
        }
        let remaining = params.duration_in_frames - local;
        if self.fade_out_frames > Frames::ZERO && remaining <= self.fade_out_frames {
            opacity =
                opacity.min(self.curve.apply(remaining.0 as f64 / self.fade_out_frames.0 as f64));
        }
        opacity
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use reelcut_core::snapshot::preset_1080p;
    use uuid::Uuid;

    fn comp_with_caption() -> (Composition, Uuid) {
        let mut comp = Composition::new("captions", preset_1080p());
        comp.add_track("Captions");
        let id = Uuid::new_v4();
        comp.insert_item(
            0,
            Item::Text {
                id,
                from: Frames(30),
                duration_in_frames: Frames(60),
                text: "Subscribe!".into(),
                color: "#ffcc00".into(),
            },
        )
        .unwrap();
        comp.insert_item(
            0,
            Item::Video {
                id: Uuid::new_v4(),
                from: Frames(120),
                duration_in_frames: Frames(30),
                src: "b-roll.mp4".into(),
                volume: 1.0,
            },
        )
        .unwrap();
        (comp, id)
    }

    #[test]
    fn selected_text_item_exposes_its_fields() {
        let (comp, id) = comp_with_caption();
        let mut sel = SelectionState::new();
        sel.select(id);

        let params = selected_caption(&comp, &sel).unwrap();
        assert_eq!(params.text, "Subscribe!");
        assert_eq!(params.color, "#ffcc00");
        assert_eq!(params.from, Frames(30));
        assert_eq!(params.duration_in_frames, Frames(60));
    }

    #[test]
    fn non_text_selection_yields_nothing() {
        let (comp, _) = comp_with_caption();
        let mut sel = SelectionState::new();
        sel.select_at(&comp, 0, 1); // the video item
        assert_eq!(selected_caption(&comp, &sel), None);
    }

    #[test]
    fn empty_or_stale_selection_yields_nothing() {
        let (comp, _) = comp_with_caption();
        let sel = SelectionState::new();
        assert_eq!(selected_caption(&comp, &sel), None);

        let mut stale = SelectionState::new();
        stale.select(Uuid::new_v4());
        assert_eq!(selected_caption(&comp, &stale), None);
    }

    fn params() -> CaptionParams {
        CaptionParams {
            text: "Hi".into(),
            color: "#ffffff".into(),
            from: Frames(100),
            duration_in_frames: Frames(40),
        }
    }

    #[test]
    fn opacity_zero_outside_item_range() {
        let fade = CaptionFade::default();
        assert_eq!(fade.opacity_at(&params(), Frames(99)), 0.0);
        assert_eq!(fade.opacity_at(&params(), Frames(140)), 0.0);
    }

    #[test]
    fn opacity_full_between_fades() {
        let fade = CaptionFade::default();
        assert_eq!(fade.opacity_at(&params(), Frames(120)), 1.0);
    }

    #[test]
    fn linear_fade_in_midpoint() {
        let fade = CaptionFade {
            fade_in_frames: Frames(10),
            fade_out_frames: Frames(10),
            curve: FadeCurve::Linear,
        };
        // Local frame 5 of a 10-frame fade-in.
        assert!((fade.opacity_at(&params(), Frames(105)) - 0.5).abs() < 1e-9);
        // First visible frame starts the ramp at zero.
        assert_eq!(fade.opacity_at(&params(), Frames(100)), 0.0);
    }

    #[test]
    fn linear_fade_out_ramps_down() {
        let fade = CaptionFade {
            fade_in_frames: Frames::ZERO,
            fade_out_frames: Frames(10),
            curve: FadeCurve::Linear,
        };
        // 5 frames remaining out of a 10-frame fade-out.
        assert!((fade.opacity_at(&params(), Frames(135)) - 0.5).abs() < 1e-9);
        // Last visible frame is nearly out.
        assert!((fade.opacity_at(&params(), Frames(139)) - 0.1).abs() < 1e-9);
    }

    #[test]
    fn zero_length_fades_mean_constant_opacity() {
        let fade = CaptionFade {
            fade_in_frames: Frames::ZERO,
            fade_out_frames: Frames::ZERO,
            curve: FadeCurve::Linear,
        };
        assert_eq!(fade.opacity_at(&params(), Frames(100)), 1.0);
        assert_eq!(fade.opacity_at(&params(), Frames(139)), 1.0);
    }

    #[test]
    fn curves_agree_at_endpoints() {
        for curve in [FadeCurve::Linear, FadeCurve::EqualPower, FadeCurve::SCurve] {
            assert!(curve.apply(0.0).abs() < 1e-9);
            assert!((curve.apply(1.0) - 1.0).abs() < 1e-9);
        }
    }

    #[test]
    fn scurve_is_monotonic() {
        let mut last = -1.0;
        for i in 0..=10 {
            let v = FadeCurve::SCurve.apply(i as f64 / 10.0);
            assert!(v >= last);
            last = v;
        }
    }

    #[test]
    fn short_item_takes_dimmer_ramp() {
        let fade = CaptionFade {
            fade_in_frames: Frames(30),
            fade_out_frames: Frames(30),
            curve: FadeCurve::Linear,
        };
        let short = CaptionParams {
            text: "!".into(),
            color: "#fff".into(),
            from: Frames(0),
            duration_in_frames: Frames(20),
        };
        // Local frame 15: fade-in says 0.5, fade-out (5 remaining of 30)
        // says ~0.167 -- the dimmer one wins.
        let opacity = fade.opacity_at(&short, Frames(15));
        assert!((opacity - 5.0 / 30.0).abs() < 1e-9);
    }
}
