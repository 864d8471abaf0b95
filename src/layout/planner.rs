//! Pure derivation of the two-clip layout: relative orientation, output
//! canvas size, and per-track placement transforms.
//!
//! The stacking policy assumes portrait devices are held side by side and
//! landscape devices stacked: a portrait pair lays out left/right, any
//! other pair top/bottom.
//!
//! Two inherited quirks are kept on purpose and pinned by tests: the
//! asymmetric `preferred_track_size` tie-break, and the second clip's
//! placement offset being taken from the first clip's *unscaled* natural
//! size. The latter can leave a seam or an overlap when the two sources
//! differ in native resolution.

use tracing::debug;

use crate::foundation::core::{Affine, Size};
use crate::layout::orientation::{Orientation, classify_orientation};
use crate::media::source::{VideoSource, VideoTrackInfo};
use crate::transform::affine::{half_turn, translate, uniform_scale};

/// Derived, immutable layout for one merge invocation.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct LayoutPlan {
    /// True when both sources independently classify as portrait.
    pub pair_is_portrait: bool,
    /// Pixel dimensions of the merged output frame.
    pub canvas_size: Size,
    /// Reference size used to derive per-source scale factors.
    pub preferred_track_size: Size,
    /// Scale-and-place transform for each source, in input order.
    pub placements: [Affine; 2],
}

impl LayoutPlan {
    /// The all-zero plan produced when either source has no video track.
    pub fn degenerate() -> Self {
        Self {
            pair_is_portrait: false,
            canvas_size: Size::ZERO,
            preferred_track_size: Size::ZERO,
            placements: [Affine::IDENTITY; 2],
        }
    }

    /// True for the degenerate plan; callers must treat it as a hard stop
    /// before building a composition request.
    pub fn is_degenerate(&self) -> bool {
        self.canvas_size.width == 0.0 && self.canvas_size.height == 0.0
    }
}

/// True iff both tracks classify as portrait.
pub fn is_pair_portrait(first: &VideoTrackInfo, second: &VideoTrackInfo) -> bool {
    classify_orientation(first.preferred_transform).is_portrait
        && classify_orientation(second.preferred_transform).is_portrait
}

/// Output canvas size under the stacking policy: side by side for a
/// portrait pair, stacked otherwise.
pub fn canvas_size(first: &VideoTrackInfo, second: &VideoTrackInfo) -> Size {
    let a = first.natural_size;
    let b = second.natural_size;
    if is_pair_portrait(first, second) {
        Size::new(a.width + b.width, a.height.max(b.height))
    } else {
        Size::new(a.width.max(b.width), a.height + b.height)
    }
}

/// Reference size for per-source scale factors.
///
/// Normally the second track's natural size; a portrait pair whose first
/// track is strictly wider, or failing that strictly taller, uses the
/// first track's size instead. The asymmetry is inherited, not a
/// largest-wins rule.
pub fn preferred_track_size(first: &VideoTrackInfo, second: &VideoTrackInfo) -> Size {
    if is_pair_portrait(first, second) {
        let a = first.natural_size;
        let b = second.natural_size;
        if a.width > b.width || a.height > b.height {
            return a;
        }
    }
    second.natural_size
}

/// Scale-and-place transform for one track.
///
/// Composes, in application order: the track's own preferred transform, a
/// uniform scale toward `preferred`, centering translations (landscape
/// tracks only, with a half-turn re-composition for Down), and finally the
/// placement offset derived from the first track's unscaled natural size.
pub fn placement_transform(
    track: &VideoTrackInfo,
    is_first: bool,
    first_natural: Size,
    preferred: Size,
    pair_is_portrait: bool,
) -> Affine {
    let info = classify_orientation(track.preferred_transform);
    let natural = track.natural_size;

    let scaled = if info.is_portrait {
        let ratio = preferred.width / natural.height;
        uniform_scale(ratio) * track.preferred_transform
    } else {
        let ratio = preferred.width / natural.width;
        let scale = uniform_scale(ratio);
        let mut concat = scale * track.preferred_transform;

        // The gap comparisons use the unscaled natural size; inherited.
        if natural.height < preferred.height {
            concat = translate(0.0, (preferred.height - natural.height) / 2.0) * concat;
        }
        if natural.width < preferred.width {
            concat = translate((preferred.width - natural.width) / 2.0, 0.0) * concat;
        }

        if info.orientation == Orientation::Down {
            let center_fix = translate(natural.width, natural.height + preferred.height);
            concat = scale * center_fix * half_turn();
        }

        concat
    };

    let offset = if is_first {
        translate(0.0, 0.0)
    } else if pair_is_portrait {
        translate(first_natural.width, 0.0)
    } else {
        translate(0.0, first_natural.height)
    };

    offset * scaled
}

/// Derive the full [`LayoutPlan`] for a pair of sources.
///
/// Pure and synchronous; never fails. A source without a video track
/// yields the degenerate all-zero plan.
pub fn plan_layout(first: &VideoSource, second: &VideoSource) -> LayoutPlan {
    let (Some(a), Some(b)) = (first.track.as_ref(), second.track.as_ref()) else {
        debug!("a source has no video track; returning degenerate layout plan");
        return LayoutPlan::degenerate();
    };

    let pair_is_portrait = is_pair_portrait(a, b);
    let canvas = canvas_size(a, b);
    let preferred = preferred_track_size(a, b);
    let placements = [
        placement_transform(a, true, a.natural_size, preferred, pair_is_portrait),
        placement_transform(b, false, a.natural_size, preferred, pair_is_portrait),
    ];

    debug!(
        portrait = pair_is_portrait,
        canvas_w = canvas.width,
        canvas_h = canvas.height,
        "derived layout plan"
    );

    LayoutPlan {
        pair_is_portrait,
        canvas_size: canvas,
        preferred_track_size: preferred,
        placements,
    }
}

#[cfg(test)]
#[path = "../../tests/unit/layout/planner.rs"]
mod tests;
