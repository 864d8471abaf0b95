//! Orientation classification of stored-vs-displayed transforms.

use crate::foundation::core::Affine;
use crate::transform::affine::COEFF_EPS;

/// Display orientation encoded by a source's preferred transform.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum Orientation {
    /// Stored frame is already upright.
    Up,
    /// Stored frame is upside down (half turn).
    Down,
    /// Stored frame needs a counter-clockwise quarter turn.
    Left,
    /// Stored frame needs a clockwise quarter turn.
    Right,
}

/// Classification result: the orientation variant plus whether the frame
/// displays portrait.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct OrientationInfo {
    /// Matched orientation variant.
    pub orientation: Orientation,
    /// True for the two quarter-turn orientations.
    pub is_portrait: bool,
}

/// Classify a preferred transform against the four canonical quarter-turn
/// matrices.
///
/// Only the linear 2x2 part participates; translation components are
/// ignored. Comparison is within [`COEFF_EPS`] so slightly perturbed
/// container metadata still matches. Anything that is not one of the four
/// canonical forms classifies as `{Up, portrait: false}` — this is policy,
/// not a general rotation decomposition.
pub fn classify_orientation(transform: Affine) -> OrientationInfo {
    let [a, b, c, d, _, _] = transform.as_coeffs();
    let close = |x: f64, y: f64| (x - y).abs() <= COEFF_EPS;

    if close(a, 0.0) && close(b, 1.0) && close(c, -1.0) && close(d, 0.0) {
        OrientationInfo {
            orientation: Orientation::Right,
            is_portrait: true,
        }
    } else if close(a, 0.0) && close(b, -1.0) && close(c, 1.0) && close(d, 0.0) {
        OrientationInfo {
            orientation: Orientation::Left,
            is_portrait: true,
        }
    } else if close(a, -1.0) && close(b, 0.0) && close(c, 0.0) && close(d, -1.0) {
        OrientationInfo {
            orientation: Orientation::Down,
            is_portrait: false,
        }
    } else {
        // Identity and every non-canonical transform both land here.
        OrientationInfo {
            orientation: Orientation::Up,
            is_portrait: false,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/layout/orientation.rs"]
mod tests;
