//! Affine transform helpers.
//!
//! Placement transforms are built from three primitives (the source's own
//! orientation transform, a uniform scale, and translations) and torn back
//! apart by the exporter, which only supports quarter-turn rotations.

use crate::foundation::core::{Affine, Vec2};
use crate::foundation::error::{MergeError, MergeResult};

/// Comparison tolerance for transform coefficients.
///
/// Container metadata frequently stores rotation matrices with small
/// floating-point perturbations; exact equality would misclassify them.
pub const COEFF_EPS: f64 = 1e-6;

/// Translation by `(x, y)`.
#[inline]
pub fn translate(x: f64, y: f64) -> Affine {
    Affine::translate(Vec2::new(x, y))
}

/// Uniform scale by `s` about the origin.
#[inline]
pub fn uniform_scale(s: f64) -> Affine {
    Affine::scale(s)
}

/// Half-turn rotation about the origin.
#[inline]
pub fn half_turn() -> Affine {
    Affine::rotate(std::f64::consts::PI)
}

/// Coefficient-wise comparison of two transforms within [`COEFF_EPS`].
pub fn approx_eq(a: Affine, b: Affine) -> bool {
    let a = a.as_coeffs();
    let b = b.as_coeffs();
    a.iter().zip(b.iter()).all(|(x, y)| (x - y).abs() <= COEFF_EPS)
}

/// Comparison of the linear 2x2 parts only, ignoring translation.
pub fn linear_approx_eq(a: Affine, b: Affine) -> bool {
    let a = a.as_coeffs();
    let b = b.as_coeffs();
    a[..4]
        .iter()
        .zip(b[..4].iter())
        .all(|(x, y)| (x - y).abs() <= COEFF_EPS)
}

/// A rotate-scale-translate decomposition with a quarter-turn rotation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct QuarterTurnRst {
    /// Clockwise quarter turns in screen coordinates (y-down), in `0..4`.
    pub quarter_turns: u8,
    /// Uniform scale factor.
    pub scale: f64,
    /// Translation component.
    pub translate: Vec2,
}

/// Decompose a transform into quarter-turn rotation + uniform scale +
/// translation.
///
/// Fails on shear, non-uniform scale, reflections, and rotations that are
/// not a multiple of 90 degrees, since the ffmpeg filter graph cannot
/// express those.
pub fn decompose_quarter_turn(t: Affine) -> MergeResult<QuarterTurnRst> {
    let [a, b, c, d, e, f] = t.as_coeffs();

    let col_x = f64::hypot(a, b);
    let col_y = f64::hypot(c, d);
    if col_x <= COEFF_EPS || (col_x - col_y).abs() > COEFF_EPS * col_x.max(1.0) {
        return Err(MergeError::validation(
            "placement transform has non-uniform or zero scale",
        ));
    }
    if (a * c + b * d).abs() > COEFF_EPS * col_x.max(1.0) {
        return Err(MergeError::validation("placement transform has shear"));
    }
    if a * d - b * c <= 0.0 {
        return Err(MergeError::validation(
            "placement transform contains a reflection",
        ));
    }

    let angle = f64::atan2(b, a);
    let turns_f = angle / std::f64::consts::FRAC_PI_2;
    let turns = turns_f.round();
    if (turns_f - turns).abs() > 1e-3 {
        return Err(MergeError::validation(
            "placement rotation is not a quarter turn",
        ));
    }
    let quarter_turns = ((turns as i64).rem_euclid(4)) as u8;

    Ok(QuarterTurnRst {
        quarter_turns,
        scale: col_x,
        translate: Vec2::new(e, f),
    })
}
