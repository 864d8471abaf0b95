use super::*;

fn linear(a: f64, b: f64, c: f64, d: f64) -> Affine {
    Affine::new([a, b, c, d, 0.0, 0.0])
}

#[test]
fn canonical_transforms_classify_exactly() {
    let up = classify_orientation(linear(1.0, 0.0, 0.0, 1.0));
    assert_eq!(up.orientation, Orientation::Up);
    assert!(!up.is_portrait);

    let down = classify_orientation(linear(-1.0, 0.0, 0.0, -1.0));
    assert_eq!(down.orientation, Orientation::Down);
    assert!(!down.is_portrait);

    let right = classify_orientation(linear(0.0, 1.0, -1.0, 0.0));
    assert_eq!(right.orientation, Orientation::Right);
    assert!(right.is_portrait);

    let left = classify_orientation(linear(0.0, -1.0, 1.0, 0.0));
    assert_eq!(left.orientation, Orientation::Left);
    assert!(left.is_portrait);
}

#[test]
fn classification_ignores_translation() {
    let right = classify_orientation(Affine::new([0.0, 1.0, -1.0, 0.0, 1080.0, 0.0]));
    assert_eq!(right.orientation, Orientation::Right);
    assert!(right.is_portrait);
}

#[test]
fn perturbed_canonical_transforms_still_match() {
    // Container metadata is rarely bit-exact.
    let eps = 1e-7;
    let right = classify_orientation(linear(eps, 1.0 - eps, -1.0 + eps, -eps));
    assert_eq!(right.orientation, Orientation::Right);
    assert!(right.is_portrait);
}

#[test]
fn non_canonical_transforms_fall_back_to_up() {
    for t in [
        linear(0.7, 0.7, -0.7, 0.7),    // 45-degree rotation
        linear(2.0, 0.0, 0.0, 2.0),     // scale
        linear(1.0, 0.0, 0.5, 1.0),     // shear
        linear(-1.0, 0.0, 0.0, 1.0),    // horizontal flip
    ] {
        let info = classify_orientation(t);
        assert_eq!(info.orientation, Orientation::Up);
        assert!(!info.is_portrait);
    }
}
