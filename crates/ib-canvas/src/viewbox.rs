//! Viewbox, scroll, and zoom transform math.
//!
//! Pure functions over the root node's affine matrix (`a, b, c, d, e, f`
//! convention — scale in `a`/`d`, translation in `e`/`f`). The canvas owns
//! the matrix; everything here only computes replacements for it.

use ib_core::{Dimensions, Viewbox};
use kurbo::{Affine, Point, Rect};

/// Round to 3 decimal places — the precision reported for scales and
/// offsets read back from the matrix.
pub fn round_scale(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}

/// Derive the viewbox snapshot from the current root transform.
///
/// Scale is read from `a`; offsets divide the negated translation back by
/// the scale. A zero translation stays exactly 0 rather than being divided
/// (avoids `-0` and `NaN` at degenerate scales).
pub fn viewbox_from_transform(matrix: Affine, inner: Dimensions, outer: Dimensions) -> Viewbox {
    let [a, _, _, _, e, f] = matrix.as_coeffs();
    let scale = round_scale(a);

    let x = if e == 0.0 { 0.0 } else { round_scale(-e) / scale };
    let y = if f == 0.0 { 0.0 } else { round_scale(-f) / scale };

    Viewbox {
        x,
        y,
        width: outer.width / scale,
        height: outer.height / scale,
        scale,
        inner,
        outer,
    }
}

/// Cover-fit scale: the requested region fully fills the container,
/// possibly cropping one axis.
pub fn cover_fit_scale(region: Rect, outer: Dimensions) -> f64 {
    f64::max(outer.width / region.width(), outer.height / region.height())
}

/// The fresh root transform for a viewbox write: cover-fit scale, then
/// translate the region origin to the container origin. Replaces the
/// previous transform wholesale.
pub fn viewbox_transform(region: Rect, outer: Dimensions) -> Affine {
    let scale = cover_fit_scale(region, outer);
    Affine::scale(scale) * Affine::translate((-region.x0, -region.y0))
}

/// Compose a screen-space translation onto the current transform. The
/// delta applies before the existing matrix (pre-multiplication), so it
/// moves the view in container pixels regardless of zoom.
pub fn scroll_transform(current: Affine, dx: f64, dy: f64) -> Affine {
    Affine::translate((dx, dy)) * current
}

/// The `fit-viewport` scale: shrink to fit the container width, never
/// enlarge beyond natural size.
pub fn fit_viewport_scale(inner: Dimensions, outer: Dimensions) -> f64 {
    1.0f64.min(outer.width / inner.width)
}

/// Zoom-to-point.
///
/// Without a center the new matrix is the target scale applied fresh
/// (origin-anchored). With a center, the screen point is mapped back
/// through the inverse of the current matrix into model space, and a
/// relative scale about that model point is composed onto the current
/// matrix — so the model point under the center stays under it.
pub fn zoom_transform(current: Affine, target_scale: f64, center: Option<Point>) -> Affine {
    match center {
        None => Affine::scale(target_scale),
        Some(center) => {
            let current_scale = current.as_coeffs()[0];
            let original = current.inverse() * center;
            let relative = target_scale / current_scale;
            current
                * Affine::translate(original.to_vec2())
                * Affine::scale(relative)
                * Affine::translate(-original.to_vec2())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const EPSILON: f64 = 1e-6;

    fn outer() -> Dimensions {
        Dimensions::new(300.0, 300.0)
    }

    #[test]
    fn identity_matrix_reads_as_unit_viewbox() {
        let vbox = viewbox_from_transform(Affine::IDENTITY, Dimensions::new(100.0, 50.0), outer());
        assert_eq!(vbox.x, 0.0);
        assert_eq!(vbox.y, 0.0);
        assert_eq!(vbox.scale, 1.0);
        assert_eq!(vbox.width, 300.0);
        assert_eq!(vbox.height, 300.0);
    }

    #[test]
    fn offsets_divide_back_by_scale() {
        // scale 2, translated so model (50, 100) sits at the origin
        let matrix = Affine::new([2.0, 0.0, 0.0, 2.0, -100.0, -200.0]);
        let vbox = viewbox_from_transform(matrix, Dimensions::new(100.0, 50.0), outer());
        assert_eq!(vbox.scale, 2.0);
        assert_eq!(vbox.x, 50.0);
        assert_eq!(vbox.y, 100.0);
        assert_eq!(vbox.width, 150.0);
    }

    #[test]
    fn zero_offset_is_kept_exact() {
        let matrix = Affine::new([0.5, 0.0, 0.0, 0.5, 0.0, -20.0]);
        let vbox = viewbox_from_transform(matrix, Dimensions::new(100.0, 50.0), outer());
        assert_eq!(vbox.x, 0.0);
        assert_eq!(vbox.y, 40.0);
    }

    #[test]
    fn cover_fit_takes_the_larger_ratio() {
        // 300x300 container, 600x150 region: width ratio 0.5, height ratio 2
        let scale = cover_fit_scale(Rect::new(0.0, 0.0, 600.0, 150.0), outer());
        assert_eq!(scale, 2.0);
    }

    #[test]
    fn viewbox_transform_maps_region_origin_to_container_origin() {
        let t = viewbox_transform(Rect::new(50.0, 100.0, 350.0, 400.0), outer());
        let mapped = t * Point::new(50.0, 100.0);
        assert!((mapped.x).abs() < EPSILON);
        assert!((mapped.y).abs() < EPSILON);
    }

    #[test]
    fn scroll_composes_in_screen_space() {
        let zoomed = Affine::scale(4.0);
        let scrolled = scroll_transform(zoomed, 10.0, -5.0);
        let [.., e, f] = scrolled.as_coeffs();
        // translation lands in container pixels, unscaled
        assert_eq!((e, f), (10.0, -5.0));
    }

    #[test]
    fn fit_viewport_never_enlarges() {
        assert_eq!(fit_viewport_scale(Dimensions::new(150.0, 100.0), outer()), 1.0);
        assert_eq!(fit_viewport_scale(Dimensions::new(600.0, 100.0), outer()), 0.5);
    }

    #[test]
    fn zoom_without_center_is_origin_anchored() {
        let current = Affine::new([2.0, 0.0, 0.0, 2.0, -30.0, -40.0]);
        let next = zoom_transform(current, 3.0, None);
        assert_eq!(next.as_coeffs(), [3.0, 0.0, 0.0, 3.0, 0.0, 0.0]);
    }

    #[test]
    fn zoom_to_point_keeps_the_point_fixed() {
        let current = Affine::new([2.0, 0.0, 0.0, 2.0, -30.0, -40.0]);
        let center = Point::new(120.0, 90.0);

        let model_point = current.inverse() * center;
        let next = zoom_transform(current, 5.0, Some(center));
        let mapped = next * model_point;

        assert!((mapped.x - center.x).abs() < EPSILON);
        assert!((mapped.y - center.y).abs() < EPSILON);
        assert!((next.as_coeffs()[0] - 5.0).abs() < EPSILON);
    }

    #[test]
    fn round_scale_is_three_decimals() {
        assert_eq!(round_scale(0.3333333), 0.333);
        assert_eq!(round_scale(2.6666666), 2.667);
    }
}
