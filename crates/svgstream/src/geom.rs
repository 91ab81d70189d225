// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Geometry types and helpers.

use svgstream_types::{AspectRatio, AxisAlign, MeetOrSlice, Transform};

/// A 2D point.
#[derive(Clone, Copy, PartialEq, Debug)]
#[allow(missing_docs)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    /// Constructs a new point.
    #[inline]
    pub fn new(x: f64, y: f64) -> Self {
        Point { x, y }
    }
}

/// A 2D size.
#[derive(Clone, Copy, PartialEq, Debug)]
#[allow(missing_docs)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    /// Constructs a new size.
    #[inline]
    pub fn new(width: f64, height: f64) -> Self {
        Size { width, height }
    }
}

/// A rectangle defined by its top-left corner and dimensions.
#[derive(Clone, Copy, PartialEq, Debug)]
#[allow(missing_docs)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    /// Constructs a new rectangle.
    #[inline]
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Rect {
            x,
            y,
            width,
            height,
        }
    }
}

/// An arc in center parameterisation.
#[derive(Clone, Copy, PartialEq, Debug)]
#[allow(missing_docs)]
pub struct CenterArc {
    pub radius: f64,
    pub center: Point,
    pub start_angle: f64,
    pub end_angle: f64,
}

/// Converts an SVG endpoint arc into center parameterisation.
///
/// `radius` may be enlarged: when the straight-line distance between the
/// endpoints exceeds the diameter there is no solution, and the SVG
/// arc implementation notes instruct to scale the radius up until there
/// is one.
///
/// Returns `None` for coincident endpoints or a non-positive radius.
pub fn svg_arc_to_center_arc(
    start: Point,
    end: Point,
    large_arc: bool,
    sweep: bool,
    radius: f64,
) -> Option<CenterArc> {
    if start == end || radius <= 0.0 {
        return None;
    }

    let chord = ((start.x - end.x).powi(2) + (start.y - end.y).powi(2)).sqrt();

    let mut radius = radius;
    if radius.powi(2) - (chord / 2.0).powi(2) < 0.0 {
        radius = chord / 2.0;
    }

    let mut normal = (radius.powi(2) - (chord / 2.0).powi(2)).sqrt();
    if large_arc != sweep {
        normal = -normal;
    }

    let center = Point::new(
        (start.x + end.x) / 2.0 + (end.y - start.y) * normal / chord,
        (start.y + end.y) / 2.0 - (end.x - start.x) * normal / chord,
    );

    let start_angle = (start.y - center.y).atan2(start.x - center.x);
    let end_angle = (end.y - center.y).atan2(end.x - center.x);

    Some(CenterArc {
        radius,
        center,
        start_angle,
        end_angle,
    })
}

/// Checks whether two angles are equal up to a multiple of 2π,
/// within the given tolerance.
pub fn angles_close(a1: f64, a2: f64, accuracy: f64) -> bool {
    let tau = 2.0 * std::f64::consts::PI;
    let rounds = ((a2 - a1) / tau).round();
    (a1 + tau * rounds - a2).abs() < accuracy
}

/// Returns the affine that maps the unit square onto `rect`.
pub fn rect_normalize_transform(rect: Rect) -> Transform {
    Transform::new_translate(rect.x, rect.y).pre_concat(&Transform::new_scale(rect.width, rect.height))
}

fn aligned_offset(align: AxisAlign, viewport_dimension: f64, object_dimension: f64) -> f64 {
    match align {
        AxisAlign::Min => 0.0,
        AxisAlign::Mid => (viewport_dimension - object_dimension) / 2.0,
        AxisAlign::Max => viewport_dimension - object_dimension,
    }
}

/// Converts a view box and a `preserveAspectRatio` value into the affine
/// that maps the view box coordinate system onto the viewport.
pub fn view_box_to_transform(
    aspect: AspectRatio,
    view_box: Rect,
    viewport: Rect,
) -> Transform {
    let mut sx = viewport.width / view_box.width;
    let mut sy = viewport.height / view_box.height;

    if !aspect.none {
        let s = match aspect.meet_or_slice {
            MeetOrSlice::Meet => sx.min(sy),
            MeetOrSlice::Slice => sx.max(sy),
        };
        sx = s;
        sy = s;
    }

    let tx = aligned_offset(aspect.align_x, viewport.width, sx * view_box.width);
    let ty = aligned_offset(aspect.align_y, viewport.height, sy * view_box.height);

    Transform::new_translate(tx, ty).pre_concat(&Transform::new_scale(sx, sy))
}

#[rustfmt::skip]
#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn arc_basic() {
        // A unit semicircle from (0,0) to (2,0).
        let arc = svg_arc_to_center_arc(
            Point::new(0.0, 0.0), Point::new(2.0, 0.0), false, true, 1.0,
        ).unwrap();

        assert!((arc.center.x - 1.0).abs() < 1e-9);
        assert!(arc.center.y.abs() < 1e-9);
        assert!(angles_close(arc.start_angle, std::f64::consts::PI, 1e-9));
        assert!(angles_close(arc.end_angle, 0.0, 1e-9));
    }

    #[test]
    fn arc_radius_enlarged() {
        // Radius 1 cannot span a chord of length 4;
        // it is scaled up to half the distance.
        let arc = svg_arc_to_center_arc(
            Point::new(0.0, 0.0), Point::new(4.0, 0.0), false, true, 1.0,
        ).unwrap();

        assert_eq!(arc.radius, 2.0);
    }

    #[test]
    fn arc_degenerate() {
        assert!(svg_arc_to_center_arc(
            Point::new(1.0, 1.0), Point::new(1.0, 1.0), false, true, 1.0,
        ).is_none());

        assert!(svg_arc_to_center_arc(
            Point::new(0.0, 0.0), Point::new(1.0, 0.0), false, true, 0.0,
        ).is_none());
    }

    #[test]
    fn angles_close_shifts_rounds() {
        let tau = 2.0 * std::f64::consts::PI;
        assert!(angles_close(0.1, 0.1 + 3.0 * tau, 1e-9));
        assert!(!angles_close(0.1, 0.2, 1e-3));
    }

    #[test]
    fn normalize_rect() {
        let ts = rect_normalize_transform(Rect::new(10.0, 20.0, 30.0, 40.0));
        assert_eq!(ts.apply(0.0, 0.0), (10.0, 20.0));
        assert_eq!(ts.apply(1.0, 1.0), (40.0, 60.0));
    }

    #[test]
    fn view_box_mid_meet() {
        // viewBox (0,0,100,50) into a 200x200 viewport:
        // scale 2, centered vertically.
        let aspect = svgstream_types::AspectRatio::from_str("xMidYMid meet").unwrap();
        let ts = view_box_to_transform(
            aspect,
            Rect::new(0.0, 0.0, 100.0, 50.0),
            Rect::new(0.0, 0.0, 200.0, 200.0),
        );

        assert_eq!((ts.a, ts.d), (2.0, 2.0));
        assert_eq!((ts.e, ts.f), (0.0, 50.0));
    }

    #[test]
    fn view_box_none_stretches() {
        let aspect = svgstream_types::AspectRatio::from_str("none").unwrap();
        let ts = view_box_to_transform(
            aspect,
            Rect::new(0.0, 0.0, 100.0, 50.0),
            Rect::new(0.0, 0.0, 200.0, 200.0),
        );

        assert_eq!((ts.a, ts.d), (2.0, 4.0));
        assert_eq!((ts.e, ts.f), (0.0, 0.0));
    }

    #[test]
    fn view_box_slice() {
        let aspect = svgstream_types::AspectRatio::from_str("xMinYMin slice").unwrap();
        let ts = view_box_to_transform(
            aspect,
            Rect::new(0.0, 0.0, 100.0, 50.0),
            Rect::new(0.0, 0.0, 200.0, 200.0),
        );

        assert_eq!((ts.a, ts.d), (4.0, 4.0));
        assert_eq!((ts.e, ts.f), (0.0, 0.0));
    }
}
