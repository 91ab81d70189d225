// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use svgstream_types::{Color, Transform};

use crate::geom::{Point, Rect};

/// A fill rule.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum FillRule {
    /// The non-zero winding rule. The SVG default.
    NonZero,
    /// The even-odd rule.
    EvenOdd,
}

impl Default for FillRule {
    #[inline]
    fn default() -> Self {
        FillRule::NonZero
    }
}

/// A stroke line cap.
#[allow(missing_docs)]
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum LineCap {
    Butt,
    Round,
    Square,
}

/// A stroke line join.
#[allow(missing_docs)]
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum LineJoin {
    Miter,
    Round,
    Bevel,
}

/// A single gradient stop, ready for a backend.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct GradientStop {
    /// Offset in the 0.0..=1.0 range, non-decreasing within a gradient.
    pub offset: f64,
    /// Stop color.
    pub color: Color,
    /// Stop opacity in the 0.0..=1.0 range.
    pub opacity: f64,
}

/// The 2D drawing backend consumed by the renderer.
///
/// The interface is a thin, stateful graphics context: a transform and
/// clip stack, a current path, and paint parameters. Every `save_state`
/// must be paired with a `restore_state`, and every
/// `begin_transparency_layer` with an `end_transparency_layer` before the
/// enclosing state is restored.
///
/// Gradients are always drawn extended beyond both end stops.
pub trait Canvas {
    /// Pushes a copy of the current graphics state.
    fn save_state(&mut self);
    /// Pops the graphics state.
    fn restore_state(&mut self);

    /// Concatenates `ts` onto the current transform.
    fn concat_transform(&mut self, ts: Transform);
    /// Translates the current coordinate system.
    fn translate(&mut self, tx: f64, ty: f64);
    /// Scales the current coordinate system.
    fn scale(&mut self, sx: f64, sy: f64);

    /// Intersects the clip region with a rectangle in user coordinates.
    fn clip_to_rect(&mut self, rect: Rect);
    /// Intersects the clip region with the current path, consuming it.
    fn clip_to_path(&mut self);

    /// Sets the fill color and its opacity.
    fn set_fill_color(&mut self, color: Color, opacity: f64);
    /// Sets the stroke color and its opacity.
    fn set_stroke_color(&mut self, color: Color, opacity: f64);
    /// Sets the stroke line cap.
    fn set_line_cap(&mut self, cap: LineCap);
    /// Sets the stroke line join.
    fn set_line_join(&mut self, join: LineJoin);
    /// Sets the stroke miter limit.
    fn set_miter_limit(&mut self, limit: f64);
    /// Sets the stroke width.
    fn set_line_width(&mut self, width: f64);
    /// Sets the stroke dash pattern. An empty array means solid.
    fn set_line_dash(&mut self, array: &[f64], phase: f64);
    /// Sets the global alpha applied to subsequent drawing.
    fn set_alpha(&mut self, alpha: f64);

    /// Starts accumulating drawing into an offscreen layer.
    ///
    /// The layer is composited on [`end_transparency_layer`] with the
    /// alpha that was current when the layer was opened.
    ///
    /// [`end_transparency_layer`]: Canvas::end_transparency_layer
    fn begin_transparency_layer(&mut self);
    /// Composites the topmost transparency layer.
    fn end_transparency_layer(&mut self);

    /// Discards the current path and starts a new one.
    fn begin_path(&mut self);
    /// Starts a new subpath.
    fn move_to(&mut self, x: f64, y: f64);
    /// Adds a line segment.
    fn line_to(&mut self, x: f64, y: f64);
    /// Adds a cubic Bézier segment.
    fn cubic_to(&mut self, x1: f64, y1: f64, x2: f64, y2: f64, x: f64, y: f64);
    /// Adds a quadratic Bézier segment.
    fn quad_to(&mut self, x1: f64, y1: f64, x: f64, y: f64);
    /// Adds a circular arc, connecting it to the current point if any.
    fn arc(&mut self, cx: f64, cy: f64, r: f64, start_angle: f64, end_angle: f64, clockwise: bool);
    /// Adds an ellipse inscribed in `rect` as a new subpath.
    fn ellipse_in_rect(&mut self, rect: Rect);
    /// Adds a rounded rectangle as a new subpath.
    fn rounded_rect(&mut self, rect: Rect, rx: f64, ry: f64);
    /// Closes the current subpath.
    fn close_path(&mut self);

    /// Fills the current path, consuming it.
    fn fill_path(&mut self, rule: FillRule);
    /// Strokes the current path, consuming it.
    fn stroke_path(&mut self);
    /// Replaces the current path with its stroked outline.
    fn replace_path_with_stroked_path(&mut self);
    /// Returns the bounding box of the current path in user coordinates.
    fn path_bounding_box(&self) -> Option<Rect>;

    /// Fills the clip region with a linear gradient between two points.
    fn draw_linear_gradient(&mut self, stops: &[GradientStop], start: Point, end: Point);
    /// Fills the clip region with a radial gradient from a zero-radius
    /// focal point to a circle around `center`.
    fn draw_radial_gradient(
        &mut self,
        stops: &[GradientStop],
        focal: Point,
        center: Point,
        radius: f64,
    );
}
