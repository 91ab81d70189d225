// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use svgstream_types::{Color, Transform};

use crate::canvas::{Canvas, FillRule, GradientStop, LineCap, LineJoin};
use crate::geom::{Point, Rect};

// Control-point distance for a quarter-circle cubic approximation.
const KAPPA: f64 = 0.551_915_024_494;

#[derive(Clone)]
struct DrawState {
    transform: Transform,
    clip: Option<tiny_skia::Mask>,
    fill_color: Color,
    fill_opacity: f64,
    stroke_color: Color,
    stroke_opacity: f64,
    line_width: f64,
    miter_limit: f64,
    line_cap: LineCap,
    line_join: LineJoin,
    dash: Option<(Vec<f32>, f32)>,
    alpha: f64,
}

impl Default for DrawState {
    fn default() -> Self {
        DrawState {
            transform: Transform::default(),
            clip: None,
            fill_color: Color::black(),
            fill_opacity: 1.0,
            stroke_color: Color::black(),
            stroke_opacity: 1.0,
            line_width: 1.0,
            miter_limit: 4.0,
            line_cap: LineCap::Butt,
            line_join: LineJoin::Miter,
            dash: None,
            alpha: 1.0,
        }
    }
}

struct Layer {
    pixmap: tiny_skia::Pixmap,
    alpha: f32,
}

/// A [`Canvas`] implementation on a `tiny-skia` pixmap.
///
/// Transparency layers are modeled as a stack of full-size pixmaps that
/// are composited with their recorded alpha when the layer ends.
pub struct PixmapCanvas {
    width: u32,
    height: u32,
    layers: Vec<Layer>,
    states: Vec<DrawState>,
    builder: tiny_skia::PathBuilder,
    // Set when the current path was produced whole,
    // e.g. by `replace_path_with_stroked_path`.
    ready: Option<tiny_skia::Path>,
}

impl std::fmt::Debug for PixmapCanvas {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "PixmapCanvas({}x{})", self.width, self.height)
    }
}

impl PixmapCanvas {
    /// Constructs a canvas backed by a transparent pixmap.
    ///
    /// Returns `None` when a dimension is zero or the pixmap
    /// cannot be allocated.
    pub fn new(width: u32, height: u32) -> Option<Self> {
        let pixmap = tiny_skia::Pixmap::new(width, height)?;
        Some(PixmapCanvas {
            width,
            height,
            layers: vec![Layer { pixmap, alpha: 1.0 }],
            states: vec![DrawState::default()],
            builder: tiny_skia::PathBuilder::new(),
            ready: None,
        })
    }

    /// Returns the backing pixmap.
    ///
    /// Valid once all transparency layers are closed.
    pub fn pixmap(&self) -> &tiny_skia::Pixmap {
        &self.layers[0].pixmap
    }

    /// Consumes the canvas and returns the rendered pixmap.
    pub fn into_pixmap(mut self) -> tiny_skia::Pixmap {
        // Unbalanced layers mean a renderer bug; composite them anyway.
        while self.layers.len() > 1 {
            self.end_transparency_layer();
        }
        self.layers.remove(0).pixmap
    }

    fn state(&self) -> &DrawState {
        self.states.last().unwrap()
    }

    fn state_mut(&mut self) -> &mut DrawState {
        self.states.last_mut().unwrap()
    }

    fn native_transform(&self) -> tiny_skia::Transform {
        to_native_transform(&self.state().transform)
    }

    fn concat(&mut self, ts: Transform) {
        let state = self.state_mut();
        state.transform = state.transform.pre_concat(&ts);
    }

    // Takes the current path, leaving the canvas without one.
    fn take_path(&mut self) -> Option<tiny_skia::Path> {
        if let Some(path) = self.ready.take() {
            self.builder = tiny_skia::PathBuilder::new();
            return Some(path);
        }

        let builder = std::mem::replace(&mut self.builder, tiny_skia::PathBuilder::new());
        builder.finish()
    }

    fn snapshot_path(&self) -> Option<tiny_skia::Path> {
        if let Some(ref path) = self.ready {
            return Some(path.clone());
        }

        self.builder.clone().finish()
    }

    fn intersect_clip(&mut self, path: &tiny_skia::Path) {
        let ts = self.native_transform();
        let width = self.width;
        let height = self.height;
        let state = self.state_mut();
        match state.clip {
            Some(ref mut mask) => {
                mask.intersect_path(path, tiny_skia::FillRule::Winding, true, ts);
            }
            None => {
                if let Some(mut mask) = tiny_skia::Mask::new(width, height) {
                    mask.fill_path(path, tiny_skia::FillRule::Winding, true, ts);
                    state.clip = Some(mask);
                }
            }
        }
    }

    fn stroke_params(&self) -> tiny_skia::Stroke {
        let state = self.state();
        tiny_skia::Stroke {
            width: state.line_width as f32,
            miter_limit: state.miter_limit as f32,
            line_cap: match state.line_cap {
                LineCap::Butt => tiny_skia::LineCap::Butt,
                LineCap::Round => tiny_skia::LineCap::Round,
                LineCap::Square => tiny_skia::LineCap::Square,
            },
            line_join: match state.line_join {
                LineJoin::Miter => tiny_skia::LineJoin::Miter,
                LineJoin::Round => tiny_skia::LineJoin::Round,
                LineJoin::Bevel => tiny_skia::LineJoin::Bevel,
            },
            dash: state
                .dash
                .as_ref()
                .and_then(|(array, phase)| tiny_skia::StrokeDash::new(array.clone(), *phase)),
        }
    }

    fn fill_with_paint(&mut self, path: &tiny_skia::Path, rule: FillRule, paint: &tiny_skia::Paint) {
        let ts = self.native_transform();
        let rule = match rule {
            FillRule::NonZero => tiny_skia::FillRule::Winding,
            FillRule::EvenOdd => tiny_skia::FillRule::EvenOdd,
        };

        let state_idx = self.states.len() - 1;
        let mask = self.states[state_idx].clip.as_ref();
        let pixmap = &mut self.layers.last_mut().unwrap().pixmap;
        pixmap.as_mut().fill_path(path, paint, rule, ts, mask);
    }

    // Fills the whole canvas with a shader; the clip mask bounds the result.
    fn fill_region_with_shader(&mut self, shader: tiny_skia::Shader) {
        let rect = match tiny_skia::Rect::from_xywh(0.0, 0.0, self.width as f32, self.height as f32)
        {
            Some(rect) => rect,
            None => return,
        };
        let path = tiny_skia::PathBuilder::from_rect(rect);

        let mut paint = tiny_skia::Paint::default();
        paint.shader = shader;
        paint.anti_alias = true;

        // Mask intersection does the clipping; the identity transform is
        // deliberate, the rect already covers the whole canvas.
        let state_idx = self.states.len() - 1;
        let mask = self.states[state_idx].clip.as_ref();
        let pixmap = &mut self.layers.last_mut().unwrap().pixmap;
        pixmap.as_mut().fill_path(
            &path,
            &paint,
            tiny_skia::FillRule::Winding,
            tiny_skia::Transform::identity(),
            mask,
        );
    }

    fn gradient_stops(&self, stops: &[GradientStop]) -> Vec<tiny_skia::GradientStop> {
        let alpha = self.state().alpha;
        stops
            .iter()
            .map(|stop| {
                tiny_skia::GradientStop::new(
                    stop.offset as f32,
                    to_native_color(stop.color, stop.opacity * alpha),
                )
            })
            .collect()
    }
}

impl Canvas for PixmapCanvas {
    fn save_state(&mut self) {
        let state = self.state().clone();
        self.states.push(state);
    }

    fn restore_state(&mut self) {
        if self.states.len() > 1 {
            self.states.pop();
        }
    }

    fn concat_transform(&mut self, ts: Transform) {
        self.concat(ts);
    }

    fn translate(&mut self, tx: f64, ty: f64) {
        self.concat(Transform::new_translate(tx, ty));
    }

    fn scale(&mut self, sx: f64, sy: f64) {
        self.concat(Transform::new_scale(sx, sy));
    }

    fn clip_to_rect(&mut self, rect: Rect) {
        let rect = match tiny_skia::Rect::from_xywh(
            rect.x as f32,
            rect.y as f32,
            rect.width as f32,
            rect.height as f32,
        ) {
            Some(rect) => rect,
            None => return,
        };

        let path = tiny_skia::PathBuilder::from_rect(rect);
        self.intersect_clip(&path);
    }

    fn clip_to_path(&mut self) {
        if let Some(path) = self.take_path() {
            self.intersect_clip(&path);
        }
    }

    fn set_fill_color(&mut self, color: Color, opacity: f64) {
        let state = self.state_mut();
        state.fill_color = color;
        state.fill_opacity = opacity;
    }

    fn set_stroke_color(&mut self, color: Color, opacity: f64) {
        let state = self.state_mut();
        state.stroke_color = color;
        state.stroke_opacity = opacity;
    }

    fn set_line_cap(&mut self, cap: LineCap) {
        self.state_mut().line_cap = cap;
    }

    fn set_line_join(&mut self, join: LineJoin) {
        self.state_mut().line_join = join;
    }

    fn set_miter_limit(&mut self, limit: f64) {
        self.state_mut().miter_limit = limit;
    }

    fn set_line_width(&mut self, width: f64) {
        self.state_mut().line_width = width;
    }

    fn set_line_dash(&mut self, array: &[f64], phase: f64) {
        self.state_mut().dash = if array.is_empty() {
            None
        } else {
            Some((array.iter().map(|n| *n as f32).collect(), phase as f32))
        };
    }

    fn set_alpha(&mut self, alpha: f64) {
        self.state_mut().alpha = alpha.max(0.0).min(1.0);
    }

    fn begin_transparency_layer(&mut self) {
        let alpha = self.state().alpha as f32;
        let pixmap = tiny_skia::Pixmap::new(self.width, self.height).unwrap();
        self.layers.push(Layer { pixmap, alpha });
        // Drawing inside the layer runs at full alpha;
        // the recorded alpha is applied on compositing.
        self.state_mut().alpha = 1.0;
    }

    fn end_transparency_layer(&mut self) {
        if self.layers.len() < 2 {
            log::warn!("unbalanced transparency layer end");
            return;
        }

        let layer = self.layers.pop().unwrap();
        let paint = tiny_skia::PixmapPaint {
            opacity: layer.alpha,
            blend_mode: tiny_skia::BlendMode::SourceOver,
            quality: tiny_skia::FilterQuality::Nearest,
        };

        let target = &mut self.layers.last_mut().unwrap().pixmap;
        target.as_mut().draw_pixmap(
            0,
            0,
            layer.pixmap.as_ref(),
            &paint,
            tiny_skia::Transform::identity(),
            None,
        );
    }

    fn begin_path(&mut self) {
        self.builder = tiny_skia::PathBuilder::new();
        self.ready = None;
    }

    fn move_to(&mut self, x: f64, y: f64) {
        self.builder.move_to(x as f32, y as f32);
    }

    fn line_to(&mut self, x: f64, y: f64) {
        self.builder.line_to(x as f32, y as f32);
    }

    fn cubic_to(&mut self, x1: f64, y1: f64, x2: f64, y2: f64, x: f64, y: f64) {
        self.builder.cubic_to(
            x1 as f32,
            y1 as f32,
            x2 as f32,
            y2 as f32,
            x as f32,
            y as f32,
        );
    }

    fn quad_to(&mut self, x1: f64, y1: f64, x: f64, y: f64) {
        self.builder
            .quad_to(x1 as f32, y1 as f32, x as f32, y as f32);
    }

    fn arc(&mut self, cx: f64, cy: f64, r: f64, start_angle: f64, end_angle: f64, clockwise: bool) {
        let tau = 2.0 * std::f64::consts::PI;
        let mut sweep = end_angle - start_angle;
        if (end_angle - start_angle).abs() >= tau {
            sweep = if clockwise { -tau } else { tau };
        } else if clockwise && sweep > 0.0 {
            sweep -= tau;
        } else if !clockwise && sweep < 0.0 {
            sweep += tau;
        }

        let start = (
            cx + r * start_angle.cos(),
            cy + r * start_angle.sin(),
        );
        if self.builder.is_empty() {
            self.builder.move_to(start.0 as f32, start.1 as f32);
        } else {
            self.builder.line_to(start.0 as f32, start.1 as f32);
        }

        let arc = kurbo::Arc {
            center: kurbo::Point::new(cx, cy),
            radii: kurbo::Vec2::new(r, r),
            start_angle,
            sweep_angle: sweep,
            x_rotation: 0.0,
        };
        arc.to_cubic_beziers(0.1, |p1, p2, p| {
            self.builder.cubic_to(
                p1.x as f32,
                p1.y as f32,
                p2.x as f32,
                p2.y as f32,
                p.x as f32,
                p.y as f32,
            );
        });
    }

    fn ellipse_in_rect(&mut self, rect: Rect) {
        if let Some(rect) = tiny_skia::Rect::from_xywh(
            rect.x as f32,
            rect.y as f32,
            rect.width as f32,
            rect.height as f32,
        ) {
            self.builder.push_oval(rect);
        }
    }

    fn rounded_rect(&mut self, rect: Rect, rx: f64, ry: f64) {
        if rx <= 0.0 || ry <= 0.0 {
            if let Some(rect) = tiny_skia::Rect::from_xywh(
                rect.x as f32,
                rect.y as f32,
                rect.width as f32,
                rect.height as f32,
            ) {
                self.builder.push_rect(rect);
            }
            return;
        }

        let (left, top) = (rect.x, rect.y);
        let right = rect.x + rect.width;
        let bottom = rect.y + rect.height;
        let (kx, ky) = (rx * KAPPA, ry * KAPPA);

        self.move_to(left + rx, top);
        self.line_to(right - rx, top);
        self.cubic_to(right - rx + kx, top, right, top + ry - ky, right, top + ry);
        self.line_to(right, bottom - ry);
        self.cubic_to(
            right,
            bottom - ry + ky,
            right - rx + kx,
            bottom,
            right - rx,
            bottom,
        );
        self.line_to(left + rx, bottom);
        self.cubic_to(left + rx - kx, bottom, left, bottom - ry + ky, left, bottom - ry);
        self.line_to(left, top + ry);
        self.cubic_to(left, top + ry - ky, left + rx - kx, top, left + rx, top);
        self.close_path();
    }

    fn close_path(&mut self) {
        self.builder.close();
    }

    fn fill_path(&mut self, rule: FillRule) {
        let path = match self.take_path() {
            Some(path) => path,
            None => return,
        };

        let state = self.state();
        let mut paint = tiny_skia::Paint::default();
        paint.set_color(to_native_color(
            state.fill_color,
            state.fill_opacity * state.alpha,
        ));
        paint.anti_alias = true;

        self.fill_with_paint(&path, rule, &paint);
    }

    fn stroke_path(&mut self) {
        let path = match self.take_path() {
            Some(path) => path,
            None => return,
        };

        let state = self.state();
        let mut paint = tiny_skia::Paint::default();
        paint.set_color(to_native_color(
            state.stroke_color,
            state.stroke_opacity * state.alpha,
        ));
        paint.anti_alias = true;

        let stroke = self.stroke_params();
        let ts = self.native_transform();
        let state_idx = self.states.len() - 1;
        let mask = self.states[state_idx].clip.as_ref();
        let pixmap = &mut self.layers.last_mut().unwrap().pixmap;
        pixmap.as_mut().stroke_path(&path, &paint, &stroke, ts, mask);
    }

    fn replace_path_with_stroked_path(&mut self) {
        let path = match self.take_path() {
            Some(path) => path,
            None => return,
        };

        let stroke = self.stroke_params();
        let resolution_scale =
            tiny_skia::PathStroker::compute_resolution_scale(&self.native_transform());
        let mut stroker = tiny_skia::PathStroker::new();
        if let Some(stroked) = stroker.stroke(&path, &stroke, resolution_scale) {
            self.ready = Some(stroked);
        }
    }

    fn path_bounding_box(&self) -> Option<Rect> {
        let path = self.snapshot_path()?;
        let bounds = path.bounds();
        Some(Rect::new(
            bounds.x() as f64,
            bounds.y() as f64,
            bounds.width() as f64,
            bounds.height() as f64,
        ))
    }

    fn draw_linear_gradient(&mut self, stops: &[GradientStop], start: Point, end: Point) {
        if stops.is_empty() {
            return;
        }

        let points = self.gradient_stops(stops);
        if let Some(shader) = tiny_skia::LinearGradient::new(
            tiny_skia::Point::from_xy(start.x as f32, start.y as f32),
            tiny_skia::Point::from_xy(end.x as f32, end.y as f32),
            points,
            tiny_skia::SpreadMode::Pad,
            self.native_transform(),
        ) {
            self.fill_region_with_shader(shader);
        }
    }

    fn draw_radial_gradient(
        &mut self,
        stops: &[GradientStop],
        focal: Point,
        center: Point,
        radius: f64,
    ) {
        if stops.is_empty() || radius <= 0.0 {
            return;
        }

        let points = self.gradient_stops(stops);
        if let Some(shader) = tiny_skia::RadialGradient::new(
            tiny_skia::Point::from_xy(focal.x as f32, focal.y as f32),
            tiny_skia::Point::from_xy(center.x as f32, center.y as f32),
            radius as f32,
            points,
            tiny_skia::SpreadMode::Pad,
            self.native_transform(),
        ) {
            self.fill_region_with_shader(shader);
        }
    }
}

fn to_native_transform(ts: &Transform) -> tiny_skia::Transform {
    tiny_skia::Transform::from_row(
        ts.a as f32,
        ts.b as f32,
        ts.c as f32,
        ts.d as f32,
        ts.e as f32,
        ts.f as f32,
    )
}

fn to_native_color(color: Color, opacity: f64) -> tiny_skia::Color {
    tiny_skia::Color::from_rgba(
        color.red() as f32,
        color.green() as f32,
        color.blue() as f32,
        opacity.max(0.0).min(1.0) as f32,
    )
    .unwrap_or(tiny_skia::Color::BLACK)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fill_rect_covers_canvas() {
        let mut canvas = PixmapCanvas::new(4, 4).unwrap();
        canvas.move_to(0.0, 0.0);
        canvas.line_to(4.0, 0.0);
        canvas.line_to(4.0, 4.0);
        canvas.line_to(0.0, 4.0);
        canvas.close_path();
        canvas.set_fill_color(Color::new(1.0, 0.0, 0.0), 1.0);
        canvas.fill_path(FillRule::NonZero);

        let pixmap = canvas.into_pixmap();
        let px = pixmap.pixel(2, 2).unwrap();
        assert_eq!((px.red(), px.green(), px.blue(), px.alpha()), (255, 0, 0, 255));
    }

    #[test]
    fn clip_restores_with_state() {
        let mut canvas = PixmapCanvas::new(4, 4).unwrap();
        canvas.save_state();
        canvas.clip_to_rect(Rect::new(0.0, 0.0, 2.0, 2.0));
        canvas.restore_state();

        // The clip is gone, the whole canvas is paintable.
        canvas.move_to(0.0, 0.0);
        canvas.line_to(4.0, 0.0);
        canvas.line_to(4.0, 4.0);
        canvas.line_to(0.0, 4.0);
        canvas.close_path();
        canvas.fill_path(FillRule::NonZero);

        let pixmap = canvas.into_pixmap();
        assert_eq!(pixmap.pixel(3, 3).unwrap().alpha(), 255);
    }

    #[test]
    fn transparency_layer_applies_alpha() {
        let mut canvas = PixmapCanvas::new(2, 2).unwrap();
        canvas.save_state();
        canvas.set_alpha(0.5);
        canvas.begin_transparency_layer();

        canvas.move_to(0.0, 0.0);
        canvas.line_to(2.0, 0.0);
        canvas.line_to(2.0, 2.0);
        canvas.line_to(0.0, 2.0);
        canvas.close_path();
        canvas.set_fill_color(Color::black(), 1.0);
        canvas.fill_path(FillRule::NonZero);

        canvas.end_transparency_layer();
        canvas.restore_state();

        let pixmap = canvas.into_pixmap();
        let alpha = pixmap.pixel(1, 1).unwrap().alpha();
        assert!(alpha > 120 && alpha < 135);
    }

    #[test]
    fn full_circle_arc() {
        let mut canvas = PixmapCanvas::new(10, 10).unwrap();
        canvas.arc(5.0, 5.0, 4.0, 0.0, 2.0 * std::f64::consts::PI, true);
        canvas.close_path();
        canvas.fill_path(FillRule::NonZero);

        let pixmap = canvas.into_pixmap();
        assert_eq!(pixmap.pixel(5, 5).unwrap().alpha(), 255);
        assert_eq!(pixmap.pixel(0, 0).unwrap().alpha(), 0);
    }
}
