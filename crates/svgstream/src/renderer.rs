// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use std::collections::HashMap;
use std::str::FromStr;

use svgstream_types::{
    AspectRatio, Color, FuncIRI, Length, LengthListParser, LengthUnit, Number, PathCommand,
    PathDataParser, TransformListParser, ViewBox,
};

use crate::canvas::{Canvas, FillRule, GradientStop, LineCap, LineJoin};
use crate::geom::{self, Point, Rect, Size};
use crate::gradient::{
    evaluate_length, resolve_stop_offset, Gradient, GradientGeometry, GradientUnits,
    LinearGeometry, RadialGeometry, Stop,
};
use crate::style::{StyleIterator, StyleSheet, INLINE_PROPERTIES};

pub(crate) type AttributeMap<'a> = HashMap<&'a str, &'a str>;

// Style names that can be specified both as an attribute and inside
// a style declaration. Everything here goes through `process_style`.
const PRESENTATION_PROPERTIES: &[&str] = &[
    "fill",
    "stroke",
    "stroke-linecap",
    "stroke-linejoin",
    "stroke-miterlimit",
    "stroke-width",
    "fill-opacity",
    "stroke-opacity",
    "stop-color",
    "stop-opacity",
];

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
enum ElementKind {
    Svg,
    Group,
    Rect,
    Circle,
    Ellipse,
    Line,
    Polyline,
    Polygon,
    Path,
    LinearGradient,
    RadialGradient,
    Stop,
    Style,
}

impl ElementKind {
    fn from_name(name: &str) -> Option<Self> {
        match name {
            "svg" => Some(ElementKind::Svg),
            "g" => Some(ElementKind::Group),
            "rect" => Some(ElementKind::Rect),
            "circle" => Some(ElementKind::Circle),
            "ellipse" => Some(ElementKind::Ellipse),
            "line" => Some(ElementKind::Line),
            "polyline" => Some(ElementKind::Polyline),
            "polygon" => Some(ElementKind::Polygon),
            "path" => Some(ElementKind::Path),
            "linearGradient" => Some(ElementKind::LinearGradient),
            "radialGradient" => Some(ElementKind::RadialGradient),
            "stop" => Some(ElementKind::Stop),
            "style" => Some(ElementKind::Style),
            _ => None,
        }
    }
}

// The fill or stroke half of the graphics state.
//
// `should_paint == false` implies an empty IRI. Setting a color clears
// a previously set gradient reference; disabling paint keeps the color.
#[derive(Clone, Debug)]
struct PaintState {
    should_paint: bool,
    color: Color,
    iri: String,
    opacity: f64,
}

impl PaintState {
    fn new(should_paint: bool) -> Self {
        PaintState {
            should_paint,
            color: Color::black(),
            iri: String::new(),
            opacity: 1.0,
        }
    }

    fn set_should_paint(&mut self, should_paint: bool) {
        self.should_paint = should_paint;
        if !should_paint {
            self.iri.clear();
        }
    }

    fn set_color(&mut self, color: Color) {
        self.should_paint = true;
        self.color = color;
        self.iri.clear();
    }

    fn set_iri(&mut self, iri: &str) {
        self.should_paint = true;
        self.iri = iri.to_string();
    }

    fn apply_opacity(&mut self, additional: f64) {
        self.opacity *= additional;
    }
}

#[derive(Clone, Default, Debug)]
struct LineDash {
    values: Vec<f64>,
    phase: f64,
}

// The graphics state items that cannot be read back out of the canvas.
// Everything else lives on the canvas state stack.
#[derive(Clone, Debug)]
struct GraphicsState {
    fill: PaintState,
    fill_rule: FillRule,
    stroke: PaintState,
    line_dash: LineDash,
    // Tracks the `display` attribute.
    display: bool,
    // Tracks the `visibility` attribute, which inherits
    // differently than `display`.
    visibility: bool,
    stop_color: Color,
    stop_opacity: f64,
}

impl Default for GraphicsState {
    fn default() -> Self {
        // The default fill is black, but the default stroke is none.
        GraphicsState {
            fill: PaintState::new(true),
            fill_rule: FillRule::NonZero,
            stroke: PaintState::new(false),
            line_dash: LineDash::default(),
            display: true,
            visibility: true,
            stop_color: Color::black(),
            stop_opacity: 1.0,
        }
    }
}

// One open element.
struct Frame {
    kind: Option<ElementKind>,
    line: u32,
    column: u32,
    saved: GraphicsState,
    transparency_layer: bool,
    style_text: String,
    style_type: Option<String>,
}

pub(crate) struct Renderer<'a, C: Canvas> {
    canvas: &'a mut C,
    canvas_size: Size,
    frames: Vec<Frame>,
    graphics: GraphicsState,
    gradients: HashMap<String, Gradient>,
    pending_gradient: Option<Gradient>,
    style_sheet: Option<StyleSheet>,
}

impl<'a, C: Canvas> Renderer<'a, C> {
    pub fn new(canvas: &'a mut C, canvas_size: Size) -> Self {
        let root = Frame {
            kind: None,
            line: 0,
            column: 0,
            saved: GraphicsState::default(),
            transparency_layer: false,
            style_text: String::new(),
            style_type: None,
        };

        Renderer {
            canvas,
            canvas_size,
            frames: vec![root],
            graphics: GraphicsState::default(),
            gradients: HashMap::new(),
            pending_gradient: None,
            style_sheet: None,
        }
    }

    pub fn merge_style_sheet(&mut self, sheet: &StyleSheet) {
        self.style_sheet
            .get_or_insert_with(StyleSheet::default)
            .merge_from(sheet);
    }

    pub fn render(&mut self, doc: &roxmltree::Document) {
        // The SVG default paint.
        self.canvas.set_fill_color(Color::black(), 1.0);
        self.process_element(doc.root_element());
    }

    fn process_element(&mut self, node: roxmltree::Node) {
        let kind = ElementKind::from_name(node.tag_name().name());
        let pos = node.document().text_pos_at(node.range().start);

        self.frames.push(Frame {
            kind,
            line: pos.row,
            column: pos.col,
            saved: self.graphics.clone(),
            transparency_layer: false,
            style_text: String::new(),
            style_type: None,
        });
        self.canvas.save_state();

        let attributes = self.process_common_attributes(node);

        match kind {
            Some(ElementKind::Svg) => self.begin_svg(&attributes),
            Some(ElementKind::Rect) => self.begin_rect(&attributes),
            Some(ElementKind::Circle) => self.begin_circle(&attributes),
            Some(ElementKind::Ellipse) => self.begin_ellipse(&attributes),
            Some(ElementKind::Line) => self.begin_line(&attributes),
            Some(ElementKind::Polyline) => self.begin_poly(&attributes, false),
            Some(ElementKind::Polygon) => self.begin_poly(&attributes, true),
            Some(ElementKind::Path) => self.begin_path_element(&attributes),
            Some(ElementKind::LinearGradient) => self.begin_linear_gradient(&attributes),
            Some(ElementKind::RadialGradient) => self.begin_radial_gradient(&attributes),
            Some(ElementKind::Stop) => self.begin_stop(&attributes),
            Some(ElementKind::Style) => self.begin_style(&attributes),
            // `g`, unknown and unsupported elements are transparent
            // containers: the common attributes still apply.
            Some(ElementKind::Group) | None => {}
        }

        for child in node.children() {
            if child.is_element() {
                self.process_element(child);
            } else if child.is_text() && kind == Some(ElementKind::Style) {
                if let Some(text) = child.text() {
                    let frame = self.frames.last_mut().unwrap();
                    frame.style_text.push_str(text);
                }
            }
        }

        match kind {
            Some(ElementKind::LinearGradient) | Some(ElementKind::RadialGradient) => {
                self.end_gradient();
            }
            Some(ElementKind::Style) => self.end_style(),
            _ => {}
        }

        let frame = self.frames.pop().unwrap();
        if frame.transparency_layer {
            self.canvas.end_transparency_layer();
        }
        self.canvas.restore_state();
        self.graphics = frame.saved;
    }

    fn element_position(&self) -> (u32, u32) {
        let frame = self.frames.last().unwrap();
        (frame.line, frame.column)
    }

    // Routes every attribute of the element. Style-like attributes are
    // applied after the class and inline-style declarations, in document
    // order, so the application order is class, style, attributes.
    // Whatever is left over goes back to the element handler.
    fn process_common_attributes<'n, 'input>(
        &mut self,
        node: roxmltree::Node<'n, 'input>,
    ) -> AttributeMap<'n> {
        let mut unprocessed = AttributeMap::new();
        let mut attribute_styles: Vec<(&str, &str)> = Vec::new();
        let mut class_value = None;
        let mut style_value = None;

        for attribute in node.attributes() {
            let name = attribute.name();
            let value = attribute.value().trim();

            if PRESENTATION_PROPERTIES.contains(&name) {
                attribute_styles.push((name, value));
                continue;
            }

            match name {
                "transform" => self.process_transform(value),
                "display" => self.process_display(value),
                "visibility" => self.process_visibility(value),
                "opacity" => self.process_opacity(value),
                "fill-rule" => self.process_fill_rule(value),
                "stroke-dasharray" => self.process_dash_array(value),
                "stroke-dashoffset" => self.process_dash_offset(value),
                "style" => style_value = Some(value),
                "class" => class_value = Some(value),
                _ => {
                    unprocessed.insert(name, value);
                }
            }
        }

        if let Some(class) = class_value {
            let declarations: Vec<(String, String)> = self
                .style_sheet
                .as_ref()
                .and_then(|sheet| sheet.get(class))
                .map(|declarations| declarations.to_vec())
                .unwrap_or_default();

            for (property, value) in &declarations {
                self.process_style(property, value);
            }
        }

        if let Some(style) = style_value {
            for (property, value) in StyleIterator::new(style, INLINE_PROPERTIES) {
                self.process_style(property, value);
            }
        }

        for (property, value) in attribute_styles {
            self.process_style(property, value);
        }

        unprocessed
    }

    // The style dispatch table. Returns whether the name was recognised.
    fn process_style(&mut self, name: &str, value: &str) -> bool {
        match name {
            "fill" => self.process_paint_value(value, true),
            "stroke" => self.process_paint_value(value, false),
            "stroke-linecap" => {
                let cap = match value {
                    "butt" => LineCap::Butt,
                    "round" => LineCap::Round,
                    "square" => LineCap::Square,
                    // Other values have no effect.
                    _ => return true,
                };
                self.canvas.set_line_cap(cap);
            }
            "stroke-linejoin" => {
                let join = match value {
                    "miter" => LineJoin::Miter,
                    "round" => LineJoin::Round,
                    "bevel" => LineJoin::Bevel,
                    _ => return true,
                };
                self.canvas.set_line_join(join);
            }
            "stroke-miterlimit" => {
                if let Some(limit) = parse_float(value) {
                    self.canvas.set_miter_limit(limit);
                }
            }
            "stroke-width" => {
                if let Some(width) = parse_float(value) {
                    self.canvas.set_line_width(width);
                }
            }
            "fill-opacity" => {
                if let Some(opacity) = parse_float(value) {
                    self.graphics.fill.apply_opacity(clamp_unit(opacity));
                    self.send_paint_color(true);
                }
            }
            "stroke-opacity" => {
                if let Some(opacity) = parse_float(value) {
                    self.graphics.stroke.apply_opacity(clamp_unit(opacity));
                    self.send_paint_color(false);
                }
            }
            "stop-color" => {
                if let Ok(color) = Color::from_str(value) {
                    self.graphics.stop_color = color;
                }
            }
            "stop-opacity" => {
                if let Some(opacity) = parse_float(value) {
                    self.graphics.stop_opacity = clamp_unit(opacity);
                }
            }
            _ => return false,
        }

        true
    }

    fn process_paint_value(&mut self, value: &str, is_fill: bool) {
        if value == "none" {
            let paint = self.paint_state_mut(is_fill);
            paint.set_should_paint(false);
        } else if let Ok(color) = Color::from_str(value) {
            self.paint_state_mut(is_fill).set_color(color);
            self.send_paint_color(is_fill);
        } else if let Ok(iri) = FuncIRI::from_str(value) {
            self.paint_state_mut(is_fill).set_iri(iri.0);
        }
        // Anything else is silently ignored; the defaults prevail.
    }

    fn paint_state_mut(&mut self, is_fill: bool) -> &mut PaintState {
        if is_fill {
            &mut self.graphics.fill
        } else {
            &mut self.graphics.stroke
        }
    }

    // Programs the canvas with the stored color and opacity.
    fn send_paint_color(&mut self, is_fill: bool) {
        let (color, opacity) = {
            let paint = if is_fill {
                &self.graphics.fill
            } else {
                &self.graphics.stroke
            };
            (paint.color, paint.opacity)
        };

        if is_fill {
            self.canvas.set_fill_color(color, opacity);
        } else {
            self.canvas.set_stroke_color(color, opacity);
        }
    }

    fn process_transform(&mut self, value: &str) {
        for ts in TransformListParser::from(value) {
            match ts {
                Ok(ts) => self.canvas.concat_transform(ts),
                Err(_) => {
                    let (line, column) = self.element_position();
                    log::warn!("invalid transform list at {}:{}", line, column);
                    break;
                }
            }
        }
    }

    fn process_display(&mut self, value: &str) {
        // Values other than `none` are not tracked, because a parent with
        // display=none already hides the whole subtree.
        if value == "none" {
            self.graphics.display = false;
        }
    }

    fn process_visibility(&mut self, value: &str) {
        if value == "visible" {
            self.graphics.visibility = true;
        } else if value == "hidden" || value == "collapse" {
            self.graphics.visibility = false;
        }
        // `inherit` does nothing.
    }

    fn process_opacity(&mut self, value: &str) {
        if let Some(opacity) = parse_float(value) {
            self.canvas.set_alpha(opacity);
            self.canvas.begin_transparency_layer();
            self.frames.last_mut().unwrap().transparency_layer = true;
        }
    }

    fn process_fill_rule(&mut self, value: &str) {
        if value == "evenodd" {
            self.graphics.fill_rule = FillRule::EvenOdd;
        } else if value == "nonzero" {
            self.graphics.fill_rule = FillRule::NonZero;
        }
    }

    fn process_dash_array(&mut self, value: &str) {
        let mut lengths = Vec::new();
        let mut valid = true;
        for length in LengthListParser::from(value) {
            match length {
                Ok(length) => lengths.push(length),
                Err(_) => {
                    valid = false;
                    break;
                }
            }
        }

        if valid && !lengths.is_empty() {
            let values: Vec<f64> = lengths.iter().map(|l| l.number).collect();
            if values.iter().any(|n| *n != 0.0) {
                self.canvas.set_line_dash(&values, self.graphics.line_dash.phase);
                self.graphics.line_dash.values = values;
            } else {
                // An all-zero pattern means solid.
                self.canvas.set_line_dash(&[], 0.0);
                self.graphics.line_dash.values.clear();
            }
        } else if value == "none" {
            self.canvas.set_line_dash(&[], 0.0);
            self.graphics.line_dash.values.clear();
        }
    }

    fn process_dash_offset(&mut self, value: &str) {
        if let Ok(phase) = Length::from_str(value) {
            if !self.graphics.line_dash.values.is_empty() {
                let values = self.graphics.line_dash.values.clone();
                self.canvas.set_line_dash(&values, phase.number);
            }
            self.graphics.line_dash.phase = phase.number;
        }
    }

    fn begin_svg(&mut self, attributes: &AttributeMap) {
        let width = match attributes.get("width") {
            Some(value) => match Length::from_str(value) {
                Ok(length) if length.number >= 0.0 => length,
                _ => return,
            },
            None => Length::new(100.0, LengthUnit::Percent),
        };

        let height = match attributes.get("height") {
            Some(value) => match Length::from_str(value) {
                Ok(length) if length.number >= 0.0 => length,
                _ => return,
            },
            None => Length::new(100.0, LengthUnit::Percent),
        };

        // A zero dimension disables rendering of the whole element.
        if width.number == 0.0 || height.number == 0.0 {
            self.graphics.display = false;
            return;
        }

        // The outermost svg element gets a special treatment: the canvas
        // the client asked for is the viewport. Nested svg elements define
        // their own viewport from their attributes.
        let is_outermost = self.frames.len() == 2;
        let viewport = if is_outermost {
            Rect::new(0.0, 0.0, self.canvas_size.width, self.canvas_size.height)
        } else {
            Rect::new(0.0, 0.0, width.number, height.number)
        };

        // Descendants are clipped to the viewport.
        self.canvas.clip_to_rect(viewport);

        let mut view_box = attributes
            .get("viewBox")
            .and_then(|value| ViewBox::from_str(value).ok())
            .map(|vb| Rect::new(vb.x, vb.y, vb.w, vb.h));

        if view_box.is_none() && is_outermost {
            view_box = Some(Rect::new(0.0, 0.0, width.number, height.number));
        }

        if let Some(view_box) = view_box {
            // preserveAspectRatio only applies when a view box is in play.
            let aspect = attributes
                .get("preserveAspectRatio")
                .and_then(|value| AspectRatio::from_str(value).ok())
                .unwrap_or_default();

            let ts = geom::view_box_to_transform(aspect, view_box, viewport);
            self.canvas.concat_transform(ts);
        }
    }

    fn begin_rect(&mut self, attributes: &AttributeMap) {
        let x = float_attribute(attributes, "x").unwrap_or(0.0);
        let y = float_attribute(attributes, "y").unwrap_or(0.0);
        let width = float_attribute(attributes, "width").unwrap_or(0.0);
        let height = float_attribute(attributes, "height").unwrap_or(0.0);
        if width <= 0.0 || height <= 0.0 {
            return;
        }

        let rx_attr = float_attribute(attributes, "rx");
        let ry_attr = float_attribute(attributes, "ry");
        let mut rx = rx_attr.unwrap_or(0.0);
        let mut ry = ry_attr.unwrap_or(0.0);
        if rx < 0.0 || ry < 0.0 {
            return;
        }

        // A lone radius mirrors to the other axis.
        if rx_attr.is_some() && ry_attr.is_none() {
            ry = rx;
        } else if rx_attr.is_none() && ry_attr.is_some() {
            rx = ry;
        }
        rx = rx.min(width / 2.0);
        ry = ry.min(height / 2.0);

        let rect = Rect::new(x, y, width, height);
        self.paint_element(
            |canvas| {
                canvas.begin_path();
                canvas.rounded_rect(rect, rx, ry);
                canvas.close_path();
            },
            true,
        );
    }

    fn begin_circle(&mut self, attributes: &AttributeMap) {
        let cx = float_attribute(attributes, "cx").unwrap_or(0.0);
        let cy = float_attribute(attributes, "cy").unwrap_or(0.0);
        let r = float_attribute(attributes, "r").unwrap_or(0.0);
        if r <= 0.0 {
            return;
        }

        self.paint_element(
            |canvas| {
                canvas.begin_path();
                canvas.arc(cx, cy, r, 0.0, 2.0 * std::f64::consts::PI, true);
                canvas.close_path();
            },
            true,
        );
    }

    fn begin_ellipse(&mut self, attributes: &AttributeMap) {
        let cx = float_attribute(attributes, "cx").unwrap_or(0.0);
        let cy = float_attribute(attributes, "cy").unwrap_or(0.0);
        let rx = float_attribute(attributes, "rx").unwrap_or(0.0);
        let ry = float_attribute(attributes, "ry").unwrap_or(0.0);
        if rx <= 0.0 || ry <= 0.0 {
            return;
        }

        let bounds = Rect::new(cx - rx, cy - ry, rx * 2.0, ry * 2.0);
        self.paint_element(
            |canvas| {
                canvas.begin_path();
                canvas.ellipse_in_rect(bounds);
                canvas.close_path();
            },
            true,
        );
    }

    fn begin_line(&mut self, attributes: &AttributeMap) {
        let x1 = float_attribute(attributes, "x1").unwrap_or(0.0);
        let y1 = float_attribute(attributes, "y1").unwrap_or(0.0);
        let x2 = float_attribute(attributes, "x2").unwrap_or(0.0);
        let y2 = float_attribute(attributes, "y2").unwrap_or(0.0);

        self.paint_element(
            |canvas| {
                canvas.begin_path();
                canvas.move_to(x1, y1);
                canvas.line_to(x2, y2);
            },
            false,
        );
    }

    fn begin_poly(&mut self, attributes: &AttributeMap, is_polygon: bool) {
        let points = match attributes.get("points") {
            Some(points) => *points,
            None => return,
        };

        self.paint_element(
            |canvas| {
                canvas.begin_path();
                process_path_data(canvas, PathDataParser::points(points, is_polygon));
            },
            is_polygon,
        );
    }

    fn begin_path_element(&mut self, attributes: &AttributeMap) {
        let data = match attributes.get("d") {
            Some(data) => *data,
            None => return,
        };

        self.paint_element(
            |canvas| {
                canvas.begin_path();
                process_path_data(canvas, PathDataParser::path(data));
            },
            true,
        );
    }

    fn begin_linear_gradient(&mut self, attributes: &AttributeMap) {
        let geometry = GradientGeometry::Linear(LinearGeometry {
            x1: length_attribute(attributes, "x1", Length::new(0.0, LengthUnit::Percent)),
            y1: length_attribute(attributes, "y1", Length::new(0.0, LengthUnit::Percent)),
            x2: length_attribute(attributes, "x2", Length::new(100.0, LengthUnit::Percent)),
            y2: length_attribute(attributes, "y2", Length::new(0.0, LengthUnit::Percent)),
        });

        self.pending_gradient = Some(Gradient::new(geometry, attributes));
    }

    fn begin_radial_gradient(&mut self, attributes: &AttributeMap) {
        let cx = length_attribute(attributes, "cx", Length::new(50.0, LengthUnit::Percent));
        let cy = length_attribute(attributes, "cy", Length::new(50.0, LengthUnit::Percent));
        let geometry = GradientGeometry::Radial(RadialGeometry {
            cx,
            cy,
            r: length_attribute(attributes, "r", Length::new(50.0, LengthUnit::Percent)),
            // The focal point follows the center unless given.
            fx: length_attribute(attributes, "fx", cx),
            fy: length_attribute(attributes, "fy", cy),
        });

        self.pending_gradient = Some(Gradient::new(geometry, attributes));
    }

    fn end_gradient(&mut self) {
        if let Some(gradient) = self.pending_gradient.take() {
            if gradient.id.is_empty() {
                let (line, column) = self.element_position();
                log::warn!("a gradient without an id at {}:{} is unreachable", line, column);
                return;
            }

            self.gradients.insert(gradient.id.clone(), gradient);
        }
    }

    fn begin_stop(&mut self, attributes: &AttributeMap) {
        if self.pending_gradient.is_none() {
            let (line, column) = self.element_position();
            log::warn!("a stop element outside a gradient at {}:{}", line, column);
            return;
        }

        let offset = match attributes
            .get("offset")
            .and_then(|value| Length::from_str(value).ok())
        {
            Some(offset) => offset,
            None => return,
        };

        let stop_color = self.graphics.stop_color;
        let stop_opacity = self.graphics.stop_opacity;
        let pending = self.pending_gradient.as_mut().unwrap();

        let prev = pending.stops.last().map(|s| s.offset.get()).unwrap_or(0.0);
        let offset = match resolve_stop_offset(offset, prev) {
            Some(offset) => offset,
            None => return,
        };

        pending.stops.push(Stop {
            offset: strict_num::NormalizedF64::new_clamped(offset),
            color: stop_color,
            opacity: strict_num::NormalizedF64::new_clamped(stop_opacity),
        });
    }

    fn begin_style(&mut self, attributes: &AttributeMap) {
        if let Some(style_type) = attributes.get("type") {
            self.frames.last_mut().unwrap().style_type = Some(style_type.to_string());
        }
    }

    fn end_style(&mut self) {
        let frame = self.frames.last().unwrap();
        if frame.style_type.as_deref() != Some("text/css") {
            return;
        }

        // The sheet is merged only when the whole block parsed;
        // a hard error leaves the current sheet untouched.
        let sheet = StyleSheet::from_data(frame.style_text.as_bytes());
        match sheet {
            Some(sheet) => self.merge_style_sheet(&sheet),
            None => {
                let (line, column) = self.element_position();
                log::warn!("failed to parse a style sheet at {}:{}", line, column);
            }
        }
    }

    // Runs the fill and stroke passes over a freshly defined path.
    // Elements without an interior never run the fill pass.
    fn paint_element<F: Fn(&mut C)>(&mut self, define_path: F, is_fillable: bool) {
        if !self.graphics.display || !self.graphics.visibility {
            return;
        }

        if is_fillable && self.graphics.fill.should_paint {
            self.canvas.save_state();
            define_path(&mut *self.canvas);
            if self.graphics.fill.iri.is_empty() {
                self.canvas.fill_path(self.graphics.fill_rule);
            } else {
                let iri = self.graphics.fill.iri.clone();
                self.draw_clipped_gradient(&iri);
            }
            self.canvas.restore_state();
        }

        if self.graphics.stroke.should_paint {
            self.canvas.save_state();
            define_path(&mut *self.canvas);
            if self.graphics.stroke.iri.is_empty() {
                self.canvas.stroke_path();
            } else {
                // The gradient fills the stroke ribbon.
                let iri = self.graphics.stroke.iri.clone();
                self.canvas.replace_path_with_stroked_path();
                self.draw_clipped_gradient(&iri);
            }
            self.canvas.restore_state();
        }
    }

    // Draws the referenced gradient clipped by the current path.
    fn draw_clipped_gradient(&mut self, iri: &str) {
        let id = iri.trim().strip_prefix('#').unwrap_or(iri);
        let gradient = match self.gradients.get(id) {
            Some(gradient) => gradient,
            None => {
                let (line, column) = self.element_position();
                log::warn!("unresolved gradient reference '{}' at {}:{}", iri, line, column);
                return;
            }
        };

        let bounding_box = self.canvas.path_bounding_box();
        self.canvas.clip_to_path();

        if gradient.units == GradientUnits::ObjectBoundingBox {
            // The gradient geometry lives in a coordinate system where
            // (0,0) and (1,1) are the corners of the object bounding box.
            if let Some(bounding_box) = bounding_box {
                self.canvas
                    .concat_transform(geom::rect_normalize_transform(bounding_box));
            }
        }

        for ts in &gradient.transforms {
            self.canvas.concat_transform(*ts);
        }

        let stops: Vec<GradientStop> = gradient
            .stops
            .iter()
            .map(|stop| GradientStop {
                offset: stop.offset.get(),
                color: stop.color,
                opacity: stop.opacity.get(),
            })
            .collect();

        match gradient.geometry {
            GradientGeometry::Linear(linear) => {
                let start = Point::new(evaluate_length(linear.x1), evaluate_length(linear.y1));
                let end = Point::new(evaluate_length(linear.x2), evaluate_length(linear.y2));
                self.canvas.draw_linear_gradient(&stops, start, end);
            }
            GradientGeometry::Radial(radial) => {
                let focal = Point::new(evaluate_length(radial.fx), evaluate_length(radial.fy));
                let center = Point::new(evaluate_length(radial.cx), evaluate_length(radial.cy));
                let radius = evaluate_length(radial.r);
                self.canvas.draw_radial_gradient(&stops, focal, center, radius);
            }
        }
    }
}

// Feeds canonical path commands into the canvas.
// A parse failure keeps whatever was emitted before it.
fn process_path_data<C: Canvas>(canvas: &mut C, parser: PathDataParser) {
    let mut current = Point::new(0.0, 0.0);
    let mut subpath_start = current;

    for command in parser {
        let command = match command {
            Ok(command) => command,
            Err(_) => {
                log::warn!("invalid path data, truncating");
                break;
            }
        };

        match command {
            PathCommand::MoveTo { x, y } => {
                canvas.move_to(x, y);
                current = Point::new(x, y);
                subpath_start = current;
            }
            PathCommand::LineTo { x, y }
            | PathCommand::HorizontalLineTo { x, y }
            | PathCommand::VerticalLineTo { x, y } => {
                canvas.line_to(x, y);
                current = Point::new(x, y);
            }
            PathCommand::CubicBezier { x1, y1, x2, y2, x, y }
            | PathCommand::SmoothCubicBezier { x1, y1, x2, y2, x, y } => {
                canvas.cubic_to(x1, y1, x2, y2, x, y);
                current = Point::new(x, y);
            }
            PathCommand::QuadBezier { x1, y1, x, y }
            | PathCommand::SmoothQuadBezier { x1, y1, x, y } => {
                canvas.quad_to(x1, y1, x, y);
                current = Point::new(x, y);
            }
            PathCommand::EllipticalArc {
                rx,
                ry,
                rotation,
                large_arc,
                sweep,
                x,
                y,
            } => {
                let end = Point::new(x, y);
                add_elliptical_arc(canvas, current, end, rx, ry, rotation, large_arc, sweep);
                current = end;
            }
            PathCommand::ClosePath => {
                canvas.close_path();
                current = subpath_start;
            }
        }
    }
}

// Adds an endpoint-parameterised elliptical arc as cubic segments.
// A degenerate arc, e.g. one with coincident endpoints, collapses
// to a straight line and the path keeps going.
#[allow(clippy::too_many_arguments)]
fn add_elliptical_arc<C: Canvas>(
    canvas: &mut C,
    from: Point,
    to: Point,
    rx: f64,
    ry: f64,
    rotation: f64,
    large_arc: bool,
    sweep: bool,
) {
    let svg_arc = kurbo::SvgArc {
        from: kurbo::Point::new(from.x, from.y),
        to: kurbo::Point::new(to.x, to.y),
        radii: kurbo::Vec2::new(rx, ry),
        x_rotation: rotation.to_radians(),
        large_arc,
        sweep,
    };

    match kurbo::Arc::from_svg_arc(&svg_arc) {
        Some(arc) => {
            arc.to_cubic_beziers(0.1, |p1, p2, p| {
                canvas.cubic_to(p1.x, p1.y, p2.x, p2.y, p.x, p.y);
            });
        }
        None => {
            canvas.line_to(to.x, to.y);
        }
    }
}

fn parse_float(value: &str) -> Option<f64> {
    Number::from_str(value).ok().map(|n| n.0)
}

fn float_attribute(attributes: &AttributeMap, name: &str) -> Option<f64> {
    attributes.get(name).and_then(|value| parse_float(value))
}

fn length_attribute(attributes: &AttributeMap, name: &str, default: Length) -> Length {
    attributes
        .get(name)
        .and_then(|value| Length::from_str(value).ok())
        .unwrap_or(default)
}

#[inline]
fn clamp_unit(value: f64) -> f64 {
    value.max(0.0).min(1.0)
}
