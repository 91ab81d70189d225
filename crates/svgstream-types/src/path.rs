use crate::{ByteExt, Error, Stream};

/// A canonical path command with resolved absolute coordinates.
///
/// Relative commands are resolved against the current point during parsing,
/// and the shorthand forms carry their reconstructed control points,
/// so a consumer can feed the commands straight into a path builder.
#[allow(missing_docs)]
#[derive(Clone, Copy, PartialEq, Debug)]
pub enum PathCommand {
    MoveTo {
        x: f64,
        y: f64,
    },
    LineTo {
        x: f64,
        y: f64,
    },
    HorizontalLineTo {
        x: f64,
        y: f64,
    },
    VerticalLineTo {
        x: f64,
        y: f64,
    },
    CubicBezier {
        x1: f64,
        y1: f64,
        x2: f64,
        y2: f64,
        x: f64,
        y: f64,
    },
    SmoothCubicBezier {
        x1: f64,
        y1: f64,
        x2: f64,
        y2: f64,
        x: f64,
        y: f64,
    },
    QuadBezier {
        x1: f64,
        y1: f64,
        x: f64,
        y: f64,
    },
    SmoothQuadBezier {
        x1: f64,
        y1: f64,
        x: f64,
        y: f64,
    },
    EllipticalArc {
        rx: f64,
        ry: f64,
        rotation: f64,
        large_arc: bool,
        sweep: bool,
        x: f64,
        y: f64,
    },
    ClosePath,
}

impl PathCommand {
    /// Returns the command end point.
    ///
    /// `ClosePath` ends at the current subpath start,
    /// which only the parser knows, so it has no point of its own.
    pub fn point(&self) -> Option<(f64, f64)> {
        match *self {
            PathCommand::MoveTo { x, y }
            | PathCommand::LineTo { x, y }
            | PathCommand::HorizontalLineTo { x, y }
            | PathCommand::VerticalLineTo { x, y }
            | PathCommand::CubicBezier { x, y, .. }
            | PathCommand::SmoothCubicBezier { x, y, .. }
            | PathCommand::QuadBezier { x, y, .. }
            | PathCommand::SmoothQuadBezier { x, y, .. }
            | PathCommand::EllipticalArc { x, y, .. } => Some((x, y)),
            PathCommand::ClosePath => None,
        }
    }
}

/// The grammar interpreted by [`PathDataParser`].
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum PathDataFormat {
    /// The `d` attribute of the `path` element.
    Path,
    /// The `points` attribute of the `polygon` and `polyline` elements:
    /// a MoveTo followed by LineTo's, always absolute.
    Points,
}

// Which command the letter selected. Shorthand reflection and
// repetition rules depend on it.
#[derive(Clone, Copy, PartialEq, Debug)]
enum CmdKind {
    Move,
    Line,
    HorizontalLine,
    VerticalLine,
    Cubic,
    SmoothCubic,
    Quad,
    SmoothQuad,
    Arc,
    Close,
}

/// A pull-based parser for [path data] and [`points`] lists.
///
/// Yields one canonical [`PathCommand`] per iteration.
/// A command that fails to parse yields a single error with the stream
/// left at the failed position; commands already produced stay valid.
///
/// # Examples
///
/// ```
/// use svgstream_types::{PathCommand, PathDataParser};
///
/// let mut p = PathDataParser::path("M 10 20 l 5 5");
/// assert_eq!(p.next().unwrap().unwrap(), PathCommand::MoveTo { x: 10.0, y: 20.0 });
/// assert_eq!(p.next().unwrap().unwrap(), PathCommand::LineTo { x: 15.0, y: 25.0 });
/// assert_eq!(p.next().is_none(), true);
/// ```
///
/// [path data]: https://www.w3.org/TR/SVG11/paths.html#PathData
/// [`points`]: https://www.w3.org/TR/SVG11/shapes.html#PointsBNF
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct PathDataParser<'a> {
    stream: Stream<'a>,
    format: PathDataFormat,
    implicit_close: bool,

    // Current point, prior to the command being parsed.
    x: f64,
    y: f64,

    // Start of the current subpath. ClosePath returns here.
    mx: f64,
    my: f64,

    // Absolute control points of the previous command,
    // for the shorthand reflections.
    cx1: f64,
    cy1: f64,
    cx2: f64,
    cy2: f64,

    prev_cmd: Option<CmdKind>,
    absolute: bool,
    close_emitted: bool,
    failed: bool,
}

impl<'a> PathDataParser<'a> {
    /// Constructs a parser for the `d` attribute of a `path` element.
    pub fn path(data: &'a str) -> Self {
        PathDataParser::new(data, PathDataFormat::Path, false)
    }

    /// Constructs a parser for a `points` attribute.
    ///
    /// When `implicit_close` is set, a `ClosePath` is produced once
    /// after the last point, the way a `polygon` outline closes.
    pub fn points(data: &'a str, implicit_close: bool) -> Self {
        PathDataParser::new(data, PathDataFormat::Points, implicit_close)
    }

    fn new(data: &'a str, format: PathDataFormat, implicit_close: bool) -> Self {
        PathDataParser {
            stream: Stream::from(data),
            format,
            implicit_close,
            x: 0.0,
            y: 0.0,
            mx: 0.0,
            my: 0.0,
            cx1: 0.0,
            cy1: 0.0,
            cx2: 0.0,
            cy2: 0.0,
            prev_cmd: None,
            absolute: format == PathDataFormat::Points,
            close_emitted: false,
            failed: false,
        }
    }

    fn rel_x(&self) -> f64 {
        if self.absolute {
            0.0
        } else {
            self.x
        }
    }

    fn rel_y(&self) -> f64 {
        if self.absolute {
            0.0
        } else {
            self.y
        }
    }

    fn next_path_command(&mut self) -> Result<PathCommand, Error> {
        let kind = if self.stream.curr_byte_unchecked().is_letter() {
            let c = self.stream.curr_byte_unchecked();
            let kind = match c.to_ascii_lowercase() {
                b'm' => CmdKind::Move,
                b'l' => CmdKind::Line,
                b'h' => CmdKind::HorizontalLine,
                b'v' => CmdKind::VerticalLine,
                b'c' => CmdKind::Cubic,
                b's' => CmdKind::SmoothCubic,
                b'q' => CmdKind::Quad,
                b't' => CmdKind::SmoothQuad,
                b'a' => CmdKind::Arc,
                b'z' => CmdKind::Close,
                _ => return Err(Error::UnexpectedData(self.stream.calc_char_pos())),
            };

            self.stream.advance(1);
            self.absolute = c.is_ascii_uppercase();
            kind
        } else {
            // No letter: the previous command repeats,
            // except that a repeated MoveTo becomes a LineTo
            // and ClosePath cannot be followed by operands.
            match self.prev_cmd {
                None | Some(CmdKind::Close) => {
                    return Err(Error::UnexpectedData(self.stream.calc_char_pos()));
                }
                Some(CmdKind::Move) => CmdKind::Line,
                Some(kind) => kind,
            }
        };

        // The first command must be a MoveTo.
        if self.prev_cmd.is_none() && kind != CmdKind::Move {
            return Err(Error::UnexpectedData(self.stream.calc_char_pos()));
        }

        let command = match kind {
            CmdKind::Move => {
                self.x = self.stream.parse_list_number()? + self.rel_x();
                self.y = self.stream.parse_list_number()? + self.rel_y();
                self.mx = self.x;
                self.my = self.y;
                PathCommand::MoveTo {
                    x: self.x,
                    y: self.y,
                }
            }
            CmdKind::Line => {
                self.x = self.stream.parse_list_number()? + self.rel_x();
                self.y = self.stream.parse_list_number()? + self.rel_y();
                PathCommand::LineTo {
                    x: self.x,
                    y: self.y,
                }
            }
            CmdKind::HorizontalLine => {
                self.x = self.stream.parse_list_number()? + self.rel_x();
                PathCommand::HorizontalLineTo {
                    x: self.x,
                    y: self.y,
                }
            }
            CmdKind::VerticalLine => {
                self.y = self.stream.parse_list_number()? + self.rel_y();
                PathCommand::VerticalLineTo {
                    x: self.x,
                    y: self.y,
                }
            }
            CmdKind::Cubic => {
                let x1 = self.stream.parse_list_number()? + self.rel_x();
                let y1 = self.stream.parse_list_number()? + self.rel_y();
                let x2 = self.stream.parse_list_number()? + self.rel_x();
                let y2 = self.stream.parse_list_number()? + self.rel_y();
                let x = self.stream.parse_list_number()? + self.rel_x();
                let y = self.stream.parse_list_number()? + self.rel_y();
                self.cx1 = x1;
                self.cy1 = y1;
                self.cx2 = x2;
                self.cy2 = y2;
                self.x = x;
                self.y = y;
                PathCommand::CubicBezier { x1, y1, x2, y2, x, y }
            }
            CmdKind::SmoothCubic => {
                // 'The first control point is assumed to be the reflection
                // of the second control point on the previous command
                // relative to the current point.'
                let (x1, y1) = match self.prev_cmd {
                    Some(CmdKind::Cubic) | Some(CmdKind::SmoothCubic) => {
                        (self.x * 2.0 - self.cx2, self.y * 2.0 - self.cy2)
                    }
                    _ => (self.x, self.y),
                };

                let x2 = self.stream.parse_list_number()? + self.rel_x();
                let y2 = self.stream.parse_list_number()? + self.rel_y();
                let x = self.stream.parse_list_number()? + self.rel_x();
                let y = self.stream.parse_list_number()? + self.rel_y();
                self.cx1 = x1;
                self.cy1 = y1;
                self.cx2 = x2;
                self.cy2 = y2;
                self.x = x;
                self.y = y;
                PathCommand::SmoothCubicBezier { x1, y1, x2, y2, x, y }
            }
            CmdKind::Quad => {
                let x1 = self.stream.parse_list_number()? + self.rel_x();
                let y1 = self.stream.parse_list_number()? + self.rel_y();
                let x = self.stream.parse_list_number()? + self.rel_x();
                let y = self.stream.parse_list_number()? + self.rel_y();
                self.cx1 = x1;
                self.cy1 = y1;
                self.x = x;
                self.y = y;
                PathCommand::QuadBezier { x1, y1, x, y }
            }
            CmdKind::SmoothQuad => {
                // The analogous reflection of the previous control point.
                let (x1, y1) = match self.prev_cmd {
                    Some(CmdKind::Quad) | Some(CmdKind::SmoothQuad) => {
                        (self.x * 2.0 - self.cx1, self.y * 2.0 - self.cy1)
                    }
                    _ => (self.x, self.y),
                };

                let x = self.stream.parse_list_number()? + self.rel_x();
                let y = self.stream.parse_list_number()? + self.rel_y();
                self.cx1 = x1;
                self.cy1 = y1;
                self.x = x;
                self.y = y;
                PathCommand::SmoothQuadBezier { x1, y1, x, y }
            }
            CmdKind::Arc => {
                // Radii are made non-negative per the SVG arc
                // implementation notes. Zero radii fail the command.
                let rx = self.stream.parse_list_number()?.abs();
                let ry = self.stream.parse_list_number()?.abs();
                if rx == 0.0 || ry == 0.0 {
                    return Err(Error::InvalidValue);
                }

                let rotation = self.stream.parse_list_number()?;
                let large_arc = parse_flag(&mut self.stream)?;
                let sweep = parse_flag(&mut self.stream)?;
                let x = self.stream.parse_list_number()? + self.rel_x();
                let y = self.stream.parse_list_number()? + self.rel_y();
                self.x = x;
                self.y = y;
                PathCommand::EllipticalArc {
                    rx,
                    ry,
                    rotation,
                    large_arc,
                    sweep,
                    x,
                    y,
                }
            }
            CmdKind::Close => {
                // The next subpath starts where the current one did.
                self.x = self.mx;
                self.y = self.my;
                PathCommand::ClosePath
            }
        };

        self.prev_cmd = Some(kind);
        Ok(command)
    }

    fn next_points_command(&mut self) -> Result<PathCommand, Error> {
        let first = self.prev_cmd.is_none();
        self.x = self.stream.parse_list_number()?;
        self.y = self.stream.parse_list_number()?;

        if first {
            self.mx = self.x;
            self.my = self.y;
            self.prev_cmd = Some(CmdKind::Move);
            Ok(PathCommand::MoveTo {
                x: self.x,
                y: self.y,
            })
        } else {
            self.prev_cmd = Some(CmdKind::Line);
            Ok(PathCommand::LineTo {
                x: self.x,
                y: self.y,
            })
        }
    }
}

// By the SVG spec, 'large-arc' and 'sweep' must contain only one char
// and can be written without any separators, e.g.: 10 20 30 01 10 20.
fn parse_flag(s: &mut Stream) -> Result<bool, Error> {
    let flag = s.parse_flag()?;
    if s.is_curr_byte_eq(b',') {
        s.advance(1);
    }
    s.skip_spaces();
    Ok(flag)
}

impl<'a> Iterator for PathDataParser<'a> {
    type Item = Result<PathCommand, Error>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }

        self.stream.skip_spaces();

        if self.stream.at_end() {
            if self.implicit_close && !self.close_emitted && self.prev_cmd.is_some() {
                self.close_emitted = true;
                self.x = self.mx;
                self.y = self.my;
                return Some(Ok(PathCommand::ClosePath));
            }

            return None;
        }

        let res = match self.format {
            PathDataFormat::Path => self.next_path_command(),
            PathDataFormat::Points => self.next_points_command(),
        };

        if res.is_err() {
            self.failed = true;
        }

        Some(res)
    }
}

#[rustfmt::skip]
#[cfg(test)]
mod tests {
    use super::*;

    macro_rules! test {
        ($name:ident, $parser:expr, $( $cmd:expr ),*) => (
            #[test]
            fn $name() {
                let mut s = $parser;
                $(
                    assert_eq!(s.next().unwrap().unwrap(), $cmd);
                )*

                if let Some(res) = s.next() {
                    assert!(res.is_err());
                }
            }
        )
    }

    test!(null, PathDataParser::path(""), );
    test!(not_a_path, PathDataParser::path("q"), );
    test!(not_a_move_to, PathDataParser::path("L 20 30"), );
    test!(stop_on_err_1, PathDataParser::path("M 10 20 L 30 40 L 50"),
        PathCommand::MoveTo { x: 10.0, y: 20.0 },
        PathCommand::LineTo { x: 30.0, y: 40.0 }
    );

    test!(move_to_1, PathDataParser::path("M 10 20"),
        PathCommand::MoveTo { x: 10.0, y: 20.0 });

    test!(move_to_2, PathDataParser::path("m 10 20"),
        PathCommand::MoveTo { x: 10.0, y: 20.0 });

    test!(move_to_3, PathDataParser::path("M 10 20 30 40 50 60"),
        PathCommand::MoveTo { x: 10.0, y: 20.0 },
        PathCommand::LineTo { x: 30.0, y: 40.0 },
        PathCommand::LineTo { x: 50.0, y: 60.0 }
    );

    test!(relative_move_to, PathDataParser::path("m 30 40 110 120 -20 -130"),
        PathCommand::MoveTo { x: 30.0, y: 40.0 },
        PathCommand::LineTo { x: 140.0, y: 160.0 },
        PathCommand::LineTo { x: 120.0, y: 30.0 }
    );

    // Relative commands resolve against the current point,
    // with H and V touching only their own axis.
    test!(relative_mixed, PathDataParser::path("M 10 20 l 5 -5 h 5 v 10 l 0 5"),
        PathCommand::MoveTo { x: 10.0, y: 20.0 },
        PathCommand::LineTo { x: 15.0, y: 15.0 },
        PathCommand::HorizontalLineTo { x: 20.0, y: 15.0 },
        PathCommand::VerticalLineTo { x: 20.0, y: 25.0 },
        PathCommand::LineTo { x: 20.0, y: 30.0 }
    );

    test!(close_resets_current_point, PathDataParser::path("M0 0 L10 0 l0 10 z M20 20"),
        PathCommand::MoveTo { x: 0.0, y: 0.0 },
        PathCommand::LineTo { x: 10.0, y: 0.0 },
        PathCommand::LineTo { x: 10.0, y: 10.0 },
        PathCommand::ClosePath,
        PathCommand::MoveTo { x: 20.0, y: 20.0 }
    );

    // A relative command after a close is relative to the subpath start.
    test!(relative_after_close, PathDataParser::path("M10 10 L20 10 Z l 1 2"),
        PathCommand::MoveTo { x: 10.0, y: 10.0 },
        PathCommand::LineTo { x: 20.0, y: 10.0 },
        PathCommand::ClosePath,
        PathCommand::LineTo { x: 11.0, y: 12.0 }
    );

    test!(curve_to_1, PathDataParser::path("M 10 20 C 30 40 50 60 70 80"),
        PathCommand::MoveTo { x: 10.0, y: 20.0 },
        PathCommand::CubicBezier {
            x1: 30.0, y1: 40.0,
            x2: 50.0, y2: 60.0,
            x: 70.0, y: 80.0,
        }
    );

    test!(curve_to_2, PathDataParser::path("M 10 20 c 10 10 20 20 30 30"),
        PathCommand::MoveTo { x: 10.0, y: 20.0 },
        PathCommand::CubicBezier {
            x1: 20.0, y1: 30.0,
            x2: 30.0, y2: 40.0,
            x: 40.0, y: 50.0,
        }
    );

    // The reflected control point of the second curve is (40, 10).
    test!(smooth_curve_reflection,
        PathDataParser::path("M 0 0 C 10 0 20 10 30 10 S 50 20 60 10"),
        PathCommand::MoveTo { x: 0.0, y: 0.0 },
        PathCommand::CubicBezier {
            x1: 10.0, y1: 0.0,
            x2: 20.0, y2: 10.0,
            x: 30.0, y: 10.0,
        },
        PathCommand::SmoothCubicBezier {
            x1: 40.0, y1: 10.0,
            x2: 50.0, y2: 20.0,
            x: 60.0, y: 10.0,
        }
    );

    test!(smooth_curve_after_move, PathDataParser::path("M 30 40 S 171 45 180 155"),
        PathCommand::MoveTo { x: 30.0, y: 40.0 },
        PathCommand::SmoothCubicBezier {
            x1: 30.0, y1: 40.0,
            x2: 171.0, y2: 45.0,
            x: 180.0, y: 155.0,
        }
    );

    test!(smooth_quad_after_quad, PathDataParser::path("M 30 40 Q 171 45 100 90 T 160 180"),
        PathCommand::MoveTo { x: 30.0, y: 40.0 },
        PathCommand::QuadBezier { x1: 171.0, y1: 45.0, x: 100.0, y: 90.0 },
        PathCommand::SmoothQuadBezier { x1: 29.0, y1: 135.0, x: 160.0, y: 180.0 }
    );

    test!(smooth_quad_after_smooth_quad, PathDataParser::path("M 30 30 T 40 140 T 170 30"),
        PathCommand::MoveTo { x: 30.0, y: 30.0 },
        PathCommand::SmoothQuadBezier { x1: 30.0, y1: 30.0, x: 40.0, y: 140.0 },
        PathCommand::SmoothQuadBezier { x1: 50.0, y1: 250.0, x: 170.0, y: 30.0 }
    );

    test!(arc_to_1, PathDataParser::path("M 10 20 A 5 5 30 1 1 20 20"),
        PathCommand::MoveTo { x: 10.0, y: 20.0 },
        PathCommand::EllipticalArc {
            rx: 5.0, ry: 5.0,
            rotation: 30.0,
            large_arc: true, sweep: true,
            x: 20.0, y: 20.0,
        }
    );

    test!(arc_to_2, PathDataParser::path("M10-20A5.5.3-4 010-.1"),
        PathCommand::MoveTo { x: 10.0, y: -20.0 },
        PathCommand::EllipticalArc {
            rx: 5.5, ry: 0.3,
            rotation: -4.0,
            large_arc: false, sweep: true,
            x: 0.0, y: -0.1,
        }
    );

    // Negative radii are made non-negative.
    test!(arc_to_3, PathDataParser::path("m 10 20 a -5 -5 30 0 0 10 0"),
        PathCommand::MoveTo { x: 10.0, y: 20.0 },
        PathCommand::EllipticalArc {
            rx: 5.0, ry: 5.0,
            rotation: 30.0,
            large_arc: false, sweep: false,
            x: 20.0, y: 20.0,
        }
    );

    // A zero radius fails the command.
    test!(arc_to_4, PathDataParser::path("M 10 20 A 0 5 30 1 1 20 20"),
        PathCommand::MoveTo { x: 10.0, y: 20.0 }
    );

    test!(separator_1, PathDataParser::path("M 10 20 L 5 15 C 10 20 30 40 50 60"),
        PathCommand::MoveTo { x: 10.0, y: 20.0 },
        PathCommand::LineTo { x: 5.0, y: 15.0 },
        PathCommand::CubicBezier {
            x1: 10.0, y1: 20.0,
            x2: 30.0, y2: 40.0,
            x: 50.0, y: 60.0,
        }
    );

    test!(separator_2, PathDataParser::path("M 10, 20 L 5, 15 C 10, 20 30, 40 50, 60"),
        PathCommand::MoveTo { x: 10.0, y: 20.0 },
        PathCommand::LineTo { x: 5.0, y: 15.0 },
        PathCommand::CubicBezier {
            x1: 10.0, y1: 20.0,
            x2: 30.0, y2: 40.0,
            x: 50.0, y: 60.0,
        }
    );

    test!(separator_3, PathDataParser::path("M10 20V30H40V50H60Z"),
        PathCommand::MoveTo { x: 10.0, y: 20.0 },
        PathCommand::VerticalLineTo { x: 10.0, y: 30.0 },
        PathCommand::HorizontalLineTo { x: 40.0, y: 30.0 },
        PathCommand::VerticalLineTo { x: 40.0, y: 50.0 },
        PathCommand::HorizontalLineTo { x: 60.0, y: 50.0 },
        PathCommand::ClosePath
    );

    // ClosePath can't be followed by a number.
    test!(invalid_1, PathDataParser::path("M 0 0 Z 2"),
        PathCommand::MoveTo { x: 0.0, y: 0.0 },
        PathCommand::ClosePath
    );

    // ClosePath can be followed by any command.
    test!(invalid_2, PathDataParser::path("M 0 0 Z H 10"),
        PathCommand::MoveTo { x: 0.0, y: 0.0 },
        PathCommand::ClosePath,
        PathCommand::HorizontalLineTo { x: 10.0, y: 0.0 }
    );

    test!(points_1, PathDataParser::points("10 20 30 40", false),
        PathCommand::MoveTo { x: 10.0, y: 20.0 },
        PathCommand::LineTo { x: 30.0, y: 40.0 }
    );

    test!(points_2, PathDataParser::points("10,20 30,40 50,60", true),
        PathCommand::MoveTo { x: 10.0, y: 20.0 },
        PathCommand::LineTo { x: 30.0, y: 40.0 },
        PathCommand::LineTo { x: 50.0, y: 60.0 },
        PathCommand::ClosePath
    );

    #[test]
    fn points_empty_no_close() {
        let mut p = PathDataParser::points("", true);
        assert!(p.next().is_none());
    }

    #[test]
    fn points_close_emitted_once() {
        let mut p = PathDataParser::points("10 20 30 40", true);
        let cmds: Vec<_> = p.by_ref().collect();
        assert_eq!(cmds.len(), 3);
        assert!(p.next().is_none());
    }

    #[test]
    fn failure_keeps_stream_position() {
        let mut p = PathDataParser::path("M 10 20 L q");
        let _ = p.next();
        assert!(p.next().unwrap().is_err());
        // the stream is left at the failed token
        assert_eq!(p.stream.slice_tail(), " q");
        assert!(p.next().is_none());
    }

    // The sequence of emitted points equals the literal operands
    // of an absolute-only path.
    #[test]
    fn absolute_round_trip() {
        let p = PathDataParser::path("M 1 2 L 3 4 C 5 6 7 8 9 10 Q 11 12 13 14");
        let points: Vec<_> = p.map(|c| c.unwrap().point().unwrap()).collect();
        assert_eq!(points, &[(1.0, 2.0), (3.0, 4.0), (9.0, 10.0), (13.0, 14.0)]);
    }

    // Replacing `l dx dy` with `L x+dx y+dy` yields the same points.
    #[test]
    fn relative_absolute_equivalence() {
        let rel = PathDataParser::path("M 10 20 l 5 5 c 1 1 2 2 3 3 v 7");
        let abs = PathDataParser::path("M 10 20 L 15 25 C 16 26 17 27 18 28 V 35");
        let rel_points: Vec<_> = rel.map(|c| c.unwrap().point()).collect();
        let abs_points: Vec<_> = abs.map(|c| c.unwrap().point()).collect();
        assert_eq!(rel_points, abs_points);
    }
}
