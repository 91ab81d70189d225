use crate::{Error, Stream};

/// Representation of the [`<transform>`] type: a 2D affine matrix.
///
/// A point is transformed as `x' = a*x + c*y + e`, `y' = b*x + d*y + f`.
///
/// [`<transform>`]: https://www.w3.org/TR/SVG11/types.html#DataTypeTransformList
#[derive(Clone, Copy, PartialEq, Debug)]
#[allow(missing_docs)]
pub struct Transform {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub d: f64,
    pub e: f64,
    pub f: f64,
}

impl Transform {
    /// Constructs a new transform.
    #[inline]
    pub fn new(a: f64, b: f64, c: f64, d: f64, e: f64, f: f64) -> Self {
        Transform { a, b, c, d, e, f }
    }

    /// Constructs a new translation transform.
    #[inline]
    pub fn new_translate(tx: f64, ty: f64) -> Self {
        Transform::new(1.0, 0.0, 0.0, 1.0, tx, ty)
    }

    /// Constructs a new scaling transform.
    #[inline]
    pub fn new_scale(sx: f64, sy: f64) -> Self {
        Transform::new(sx, 0.0, 0.0, sy, 0.0, 0.0)
    }

    /// Constructs a new rotation transform from an angle in radians.
    #[inline]
    pub fn new_rotate(rad: f64) -> Self {
        let (sin, cos) = rad.sin_cos();
        Transform::new(cos, sin, -sin, cos, 0.0, 0.0)
    }

    /// Returns `self` combined with `other`, with `other` applied first.
    #[must_use]
    pub fn pre_concat(&self, other: &Transform) -> Transform {
        Transform {
            a: self.a * other.a + self.c * other.b,
            b: self.b * other.a + self.d * other.b,
            c: self.a * other.c + self.c * other.d,
            d: self.b * other.c + self.d * other.d,
            e: self.a * other.e + self.c * other.f + self.e,
            f: self.b * other.e + self.d * other.f + self.f,
        }
    }

    /// Transforms a point.
    #[inline]
    pub fn apply(&self, x: f64, y: f64) -> (f64, f64) {
        (self.a * x + self.c * y + self.e, self.b * x + self.d * y + self.f)
    }
}

impl Default for Transform {
    #[inline]
    fn default() -> Transform {
        Transform::new(1.0, 0.0, 0.0, 1.0, 0.0, 0.0)
    }
}

/// A pull-based [`<transform-list>`] parser.
///
/// Yields one affine matrix per transform function.
/// `rotate(<angle> <cx> <cy>)` is composed into a single matrix,
/// equivalent to `translate(<cx> <cy>) rotate(<angle>) translate(-<cx> -<cy>)`.
///
/// # Examples
///
/// ```
/// use svgstream_types::{Transform, TransformListParser};
///
/// let mut p = TransformListParser::from("scale(2) translate(10, -20)");
/// assert_eq!(p.next().unwrap().unwrap(), Transform::new_scale(2.0, 2.0));
/// assert_eq!(p.next().unwrap().unwrap(), Transform::new_translate(10.0, -20.0));
/// assert_eq!(p.next().is_none(), true);
/// ```
///
/// [`<transform-list>`]: https://www.w3.org/TR/SVG11/types.html#DataTypeTransformList
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct TransformListParser<'a> {
    stream: Stream<'a>,
}

impl<'a> From<&'a str> for TransformListParser<'a> {
    fn from(text: &'a str) -> Self {
        TransformListParser {
            stream: Stream::from(text),
        }
    }
}

impl<'a> Iterator for TransformListParser<'a> {
    type Item = Result<Transform, Error>;

    fn next(&mut self) -> Option<Self::Item> {
        self.stream.skip_spaces();

        if self.stream.at_end() {
            // empty attribute is still a valid value
            return None;
        }

        let res = parse_next(&mut self.stream);
        if res.is_err() {
            self.stream.jump_to_end();
        }

        Some(res)
    }
}

fn parse_next(s: &mut Stream) -> Result<Transform, Error> {
    let start = s.pos();
    let name = s.consume_ascii_ident();
    s.skip_spaces();
    s.consume_byte(b'(')?;

    let t = match name.as_bytes() {
        b"matrix" => Transform::new(
            s.parse_list_number()?,
            s.parse_list_number()?,
            s.parse_list_number()?,
            s.parse_list_number()?,
            s.parse_list_number()?,
            s.parse_list_number()?,
        ),
        b"translate" => {
            let x = s.parse_list_number()?;
            s.skip_spaces();

            let y = if s.is_curr_byte_eq(b')') {
                // 'If <ty> is not provided, it is assumed to be zero.'
                0.0
            } else {
                s.parse_list_number()?
            };

            Transform::new_translate(x, y)
        }
        b"scale" => {
            let x = s.parse_list_number()?;
            s.skip_spaces();

            let y = if s.is_curr_byte_eq(b')') {
                // 'If <sy> is not provided, it is assumed to be equal to <sx>.'
                x
            } else {
                s.parse_list_number()?
            };

            Transform::new_scale(x, y)
        }
        b"rotate" => {
            let a = s.parse_list_number()?;
            s.skip_spaces();

            if !s.is_curr_byte_eq(b')') {
                // 'If optional parameters <cx> and <cy> are supplied,
                // the rotate is about the point (cx, cy).'
                let cx = s.parse_list_number()?;
                let cy = s.parse_list_number()?;
                Transform::new_translate(cx, cy)
                    .pre_concat(&Transform::new_rotate(a.to_radians()))
                    .pre_concat(&Transform::new_translate(-cx, -cy))
            } else {
                Transform::new_rotate(a.to_radians())
            }
        }
        b"skewX" => {
            let a = s.parse_list_number()?;
            Transform::new(1.0, 0.0, a.to_radians().tan(), 1.0, 0.0, 0.0)
        }
        b"skewY" => {
            let a = s.parse_list_number()?;
            Transform::new(1.0, a.to_radians().tan(), 0.0, 1.0, 0.0, 0.0)
        }
        _ => {
            return Err(Error::UnexpectedData(s.calc_char_pos_at(start)));
        }
    };

    s.skip_spaces();
    s.consume_byte(b')')?;
    s.skip_spaces();

    if s.is_curr_byte_eq(b',') {
        s.advance(1);
    }

    Ok(t)
}

impl std::str::FromStr for Transform {
    type Err = Error;

    fn from_str(text: &str) -> Result<Self, Error> {
        let tokens = TransformListParser::from(text);
        let mut ts = Transform::default();

        for token in tokens {
            ts = ts.pre_concat(&token?);
        }

        Ok(ts)
    }
}
