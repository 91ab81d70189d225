use crate::{Error, Stream};

/// A single-axis alignment of the [`preserveAspectRatio`] attribute.
///
/// [`preserveAspectRatio`]: https://www.w3.org/TR/SVG11/coords.html#PreserveAspectRatioAttribute
#[allow(missing_docs)]
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum AxisAlign {
    Min,
    Mid,
    Max,
}

/// The `meetOrSlice` value of the [`preserveAspectRatio`] attribute.
///
/// [`preserveAspectRatio`]: https://www.w3.org/TR/SVG11/coords.html#PreserveAspectRatioAttribute
#[allow(missing_docs)]
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum MeetOrSlice {
    Meet,
    Slice,
}

/// Representation of the [`preserveAspectRatio`] attribute.
///
/// The `none` alignment keeps both axis alignments at `Mid`
/// and sets the `none` flag instead.
///
/// [`preserveAspectRatio`]: https://www.w3.org/TR/SVG11/coords.html#PreserveAspectRatioAttribute
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct AspectRatio {
    /// Set when the `defer` keyword is present.
    pub defer: bool,
    /// Set when the alignment value is `none`.
    pub none: bool,
    /// Horizontal alignment. Must be `Mid` when `none` is set.
    pub align_x: AxisAlign,
    /// Vertical alignment. Must be `Mid` when `none` is set.
    pub align_y: AxisAlign,
    /// `meet` unless the `slice` keyword is present.
    pub meet_or_slice: MeetOrSlice,
}

impl Default for AspectRatio {
    #[inline]
    fn default() -> Self {
        AspectRatio {
            defer: false,
            none: false,
            align_x: AxisAlign::Mid,
            align_y: AxisAlign::Mid,
            meet_or_slice: MeetOrSlice::Meet,
        }
    }
}

impl std::str::FromStr for AspectRatio {
    type Err = Error;

    fn from_str(text: &str) -> Result<Self, Error> {
        let mut s = Stream::from(text);

        s.skip_spaces();

        let defer = s.starts_with(b"defer");
        if defer {
            s.advance(5);
            s.skip_spaces();
        }

        let start = s.pos();
        let align = s.consume_ascii_ident();
        let (none, align_x, align_y) = match align {
            "none" => (true, AxisAlign::Mid, AxisAlign::Mid),
            "xMinYMin" => (false, AxisAlign::Min, AxisAlign::Min),
            "xMidYMin" => (false, AxisAlign::Mid, AxisAlign::Min),
            "xMaxYMin" => (false, AxisAlign::Max, AxisAlign::Min),
            "xMinYMid" => (false, AxisAlign::Min, AxisAlign::Mid),
            "xMidYMid" => (false, AxisAlign::Mid, AxisAlign::Mid),
            "xMaxYMid" => (false, AxisAlign::Max, AxisAlign::Mid),
            "xMinYMax" => (false, AxisAlign::Min, AxisAlign::Max),
            "xMidYMax" => (false, AxisAlign::Mid, AxisAlign::Max),
            "xMaxYMax" => (false, AxisAlign::Max, AxisAlign::Max),
            _ => return Err(Error::UnexpectedData(s.calc_char_pos_at(start))),
        };

        s.skip_spaces();

        let mut meet_or_slice = MeetOrSlice::Meet;
        if !s.at_end() {
            let start = s.pos();
            match s.consume_ascii_ident() {
                "meet" => {}
                "slice" => meet_or_slice = MeetOrSlice::Slice,
                "" => {}
                _ => return Err(Error::UnexpectedData(s.calc_char_pos_at(start))),
            }
        }

        Ok(AspectRatio {
            defer,
            none,
            align_x,
            align_y,
            meet_or_slice,
        })
    }
}
