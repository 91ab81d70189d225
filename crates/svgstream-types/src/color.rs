use crate::{colors, ByteExt, Error, Stream};

/// Representation of the [`<color>`] type.
///
/// Component intensities are kept in the 0.0..=1.0 range,
/// the way a raster backend consumes them.
///
/// [`<color>`]: https://www.w3.org/TR/SVG11/types.html#DataTypeColor
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct Color {
    red: f64,
    green: f64,
    blue: f64,
}

impl Color {
    /// Constructs a new `Color`.
    ///
    /// Each component is clamped into the 0.0..=1.0 range.
    #[inline]
    pub fn new(red: f64, green: f64, blue: f64) -> Color {
        Color {
            red: clamp_unit(red),
            green: clamp_unit(green),
            blue: clamp_unit(blue),
        }
    }

    /// Constructs a new `Color` from 8-bit components.
    #[inline]
    pub fn from_rgb8(red: u8, green: u8, blue: u8) -> Color {
        Color::new(
            red as f64 / 255.0,
            green as f64 / 255.0,
            blue as f64 / 255.0,
        )
    }

    /// Constructs a new `Color` set to black.
    #[inline]
    pub fn black() -> Color {
        Color::new(0.0, 0.0, 0.0)
    }

    /// Constructs a new `Color` set to white.
    #[inline]
    pub fn white() -> Color {
        Color::new(1.0, 1.0, 1.0)
    }

    /// Returns the red component.
    #[inline]
    pub fn red(&self) -> f64 {
        self.red
    }

    /// Returns the green component.
    #[inline]
    pub fn green(&self) -> f64 {
        self.green
    }

    /// Returns the blue component.
    #[inline]
    pub fn blue(&self) -> f64 {
        self.blue
    }
}

impl Default for Color {
    #[inline]
    fn default() -> Self {
        Color::black()
    }
}

impl std::str::FromStr for Color {
    type Err = Error;

    /// Parses a `Color` from a string.
    ///
    /// # Errors
    ///
    /// - Returns an error if a color has an invalid format.
    /// - Returns an error when the color is followed by anything
    ///   but whitespace.
    fn from_str(text: &str) -> Result<Self, Error> {
        let mut s = Stream::from(text);
        let color = s.parse_color()?;

        s.skip_spaces();
        if !s.at_end() {
            return Err(Error::UnexpectedData(s.calc_char_pos()));
        }

        Ok(color)
    }
}

impl<'a> Stream<'a> {
    /// Parses a color.
    ///
    /// Supported forms: `#rgb`, `#rrggbb`, `rgb(n, n, n)` with integer or
    /// integer-percent components, and a color keyword.
    pub fn parse_color(&mut self) -> Result<Color, Error> {
        let mut s = *self;
        s.skip_spaces();

        let color = if s.is_curr_byte_eq(b'#') {
            s.parse_hex_color()?
        } else if s.starts_with_ignore_case(b"rgb(") {
            s.parse_functional_color()?
        } else {
            s.parse_color_keyword()?
        };

        *self = s;
        Ok(color)
    }

    fn parse_hex_color(&mut self) -> Result<Color, Error> {
        self.consume_byte(b'#')?;

        // Count the hex digits first to choose between the
        // three-digit and six-digit forms.
        let mut probe = *self;
        let digits = probe.consume_bytes(|_, c| c.is_hex_digit()).len();
        if digits < 3 {
            return Err(Error::InvalidValue);
        }

        if digits < 6 {
            // #rgb, scaled by 15
            let r = self.parse_hex_int(1)?;
            let g = self.parse_hex_int(1)?;
            let b = self.parse_hex_int(1)?;
            Ok(Color::new(
                r as f64 / 15.0,
                g as f64 / 15.0,
                b as f64 / 15.0,
            ))
        } else {
            // #rrggbb, scaled by 255
            let r = self.parse_hex_int(2)?;
            let g = self.parse_hex_int(2)?;
            let b = self.parse_hex_int(2)?;
            Ok(Color::new(
                r as f64 / 255.0,
                g as f64 / 255.0,
                b as f64 / 255.0,
            ))
        }
    }

    fn parse_functional_color(&mut self) -> Result<Color, Error> {
        self.advance(4); // rgb(
        self.skip_spaces();

        let mut components = [0.0; 3];
        for (i, component) in components.iter_mut().enumerate() {
            if i != 0 && !self.consume_number_delimiter() {
                return Err(Error::InvalidValue);
            }

            // Each component is either an integer or an integer percent.
            if let Ok(n) = self.parse_percent_integer() {
                *component = n as f64 / 100.0;
            } else {
                let n = self.parse_integer()?;
                *component = n as f64 / 255.0;
            }
        }

        self.skip_spaces();
        self.consume_byte(b')')?;

        Ok(Color::new(components[0], components[1], components[2]))
    }

    fn parse_color_keyword(&mut self) -> Result<Color, Error> {
        // The longest leading alphabetic run is the keyword candidate.
        let mut probe = *self;
        let name = probe.consume_bytes(|_, c| c.is_letter());
        if name.is_empty() {
            return Err(Error::InvalidValue);
        }

        // TODO: remove allocation
        let name = name.to_ascii_lowercase();
        match colors::from_str(&name) {
            Some([r, g, b]) => {
                *self = probe;
                Ok(Color::from_rgb8(r, g, b))
            }
            None => Err(Error::InvalidValue),
        }
    }
}

#[inline]
fn clamp_unit(value: f64) -> f64 {
    debug_assert!(!value.is_nan());
    value.max(0.0).min(1.0)
}

#[rustfmt::skip]
#[cfg(test)]
mod tests {
    use std::str::FromStr;
    use super::*;

    macro_rules! test {
        ($name:ident, $text:expr, $color:expr) => {
            #[test]
            fn $name() {
                assert_eq!(Color::from_str($text).unwrap(), $color);
            }
        };
    }

    test!(rrggbb, "#ff0000", Color::new(1.0, 0.0, 0.0));
    test!(rrggbb_upper, "#FF0000", Color::new(1.0, 0.0, 0.0));
    test!(rgb_hex, "#f00", Color::new(1.0, 0.0, 0.0));
    test!(rrggbb_spaced, "  #ff0000  ", Color::new(1.0, 0.0, 0.0));
    test!(rrggbb_gray, "#808080", Color::from_rgb8(128, 128, 128));
    test!(rgb_hex_mixed, "#4a8", Color::new(4.0 / 15.0, 10.0 / 15.0, 8.0 / 15.0));

    test!(
        rgb_numeric,
        "rgb(254, 203, 231)",
        Color::from_rgb8(254, 203, 231)
    );

    test!(
        rgb_numeric_spaced,
        " rgb( 77 , 77 , 77 ) ",
        Color::from_rgb8(77, 77, 77)
    );

    test!(
        rgb_percentage,
        "rgb(50%, 50%, 50%)",
        Color::new(0.5, 0.5, 0.5)
    );

    test!(
        rgb_percentage_overflow,
        "rgb(140%, 0%, 130%)",
        Color::new(1.0, 0.0, 1.0)
    );

    test!(
        rgb_numeric_upper_case,
        "RGB(254, 203, 231)",
        Color::from_rgb8(254, 203, 231)
    );

    test!(
        rgb_mixed_forms,
        "rgb(0, 100%, 0)",
        Color::new(0.0, 1.0, 0.0)
    );

    test!(name_red, "red", Color::from_rgb8(255, 0, 0));
    test!(name_red_spaced, " red ", Color::from_rgb8(255, 0, 0));
    test!(name_red_upper_case, "RED", Color::from_rgb8(255, 0, 0));
    test!(name_red_mixed_case, "ReD", Color::from_rgb8(255, 0, 0));
    test!(name_grey, "grey", Color::from_rgb8(128, 128, 128));
    test!(name_gray, "gray", Color::from_rgb8(128, 128, 128));

    test!(
        name_cornflowerblue,
        "cornflowerblue",
        Color::from_rgb8(100, 149, 237)
    );

    macro_rules! test_err {
        ($name:ident, $text:expr) => {
            #[test]
            fn $name() {
                assert!(Color::from_str($text).is_err());
            }
        };
    }

    test_err!(not_a_color_1, "text");
    test_err!(not_a_color_2, "");
    test_err!(short_hex, "#12");
    test_err!(float_component, "rgb(1.5, 2, 3)");
    test_err!(no_comma, "rgb(0 100 0)");
    test_err!(unterminated_rgb, "rgb(0,100,0");

    #[test]
    fn cursor_unchanged_on_error() {
        let mut s = Stream::from("  zzz");
        assert!(s.parse_color().is_err());
        assert_eq!(s.pos(), 0);
    }

    #[test]
    fn consumes_keyword_only() {
        let mut s = Stream::from("red extra");
        assert_eq!(s.parse_color().unwrap(), Color::from_rgb8(255, 0, 0));
        assert_eq!(s.slice_tail(), " extra");
    }

    #[test]
    fn components_are_clamped() {
        let c = Color::new(-1.0, 2.0, 0.5);
        assert_eq!(c, Color::new(0.0, 1.0, 0.5));
    }
}
