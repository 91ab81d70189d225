use std::str::FromStr;

use crate::{Error, Stream};

impl<'a> Stream<'a> {
    /// Parses a number from the stream.
    ///
    /// The grammar is: optional `-`, then an integer part and/or
    /// a fractional part, then an optional exponent.
    /// A leading `+` is not an SVG convention and is rejected.
    /// Non-finite results are an error.
    pub fn parse_number(&mut self) -> Result<f64, Error> {
        let mut s = *self;
        s.skip_spaces();

        let start = s.pos();
        match s.parse_number_impl(start) {
            Ok(n) => {
                *self = s;
                Ok(n)
            }
            Err(_) => Err(Error::InvalidNumber(s.calc_char_pos_at(start))),
        }
    }

    fn parse_number_impl(&mut self, start: usize) -> Result<f64, Error> {
        if self.is_curr_byte_eq(b'-') {
            self.advance(1);
        }

        let int_start = self.pos();
        self.skip_digits();
        let had_integer = self.pos() != int_start;

        let mut had_fraction = false;
        if self.is_curr_byte_eq(b'.') {
            self.advance(1);
            let frac_start = self.pos();
            self.skip_digits();
            had_fraction = self.pos() != frac_start;
        }

        // Must have a non-empty integer or fractional part.
        if !had_integer && !had_fraction {
            return Err(Error::InvalidNumber(0));
        }

        // An optional exponent. `1em`/`1ex` must stay a number plus a unit,
        // so the exponent is consumed only when digits follow it.
        if matches!(self.curr_byte(), Ok(b'e') | Ok(b'E')) {
            let mut s = *self;
            s.advance(1);
            if s.is_curr_byte_eq(b'-') {
                s.advance(1);
            }
            let exp_start = s.pos();
            s.skip_digits();
            if s.pos() != exp_start {
                *self = s;
            }
        }

        // Use the default f64 parser now.
        if let Ok(n) = f64::from_str(self.slice_back(start)) {
            // inf, nan, etc. are an error.
            if n.is_finite() {
                return Ok(n);
            }
        }

        Err(Error::InvalidNumber(0))
    }

    /// Parses a number from a list of numbers.
    pub fn parse_list_number(&mut self) -> Result<f64, Error> {
        if self.at_end() {
            return Err(Error::UnexpectedEndOfStream);
        }

        let mut s = *self;
        let n = s.parse_number()?;
        s.skip_spaces();
        s.parse_list_separator();
        *self = s;
        Ok(n)
    }
}

/// Representation of the [`<number>`] type.
///
/// [`<number>`]: https://www.w3.org/TR/SVG11/types.html#DataTypeNumber
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct Number(pub f64);

impl FromStr for Number {
    type Err = Error;

    fn from_str(text: &str) -> Result<Self, Error> {
        let mut s = Stream::from(text);
        let n = s.parse_number()?;
        s.skip_spaces();
        if !s.at_end() {
            return Err(Error::UnexpectedData(s.calc_char_pos()));
        }

        Ok(Number(n))
    }
}

/// A pull-based [`<list-of-numbers>`] parser.
///
/// # Examples
///
/// ```
/// use svgstream_types::NumberListParser;
///
/// let mut p = NumberListParser::from("10, 20 -50");
/// assert_eq!(p.next().unwrap().unwrap(), 10.0);
/// assert_eq!(p.next().unwrap().unwrap(), 20.0);
/// assert_eq!(p.next().unwrap().unwrap(), -50.0);
/// assert_eq!(p.next().is_none(), true);
/// ```
///
/// [`<list-of-numbers>`]: https://www.w3.org/TR/SVG11/types.html#DataTypeList
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct NumberListParser<'a>(Stream<'a>);

impl<'a> From<&'a str> for NumberListParser<'a> {
    #[inline]
    fn from(v: &'a str) -> Self {
        NumberListParser(Stream::from(v))
    }
}

impl<'a> Iterator for NumberListParser<'a> {
    type Item = Result<f64, Error>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.0.at_end() {
            None
        } else {
            let v = self.0.parse_list_number();
            if v.is_err() {
                self.0.jump_to_end();
            }

            Some(v)
        }
    }
}
