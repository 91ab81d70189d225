use crate::{Error, Stream};

/// Representation of the [`viewBox`] attribute.
///
/// [`viewBox`]: https://www.w3.org/TR/SVG11/coords.html#ViewBoxAttribute
#[derive(Clone, Copy, PartialEq, Debug)]
#[allow(missing_docs)]
pub struct ViewBox {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
}

impl std::str::FromStr for ViewBox {
    type Err = Error;

    fn from_str(text: &str) -> Result<Self, Error> {
        let mut s = Stream::from(text);

        let x = s.parse_list_number()?;
        let y = s.parse_list_number()?;
        let w = s.parse_list_number()?;
        let h = s.parse_list_number()?;

        s.skip_spaces();
        if !s.at_end() {
            return Err(Error::UnexpectedData(s.calc_char_pos()));
        }

        if w <= 0.0 || h <= 0.0 {
            return Err(Error::InvalidValue);
        }

        Ok(ViewBox { x, y, w, h })
    }
}

#[rustfmt::skip]
#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn parse_1() {
        assert_eq!(ViewBox::from_str("-20 30 100 500").unwrap(),
                   ViewBox { x: -20.0, y: 30.0, w: 100.0, h: 500.0 });
    }

    #[test]
    fn parse_2() {
        assert_eq!(ViewBox::from_str("-20, 30, 100, 500").unwrap(),
                   ViewBox { x: -20.0, y: 30.0, w: 100.0, h: 500.0 });
    }

    macro_rules! test_err {
        ($name:ident, $text:expr) => (
            #[test]
            fn $name() {
                assert!(ViewBox::from_str($text).is_err());
            }
        )
    }

    test_err!(parse_err_1, "qwe");
    test_err!(parse_err_2, "10 20 30");
    test_err!(parse_err_3, "10 20 30 40 50");
    test_err!(parse_err_4, "10 20 0 40");
    test_err!(parse_err_5, "10 20 30 -40");
}
