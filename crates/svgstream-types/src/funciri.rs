use crate::{Error, Stream};

/// Representation of the [`<FuncIRI>`] type.
///
/// The inner content of `url(...)` is returned verbatim,
/// typically a `#id` local fragment.
///
/// [`<FuncIRI>`]: https://www.w3.org/TR/SVG11/types.html#DataTypeFuncIRI
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct FuncIRI<'a>(pub &'a str);

impl<'a> FuncIRI<'a> {
    /// Parses a `FuncIRI` from a string.
    ///
    /// We can't use the `FromStr` trait because it requires
    /// an owned value as a return type.
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(text: &'a str) -> Result<Self, Error> {
        let mut s = Stream::from(text);
        let link = s.parse_func_iri()?;
        s.skip_spaces();
        if !s.at_end() {
            return Err(Error::UnexpectedData(s.calc_char_pos()));
        }

        Ok(Self(link))
    }
}

impl<'a> Stream<'a> {
    /// Parses a `url(...)` token and returns its content verbatim.
    pub fn parse_func_iri(&mut self) -> Result<&'a str, Error> {
        let mut s = *self;
        s.skip_spaces();

        if !s.starts_with(b"url(") {
            return Err(Error::InvalidValue);
        }
        s.advance(4);

        let link = s.consume_bytes(|_, c| c != b')');
        s.consume_byte(b')')?;

        *self = s;
        Ok(link)
    }
}

#[rustfmt::skip]
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_func_iri_1() {
        assert_eq!(FuncIRI::from_str("url(#id)").unwrap(), FuncIRI("#id"));
    }

    #[test]
    fn parse_func_iri_2() {
        assert_eq!(FuncIRI::from_str("url(#1)").unwrap(), FuncIRI("#1"));
    }

    #[test]
    fn parse_func_iri_3() {
        // the content is verbatim
        assert_eq!(FuncIRI::from_str("  url( #id )  ").unwrap(), FuncIRI(" #id "));
    }

    #[test]
    fn parse_func_iri_4() {
        // Trailing data is ok for the Stream, but not for FuncIRI.
        assert_eq!(Stream::from("url(#id) qwe").parse_func_iri().unwrap(), "#id");
        assert!(FuncIRI::from_str("url(#id) qwe").is_err());
    }

    #[test]
    fn parse_err_func_iri_1() {
        assert!(FuncIRI::from_str("url ( #1 )").is_err());
    }

    #[test]
    fn parse_err_func_iri_2() {
        let mut s = Stream::from("url(#id");
        assert!(s.parse_func_iri().is_err());
        assert_eq!(s.pos(), 0);
    }
}
