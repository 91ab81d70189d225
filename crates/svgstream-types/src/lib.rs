/*!
*svgstream-types* is a collection of parsers for SVG attribute grammars.

It covers the value-level types an SVG interpreter needs:

- [`<number>`](https://www.w3.org/TR/SVG11/types.html#DataTypeNumber)
- [`<length>`](https://www.w3.org/TR/SVG11/types.html#DataTypeLength)
- [`<color>`](https://www.w3.org/TR/SVG11/types.html#DataTypeColor)
- [`<FuncIRI>`](https://www.w3.org/TR/SVG11/types.html#DataTypeFuncIRI)
- [`<transform-list>`](https://www.w3.org/TR/SVG11/types.html#DataTypeTransformList)
- [path data](https://www.w3.org/TR/SVG11/paths.html#PathData) and
  [`points`](https://www.w3.org/TR/SVG11/shapes.html#PointsBNF)
- [`viewBox`](https://www.w3.org/TR/SVG11/coords.html#ViewBoxAttribute)
- [`preserveAspectRatio`](https://www.w3.org/TR/SVG11/coords.html#PreserveAspectRatioAttribute)

## Conventions

Two kinds of entry points are provided:

- *consumers* are [`Stream`] methods; on success they advance past the token,
  on failure they return an error and leave the stream position unchanged;
- *parsers* are `FromStr` impls (and the pull iterators); they must consume
  the whole input, trailing data is an error.

## Limitations

- Accepts only [normalized](https://www.w3.org/TR/REC-xml/#AVNormalize)
  values, e.g. an input text should not contain `&#x20;` or `&data;`.
- Keywords must be lowercase, except color names and `rgb(`.

## Safety

- The library should not panic. Any panic is considered a critical bug.
- The library forbids unsafe code.
*/

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(missing_debug_implementations)]
#![deny(missing_copy_implementations)]

mod aspect_ratio;
mod color;
#[rustfmt::skip] mod colors;
mod error;
mod funciri;
mod length;
mod number;
mod path;
mod stream;
mod transform;
mod viewbox;

use crate::stream::ByteExt;

pub use crate::aspect_ratio::*;
pub use crate::color::*;
pub use crate::error::*;
pub use crate::funciri::*;
pub use crate::length::*;
pub use crate::number::*;
pub use crate::path::*;
pub use crate::stream::Stream;
pub use crate::transform::*;
pub use crate::viewbox::*;
