// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

/*!
`svgstream` is a streaming SVG rendering engine.

The engine walks an SVG document in document order, maintains a stack of
graphics states, and emits canonical drawing operations (path construction,
fills and strokes, gradient paints, transforms, clipping) to a 2D backend
behind the [`Canvas`] trait. A raster backend on [`tiny_skia`] is provided.

Only a pragmatic subset of static SVG is interpreted: basic shapes, paths,
groups, linear and radial gradients, inline styles and `.class` style
sheets. Text, filters, masks, patterns, references and animation are out
of scope.

## Example

```no_run
use svgstream::{Document, Size};

let data = std::fs::read("image.svg").unwrap();
let document = Document::from_data(&data).unwrap();
let pixmap = document.render(Size::new(256.0, 256.0), None).unwrap();
pixmap.save_png("image.png").unwrap();
```
*/

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![allow(clippy::collapsible_else_if)]
#![allow(clippy::field_reassign_with_default)]
#![allow(clippy::too_many_arguments)]
#![allow(clippy::uninlined_format_args)]

pub use tiny_skia;

pub use svgstream_types as types;

pub mod geom;

mod backend;
mod canvas;
mod document;
mod error;
mod gradient;
mod renderer;
mod style;

pub use crate::backend::PixmapCanvas;
pub use crate::canvas::{Canvas, FillRule, GradientStop, LineCap, LineJoin};
pub use crate::document::Document;
pub use crate::error::Error;
pub use crate::geom::{Point, Rect, Size};
pub use crate::style::{StyleIterator, StyleSheet};
