// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use std::str::FromStr;

use svgstream_types::{Length, ViewBox};

use crate::backend::PixmapCanvas;
use crate::canvas::Canvas;
use crate::error::Error;
use crate::geom::{Rect, Size};
use crate::renderer::Renderer;
use crate::style::StyleSheet;

// An arbitrary but reasonable limit, the same idea as in usvg:
// huge documents are almost always malicious.
const ELEMENTS_LIMIT: usize = 1_000_000;

/// An SVG document, ready to be rendered any number of times.
///
/// Construction parses the XML and extracts the outermost `svg` element's
/// intrinsic size and view box; everything else is interpreted during
/// [`render`](Document::render).
#[derive(Clone, Debug)]
pub struct Document {
    text: String,
    size: Size,
    view_box: Option<Rect>,
}

impl Document {
    /// Creates a document from SVG data.
    ///
    /// # Errors
    ///
    /// - when the data is not UTF-8;
    /// - when the XML is malformed;
    /// - when the outermost `svg` carries an unparsable width or height.
    pub fn from_data(data: &[u8]) -> Result<Document, Error> {
        let text = std::str::from_utf8(data).map_err(|_| Error::NotAnUtf8Str)?;
        let doc = parse_xml(text)?;

        // The intrinsic size defaults to 100 per the SVG spec; only the numeric
        // value is kept, length units are not resolved.
        let mut width = Length::new_number(100.0);
        let mut height = Length::new_number(100.0);
        let mut view_box = None;

        if let Some(svg) = doc
            .descendants()
            .find(|node| node.is_element() && node.tag_name().name() == "svg")
        {
            if let Some(value) = svg.attribute("width") {
                width = Length::from_str(value.trim()).map_err(|_| Error::InvalidSize)?;
            }

            if let Some(value) = svg.attribute("height") {
                height = Length::from_str(value.trim()).map_err(|_| Error::InvalidSize)?;
            }

            if let Some(value) = svg.attribute("viewBox") {
                if let Ok(vb) = ViewBox::from_str(value.trim()) {
                    view_box = Some(Rect::new(vb.x, vb.y, vb.w, vb.h));
                }
            }
        }

        Ok(Document {
            text: text.to_string(),
            size: Size::new(width.number, height.number),
            view_box,
        })
    }

    /// Returns the document's intrinsic size.
    ///
    /// Only the numeric values of the `width`/`height` attributes;
    /// units are discarded and default to 100 when absent.
    pub fn size(&self) -> Size {
        self.size
    }

    /// Returns the `viewBox` of the outermost `svg` element, if any.
    pub fn view_box(&self) -> Option<Rect> {
        self.view_box
    }

    /// Renders the document onto a fresh pixmap of the given size.
    ///
    /// An optional style sheet is merged in before the document's own
    /// `<style>` elements are seen, so the document wins on conflicts.
    ///
    /// # Errors
    ///
    /// - when a canvas dimension is smaller than one pixel;
    /// - when the XML is malformed.
    pub fn render(
        &self,
        canvas_size: Size,
        style_sheet: Option<&StyleSheet>,
    ) -> Result<tiny_skia::Pixmap, Error> {
        let width = canvas_size.width.floor();
        let height = canvas_size.height.floor();
        if width < 1.0 || height < 1.0 {
            return Err(Error::InvalidSize);
        }

        let mut canvas =
            PixmapCanvas::new(width as u32, height as u32).ok_or(Error::InvalidSize)?;
        self.render_to_canvas(&mut canvas, Size::new(width, height), style_sheet)?;

        Ok(canvas.into_pixmap())
    }

    /// Renders the document through an arbitrary [`Canvas`] backend.
    ///
    /// The canvas is assumed to cover `canvas_size`.
    pub fn render_to_canvas<C: Canvas>(
        &self,
        canvas: &mut C,
        canvas_size: Size,
        style_sheet: Option<&StyleSheet>,
    ) -> Result<(), Error> {
        let doc = parse_xml(&self.text)?;

        let mut renderer = Renderer::new(canvas, canvas_size);
        if let Some(sheet) = style_sheet {
            renderer.merge_style_sheet(sheet);
        }
        renderer.render(&doc);

        Ok(())
    }
}

fn parse_xml(text: &str) -> Result<roxmltree::Document, Error> {
    let options = roxmltree::ParsingOptions {
        allow_dtd: true,
        ..roxmltree::ParsingOptions::default()
    };

    let doc = roxmltree::Document::parse_with_options(text, options)?;
    if doc.descendants().count() > ELEMENTS_LIMIT {
        return Err(Error::ElementsLimitReached);
    }

    Ok(doc)
}

#[rustfmt::skip]
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn size_detection_1() {
        let doc = Document::from_data(b"<svg width='30' height='40'/>").unwrap();
        assert_eq!(doc.size(), Size::new(30.0, 40.0));
    }

    #[test]
    fn size_detection_2() {
        // units are discarded, only values are kept
        let doc = Document::from_data(b"<svg width='30mm' height='50%'/>").unwrap();
        assert_eq!(doc.size(), Size::new(30.0, 50.0));
    }

    #[test]
    fn size_detection_3() {
        let doc = Document::from_data(b"<svg viewBox='0 0 10 20'/>").unwrap();
        assert_eq!(doc.size(), Size::new(100.0, 100.0));
        assert_eq!(doc.view_box(), Some(Rect::new(0.0, 0.0, 10.0, 20.0)));
    }

    #[test]
    fn invalid_size_attribute() {
        assert!(Document::from_data(b"<svg width='abc' height='40'/>").is_err());
    }

    #[test]
    fn malformed_xml() {
        assert!(Document::from_data(b"<svg><rect</svg>").is_err());
    }

    #[test]
    fn not_utf8() {
        assert!(matches!(
            Document::from_data(&[0xff, 0xfe, 0x00]),
            Err(Error::NotAnUtf8Str)
        ));
    }

    #[test]
    fn tiny_canvas_rejected() {
        let doc = Document::from_data(b"<svg width='10' height='10'/>").unwrap();
        assert!(doc.render(Size::new(0.5, 10.0), None).is_err());
    }
}
