// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

/// Properties recognised inside a `<style>` rule block.
pub(crate) const SHEET_PROPERTIES: &[&str] = &["fill", "stop-color", "stroke", "stroke-width"];

/// Properties recognised inside an inline `style` attribute.
pub(crate) const INLINE_PROPERTIES: &[&str] = &["fill", "stop-color", "stroke"];

/// A pull-based parser of `prop:value;prop:value` declaration blocks.
///
/// Yields `(property, value)` pairs with surrounding whitespace trimmed.
/// Properties outside the supported set are silently skipped.
/// The final pair need not be `;`-terminated.
#[derive(Clone, Copy, Debug)]
pub struct StyleIterator<'a> {
    text: &'a str,
    supported: &'a [&'a str],
}

impl<'a> StyleIterator<'a> {
    /// Constructs an iterator with a supported-property filter.
    pub fn new(text: &'a str, supported: &'a [&'a str]) -> Self {
        StyleIterator { text, supported }
    }
}

impl<'a> Iterator for StyleIterator<'a> {
    type Item = (&'a str, &'a str);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            self.text = self.text.trim_start();
            if self.text.is_empty() {
                return None;
            }

            // A declaration without a colon terminates the block.
            let colon = self.text.find(':')?;
            let property = self.text[..colon].trim_end();
            self.text = &self.text[colon + 1..];

            let value = match self.text.find(';') {
                Some(semi) => {
                    let value = &self.text[..semi];
                    self.text = &self.text[semi + 1..];
                    value
                }
                None => {
                    let value = self.text;
                    self.text = "";
                    value
                }
            };

            if self.supported.contains(&property) {
                return Some((property, value.trim()));
            }
        }
    }
}

// The three-state scanner of a `<style>` rule set.
//
// OutsideContents is before a selector and after `}`,
// BeforeBody is between the selector and `{`,
// InBody accumulates the declaration block up to `}`.
#[derive(Clone, Copy, PartialEq, Debug)]
enum ParserState {
    OutsideContents,
    BeforeBody,
    InBody,
}

type Declarations = Vec<(String, String)>;

/// A class-keyed style sheet.
///
/// Maps a class name to its declarations, in document order.
/// Only `.class` selectors are supported.
#[derive(Clone, Default, Debug)]
pub struct StyleSheet {
    entries: Vec<(String, Declarations)>,
}

impl StyleSheet {
    /// Parses a style sheet.
    ///
    /// Returns `None` on a hard parse error: an unexpected byte outside
    /// rule contents or between a selector and its brace.
    /// An unterminated final rule is dropped silently.
    pub fn from_data(data: &[u8]) -> Option<StyleSheet> {
        let text = std::str::from_utf8(data).ok()?;

        let mut sheet = StyleSheet::default();
        let mut state = ParserState::OutsideContents;
        let mut selector = String::new();
        let mut body = String::new();

        let mut bytes = text.bytes().peekable();
        while let Some(c) = bytes.next() {
            match state {
                ParserState::OutsideContents => match c {
                    b'.' => {
                        while let Some(&next) = bytes.peek() {
                            if next.is_ascii_alphanumeric() || next == b'-' || next == b'_' {
                                selector.push(next as char);
                                bytes.next();
                            } else {
                                break;
                            }
                        }
                        state = ParserState::BeforeBody;
                    }
                    b' ' | b'\t' | b'\n' | b'\r' => {}
                    _ => return None,
                },
                ParserState::BeforeBody => match c {
                    b'{' => state = ParserState::InBody,
                    b' ' => {}
                    _ => return None,
                },
                ParserState::InBody => match c {
                    b'}' => {
                        let declarations = StyleIterator::new(&body, SHEET_PROPERTIES)
                            .map(|(p, v)| (p.to_string(), v.to_string()))
                            .collect();
                        sheet.entries.push((std::mem::take(&mut selector), declarations));
                        body.clear();
                        state = ParserState::OutsideContents;
                    }
                    // Spaces and newlines inside a block are dropped,
                    // the declarations never need them.
                    b' ' | b'\n' => {}
                    _ => body.push(c as char),
                },
            }
        }

        Some(sheet)
    }

    /// Returns the declarations recorded for a class, if any.
    pub(crate) fn get(&self, class: &str) -> Option<&[(String, String)]> {
        self.entries
            .iter()
            .find(|(name, _)| name == class)
            .map(|(_, declarations)| declarations.as_slice())
    }

    /// Merges `source` into `self`.
    ///
    /// Keys absent from `self` are inserted; for shared keys the source
    /// declarations are appended, so they win when applied in order.
    pub fn merge_from(&mut self, source: &StyleSheet) {
        for (name, declarations) in &source.entries {
            match self.entries.iter_mut().find(|(n, _)| n == name) {
                Some((_, existing)) => existing.extend(declarations.iter().cloned()),
                None => self.entries.push((name.clone(), declarations.clone())),
            }
        }
    }
}
