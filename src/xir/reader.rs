// Table schema compiler (TABLEC)
//
//  Copyright (C) 2014-2022 Ryan Specialty Group, LLC.
//
//  This file is part of TABLEC.
//
//  This program is free software: you can redistribute it and/or modify
//  it under the terms of the GNU General Public License as published by
//  the Free Software Foundation, either version 3 of the License, or
//  (at your option) any later version.
//
//  This program is distributed in the hope that it will be useful,
//  but WITHOUT ANY WARRANTY; without even the implied warranty of
//  MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
//  GNU General Public License for more details.
//
//  You should have received a copy of the GNU General Public License
//  along with this program.  If not, see <http://www.gnu.org/licenses/>.

//! Parse XML source into a XIR [`Document`].
//!
//! This uses [`quick_xml`] as the parser.

use super::{Attr, Document, Element, Error};
use crate::span::{Context, Span};
use memchr::memchr_iter;
use quick_xml::{
    events::{BytesStart, Event as QuickXmlEvent},
    Reader,
};
use std::result;

pub type Result<T> = result::Result<T, Error>;

/// Parse `src` into a [`Document`],
///   attributing spans to `ctx`.
///
/// Parsing stops at the first error.
pub fn parse_document(src: &[u8], ctx: Context) -> Result<Document> {
    XmlTreeReader::new(src, ctx).read()
}

/// Tracks line numbers while reading forward through a source.
///
/// Byte positions requested of [`LineCounter::line_at`] must not decrease,
///   allowing each byte of the source to be scanned for newlines only
///   once.
struct LineCounter<'s> {
    src: &'s [u8],
    pos: usize,
    line: u32,
}

impl<'s> LineCounter<'s> {
    fn new(src: &'s [u8]) -> Self {
        Self { src, pos: 0, line: 1 }
    }

    /// 1-based line number of the byte at `pos`.
    fn line_at(&mut self, pos: usize) -> u32 {
        let pos = pos.min(self.src.len());

        if pos > self.pos {
            let seen = memchr_iter(b'\n', &self.src[self.pos..pos]).count();

            self.line += seen as u32;
            self.pos = pos;
        }

        self.line
    }
}

/// Builds a [`Document`] from [`quick_xml`] events.
///
/// Open elements are held on a stack;
///   an element is attached to its parent
///   (or to the document)
///   once it is closed.
struct XmlTreeReader<'s> {
    /// Inner parser.
    reader: Reader<&'s [u8]>,

    /// Parsing context for reader.
    ctx: Context,

    /// Buffer for [`quick_xml::Reader`].
    readbuf: Vec<u8>,

    lines: LineCounter<'s>,

    /// Elements whose closing tag has not yet been read.
    stack: Vec<Element>,

    /// Completed top-level elements.
    elements: Vec<Element>,
}

impl<'s> XmlTreeReader<'s> {
    fn new(src: &'s [u8], ctx: Context) -> Self {
        let mut reader = Reader::from_reader(src);

        // A schema must be well-formed;
        //   mismatched tags are an error.
        reader.check_end_names(true);

        Self {
            reader,
            ctx,
            readbuf: Vec::new(),
            lines: LineCounter::new(src),
            stack: Vec::new(),
            elements: Vec::new(),
        }
    }

    fn read(mut self) -> Result<Document> {
        loop {
            self.readbuf.clear();

            let ev = match self.reader.read_event_into(&mut self.readbuf) {
                Ok(ev) => ev.into_owned(),
                Err(inner) => {
                    let pos = self.reader.buffer_position();
                    let span = self.ctx.span(self.lines.line_at(pos));

                    return Err(Error::QuickXmlError(inner.into(), span));
                }
            };

            // Position immediately following the event.
            let end = self.reader.buffer_position();

            match ev {
                QuickXmlEvent::Start(ele) => {
                    let open = self.open_element(&ele, end)?;
                    self.stack.push(open);
                }

                QuickXmlEvent::Empty(ele) => {
                    let open = self.open_element(&ele, end)?;
                    self.attach(open);
                }

                // `check_end_names` guarantees that this closes the
                //   element atop of the stack.
                QuickXmlEvent::End(_) => {
                    if let Some(closed) = self.stack.pop() {
                        self.attach(closed);
                    }
                }

                QuickXmlEvent::Eof => break,

                // Nothing else is meaningful in a schema.
                QuickXmlEvent::Text(_)
                | QuickXmlEvent::CData(_)
                | QuickXmlEvent::Comment(_)
                | QuickXmlEvent::Decl(_)
                | QuickXmlEvent::PI(_)
                | QuickXmlEvent::DocType(_) => (),
            }
        }

        match self.stack.pop() {
            Some(unclosed) => Err(Error::UnclosedElement(
                unclosed.name().to_string(),
                unclosed.span().clone(),
            )),
            None => Ok(Document::new(self.ctx, self.elements)),
        }
    }

    /// Produce an [`Element`] for an opening (or self-closing) tag whose
    ///   closing `>` ends immediately before `end`.
    ///
    /// The tag may span multiple lines if its attributes do;
    ///   its span is the line on which it begins.
    fn open_element(&mut self, ele: &BytesStart, end: usize) -> Result<Element> {
        let end_line = self.lines.line_at(end);
        let tag_lines = memchr_iter(b'\n', ele).count() as u32;
        let span = self.ctx.span(end_line.saturating_sub(tag_lines));

        let name = Self::utf8(ele.name().as_ref(), &span)?;
        let mut open = Element::new(name, span.clone());

        for attr in ele.attributes() {
            let attr = attr
                .map_err(|e| Error::QuickXmlError(e.into(), span.clone()))?;

            let name = Self::utf8(attr.key.as_ref(), &span)?;
            let value = attr
                .unescape_value()
                .map_err(|e| Error::QuickXmlError(e.into(), span.clone()))?;

            open.push_attr(Attr::new(name, value.into_owned()));
        }

        Ok(open)
    }

    fn attach(&mut self, ele: Element) {
        match self.stack.last_mut() {
            Some(parent) => parent.push_child(ele),
            None => self.elements.push(ele),
        }
    }

    fn utf8(bytes: &[u8], span: &Span) -> Result<String> {
        std::str::from_utf8(bytes)
            .map(str::to_string)
            .map_err(|e| Error::InvalidUtf8(e, bytes.to_vec(), span.clone()))
    }
}

#[cfg(test)]
mod test;
