//! Streaming element cursor over a report document.
//!
//! Wraps a `quick_xml` reader and exposes just what the report grammar
//! needs: walk child elements of a parent, skip an element, collect an
//! element's text. Every element carries the 1-based line of its opening
//! `<` so schema errors can point at the offending line.
//!
//! Callers must fully consume an element returned by [`XmlCursor::next_child`]
//! (by iterating its children, [`XmlCursor::skip`] or [`XmlCursor::text`])
//! before asking the parent for its next child.

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use crate::errors::ReportParseError;

/// An opened element with decoded attributes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Element {
    pub name: String,
    pub line: usize,
    attributes: Vec<(String, String)>,
    empty: bool,
}

impl Element {
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }
}

enum Step {
    Open(Element),
    Close,
    Text(String),
    Eof,
}

/// Incremental byte offset to line number conversion.
///
/// Offsets are queried in increasing order, so each byte is scanned once.
struct LineCounter<'a> {
    source: &'a [u8],
    offset: usize,
    line: usize,
}

impl<'a> LineCounter<'a> {
    fn new(source: &'a str) -> Self {
        Self {
            source: source.as_bytes(),
            offset: 0,
            line: 1,
        }
    }

    fn line_at(&mut self, offset: usize) -> usize {
        let offset = offset.min(self.source.len());
        if offset < self.offset {
            self.offset = 0;
            self.line = 1;
        }
        self.line += self.source[self.offset..offset]
            .iter()
            .filter(|&&b| b == b'\n')
            .count();
        self.offset = offset;
        self.line
    }
}

pub(crate) struct XmlCursor<'a> {
    reader: Reader<&'a [u8]>,
    lines: LineCounter<'a>,
}

impl<'a> XmlCursor<'a> {
    pub fn new(source: &'a str) -> Self {
        Self {
            reader: Reader::from_str(source),
            lines: LineCounter::new(source),
        }
    }

    /// Advance to the document's root element.
    pub fn root(&mut self) -> Result<Element, ReportParseError> {
        loop {
            match self.step()? {
                Step::Open(element) => return Ok(element),
                Step::Text(_) => continue,
                Step::Close => {
                    let line = self.current_line();
                    return Err(ReportParseError::stream(
                        "Unexpected closing tag before the root element",
                        Some(line),
                    ));
                }
                Step::Eof => {
                    return Err(ReportParseError::stream(
                        "Document has no root element",
                        None,
                    ))
                }
            }
        }
    }

    /// Next child element of `parent`, or `None` once `parent` closes.
    pub fn next_child(&mut self, parent: &Element) -> Result<Option<Element>, ReportParseError> {
        if parent.empty {
            return Ok(None);
        }
        loop {
            match self.step()? {
                Step::Open(element) => return Ok(Some(element)),
                Step::Close => return Ok(None),
                Step::Text(_) => continue,
                Step::Eof => return Err(self.unclosed(parent)),
            }
        }
    }

    /// Read past the closed root element; only whitespace, comments and
    /// processing instructions may follow it.
    pub fn finish(&mut self) -> Result<(), ReportParseError> {
        loop {
            let line = self.current_line();
            match self.step()? {
                Step::Eof => return Ok(()),
                Step::Text(text) if text.trim().is_empty() => continue,
                Step::Open(element) => {
                    return Err(ReportParseError::stream(
                        format!("Unexpected element <{}> after the root element", element.name),
                        Some(element.line),
                    ))
                }
                Step::Close | Step::Text(_) => {
                    return Err(ReportParseError::stream(
                        "Unexpected content after the root element",
                        Some(line),
                    ))
                }
            }
        }
    }

    /// Consume `element` and everything nested in it.
    pub fn skip(&mut self, element: &Element) -> Result<(), ReportParseError> {
        self.consume(element, |_| {})
    }

    /// Consume `element`, returning its concatenated text content.
    pub fn text(&mut self, element: &Element) -> Result<String, ReportParseError> {
        let mut text = String::new();
        self.consume(element, |chunk| text.push_str(chunk))?;
        Ok(text)
    }

    fn consume<F>(&mut self, element: &Element, mut on_text: F) -> Result<(), ReportParseError>
    where
        F: FnMut(&str),
    {
        if element.empty {
            return Ok(());
        }
        let mut depth = 1usize;
        while depth > 0 {
            match self.step()? {
                Step::Open(nested) => {
                    if !nested.empty {
                        depth += 1;
                    }
                }
                Step::Close => depth -= 1,
                Step::Text(chunk) => on_text(&chunk),
                Step::Eof => return Err(self.unclosed(element)),
            }
        }
        Ok(())
    }

    fn step(&mut self) -> Result<Step, ReportParseError> {
        loop {
            let start = self.reader.buffer_position() as usize;
            let event = self
                .reader
                .read_event()
                .map_err(|e| self.stream_error(e))?;

            let step = match event {
                Event::Start(e) => Step::Open(self.element(&e, start, false)?),
                Event::Empty(e) => Step::Open(self.element(&e, start, true)?),
                Event::End(_) => Step::Close,
                Event::Text(t) => {
                    let text = t.unescape().map_err(|e| self.stream_error(e))?;
                    Step::Text(text.into_owned())
                }
                Event::CData(t) => {
                    Step::Text(String::from_utf8_lossy(&t.into_inner()).into_owned())
                }
                Event::Eof => Step::Eof,
                Event::Comment(_) | Event::Decl(_) | Event::PI(_) | Event::DocType(_) => {
                    continue
                }
            };
            return Ok(step);
        }
    }

    fn element(
        &mut self,
        start: &BytesStart<'_>,
        offset: usize,
        empty: bool,
    ) -> Result<Element, ReportParseError> {
        let line = self.lines.line_at(offset);
        let name = String::from_utf8_lossy(start.name().as_ref()).into_owned();

        let mut attributes = Vec::new();
        for attribute in start.attributes() {
            let attribute = attribute.map_err(|e| {
                ReportParseError::stream(format!("Invalid attribute in <{}>: {}", name, e), Some(line))
            })?;
            let key = String::from_utf8_lossy(attribute.key.as_ref()).into_owned();
            let value = attribute.unescape_value().map_err(|e| {
                ReportParseError::stream(
                    format!("Invalid value for attribute \"{}\": {}", key, e),
                    Some(line),
                )
            })?;
            attributes.push((key, value.into_owned()));
        }

        Ok(Element {
            name,
            line,
            attributes,
            empty,
        })
    }

    fn current_line(&mut self) -> usize {
        let offset = self.reader.buffer_position() as usize;
        self.lines.line_at(offset)
    }

    fn stream_error(&mut self, error: quick_xml::Error) -> ReportParseError {
        let offset = self.reader.error_position() as usize;
        let line = self.lines.line_at(offset);
        ReportParseError::stream(error.to_string(), Some(line))
    }

    fn unclosed(&mut self, element: &Element) -> ReportParseError {
        let line = self.current_line();
        ReportParseError::stream(
            format!(
                "Unexpected end of document: <{}> opened at line {} is never closed",
                element.name, element.line
            ),
            Some(line),
        )
    }
}
