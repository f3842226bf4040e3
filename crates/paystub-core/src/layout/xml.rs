//! Reader for `pdftohtml -xml` output.
//!
//! The converter writes one `<page number="N">` element per page, each
//! holding `<text top=".." left=".." ...>` elements. Text content may be
//! wrapped in `<b>`, `<i>` or `<a>` children; all of it is concatenated.

use std::collections::BTreeMap;
use std::path::Path;

use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};
use tracing::debug;

use super::{Document, Page, Result, TextBox};
use crate::error::LayoutError;

/// Parse a converted document from an XML file on disk.
pub fn read_document(path: &Path) -> crate::Result<Document> {
    let bytes = std::fs::read(path)?;
    let xml = String::from_utf8_lossy(&bytes);
    let document = parse_document(&xml)?;

    debug!(
        "Read {} pages from {}",
        document.page_count(),
        path.display()
    );

    Ok(document)
}

/// Parse a converted document from its XML text.
pub fn parse_document(xml: &str) -> Result<Document> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(false);

    let mut pages = BTreeMap::new();
    let mut page: Option<Page> = None;
    let mut pending: Option<TextBox> = None;

    loop {
        let event = reader.read_event().map_err(|e| LayoutError::Xml {
            position: reader.buffer_position() as u64,
            reason: e.to_string(),
        })?;

        match event {
            Event::Start(e) => match e.name().as_ref() {
                b"page" => page = Some(Page::new(number_attribute(&e)?)),
                b"text" => pending = Some(open_text_box(&e)?),
                _ => {}
            },
            Event::Empty(e) if e.name().as_ref() == b"page" => {
                let number = number_attribute(&e)?;
                pages.insert(number, Page::new(number));
            }
            Event::Text(t) => {
                if let Some(text_box) = pending.as_mut() {
                    let text = t.unescape().map_err(|e| LayoutError::Xml {
                        position: reader.buffer_position() as u64,
                        reason: e.to_string(),
                    })?;
                    text_box.value.push_str(&text);
                }
            }
            Event::CData(c) => {
                if let Some(text_box) = pending.as_mut() {
                    text_box.value.push_str(&String::from_utf8_lossy(&c));
                }
            }
            Event::End(e) => match e.name().as_ref() {
                b"text" => {
                    if let (Some(mut text_box), Some(page)) = (pending.take(), page.as_mut()) {
                        text_box.value = text_box.value.trim().to_string();
                        if !text_box.value.is_empty() {
                            page.boxes.push(text_box);
                        }
                    }
                }
                b"page" => {
                    if let Some(done) = page.take() {
                        pages.insert(done.number, done);
                    }
                }
                _ => {}
            },
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(Document { pages })
}

fn open_text_box(e: &BytesStart<'_>) -> Result<TextBox> {
    Ok(TextBox::new(
        parse_attribute(e, "top")?,
        parse_attribute(e, "left")?,
        "",
    ))
}

fn number_attribute(e: &BytesStart<'_>) -> Result<u32> {
    parse_attribute(e, "number")
}

fn parse_attribute<T: std::str::FromStr>(e: &BytesStart<'_>, name: &str) -> Result<T> {
    let element = String::from_utf8_lossy(e.name().as_ref()).into_owned();
    let invalid = |value: String| LayoutError::InvalidAttribute {
        attribute: name.to_string(),
        value,
    };

    let attribute = e
        .try_get_attribute(name)
        .map_err(|err| invalid(err.to_string()))?
        .ok_or_else(|| LayoutError::MissingAttribute {
            element,
            attribute: name.to_string(),
        })?;

    let value = attribute
        .unescape_value()
        .map_err(|err| invalid(err.to_string()))?;

    value.trim().parse().map_err(|_| invalid(value.to_string()))
}
