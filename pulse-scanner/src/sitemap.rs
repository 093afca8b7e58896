//! Sitemap data model and XML decoding.
//!
//! Product sitemaps look like:
//! ```xml
//! <urlset xmlns:image="http://www.google.com/schemas/sitemap-image/1.1">
//!   <url>
//!     <loc>https://shop.example/products/cap</loc>
//!     <lastmod>2024-01-01T00:00:00-05:00</lastmod>
//!     <changefreq>daily</changefreq>
//!     <image:image>
//!       <image:loc>https://cdn.example/cap.jpg</image:loc>
//!       <image:title>Cap</image:title>
//!       <image:caption>Cap</image:caption>
//!     </image:image>
//!   </url>
//! </urlset>
//! ```
//! Elements are matched on their local name, so the `image:` prefix is optional.

use crate::error::{Result, ScanError};
use quick_xml::events::Event;
use quick_xml::Reader;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SitemapDocument {
    /// `<url>` elements in document order
    pub entries: Vec<UrlEntry>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UrlEntry {
    pub location: String,
    pub last_modified: String,
    pub change_frequency: String,
    pub image: ImageEntry,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageEntry {
    pub location: String,
    pub title: String,
    pub caption: String,
}

/// How malformed XML is treated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DecodePolicy {
    /// Keep every `<url>` completed before the error and log a warning
    #[default]
    Lenient,
    /// Any XML error fails the decode
    Strict,
}

/// Decode sitemap bytes, applying `policy` to malformed input.
pub fn decode_sitemap(bytes: &[u8], policy: DecodePolicy) -> Result<SitemapDocument> {
    let (document, error) = decode_partial(bytes);
    match (error, policy) {
        (None, _) => Ok(document),
        (Some(e), DecodePolicy::Strict) => Err(e),
        (Some(e), DecodePolicy::Lenient) => {
            warn!(
                "Sitemap XML is malformed ({}), continuing with {} decoded entries",
                e,
                document.entries.len()
            );
            Ok(document)
        }
    }
}

/// Decode as much of the document as possible.
///
/// Returns the entries whose `</url>` was reached before any error, plus the
/// error itself. A `<url>` left open by the error is dropped.
pub fn decode_partial(bytes: &[u8]) -> (SitemapDocument, Option<ScanError>) {
    // Text and CDATA pieces of one field are joined first and trimmed when the field closes
    let mut reader = Reader::from_reader(bytes);

    let mut document = SitemapDocument::default();
    // Local names of the currently open elements, root first
    let mut path: Vec<Vec<u8>> = Vec::new();
    let mut current: Option<UrlEntry> = None;
    let mut buf = Vec::new();

    let error = loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) => {
                let name = e.local_name().as_ref().to_vec();
                if path.len() == 1 && name.as_slice() == b"url" {
                    current = Some(UrlEntry::default());
                }
                path.push(name);
                if let Some(slot) = field_slot(&path, current.as_mut()) {
                    slot.clear();
                }
            }
            Ok(Event::Empty(ref e)) => {
                let name = e.local_name().as_ref().to_vec();
                if path.len() == 1 && name.as_slice() == b"url" {
                    document.entries.push(UrlEntry::default());
                } else {
                    path.push(name);
                    if let Some(slot) = field_slot(&path, current.as_mut()) {
                        slot.clear();
                    }
                    path.pop();
                    if path.is_empty() {
                        break None;
                    }
                }
            }
            Ok(Event::End(_)) => {
                if let Some(slot) = field_slot(&path, current.as_mut()) {
                    let trimmed = slot.trim();
                    if trimmed.len() != slot.len() {
                        *slot = trimmed.to_string();
                    }
                }
                let closed = path.pop();
                if path.len() == 1 && closed.as_deref() == Some(b"url".as_slice()) {
                    if let Some(entry) = current.take() {
                        document.entries.push(entry);
                    }
                }
                // Anything after the root element is ignored
                if path.is_empty() {
                    break None;
                }
            }
            Ok(Event::Text(ref text)) => match text.unescape() {
                Ok(text) => {
                    if let Some(slot) = field_slot(&path, current.as_mut()) {
                        slot.push_str(&text);
                    }
                }
                Err(e) => break Some(ScanError::ParseError(e.to_string())),
            },
            Ok(Event::CData(cdata)) => {
                let raw = cdata.into_inner();
                if let Some(slot) = field_slot(&path, current.as_mut()) {
                    slot.push_str(&String::from_utf8_lossy(&raw));
                }
            }
            Ok(Event::Eof) => break None,
            Err(e) => break Some(ScanError::from(e)),
            _ => {}
        }
        buf.clear();
    };

    let error = error.or_else(|| {
        path.last().map(|open| {
            ScanError::ParseError(format!(
                "unexpected end of document inside <{}>",
                String::from_utf8_lossy(open)
            ))
        })
    });

    debug!("Decoded {} sitemap entries", document.entries.len());
    (document, error)
}

/// The `UrlEntry` field written by text at `path`, if any.
fn field_slot<'a>(path: &[Vec<u8>], entry: Option<&'a mut UrlEntry>) -> Option<&'a mut String> {
    let entry = entry?;
    match path {
        [_, url, field] if url.as_slice() == b"url" => match field.as_slice() {
            b"loc" => Some(&mut entry.location),
            b"lastmod" => Some(&mut entry.last_modified),
            b"changefreq" => Some(&mut entry.change_frequency),
            _ => None,
        },
        [_, url, image, field] if url.as_slice() == b"url" && image.as_slice() == b"image" => {
            match field.as_slice() {
                b"loc" => Some(&mut entry.image.location),
                b"title" => Some(&mut entry.image.title),
                b"caption" => Some(&mut entry.image.caption),
                _ => None,
            }
        }
        _ => None,
    }
}
