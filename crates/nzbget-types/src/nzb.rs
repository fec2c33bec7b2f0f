//! NZB document metadata.
//!
//! Only the parts needed to submit a document are read: the `<head>` metadata (for the job name)
//! and enough of the body to report its size. Segment payloads are never inspected.

use quick_xml::{
    Decoder, Reader,
    events::{BytesStart, Event},
};

use crate::NzbGetError;

/// Metadata read from an NZB document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NzbMetadata {
    /// Value of `<meta type="name">`, if present and non-empty.
    pub name: Option<String>,
    /// All `<meta>` entries of the head, in document order.
    pub meta: Vec<(String, String)>,
    /// Number of `<file>` entries.
    pub files: usize,
    /// Number of `<segment>` entries across all files.
    pub segments: usize,
    /// Sum of the declared segment sizes.
    pub total_bytes: u64,
}

/// Parse an NZB document.
///
/// Text is decoded with the encoding the XML declaration names, so Latin-1 and other legacy
/// documents are read as they are. Fails when the content is not well-formed XML, is truncated,
/// or its root element is not `nzb`.
pub fn parse_nzb(content: &[u8]) -> Result<NzbMetadata, NzbGetError> {
    let mut reader = Reader::from_reader(content);
    reader.config_mut().trim_text(true);

    let mut scan = Scan::default();
    let mut buf = Vec::new();
    loop {
        let event = match reader.read_event_into(&mut buf) {
            Ok(event) => event,
            Err(e) => {
                return Err(invalid(format!(
                    "malformed XML at position {}: {e}",
                    reader.error_position()
                )));
            }
        };
        let decoder = reader.decoder();

        match event {
            Event::Start(e) => {
                scan.open(&e, decoder)?;
                scan.depth += 1;
            }
            Event::Empty(e) => {
                scan.open(&e, decoder)?;
                scan.close(e.local_name().as_ref());
            }
            Event::End(e) => {
                scan.depth = scan.depth.saturating_sub(1);
                scan.close(e.local_name().as_ref());
            }
            Event::Text(t) => {
                if scan.meta_type.is_some() {
                    let text = t.unescape().map_err(|e| invalid(e.to_string()))?;
                    scan.meta_text.push_str(&text);
                }
            }
            Event::CData(c) => {
                if scan.meta_type.is_some() {
                    let text = decoder.decode(&c).map_err(|e| invalid(e.to_string()))?;
                    scan.meta_text.push_str(&text);
                }
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    if !scan.saw_root {
        return Err(invalid("document has no root element"));
    }
    if scan.depth != 0 {
        return Err(invalid("document is truncated"));
    }

    Ok(scan.metadata)
}

fn invalid(message: impl Into<String>) -> NzbGetError {
    NzbGetError::InvalidNzb(message.into())
}

#[derive(Default)]
struct Scan {
    metadata: NzbMetadata,
    saw_root: bool,
    depth: usize,
    in_head: bool,
    meta_type: Option<String>,
    meta_text: String,
}

impl Scan {
    fn open(&mut self, e: &BytesStart<'_>, decoder: Decoder) -> Result<(), NzbGetError> {
        let name = e.local_name();
        if !self.saw_root {
            if name.as_ref() != b"nzb" {
                return Err(invalid(format!(
                    "root element is <{}>, expected <nzb>",
                    String::from_utf8_lossy(name.as_ref())
                )));
            }
            self.saw_root = true;
            return Ok(());
        }

        match name.as_ref() {
            b"head" => self.in_head = true,
            b"meta" if self.in_head => {
                let kind = match e
                    .try_get_attribute("type")
                    .map_err(|e| invalid(e.to_string()))?
                {
                    Some(attr) => attr
                        .decode_and_unescape_value(decoder)
                        .map_err(|e| invalid(e.to_string()))?
                        .into_owned(),
                    None => String::new(),
                };
                self.meta_type = Some(kind);
                self.meta_text.clear();
            }
            b"file" => self.metadata.files += 1,
            b"segment" => {
                self.metadata.segments += 1;
                let bytes = e
                    .try_get_attribute("bytes")
                    .ok()
                    .flatten()
                    .and_then(|attr| {
                        attr.decode_and_unescape_value(decoder)
                            .ok()?
                            .trim()
                            .parse::<u64>()
                            .ok()
                    });
                self.metadata.total_bytes += bytes.unwrap_or(0);
            }
            _ => {}
        }
        Ok(())
    }

    fn close(&mut self, name: &[u8]) {
        match name {
            b"head" => self.in_head = false,
            b"meta" => {
                if let Some(kind) = self.meta_type.take() {
                    let value = self.meta_text.trim().to_string();
                    if kind == "name" && self.metadata.name.is_none() && !value.is_empty() {
                        self.metadata.name = Some(value.clone());
                    }
                    self.metadata.meta.push((kind, value));
                }
            }
            _ => {}
        }
    }
}
