//! quick-xml backed event stream

use super::{
    AttributeMap, Element, ElementEnd, EventStream, QualifiedName, StreamError, StreamResult,
    XmlEvent,
};
use crate::config::compile_time::stream::{EVENT_BUFFER_CAPACITY, MAX_ELEMENT_DEPTH};
use quick_xml::events::{BytesStart, Event};
use quick_xml::name::ResolveResult;
use quick_xml::NsReader;
use std::io::BufRead;

/// Namespace-resolving pull reader over a buffered byte source
pub struct XmlEventReader<R: BufRead> {
    reader: NsReader<R>,
    buf: Vec<u8>,
    open: Vec<QualifiedName>,
    pending: Option<XmlEvent>,
    max_depth: usize,
    finished: bool,
}

impl<R: BufRead> XmlEventReader<R> {
    pub fn new(source: R) -> Self {
        let mut reader = NsReader::from_reader(source);
        reader.config_mut().trim_text(false);
        reader.config_mut().expand_empty_elements = true;

        Self {
            reader,
            buf: Vec::with_capacity(EVENT_BUFFER_CAPACITY),
            open: Vec::new(),
            pending: None,
            max_depth: MAX_ELEMENT_DEPTH,
            finished: false,
        }
    }

    /// Override the nesting limit (never above the compiled-in maximum)
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth.min(MAX_ELEMENT_DEPTH);
        self
    }

    fn open_element(
        &mut self,
        namespace: Option<String>,
        start: &BytesStart<'_>,
        position: u64,
    ) -> StreamResult<Element> {
        let depth = self.open.len() + 1;
        if depth > self.max_depth {
            return Err(StreamError::DepthLimitExceeded {
                max: self.max_depth,
                position,
            });
        }

        let local_name = self
            .reader
            .decoder()
            .decode(start.local_name().as_ref())
            .map_err(|e| xml_error(e, position))?
            .into_owned();
        let attributes = collect_attributes(&self.reader, start, position)?;

        Ok(Element {
            name: QualifiedName {
                namespace,
                local_name,
            },
            attributes,
            depth,
        })
    }
}

impl<R: BufRead> EventStream for XmlEventReader<R> {
    fn next_event(&mut self) -> StreamResult<Option<XmlEvent>> {
        if let Some(event) = self.pending.take() {
            return Ok(Some(event));
        }

        loop {
            if self.finished {
                return Ok(None);
            }

            self.buf.clear();
            let position = self.reader.buffer_position() as u64;
            let decoder = self.reader.decoder();

            let (resolved, event) = self
                .reader
                .read_resolved_event_into(&mut self.buf)
                .map_err(|e| xml_error(e, position))?;

            let namespace = match resolved {
                ResolveResult::Bound(ns) => Some(
                    decoder
                        .decode(ns.as_ref())
                        .map_err(|e| xml_error(e, position))?
                        .into_owned(),
                ),
                ResolveResult::Unbound => None,
                ResolveResult::Unknown(prefix) => {
                    return Err(StreamError::UnboundPrefix {
                        prefix: String::from_utf8_lossy(&prefix).into_owned(),
                        position,
                    });
                }
            };

            match event {
                Event::Start(start) => {
                    let start = start.into_owned();
                    let element = self.open_element(namespace, &start, position)?;
                    self.open.push(element.name.clone());
                    return Ok(Some(XmlEvent::Start(element)));
                }
                Event::Empty(start) => {
                    let start = start.into_owned();
                    let element = self.open_element(namespace, &start, position)?;
                    self.pending = Some(XmlEvent::End(ElementEnd {
                        name: element.name.clone(),
                        depth: element.depth,
                    }));
                    return Ok(Some(XmlEvent::Start(element)));
                }
                Event::End(_) => {
                    let depth = self.open.len();
                    let name = self.open.pop().ok_or_else(|| StreamError::Xml {
                        message: "end tag without matching start tag".to_string(),
                        position,
                    })?;
                    return Ok(Some(XmlEvent::End(ElementEnd { name, depth })));
                }
                Event::Text(text) => {
                    if self.open.is_empty() {
                        continue;
                    }
                    let text = text.unescape().map_err(|e| xml_error(e, position))?;
                    if !text.is_empty() {
                        return Ok(Some(XmlEvent::Text(text.into_owned())));
                    }
                }
                Event::CData(cdata) => {
                    if self.open.is_empty() {
                        continue;
                    }
                    let text = self
                        .reader
                        .decoder()
                        .decode(&cdata)
                        .map_err(|e| xml_error(e, position))?
                        .into_owned();
                    if !text.is_empty() {
                        return Ok(Some(XmlEvent::Text(text)));
                    }
                }
                Event::Eof => {
                    self.finished = true;
                    return Ok(None);
                }
                _ => {}
            }
        }
    }

    fn depth(&self) -> usize {
        self.open.len()
    }

    fn position(&self) -> u64 {
        self.reader.buffer_position() as u64
    }
}

/// Attributes keyed by local name, or `{namespace}local` when prefixed.
/// Namespace declarations are dropped. Names and values are decoded with
/// the encoding the document declares.
fn collect_attributes<R>(
    reader: &NsReader<R>,
    start: &BytesStart<'_>,
    position: u64,
) -> StreamResult<AttributeMap> {
    let decoder = reader.decoder();
    let mut attributes = AttributeMap::new();

    for attr in start.attributes() {
        let attr = attr.map_err(|e| xml_error(e, position))?;
        if attr.key.as_namespace_binding().is_some() {
            continue;
        }

        let (resolved, local) = reader.resolve_attribute(attr.key);
        let local = decoder
            .decode(local.as_ref())
            .map_err(|e| xml_error(e, position))?;
        let key = match resolved {
            ResolveResult::Bound(ns) => {
                let ns = decoder
                    .decode(ns.as_ref())
                    .map_err(|e| xml_error(e, position))?;
                format!("{{{}}}{}", ns, local)
            }
            ResolveResult::Unbound => local.to_string(),
            ResolveResult::Unknown(prefix) => {
                return Err(StreamError::UnboundPrefix {
                    prefix: String::from_utf8_lossy(&prefix).into_owned(),
                    position,
                });
            }
        };

        let value = attr
            .decode_and_unescape_value(decoder)
            .map_err(|e| xml_error(e, position))?
            .into_owned();
        attributes.insert(key, value);
    }

    Ok(attributes)
}

fn xml_error(error: impl std::fmt::Display, position: u64) -> StreamError {
    StreamError::Xml {
        message: error.to_string(),
        position,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    const NS: &str = "http://checklists.nist.gov/xccdf/1.2";

    fn events(xml: &str) -> StreamResult<Vec<XmlEvent>> {
        let mut reader = XmlEventReader::new(xml.as_bytes());
        let mut events = Vec::new();
        while let Some(event) = reader.next_event()? {
            events.push(event);
        }
        Ok(events)
    }

    fn start(event: &XmlEvent) -> &Element {
        match event {
            XmlEvent::Start(element) => element,
            other => panic!("expected start event, got {:?}", other),
        }
    }

    #[test]
    fn test_events_in_document_order() {
        let xml = format!(
            r#"<?xml version="1.0"?><Benchmark xmlns="{}"><Rule id="R1"><title>T</title></Rule></Benchmark>"#,
            NS
        );
        let events = events(&xml).unwrap();

        assert_eq!(events.len(), 7);
        let root = start(&events[0]);
        assert_eq!(root.name, QualifiedName::new(Some(NS), "Benchmark"));
        assert_eq!(root.depth, 1);
        assert!(root.attributes.is_empty());

        let rule = start(&events[1]);
        assert_eq!(rule.attribute("id"), Some("R1"));
        assert_eq!(rule.depth, 2);

        assert_eq!(start(&events[2]).depth, 3);
        assert_eq!(events[3], XmlEvent::Text("T".to_string()));
        assert_matches!(&events[4], XmlEvent::End(end) if end.depth == 3 && end.name.local_name == "title");
        assert_matches!(&events[6], XmlEvent::End(end) if end.depth == 1);
    }

    #[test]
    fn test_self_closing_elements_produce_start_and_end() {
        let events = events(r#"<a><select idref="x" selected="true"/></a>"#).unwrap();

        assert_eq!(events.len(), 4);
        let select = start(&events[1]);
        assert_eq!(select.attribute("selected"), Some("true"));
        assert_matches!(&events[2], XmlEvent::End(end) if end.name.local_name == "select" && end.depth == 2);
    }

    #[test]
    fn test_prefixed_attributes_use_clark_keys() {
        let events = events(
            r#"<a xmlns:xsi="urn:xsi" xmlns:x="urn:x" x:kind="k" plain="p"><x:b/></a>"#,
        )
        .unwrap();

        let root = start(&events[0]);
        assert_eq!(root.attribute("plain"), Some("p"));
        assert_eq!(root.attribute("{urn:x}kind"), Some("k"));
        assert_eq!(root.attributes.len(), 2);

        let child = start(&events[1]);
        assert_eq!(child.name, QualifiedName::new(Some("urn:x"), "b"));
    }

    #[test]
    fn test_text_entities_and_cdata() {
        let events = events("<a>x &amp; y<![CDATA[<raw>]]></a>").unwrap();

        assert_eq!(events[1], XmlEvent::Text("x & y".to_string()));
        assert_eq!(events[2], XmlEvent::Text("<raw>".to_string()));
    }

    #[test]
    fn test_whitespace_outside_root_is_skipped() {
        let events = events("\n<a>\n</a>\n").unwrap();

        assert_eq!(events.len(), 3);
        assert_eq!(events[1], XmlEvent::Text("\n".to_string()));
    }

    #[test]
    fn test_truncated_input_leaves_elements_open() {
        let mut reader = XmlEventReader::new("<a><b>text".as_bytes());
        while reader.next_event().unwrap().is_some() {}

        assert_eq!(reader.depth(), 2);
        assert_eq!(reader.next_event().unwrap(), None);
    }

    #[test]
    fn test_declared_latin1_input_is_decoded() {
        let xml: &[u8] =
            b"<?xml version=\"1.0\" encoding=\"ISO-8859-1\"?><a note=\"na\xefve\"><b>caf\xe9</b><![CDATA[\xfc]]></a>";
        let mut reader = XmlEventReader::new(xml);
        let mut events = Vec::new();
        while let Some(event) = reader.next_event().unwrap() {
            events.push(event);
        }

        assert_eq!(start(&events[0]).attribute("note"), Some("na\u{ef}ve"));
        assert_eq!(events[2], XmlEvent::Text("caf\u{e9}".to_string()));
        assert_eq!(events[4], XmlEvent::Text("\u{fc}".to_string()));
    }

    #[test]
    fn test_mismatched_end_tag_is_malformed() {
        assert_matches!(events("<a><b></a>"), Err(StreamError::Xml { .. }));
    }

    #[test]
    fn test_unbound_prefix() {
        assert_matches!(
            events("<a><y:b/></a>"),
            Err(StreamError::UnboundPrefix { ref prefix, .. }) if prefix == "y"
        );
    }

    #[test]
    fn test_depth_limit() {
        let mut reader = XmlEventReader::new("<a><b><c/></b></a>".as_bytes()).with_max_depth(2);

        assert!(reader.next_event().unwrap().is_some());
        assert!(reader.next_event().unwrap().is_some());
        assert_matches!(
            reader.next_event(),
            Err(StreamError::DepthLimitExceeded { max: 2, .. })
        );
    }
}
