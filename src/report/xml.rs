// src/report/xml.rs
//! Minimal owned element tree over `quick-xml` events, with null-safe path lookup.

use quick_xml::encoding::Decoder;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// An element with its concatenated text and child elements. Attributes are dropped.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Element {
    name: String,
    text: String,
    children: Vec<Element>,
}

impl Element {
    fn from_start(start: &BytesStart<'_>, decoder: Decoder) -> Result<Self, String> {
        let local_name = start.local_name();
        let name = decoder
            .decode(local_name.as_ref())
            .map_err(|e| e.to_string())?;
        Ok(Self {
            name: name.into_owned(),
            ..Self::default()
        })
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// First child with the given local name.
    #[must_use]
    pub fn child(&self, name: &str) -> Option<&Element> {
        self.children.iter().find(|c| c.name == name)
    }

    /// All children with the given local name, in document order.
    pub fn children<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Element> + 'a {
        self.children.iter().filter(move |c| c.name == name)
    }

    /// Trimmed text content, or `None` when the element has no text.
    #[must_use]
    pub fn text(&self) -> Option<&str> {
        let t = self.text.trim();
        (!t.is_empty()).then_some(t)
    }
}

/// Follows `path` from `node`. Any missing step, including a missing `node`, yields `None`.
#[must_use]
pub fn lookup<'a>(node: Option<&'a Element>, path: &[&str]) -> Option<&'a Element> {
    path.iter().try_fold(node?, |n, seg| n.child(seg))
}

/// Text of the element at `path` beneath `node`.
#[must_use]
pub fn field(node: Option<&Element>, path: &[&str]) -> Option<String> {
    lookup(node, path).and_then(Element::text).map(str::to_owned)
}

/// Parses a complete document and returns its root element.
///
/// The encoding named in the XML declaration is honored; without one the
/// document is read as UTF-8.
///
/// # Errors
/// Returns a description of the problem if the document is not well-formed or has no root.
pub fn parse_document(xml: &[u8]) -> Result<Element, String> {
    let mut reader = Reader::from_reader(xml.strip_prefix(UTF8_BOM).unwrap_or(xml));
    let mut buf = Vec::new();
    let mut stack: Vec<Element> = Vec::new();
    let mut root: Option<Element> = None;

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) => {
                if stack.is_empty() && root.is_some() {
                    return Err("multiple root elements".into());
                }
                stack.push(Element::from_start(&e, reader.decoder())?);
            }
            Ok(Event::Empty(e)) => {
                let el = Element::from_start(&e, reader.decoder())?;
                attach(&mut stack, &mut root, el)?;
            }
            Ok(Event::End(_)) => {
                let done = stack.pop().ok_or("unexpected closing tag")?;
                attach(&mut stack, &mut root, done)?;
            }
            Ok(Event::Text(t)) => {
                if let Some(top) = stack.last_mut() {
                    let s = t.unescape().map_err(|e| e.to_string())?;
                    top.text.push_str(&s);
                }
            }
            Ok(Event::CData(c)) => {
                if let Some(top) = stack.last_mut() {
                    let s = c.decode().map_err(|e| e.to_string())?;
                    top.text.push_str(&s);
                }
            }
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(e) => return Err(format!("at byte {}: {e}", reader.buffer_position())),
        }
        buf.clear();
    }

    if let Some(open) = stack.last() {
        return Err(format!("unclosed element <{}>", open.name));
    }
    root.ok_or_else(|| "document has no root element".into())
}

fn attach(stack: &mut [Element], root: &mut Option<Element>, el: Element) -> Result<(), String> {
    match stack.last_mut() {
        Some(parent) => parent.children.push(el),
        None if root.is_some() => return Err("multiple root elements".into()),
        None => *root = Some(el),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_through_missing_parent() {
        let root = parse_document(b"<a><b><c>x</c></b></a>").unwrap();
        assert_eq!(field(Some(&root), &["b", "c"]), Some("x".into()));
        assert_eq!(field(Some(&root), &["missing", "c"]), None);
        assert_eq!(field(None, &["b", "c"]), None);
    }

    #[test]
    fn test_first_child_wins() {
        let root = parse_document(b"<a><b>1</b><b>2</b></a>").unwrap();
        assert_eq!(field(Some(&root), &["b"]), Some("1".into()));
        assert_eq!(root.children("b").count(), 2);
    }

    #[test]
    fn test_empty_and_whitespace_text_is_none() {
        let root = parse_document(b"<a><b/><c>   </c><d></d></a>").unwrap();
        assert_eq!(field(Some(&root), &["b"]), None);
        assert_eq!(field(Some(&root), &["c"]), None);
        assert_eq!(field(Some(&root), &["d"]), None);
    }

    #[test]
    fn test_entities_and_cdata() {
        let root = parse_document(b"<a><b>AT&amp;T</b><c><![CDATA[x<y]]></c></a>").unwrap();
        assert_eq!(field(Some(&root), &["b"]), Some("AT&T".into()));
        assert_eq!(field(Some(&root), &["c"]), Some("x<y".into()));
    }

    #[test]
    fn test_namespace_prefix_ignored() {
        let root = parse_document(br#"<d:feedback xmlns:d="urn:x"><d:a>1</d:a></d:feedback>"#).unwrap();
        assert_eq!(root.name(), "feedback");
        assert_eq!(field(Some(&root), &["a"]), Some("1".into()));
    }

    #[test]
    fn test_malformed_documents() {
        assert!(parse_document(b"").is_err());
        assert!(parse_document(b"<a><b></a>").is_err());
        assert!(parse_document(b"<a>").is_err());
        assert!(parse_document(b"<a/><b/>").is_err());
    }

    #[test]
    fn test_declaration_and_bom_accepted() {
        let doc = "\u{feff}<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<!-- c --><a>1</a>\n";
        let root = parse_document(doc.as_bytes()).unwrap();
        assert_eq!(root.text(), Some("1"));
    }

    #[test]
    fn test_declared_latin1_is_decoded() {
        let mut doc = b"<?xml version=\"1.0\" encoding=\"ISO-8859-1\"?><a><b>Soci".to_vec();
        doc.extend_from_slice(b"\xe9t\xe9</b></a>");
        let root = parse_document(&doc).unwrap();
        assert_eq!(field(Some(&root), &["b"]), Some("Soci\u{e9}t\u{e9}".into()));
    }
}
