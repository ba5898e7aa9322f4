//! Document parsing with exact byte spans.
//!
//! quick-xml drives the event structure (which spans are element open
//! tags, nesting, tag names); attribute spans are recovered by scanning
//! the open-tag slice itself, since the event reader does not expose
//! per-attribute offsets.

use std::ops::Range;

use quick_xml::Reader;
use quick_xml::events::Event;

use crate::error::XmlError;

/// One attribute of an element open tag.
#[derive(Debug, Clone)]
pub struct Attribute {
    /// Full attribute name as written, e.g. `android:paddingLeft`.
    pub name: String,
    /// Namespace prefix, if any (`android` for `android:paddingLeft`).
    pub prefix: Option<String>,
    /// Name without the prefix (`paddingLeft`).
    pub local_name: String,
    /// Attribute value, raw (no entity expansion).
    pub value: String,
    /// Byte span of the whole `name="value"` token in the source.
    pub span: Range<usize>,
    /// Byte span of the value text, inside the quotes.
    pub value_span: Range<usize>,
}

/// One element open tag (`<name ...>` or `<name .../>`).
#[derive(Debug, Clone)]
pub struct ElementTag {
    /// Qualified tag name as written.
    pub name: String,
    /// Nesting depth; the document root is at depth 0.
    pub depth: usize,
    /// Index of the parent element in [`Document::tags`], if any.
    pub parent: Option<usize>,
    /// Byte span of the open tag, including the angle brackets.
    pub span: Range<usize>,
    /// Byte offset just before `>` or `/>`, where a new attribute can be
    /// inserted.
    pub insertion_offset: usize,
    /// Whether the tag is self-closing (`<name/>`).
    pub self_closing: bool,
    /// Attributes in document order.
    pub attributes: Vec<Attribute>,
}

impl Attribute {
    /// Build a full attribute name with this attribute's prefix and the
    /// given local name (`android:paddingLeft` -> `android:paddingStart`).
    #[must_use]
    pub fn qualified(&self, local_name: &str) -> String {
        match &self.prefix {
            Some(prefix) => format!("{prefix}:{local_name}"),
            None => local_name.to_string(),
        }
    }
}

impl ElementTag {
    /// Look up an attribute by its full name (prefix included).
    #[must_use]
    pub fn attribute(&self, name: &str) -> Option<&Attribute> {
        self.attributes.iter().find(|a| a.name == name)
    }
}

/// A parsed XML document: the source text plus its element tags.
#[derive(Debug)]
pub struct Document {
    source: String,
    tags: Vec<ElementTag>,
}

impl Document {
    /// Parse XML source into a span-indexed document.
    ///
    /// # Errors
    /// Returns [`XmlError::Parse`] when the source is not well-formed.
    pub fn parse(source: &str) -> Result<Self, XmlError> {
        let mut reader = Reader::from_str(source);
        let mut tags: Vec<ElementTag> = Vec::new();
        let mut stack: Vec<usize> = Vec::new();

        loop {
            let start = position(&reader);
            match reader.read_event() {
                Err(e) => {
                    return Err(XmlError::Parse {
                        position: position(&reader),
                        message: e.to_string(),
                    });
                }
                Ok(Event::Eof) => break,
                Ok(Event::Start(e)) => {
                    let end = position(&reader);
                    let name = String::from_utf8_lossy(e.name().as_ref()).into_owned();
                    let index = tags.len();
                    tags.push(build_tag(
                        source,
                        name,
                        start..end,
                        stack.len(),
                        stack.last().copied(),
                        false,
                    )?);
                    stack.push(index);
                }
                Ok(Event::Empty(e)) => {
                    let end = position(&reader);
                    let name = String::from_utf8_lossy(e.name().as_ref()).into_owned();
                    tags.push(build_tag(
                        source,
                        name,
                        start..end,
                        stack.len(),
                        stack.last().copied(),
                        true,
                    )?);
                }
                Ok(Event::End(_)) => {
                    stack.pop();
                }
                Ok(_) => {}
            }
        }

        Ok(Self {
            source: source.to_string(),
            tags,
        })
    }

    /// The original source text.
    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
    }

    /// All element tags in document order.
    #[must_use]
    pub fn tags(&self) -> &[ElementTag] {
        &self.tags
    }

    /// The document root element, if the document has one.
    #[must_use]
    pub fn root(&self) -> Option<&ElementTag> {
        self.tags.iter().find(|t| t.parent.is_none())
    }

    /// Index of the document root element.
    #[must_use]
    pub fn root_index(&self) -> Option<usize> {
        self.tags.iter().position(|t| t.parent.is_none())
    }

    /// Direct children of the tag at `parent`.
    pub fn children(&self, parent: usize) -> impl Iterator<Item = &ElementTag> {
        self.tags.iter().filter(move |t| t.parent == Some(parent))
    }

    /// First direct child of `parent` with the given tag name.
    #[must_use]
    pub fn find_child(&self, parent: usize, name: &str) -> Option<&ElementTag> {
        self.children(parent).find(|t| t.name == name)
    }
}

fn position(reader: &Reader<&[u8]>) -> usize {
    usize::try_from(reader.buffer_position()).unwrap_or(usize::MAX)
}

/// Scan the open-tag slice for attribute spans and the insertion offset.
fn build_tag(
    source: &str,
    name: String,
    span: Range<usize>,
    depth: usize,
    parent: Option<usize>,
    self_closing: bool,
) -> Result<ElementTag, XmlError> {
    let text = &source[span.clone()];
    let bytes = text.as_bytes();
    let len = bytes.len();

    let malformed = |at: usize| XmlError::Parse {
        position: span.start + at,
        message: "malformed attribute syntax in open tag".to_string(),
    };

    // Skip "<" and the tag name.
    let mut i = 1;
    while i < len && !bytes[i].is_ascii_whitespace() && bytes[i] != b'>' && bytes[i] != b'/' {
        i += 1;
    }

    let mut attributes = Vec::new();
    let mut insertion_offset = span.end.saturating_sub(1);

    loop {
        while i < len && bytes[i].is_ascii_whitespace() {
            i += 1;
        }
        if i >= len {
            break;
        }
        if bytes[i] == b'>' || bytes[i] == b'/' {
            insertion_offset = span.start + i;
            break;
        }

        let name_start = i;
        while i < len && bytes[i] != b'=' && !bytes[i].is_ascii_whitespace() {
            i += 1;
        }
        let attr_name = &text[name_start..i];

        while i < len && bytes[i].is_ascii_whitespace() {
            i += 1;
        }
        if i >= len || bytes[i] != b'=' {
            return Err(malformed(i.min(len.saturating_sub(1))));
        }
        i += 1;
        while i < len && bytes[i].is_ascii_whitespace() {
            i += 1;
        }
        if i >= len || (bytes[i] != b'"' && bytes[i] != b'\'') {
            return Err(malformed(i.min(len.saturating_sub(1))));
        }
        let quote = bytes[i];
        i += 1;
        let value_start = i;
        while i < len && bytes[i] != quote {
            i += 1;
        }
        if i >= len {
            return Err(malformed(value_start));
        }
        let value_end = i;
        i += 1; // past the closing quote

        let (prefix, local_name) = match attr_name.split_once(':') {
            Some((p, l)) => (Some(p.to_string()), l.to_string()),
            None => (None, attr_name.to_string()),
        };

        attributes.push(Attribute {
            name: attr_name.to_string(),
            prefix,
            local_name,
            value: text[value_start..value_end].to_string(),
            span: span.start + name_start..span.start + i,
            value_span: span.start + value_start..span.start + value_end,
        });
    }

    Ok(ElementTag {
        name,
        depth,
        parent,
        span,
        insertion_offset,
        self_closing,
        attributes,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_single_tag_spans() {
        let src = r#"<TextView android:paddingLeft="4dp" android:text="hi"/>"#;
        let doc = Document::parse(src).unwrap();

        assert_eq!(doc.tags().len(), 1);
        let tag = doc.root().unwrap();
        assert_eq!(tag.name, "TextView");
        assert!(tag.self_closing);
        assert_eq!(tag.attributes.len(), 2);

        let attr = tag.attribute("android:paddingLeft").unwrap();
        assert_eq!(&src[attr.span.clone()], r#"android:paddingLeft="4dp""#);
        assert_eq!(&src[attr.value_span.clone()], "4dp");
        assert_eq!(attr.prefix.as_deref(), Some("android"));
        assert_eq!(attr.local_name, "paddingLeft");
    }

    #[test]
    fn test_parse_nesting_and_children() {
        let src = "<manifest>\n  <application android:label=\"app\">\n    <activity/>\n  </application>\n  <uses-sdk/>\n</manifest>";
        let doc = Document::parse(src).unwrap();

        let root = doc.root_index().unwrap();
        assert_eq!(doc.tags()[root].name, "manifest");

        let application = doc.find_child(root, "application").unwrap();
        assert_eq!(application.depth, 1);
        assert_eq!(application.attribute("android:label").unwrap().value, "app");

        assert!(doc.find_child(root, "uses-sdk").is_some());
        assert!(doc.find_child(root, "activity").is_none());
    }

    #[test]
    fn test_insertion_offset_before_close() {
        let src = r#"<application android:label="app">"#;
        let doc = Document::parse(src).unwrap();
        let tag = &doc.tags()[0];
        assert_eq!(&src[tag.insertion_offset..=tag.insertion_offset], ">");

        let src2 = r#"<uses-sdk android:minSdkVersion="7"/>"#;
        let doc2 = Document::parse(src2).unwrap();
        let tag2 = &doc2.tags()[0];
        assert_eq!(&src2[tag2.insertion_offset..tag2.insertion_offset + 2], "/>");
    }

    #[test]
    fn test_comments_and_declaration_skipped() {
        let src = "<?xml version=\"1.0\"?>\n<!-- layout -->\n<LinearLayout android:gravity=\"left\"></LinearLayout>";
        let doc = Document::parse(src).unwrap();
        assert_eq!(doc.tags().len(), 1);
        assert_eq!(doc.root().unwrap().name, "LinearLayout");
    }

    #[test]
    fn test_single_quoted_values() {
        let src = "<v a='x y'/>";
        let doc = Document::parse(src).unwrap();
        assert_eq!(doc.tags()[0].attribute("a").unwrap().value, "x y");
    }

    #[test]
    fn test_malformed_tag_is_error() {
        assert!(Document::parse("<a b=></a>").is_err());
        assert!(Document::parse("<a><b></a>").is_err());
    }
}
