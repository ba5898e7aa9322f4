//! Text edit planning and application.
//!
//! Edits are plain byte-range replacements against the original source.
//! Applying a batch splices ranges in descending start order so earlier
//! spans stay valid, the same way reverse-ordered match replacement works
//! for structural refactoring.

use std::ops::Range;

use crate::document::{Attribute, ElementTag};
use crate::error::XmlError;

/// One planned replacement of a byte range with new text.
#[derive(Debug, Clone)]
pub struct TextEdit {
    /// Byte range in the original source to replace. An empty range is a
    /// pure insertion.
    pub range: Range<usize>,
    /// Replacement text.
    pub replacement: String,
}

/// Plan an edit that replaces an attribute's value, keeping its name.
#[must_use]
pub fn set_attribute_value(attr: &Attribute, new_value: &str) -> TextEdit {
    TextEdit {
        range: attr.value_span.clone(),
        replacement: new_value.to_string(),
    }
}

/// Plan an edit that renames an attribute in place, keeping its value.
#[must_use]
pub fn rename_attribute(attr: &Attribute, new_name: &str) -> TextEdit {
    TextEdit {
        range: attr.span.start..attr.span.start + attr.name.len(),
        replacement: new_name.to_string(),
    }
}

/// Plan an edit that inserts a new attribute at the end of an open tag.
#[must_use]
pub fn insert_attribute(tag: &ElementTag, name: &str, value: &str) -> TextEdit {
    TextEdit {
        range: tag.insertion_offset..tag.insertion_offset,
        replacement: format!(" {name}=\"{value}\""),
    }
}

/// Apply a batch of edits to `source`, returning the rewritten text.
///
/// # Errors
/// Returns [`XmlError::RangeOutOfBounds`] when an edit falls outside the
/// source, or [`XmlError::OverlappingEdits`] when two edits intersect.
pub fn apply_edits(source: &str, mut edits: Vec<TextEdit>) -> Result<String, XmlError> {
    edits.sort_by(|a, b| b.range.start.cmp(&a.range.start));

    for edit in &edits {
        if edit.range.end > source.len() || edit.range.start > edit.range.end {
            return Err(XmlError::RangeOutOfBounds {
                start: edit.range.start,
                end: edit.range.end,
                len: source.len(),
            });
        }
    }
    // Descending by start: each edit must end at or before the previous
    // (lower-offset) neighbour starts. Pure insertions at the same offset
    // do not intersect.
    for pair in edits.windows(2) {
        let (later, earlier) = (&pair[0], &pair[1]);
        if earlier.range.end > later.range.start {
            return Err(XmlError::OverlappingEdits {
                first_start: earlier.range.start,
                first_end: earlier.range.end,
                second_start: later.range.start,
                second_end: later.range.end,
            });
        }
    }

    let mut modified = source.to_string();
    for edit in &edits {
        modified.replace_range(edit.range.clone(), &edit.replacement);
    }
    Ok(modified)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::Document;

    #[test]
    fn test_set_attribute_value() {
        let src = r#"<v android:gravity="left|center"/>"#;
        let doc = Document::parse(src).unwrap();
        let attr = doc.tags()[0].attribute("android:gravity").unwrap();

        let edit = set_attribute_value(attr, "start|center");
        let out = apply_edits(src, vec![edit]).unwrap();
        assert_eq!(out, r#"<v android:gravity="start|center"/>"#);
    }

    #[test]
    fn test_rename_attribute() {
        let src = r#"<v android:paddingLeft="4dp"/>"#;
        let doc = Document::parse(src).unwrap();
        let attr = doc.tags()[0].attribute("android:paddingLeft").unwrap();

        let edit = rename_attribute(attr, "android:paddingStart");
        let out = apply_edits(src, vec![edit]).unwrap();
        assert_eq!(out, r#"<v android:paddingStart="4dp"/>"#);
    }

    #[test]
    fn test_insert_attribute() {
        let src = r#"<application android:label="app">"#;
        let doc = Document::parse(src).unwrap();

        let edit = insert_attribute(&doc.tags()[0], "android:supportsRtl", "true");
        let out = apply_edits(src, vec![edit]).unwrap();
        assert_eq!(
            out,
            r#"<application android:label="app" android:supportsRtl="true">"#
        );
    }

    #[test]
    fn test_multiple_edits_applied_in_reverse_order() {
        let src = r#"<v a="1" b="2"/>"#;
        let doc = Document::parse(src).unwrap();
        let tag = &doc.tags()[0];
        let edits = vec![
            set_attribute_value(tag.attribute("a").unwrap(), "one"),
            set_attribute_value(tag.attribute("b").unwrap(), "two"),
        ];

        let out = apply_edits(src, edits).unwrap();
        assert_eq!(out, r#"<v a="one" b="two"/>"#);
    }

    #[test]
    fn test_overlapping_edits_rejected() {
        let edits = vec![
            TextEdit {
                range: 0..4,
                replacement: String::new(),
            },
            TextEdit {
                range: 2..6,
                replacement: String::new(),
            },
        ];
        assert!(matches!(
            apply_edits("0123456789", edits),
            Err(XmlError::OverlappingEdits { .. })
        ));
    }

    #[test]
    fn test_out_of_bounds_edit_rejected() {
        let edits = vec![TextEdit {
            range: 5..20,
            replacement: String::new(),
        }];
        assert!(matches!(
            apply_edits("short", edits),
            Err(XmlError::RangeOutOfBounds { .. })
        ));
    }
}
