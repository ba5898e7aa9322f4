//! droidres-xml - Span-aware XML document model.
//!
//! Parses XML resource files into a flat list of element tags whose
//! attributes carry exact byte spans into the original source, so that
//! callers can plan precise text edits without owning a DOM.
//!
//! # Architecture
//!
//! ```text
//! droidres-xml/src/
//! ├── lib.rs      # Re-exports (this file)
//! ├── error.rs    # XmlError enum (thiserror)
//! ├── document.rs # Document, ElementTag, Attribute
//! ├── edit.rs     # TextEdit planning and application
//! └── diff.rs     # Unified diff generation
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! use droidres_xml::{Document, edit};
//!
//! let doc = Document::parse(r#"<TextView android:paddingLeft="4dp"/>"#)?;
//! let tag = doc.root().unwrap();
//! let attr = tag.attribute("android:paddingLeft").unwrap();
//! let rename = edit::rename_attribute(attr, "android:paddingStart");
//! let rewritten = edit::apply_edits(doc.source(), vec![rename])?;
//! ```

mod diff;
mod document;
pub mod edit;
mod error;

pub use diff::unified_diff;
pub use document::{Attribute, Document, ElementTag};
pub use edit::TextEdit;
pub use error::XmlError;
