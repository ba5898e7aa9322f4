//! Template descriptor parsing.
//!
//! A template directory carries a `template.xml` descriptor whose root
//! element attributes describe the template. A missing or unparsable
//! descriptor is never an error to the caller; it simply means the
//! directory has no metadata.

use std::fs;
use std::path::Path;

use serde::Serialize;

use droidres_xml::Document;

use crate::TEMPLATE_XML;

/// Parsed attributes of a template descriptor.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct TemplateMetadata {
    /// Declared revision; templates with higher revisions shadow lower
    /// ones when names collide across roots. Defaults to 1.
    pub revision: i32,
    /// Display name, if declared.
    pub name: Option<String>,
    /// Short description, if declared.
    pub description: Option<String>,
    /// Minimum API level the generated code requires.
    pub min_api: Option<u32>,
    /// Minimum build (compile) API level.
    pub min_build_api: Option<u32>,
}

impl TemplateMetadata {
    /// Parse the descriptor of a template directory.
    ///
    /// Returns `None` when the descriptor is missing, unreadable, or not
    /// well-formed XML. Failures are logged, never raised.
    #[must_use]
    pub fn from_template_dir(template_dir: &Path) -> Option<Self> {
        let descriptor = template_dir.join(TEMPLATE_XML);
        if !descriptor.is_file() {
            log::debug!("No {TEMPLATE_XML} in template directory {template_dir:?}");
            return None;
        }

        let xml = match fs::read_to_string(&descriptor) {
            Ok(xml) => xml,
            Err(e) => {
                log::warn!("Cannot read template descriptor {descriptor:?}: {e}");
                return None;
            }
        };

        Self::from_descriptor(&xml).or_else(|| {
            log::warn!("Malformed template descriptor {descriptor:?}");
            None
        })
    }

    /// Parse descriptor XML text. Returns `None` when not well-formed or
    /// lacking a root element.
    #[must_use]
    pub fn from_descriptor(xml: &str) -> Option<Self> {
        let doc = Document::parse(xml).ok()?;
        let root = doc.root()?;

        let attr = |name: &str| root.attribute(name).map(|a| a.value.clone());

        let revision = match attr("revision") {
            Some(raw) => match raw.parse::<i32>() {
                Ok(revision) => revision,
                Err(_) => {
                    log::warn!("Non-numeric template revision {raw:?}, assuming 1");
                    1
                }
            },
            None => 1,
        };

        Some(Self {
            revision,
            name: attr("name"),
            description: attr("description"),
            min_api: attr("minApi").and_then(|v| v.parse().ok()),
            min_build_api: attr("minBuildApi").and_then(|v| v.parse().ok()),
        })
    }

    /// Declared name, or an empty string when absent.
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or("")
    }
}
