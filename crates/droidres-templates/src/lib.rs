//! droidres-templates - Template discovery and metadata caching.
//!
//! Locates code-generation template directories on disk, merges duplicate
//! template names across multiple roots by descriptor revision, and caches
//! parsed per-template metadata keyed by directory path.
//!
//! # Filesystem layout
//!
//! ```text
//! <sdk>/tools/templates/<category>/<name>/template.xml   # primary root
//! <sdk>/extras/<vendor>/<package>/templates/...          # supplementary
//! <sdk>/extras/templates/...                             # legacy fallback
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! use droidres_templates::{TemplateManager, TemplateRoots};
//!
//! let manager = TemplateManager::new(TemplateRoots::from_sdk("/opt/android-sdk"));
//! for dir in manager.list_templates("activities") {
//!     if let Some(meta) = manager.metadata(&dir) {
//!         println!("{} (rev {})", meta.display_name(), meta.revision);
//!     }
//! }
//! ```

mod manager;
mod metadata;

pub use manager::{TemplateManager, TemplateRoots};
pub use metadata::TemplateMetadata;

/// File name of the per-template descriptor.
pub const TEMPLATE_XML: &str = "template.xml";

/// SDK subdirectory holding the primary template root.
pub const FD_TOOLS: &str = "tools";

/// Directory name for template collections.
pub const FD_TEMPLATES: &str = "templates";

/// SDK subdirectory holding supplementary template roots.
pub const FD_EXTRAS: &str = "extras";
