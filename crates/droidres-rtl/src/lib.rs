//! droidres-rtl - RTL attribute rewriting for layout and manifest XML.
//!
//! Scans a project's manifests and layout resources for left/right
//! oriented attributes, produces a rewrite plan (usages), and commits it:
//! mirrored start/end attributes are added or renamed in place, gravity
//! values are token-substituted, and rewrites can target `-v17`
//! qualifier-directory copies instead of the original files.
//!
//! # Architecture
//!
//! ```text
//! droidres-rtl/src/
//! ├── lib.rs      # Re-exports (this file)
//! ├── table.rs    # Mirrored attribute table, gravity value mapping
//! ├── options.rs  # RtlOptions toggles
//! ├── project.rs  # Project/Module model and discovery
//! ├── usage.rs    # RtlUsage, UsageKind
//! ├── scan.rs     # find_usages (scan phase)
//! └── commit.rs   # apply / preview (commit phase)
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! use droidres_rtl::{Project, RtlOptions, find_usages, apply};
//!
//! let project = Project::discover("/work/my-app");
//! let options = RtlOptions::default();
//! let usages = find_usages(&project, &options);
//! let report = apply(&usages, &options);
//! println!("{} files changed", report.files_changed);
//! ```

mod commit;
mod options;
mod project;
mod scan;
pub mod table;
mod usage;

pub use commit::{ApplyReport, FileDiff, apply, preview};
pub use options::RtlOptions;
pub use project::{Module, Project};
pub use scan::find_usages;
pub use usage::{RtlUsage, UsageKind};
