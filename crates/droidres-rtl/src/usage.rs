//! Pending edits discovered by the scan phase.

use std::ops::Range;
use std::path::PathBuf;

use serde::Serialize;

/// What a usage rewrites when committed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum UsageKind {
    /// Set `android:supportsRtl="true"` on the manifest `<application>`.
    ManifestSupportsRtl,
    /// Raise `android:targetSdkVersion` to the RTL threshold on
    /// `<uses-sdk>`.
    ManifestTargetSdk,
    /// Mirror one directional (or gravity) attribute in a layout file.
    LayoutAttribute {
        /// Full attribute name as written, e.g. `android:paddingLeft`.
        attribute: String,
        /// Whether committing must first create the `-v17` qualifier
        /// variant of the file and rewrite the copy instead.
        create_v17: bool,
    },
}

/// One pending edit: a file, a byte span anchoring the edit, and its kind.
///
/// Usages are discovered in the scan phase, optionally previewed, then
/// applied in the commit phase. Each usage is independent of the others,
/// except that layout usages targeting the same not-yet-created qualifier
/// directory share its one-time creation.
#[derive(Debug, Clone, Serialize)]
pub struct RtlUsage {
    /// Name of the module the file belongs to.
    pub module: String,
    /// The file the usage was found in.
    pub file: PathBuf,
    /// Byte span of the anchored element or attribute; an empty span
    /// marks a pure insertion point.
    pub span: Range<usize>,
    /// What committing this usage does.
    pub kind: UsageKind,
}
