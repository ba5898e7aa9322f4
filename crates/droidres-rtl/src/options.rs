//! Toggles controlling the scan and commit phases.

use serde::Serialize;

/// Options for the RTL rewrite, as chosen by the caller.
#[derive(Debug, Clone, Serialize)]
pub struct RtlOptions {
    /// Update `supportsRtl` / `targetSdkVersion` manifest declarations.
    pub update_manifest: bool,
    /// Rewrite directional attributes in layout files.
    pub update_layouts: bool,
    /// Rewrite copies in `-v17` qualifier directories instead of the base
    /// layout files.
    pub generate_v17_resources: bool,
    /// Rename legacy attributes in place instead of adding the mirrored
    /// attribute alongside them.
    pub replace_left_right: bool,
}

impl Default for RtlOptions {
    fn default() -> Self {
        Self {
            update_manifest: true,
            update_layouts: true,
            generate_v17_resources: false,
            replace_left_right: false,
        }
    }
}

impl RtlOptions {
    /// Whether any scan toggle is enabled at all.
    #[must_use]
    pub fn has_work(&self) -> bool {
        self.update_manifest || self.update_layouts
    }
}
