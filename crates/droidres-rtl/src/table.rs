//! The mirrored attribute table and gravity value mapping.
//!
//! A fixed, closed set of legacy directional attribute names maps to
//! start/end logical equivalents. Gravity is the special case whose
//! *value* is mirrored instead of its name.

use std::collections::HashMap;
use std::sync::OnceLock;

/// Manifest file name.
pub const ANDROID_MANIFEST: &str = "AndroidManifest.xml";

/// First SDK level with public RTL support.
pub const RTL_TARGET_SDK_START: u32 = 17;

/// Marker of any version-qualified resource directory (`layout-v21`...).
pub const RES_V_QUALIFIER: &str = "-v";

/// Qualifier suffix for RTL-capable resource variants.
pub const RES_V17_QUALIFIER: &str = "-v17";

/// Prefix of layout resource directories (`layout`, `layout-land`...).
pub const FD_RES_LAYOUT: &str = "layout";

/// Manifest element carrying the RTL support flag.
pub const NODE_APPLICATION: &str = "application";

/// Manifest element carrying the SDK version declarations.
pub const NODE_USES_SDK: &str = "uses-sdk";

/// RTL support flag attribute, full name.
pub const ATTR_SUPPORTS_RTL: &str = "android:supportsRtl";

/// Target SDK version attribute, full name.
pub const ATTR_TARGET_SDK_VERSION: &str = "android:targetSdkVersion";

/// XML boolean literals.
pub const VALUE_TRUE: &str = "true";
/// See [`VALUE_TRUE`].
pub const VALUE_FALSE: &str = "false";

/// Plain gravity attribute local name.
pub const ATTR_GRAVITY: &str = "gravity";

/// Layout gravity attribute local name.
pub const ATTR_LAYOUT_GRAVITY: &str = "layout_gravity";

const GRAVITY_VALUE_LEFT: &str = "left";
const GRAVITY_VALUE_RIGHT: &str = "right";
const GRAVITY_VALUE_START: &str = "start";
const GRAVITY_VALUE_END: &str = "end";

/// Mirrored (start/end) local name for a legacy directional attribute.
///
/// Gravity attributes are deliberately absent: their value is mirrored,
/// not their name.
#[must_use]
pub fn mirrored_attribute(local_name: &str) -> Option<&'static str> {
    static TABLE: OnceLock<HashMap<&'static str, &'static str>> = OnceLock::new();
    TABLE
        .get_or_init(|| {
            HashMap::from([
                ("paddingLeft", "paddingStart"),
                ("paddingRight", "paddingEnd"),
                ("layout_marginLeft", "layout_marginStart"),
                ("layout_marginRight", "layout_marginEnd"),
                ("drawableLeft", "drawableStart"),
                ("drawableRight", "drawableEnd"),
                ("layout_toLeftOf", "layout_toStartOf"),
                ("layout_toRightOf", "layout_toEndOf"),
                ("layout_alignLeft", "layout_alignStart"),
                ("layout_alignRight", "layout_alignEnd"),
                ("layout_alignParentLeft", "layout_alignParentStart"),
                ("layout_alignParentRight", "layout_alignParentEnd"),
            ])
        })
        .get(local_name)
        .copied()
}

/// Whether a local attribute name is one of the gravity attributes.
#[must_use]
pub fn is_gravity_attribute(local_name: &str) -> bool {
    local_name == ATTR_GRAVITY || local_name == ATTR_LAYOUT_GRAVITY
}

/// Mirror the directional tokens of a gravity value.
///
/// The value is a `|`-separated token list; `left` becomes `start`,
/// `right` becomes `end`, every other token is untouched.
#[must_use]
pub fn mirror_gravity_value(value: &str) -> String {
    value
        .split('|')
        .map(|token| match token.trim() {
            GRAVITY_VALUE_LEFT => GRAVITY_VALUE_START,
            GRAVITY_VALUE_RIGHT => GRAVITY_VALUE_END,
            _ => token,
        })
        .collect::<Vec<_>>()
        .join("|")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_maps_left_and_right() {
        assert_eq!(mirrored_attribute("paddingLeft"), Some("paddingStart"));
        assert_eq!(mirrored_attribute("paddingRight"), Some("paddingEnd"));
        assert_eq!(
            mirrored_attribute("layout_alignParentRight"),
            Some("layout_alignParentEnd")
        );
        assert_eq!(mirrored_attribute("textSize"), None);
        // Gravity is handled by value substitution, not the table
        assert_eq!(mirrored_attribute("gravity"), None);
    }

    #[test]
    fn test_mirror_gravity_value_tokens() {
        assert_eq!(mirror_gravity_value("left|center"), "start|center");
        assert_eq!(mirror_gravity_value("right"), "end");
        assert_eq!(
            mirror_gravity_value("top|left|bottom|right"),
            "top|start|bottom|end"
        );
        assert_eq!(mirror_gravity_value("center_vertical"), "center_vertical");
    }

    #[test]
    fn test_mirror_gravity_value_leaves_composite_tokens() {
        // Tokens merely containing "left" are not directional tokens
        assert_eq!(mirror_gravity_value("left_of_center"), "left_of_center");
    }
}
