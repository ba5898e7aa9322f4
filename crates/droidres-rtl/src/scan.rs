//! Scan phase: discover pending rewrites across a project.

use std::fs;
use std::path::{Path, PathBuf};

use droidres_xml::Document;

use crate::options::RtlOptions;
use crate::project::{Module, Project};
use crate::table::{
    ATTR_SUPPORTS_RTL, ATTR_TARGET_SDK_VERSION, FD_RES_LAYOUT, NODE_APPLICATION, NODE_USES_SDK,
    RES_V17_QUALIFIER, RES_V_QUALIFIER, RTL_TARGET_SDK_START, VALUE_FALSE, is_gravity_attribute,
    mirrored_attribute,
};
use crate::usage::{RtlUsage, UsageKind};

/// Scan every non-library module of `project` for pending RTL rewrites.
///
/// Returns an empty list when all toggles in `options` are off. Modules
/// whose manifest cannot be read or parsed are logged and skipped; the
/// scan continues with the remaining modules.
#[must_use]
pub fn find_usages(project: &Project, options: &RtlOptions) -> Vec<RtlUsage> {
    let mut usages = Vec::new();
    if !options.has_work() {
        return usages;
    }

    for module in project.application_modules() {
        if options.update_manifest {
            scan_manifest(module, &mut usages);
        }
        if options.update_layouts {
            scan_layouts(module, options, &mut usages);
        }
    }

    log::info!("Found {} RTL usage(s)", usages.len());
    usages
}

fn scan_manifest(module: &Module, out: &mut Vec<RtlUsage>) {
    let source = match fs::read_to_string(&module.manifest) {
        Ok(source) => source,
        Err(e) => {
            log::error!("Could not read manifest data for module {}: {e}", module.name);
            return;
        }
    };
    let doc = match Document::parse(&source) {
        Ok(doc) => doc,
        Err(e) => {
            log::error!("Could not read manifest data for module {}: {e}", module.name);
            return;
        }
    };
    let Some(root) = doc.root_index() else {
        log::error!("Manifest for module {} has no root element", module.name);
        return;
    };

    // First, the "supportsRtl" flag on the <application> tag
    if let Some(application) = doc.find_child(root, NODE_APPLICATION) {
        let attr = application.attribute(ATTR_SUPPORTS_RTL);
        let needs_update = attr.is_none_or(|a| a.value == VALUE_FALSE);
        if needs_update {
            // Anchor at the attribute, or at the tag's insertion point
            // when the attribute is absent.
            let span = attr.map_or(
                application.insertion_offset..application.insertion_offset,
                |a| a.span.clone(),
            );
            out.push(RtlUsage {
                module: module.name.clone(),
                file: module.manifest.clone(),
                span,
                kind: UsageKind::ManifestSupportsRtl,
            });
        }
    }

    // Second, targetSdkVersion on <uses-sdk>
    if let Some(uses_sdk) = doc.find_child(root, NODE_USES_SDK) {
        let attr = uses_sdk.attribute(ATTR_TARGET_SDK_VERSION);
        let target_sdk = attr.map_or(0, |a| {
            a.value.parse::<u32>().unwrap_or_else(|_| {
                log::warn!(
                    "Non-numeric targetSdkVersion {:?} in module {}",
                    a.value,
                    module.name
                );
                0
            })
        });
        if target_sdk < RTL_TARGET_SDK_START {
            let span = attr.map_or_else(|| uses_sdk.span.clone(), |a| a.span.clone());
            out.push(RtlUsage {
                module: module.name.clone(),
                file: module.manifest.clone(),
                span,
                kind: UsageKind::ManifestTargetSdk,
            });
        }
    }
}

fn scan_layouts(module: &Module, options: &RtlOptions, out: &mut Vec<RtlUsage>) {
    for res_dir in &module.res_dirs {
        for layout_dir in layout_subdirectories(res_dir) {
            if options.generate_v17_resources {
                let Some(name) = layout_dir.file_name().map(|n| n.to_string_lossy().into_owned())
                else {
                    continue;
                };
                // Qualified directories are source material for their own
                // base directory, never scanned directly in this mode.
                if name.contains(RES_V_QUALIFIER) {
                    continue;
                }
                let v17_dir = layout_dir.with_file_name(format!("{name}{RES_V17_QUALIFIER}"));
                if v17_dir.is_dir() && dir_has_entries(&v17_dir) {
                    // Already populated: rewrite the variant files in place.
                    scan_layout_dir(module, &v17_dir, false, out);
                } else {
                    // Rewrites will create the variant copies at commit.
                    scan_layout_dir(module, &layout_dir, true, out);
                }
            } else {
                scan_layout_dir(module, &layout_dir, false, out);
            }
        }
    }
}

fn scan_layout_dir(module: &Module, layout_dir: &Path, create_v17: bool, out: &mut Vec<RtlUsage>) {
    let Ok(entries) = fs::read_dir(layout_dir) else {
        log::warn!("Cannot list layout directory {layout_dir:?}");
        return;
    };
    let mut files: Vec<PathBuf> = entries
        .filter_map(Result::ok)
        .map(|e| e.path())
        .filter(|p| p.is_file() && p.extension().is_some_and(|ext| ext == "xml"))
        .collect();
    files.sort();

    for file in files {
        scan_layout_file(module, &file, create_v17, out);
    }
}

fn scan_layout_file(module: &Module, file: &Path, create_v17: bool, out: &mut Vec<RtlUsage>) {
    let source = match fs::read_to_string(file) {
        Ok(source) => source,
        Err(e) => {
            log::warn!("Cannot read layout file {file:?}: {e}");
            return;
        }
    };
    let doc = match Document::parse(&source) {
        Ok(doc) => doc,
        Err(e) => {
            log::warn!("Cannot parse layout file {file:?}: {e}");
            return;
        }
    };

    for tag in doc.tags() {
        for attr in &tag.attributes {
            if let Some(mirrored) = mirrored_attribute(&attr.local_name) {
                // Mirror only attributes that have not been mirrored before.
                if tag.attribute(&attr.qualified(mirrored)).is_none() {
                    out.push(layout_usage(module, file, attr.span.clone(), attr, create_v17));
                }
            } else if is_gravity_attribute(&attr.local_name) {
                // Gravity always qualifies; its value is rewritten at commit.
                out.push(layout_usage(module, file, attr.span.clone(), attr, create_v17));
            }
        }
    }
}

fn layout_usage(
    module: &Module,
    file: &Path,
    span: std::ops::Range<usize>,
    attr: &droidres_xml::Attribute,
    create_v17: bool,
) -> RtlUsage {
    RtlUsage {
        module: module.name.clone(),
        file: file.to_path_buf(),
        span,
        kind: UsageKind::LayoutAttribute {
            attribute: attr.name.clone(),
            create_v17,
        },
    }
}

/// Child directories of a resource root whose names start with `layout`.
fn layout_subdirectories(res_dir: &Path) -> Vec<PathBuf> {
    let Ok(entries) = fs::read_dir(res_dir) else {
        return Vec::new();
    };
    let mut dirs: Vec<PathBuf> = entries
        .filter_map(Result::ok)
        .map(|e| e.path())
        .filter(|p| {
            p.is_dir()
                && p.file_name()
                    .is_some_and(|n| n.to_string_lossy().starts_with(FD_RES_LAYOUT))
        })
        .collect();
    dirs.sort();
    dirs
}

fn dir_has_entries(dir: &Path) -> bool {
    fs::read_dir(dir).is_ok_and(|mut entries| entries.next().is_some())
}
