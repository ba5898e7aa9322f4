//! Commit phase: apply or preview a batch of usages.
//!
//! Edits are grouped per target file and applied in one splice pass.
//! Usages that must create a `-v17` qualifier variant first copy the base
//! file into the qualifier directory (at most once per batch, existence
//! is checked before creating) and rewrite the copy instead.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;

use droidres_xml::{Attribute, Document, ElementTag, TextEdit, edit, unified_diff};

use crate::options::RtlOptions;
use crate::table::{
    ATTR_SUPPORTS_RTL, ATTR_TARGET_SDK_VERSION, NODE_APPLICATION, NODE_USES_SDK,
    RES_V17_QUALIFIER, RES_V_QUALIFIER, RTL_TARGET_SDK_START, VALUE_TRUE, is_gravity_attribute,
    mirror_gravity_value, mirrored_attribute,
};
use crate::usage::{RtlUsage, UsageKind};

/// Outcome of [`apply`].
#[derive(Debug, Default, Serialize)]
pub struct ApplyReport {
    /// Files whose content changed on disk.
    pub files_changed: usize,
    /// Usages whose edit was applied.
    pub usages_applied: usize,
    /// Usages abandoned (unlocatable anchor, copy failure, ...).
    pub usages_skipped: usize,
    /// Qualifier-variant files created by this batch.
    pub files_created: Vec<PathBuf>,
    /// Errors encountered (file -> message).
    pub errors: HashMap<String, String>,
}

/// One per-file preview diff, produced by [`preview`].
#[derive(Debug, Clone, Serialize)]
pub struct FileDiff {
    /// The file the edits target (the `-v17` copy for variant usages).
    pub file: PathBuf,
    /// Unified diff from the current (or to-be-copied) content.
    pub diff: String,
}

/// Apply every usage's edit, best-effort.
///
/// Failures never abort the batch: a usage that cannot be committed is
/// logged, recorded in the report, and the rest proceeds.
#[must_use]
pub fn apply(usages: &[RtlUsage], options: &RtlOptions) -> ApplyReport {
    let mut report = ApplyReport::default();
    let batches = group_usages(usages, &mut report);

    for batch in batches.into_values() {
        apply_batch(&batch, options, &mut report);
    }
    report
}

/// Compute per-file unified diffs without touching disk.
///
/// For usages that would create a `-v17` variant, the diff is rendered
/// against the base file's content (the copy does not exist yet).
#[must_use]
pub fn preview(usages: &[RtlUsage], options: &RtlOptions) -> Vec<FileDiff> {
    let mut report = ApplyReport::default();
    let batches = group_usages(usages, &mut report);
    let mut diffs = Vec::new();

    for (target, batch) in batches {
        let Some(content) = batch_content(&batch) else {
            continue;
        };
        let Some((modified, _, _)) = plan_modified(&content, &batch, options, &mut report) else {
            continue;
        };
        let diff = unified_diff(&content, &modified);
        if !diff.is_empty() {
            diffs.push(FileDiff { file: target, diff });
        }
    }
    diffs
}

struct FileBatch<'a> {
    /// The file the usages (and their spans) were scanned from.
    source: PathBuf,
    /// The file the edits are written to.
    target: PathBuf,
    /// Whether `target` is a qualifier variant to create on first use.
    create_v17: bool,
    usages: Vec<&'a RtlUsage>,
}

fn group_usages<'a>(
    usages: &'a [RtlUsage],
    report: &mut ApplyReport,
) -> BTreeMap<PathBuf, FileBatch<'a>> {
    let mut batches: BTreeMap<PathBuf, FileBatch<'a>> = BTreeMap::new();

    for usage in usages {
        let (target, create_v17) = match &usage.kind {
            UsageKind::LayoutAttribute {
                create_v17: true, ..
            } => match v17_target(&usage.file) {
                Some(target) => (target, true),
                None => {
                    log::warn!("No qualifier variant target for {:?}", usage.file);
                    report.usages_skipped += 1;
                    continue;
                }
            },
            _ => (usage.file.clone(), false),
        };

        batches
            .entry(target.clone())
            .or_insert_with(|| FileBatch {
                source: usage.file.clone(),
                target,
                create_v17,
                usages: Vec::new(),
            })
            .usages
            .push(usage);
    }
    batches
}

/// Path of the `-v17` variant of a layout file, or `None` when the file
/// already lives in a version-qualified directory.
fn v17_target(file: &Path) -> Option<PathBuf> {
    let dir = file.parent()?;
    let dir_name = dir.file_name()?.to_string_lossy();
    if dir_name.contains(RES_V_QUALIFIER) {
        return None;
    }
    let variant_dir = dir.with_file_name(format!("{dir_name}{RES_V17_QUALIFIER}"));
    Some(variant_dir.join(file.file_name()?))
}

fn apply_batch(batch: &FileBatch<'_>, options: &RtlOptions, report: &mut ApplyReport) {
    if batch.create_v17 && !ensure_variant_file(batch, report) {
        report.usages_skipped += batch.usages.len();
        return;
    }

    let content = match fs::read_to_string(&batch.target) {
        Ok(content) => content,
        Err(e) => {
            log::error!("Cannot read {:?}: {e}", batch.target);
            record_error(report, &batch.target, &e.to_string());
            report.usages_skipped += batch.usages.len();
            return;
        }
    };

    let Some((modified, applied, skipped)) = plan_modified(&content, batch, options, report)
    else {
        return;
    };

    if modified != content {
        if let Err(e) = fs::write(&batch.target, &modified) {
            log::error!("Cannot write {:?}: {e}", batch.target);
            record_error(report, &batch.target, &e.to_string());
            report.usages_skipped += batch.usages.len();
            return;
        }
        report.files_changed += 1;
    }
    report.usages_applied += applied;
    report.usages_skipped += skipped;
}

/// Create the qualifier directory and file copy when missing.
///
/// Both checks are existence-first, so repeated calls within one batch
/// (or a re-run) are idempotent. Returns `false` when creation failed.
fn ensure_variant_file(batch: &FileBatch<'_>, report: &mut ApplyReport) -> bool {
    let Some(variant_dir) = batch.target.parent() else {
        return false;
    };

    if !variant_dir.exists() {
        if let Err(e) = fs::create_dir_all(variant_dir) {
            log::error!("Cannot create {variant_dir:?} directory: {e}");
            record_error(report, &batch.target, &e.to_string());
            return false;
        }
    }

    if !batch.target.exists() {
        if let Err(e) = fs::copy(&batch.source, &batch.target) {
            log::error!(
                "Cannot copy layout file {:?} to {:?} directory: {e}",
                batch.source,
                variant_dir
            );
            record_error(report, &batch.target, &e.to_string());
            return false;
        }
        report.files_created.push(batch.target.clone());
    }
    true
}

/// Plan and splice all edits of a batch against `content`.
///
/// Returns the rewritten text plus applied/skipped usage counts, or
/// `None` when the content cannot be parsed or the edits cannot be
/// applied (those failures also bump the skip counter in `report`).
fn plan_modified(
    content: &str,
    batch: &FileBatch<'_>,
    options: &RtlOptions,
    report: &mut ApplyReport,
) -> Option<(String, usize, usize)> {
    let doc = match Document::parse(content) {
        Ok(doc) => doc,
        Err(e) => {
            log::error!("Cannot parse {:?}: {e}", batch.target);
            record_error(report, &batch.target, &e.to_string());
            report.usages_skipped += batch.usages.len();
            return None;
        }
    };

    let mut edits: Vec<TextEdit> = Vec::new();
    let mut claimed: HashSet<usize> = HashSet::new();
    let mut applied = 0;
    let mut skipped = 0;

    for usage in &batch.usages {
        match plan_usage(&doc, usage, options, &mut claimed) {
            Some(mut usage_edits) => {
                edits.append(&mut usage_edits);
                applied += 1;
            }
            None => skipped += 1,
        }
    }

    match edit::apply_edits(content, edits) {
        Ok(modified) => Some((modified, applied, skipped)),
        Err(e) => {
            log::error!("Cannot apply edits to {:?}: {e}", batch.target);
            record_error(report, &batch.target, &e.to_string());
            report.usages_skipped += batch.usages.len();
            None
        }
    }
}

fn plan_usage(
    doc: &Document,
    usage: &RtlUsage,
    options: &RtlOptions,
    claimed: &mut HashSet<usize>,
) -> Option<Vec<TextEdit>> {
    match &usage.kind {
        UsageKind::ManifestSupportsRtl => {
            let tag = manifest_child(doc, NODE_APPLICATION, usage)?;
            Some(vec![set_or_insert(tag, ATTR_SUPPORTS_RTL, VALUE_TRUE)])
        }
        UsageKind::ManifestTargetSdk => {
            let tag = manifest_child(doc, NODE_USES_SDK, usage)?;
            Some(vec![set_or_insert(
                tag,
                ATTR_TARGET_SDK_VERSION,
                &RTL_TARGET_SDK_START.to_string(),
            )])
        }
        UsageKind::LayoutAttribute { attribute, .. } => {
            let (tag, attr) = locate_attribute(doc, usage, attribute, claimed)?;
            claimed.insert(attr.span.start);
            rewrite_attribute(tag, attr, options)
        }
    }
}

fn manifest_child<'a>(doc: &'a Document, name: &str, usage: &RtlUsage) -> Option<&'a ElementTag> {
    let root = doc.root_index()?;
    let tag = doc.find_child(root, name);
    if tag.is_none() {
        log::warn!("No <{name}> element in {:?}", usage.file);
    }
    tag
}

fn set_or_insert(tag: &ElementTag, name: &str, value: &str) -> TextEdit {
    match tag.attribute(name) {
        Some(attr) => edit::set_attribute_value(attr, value),
        None => edit::insert_attribute(tag, name, value),
    }
}

/// Find the attribute a layout usage refers to.
///
/// The scan span is authoritative (variant copies are byte-identical to
/// their source, so spans carry over); when it no longer matches, fall
/// back to the first unclaimed attribute with the recorded name.
fn locate_attribute<'a>(
    doc: &'a Document,
    usage: &RtlUsage,
    attribute: &str,
    claimed: &HashSet<usize>,
) -> Option<(&'a ElementTag, &'a Attribute)> {
    for tag in doc.tags() {
        for attr in &tag.attributes {
            if attr.span == usage.span && attr.name == attribute {
                return Some((tag, attr));
            }
        }
    }
    for tag in doc.tags() {
        for attr in &tag.attributes {
            if attr.name == attribute && !claimed.contains(&attr.span.start) {
                return Some((tag, attr));
            }
        }
    }
    log::warn!("Cannot locate attribute {attribute} in {:?}", usage.file);
    None
}

fn rewrite_attribute(
    tag: &ElementTag,
    attr: &Attribute,
    options: &RtlOptions,
) -> Option<Vec<TextEdit>> {
    if is_gravity_attribute(&attr.local_name) {
        // Special case: gravity mirrors its value, not its name.
        let new_value = mirror_gravity_value(&attr.value);
        log::debug!("Changing gravity from {:?} to {new_value:?}", attr.value);
        return Some(vec![edit::set_attribute_value(attr, &new_value)]);
    }

    let Some(mirrored) = mirrored_attribute(&attr.local_name) else {
        log::warn!("Cannot mirror attribute: {}", attr.name);
        return None;
    };
    let mirrored_name = attr.qualified(mirrored);

    if options.replace_left_right {
        log::debug!("Replacing attribute {} with {mirrored_name}", attr.name);
        Some(vec![edit::rename_attribute(attr, &mirrored_name)])
    } else {
        // The mirrored sibling may already exist on a variant copy.
        if tag.attribute(&mirrored_name).is_some() {
            return None;
        }
        log::debug!("Adding attribute {mirrored_name} alongside {}", attr.name);
        Some(vec![edit::insert_attribute(tag, &mirrored_name, &attr.value)])
    }
}

fn batch_content(batch: &FileBatch<'_>) -> Option<String> {
    let path = if batch.target.exists() {
        &batch.target
    } else {
        &batch.source
    };
    match fs::read_to_string(path) {
        Ok(content) => Some(content),
        Err(e) => {
            log::warn!("Cannot read {path:?}: {e}");
            None
        }
    }
}

fn record_error(report: &mut ApplyReport, file: &Path, message: &str) {
    report
        .errors
        .insert(file.display().to_string(), message.to_string());
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn usage(file: &Path, span: std::ops::Range<usize>, kind: UsageKind) -> RtlUsage {
        RtlUsage {
            module: "app".to_string(),
            file: file.to_path_buf(),
            span,
            kind,
        }
    }

    fn layout_usage(file: &Path, source: &str, attribute: &str, create_v17: bool) -> RtlUsage {
        let doc = Document::parse(source).unwrap();
        let attr = doc
            .tags()
            .iter()
            .find_map(|t| t.attribute(attribute))
            .unwrap();
        usage(
            file,
            attr.span.clone(),
            UsageKind::LayoutAttribute {
                attribute: attribute.to_string(),
                create_v17,
            },
        )
    }

    #[test]
    fn test_add_policy_keeps_legacy_attribute() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("main.xml");
        let source = r#"<TextView android:paddingLeft="4dp"/>"#;
        fs::write(&file, source).unwrap();

        let usages = vec![layout_usage(&file, source, "android:paddingLeft", false)];
        let report = apply(&usages, &RtlOptions::default());

        assert_eq!(report.files_changed, 1);
        assert_eq!(report.usages_applied, 1);
        assert_eq!(
            fs::read_to_string(&file).unwrap(),
            r#"<TextView android:paddingLeft="4dp" android:paddingStart="4dp"/>"#
        );
    }

    #[test]
    fn test_replace_policy_renames_in_place() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("main.xml");
        let source = r#"<TextView android:paddingLeft="4dp"/>"#;
        fs::write(&file, source).unwrap();

        let usages = vec![layout_usage(&file, source, "android:paddingLeft", false)];
        let options = RtlOptions {
            replace_left_right: true,
            ..RtlOptions::default()
        };
        apply(&usages, &options);

        assert_eq!(
            fs::read_to_string(&file).unwrap(),
            r#"<TextView android:paddingStart="4dp"/>"#
        );
    }

    #[test]
    fn test_gravity_value_is_token_substituted() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("main.xml");
        let source = r#"<LinearLayout android:gravity="left|center"/>"#;
        fs::write(&file, source).unwrap();

        let usages = vec![layout_usage(&file, source, "android:gravity", false)];
        apply(&usages, &RtlOptions::default());

        assert_eq!(
            fs::read_to_string(&file).unwrap(),
            r#"<LinearLayout android:gravity="start|center"/>"#
        );
    }

    #[test]
    fn test_manifest_attributes_set_and_inserted() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("AndroidManifest.xml");
        let source = r#"<manifest xmlns:android="http://schemas.android.com/apk/res/android">
    <uses-sdk android:targetSdkVersion="15"/>
    <application android:label="app"/>
</manifest>"#;
        fs::write(&file, source).unwrap();

        let usages = vec![
            usage(&file, 0..0, UsageKind::ManifestSupportsRtl),
            usage(&file, 0..0, UsageKind::ManifestTargetSdk),
        ];
        let report = apply(&usages, &RtlOptions::default());

        assert_eq!(report.usages_applied, 2);
        let updated = fs::read_to_string(&file).unwrap();
        assert!(updated.contains(
            r#"<application android:label="app" android:supportsRtl="true"/>"#
        ));
        assert!(updated.contains(r#"android:targetSdkVersion="17""#));
    }

    #[test]
    fn test_v17_copy_created_once_and_original_untouched() {
        let dir = TempDir::new().unwrap();
        let layout = dir.path().join("res/layout");
        fs::create_dir_all(&layout).unwrap();
        let file = layout.join("main.xml");
        let source = r#"<v android:paddingLeft="1dp" android:paddingRight="2dp"/>"#;
        fs::write(&file, source).unwrap();

        let usages = vec![
            layout_usage(&file, source, "android:paddingLeft", true),
            layout_usage(&file, source, "android:paddingRight", true),
        ];
        let report = apply(&usages, &RtlOptions::default());

        let variant = dir.path().join("res/layout-v17/main.xml");
        assert_eq!(report.files_created, vec![variant.clone()]);
        assert_eq!(report.usages_applied, 2);
        // Original is left alone; only the variant carries the mirrors.
        assert_eq!(fs::read_to_string(&file).unwrap(), source);
        let copied = fs::read_to_string(&variant).unwrap();
        assert!(copied.contains("android:paddingStart=\"1dp\""));
        assert!(copied.contains("android:paddingEnd=\"2dp\""));
    }

    #[test]
    fn test_v17_apply_is_idempotent_across_runs() {
        let dir = TempDir::new().unwrap();
        let layout = dir.path().join("res/layout");
        fs::create_dir_all(&layout).unwrap();
        let file = layout.join("main.xml");
        let source = r#"<v android:paddingLeft="1dp"/>"#;
        fs::write(&file, source).unwrap();

        let usages = vec![layout_usage(&file, source, "android:paddingLeft", true)];
        apply(&usages, &RtlOptions::default());
        let variant = dir.path().join("res/layout-v17/main.xml");
        let after_first = fs::read_to_string(&variant).unwrap();

        // Second run reuses the existing copy and finds the mirror present.
        let report = apply(&usages, &RtlOptions::default());
        assert!(report.files_created.is_empty());
        assert_eq!(fs::read_to_string(&variant).unwrap(), after_first);
    }

    #[test]
    fn test_unknown_attribute_is_recoverable_noop() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("main.xml");
        let source = r#"<v android:elevation="2dp"/>"#;
        fs::write(&file, source).unwrap();

        let usages = vec![layout_usage(&file, source, "android:elevation", false)];
        let report = apply(&usages, &RtlOptions::default());

        assert_eq!(report.usages_applied, 0);
        assert_eq!(report.usages_skipped, 1);
        assert_eq!(fs::read_to_string(&file).unwrap(), source);
    }

    #[test]
    fn test_preview_renders_diff_without_writing() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("main.xml");
        let source = "<v\n    android:gravity=\"right\"\n/>\n";
        fs::write(&file, source).unwrap();

        let usages = vec![layout_usage(&file, source, "android:gravity", false)];
        let diffs = preview(&usages, &RtlOptions::default());

        assert_eq!(diffs.len(), 1);
        assert!(diffs[0].diff.contains("-    android:gravity=\"right\""));
        assert!(diffs[0].diff.contains("+    android:gravity=\"end\""));
        assert_eq!(fs::read_to_string(&file).unwrap(), source);
    }

    #[test]
    fn test_preview_of_v17_usage_targets_variant_path() {
        let dir = TempDir::new().unwrap();
        let layout = dir.path().join("res/layout");
        fs::create_dir_all(&layout).unwrap();
        let file = layout.join("main.xml");
        let source = r#"<v android:paddingLeft="1dp"/>"#;
        fs::write(&file, source).unwrap();

        let usages = vec![layout_usage(&file, source, "android:paddingLeft", true)];
        let diffs = preview(&usages, &RtlOptions::default());

        assert_eq!(diffs.len(), 1);
        assert_eq!(diffs[0].file, dir.path().join("res/layout-v17/main.xml"));
        assert!(!dir.path().join("res/layout-v17").exists());
    }

    #[test]
    fn test_missing_target_file_is_reported_not_fatal() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("gone.xml");
        let usages = vec![usage(&missing, 0..0, UsageKind::ManifestSupportsRtl)];

        let report = apply(&usages, &RtlOptions::default());
        assert_eq!(report.usages_skipped, 1);
        assert_eq!(report.errors.len(), 1);
    }
}

