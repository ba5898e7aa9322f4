//! Subcommand implementations: text or JSON on stdout, logs on stderr.

use std::path::Path;

use serde_json::json;

use droidres_rtl::{Project, RtlOptions, UsageKind, apply, find_usages, preview};
use droidres_templates::{TemplateManager, TemplateRoots};

use crate::cli::ScanScope;

pub(crate) fn templates_list(sdk_root: &Path, category: &str, json: bool) -> anyhow::Result<()> {
    let manager = TemplateManager::new(TemplateRoots::from_sdk(sdk_root));
    let templates = manager.list_templates(category);

    if json {
        let entries: Vec<serde_json::Value> = templates
            .iter()
            .map(|dir| json!({ "path": dir, "metadata": manager.metadata(dir) }))
            .collect();
        println!("{}", serde_json::to_string_pretty(&entries)?);
        return Ok(());
    }

    if templates.is_empty() {
        println!("No {category} templates found under {}", sdk_root.display());
        return Ok(());
    }
    for dir in &templates {
        match manager.metadata(dir) {
            Some(metadata) => println!(
                "{:<30} rev {:<3} {}",
                metadata.display_name(),
                metadata.revision,
                dir.display()
            ),
            None => println!("{:<30} rev ?   {}", "(no descriptor)", dir.display()),
        }
    }
    Ok(())
}

pub(crate) fn rtl_scan(root: &Path, scope: &ScanScope, json: bool) -> anyhow::Result<()> {
    let options = rtl_options(scope, false);
    let project = Project::discover(root);
    let usages = find_usages(&project, &options);

    if json {
        println!("{}", serde_json::to_string_pretty(&usages)?);
        return Ok(());
    }

    for usage in &usages {
        println!(
            "{}: {} ({})",
            usage.module,
            usage.file.display(),
            describe(&usage.kind)
        );
    }
    println!("{} usage(s) found", usages.len());
    Ok(())
}

pub(crate) fn rtl_apply(
    root: &Path,
    scope: &ScanScope,
    replace: bool,
    dry_run: bool,
) -> anyhow::Result<()> {
    let options = rtl_options(scope, replace);
    let project = Project::discover(root);
    let usages = find_usages(&project, &options);

    if dry_run {
        let diffs = preview(&usages, &options);
        for diff in &diffs {
            println!("--- {}", diff.file.display());
            println!("{}", diff.diff);
        }
        println!("{} file(s) would change", diffs.len());
        return Ok(());
    }

    let report = apply(&usages, &options);
    println!(
        "{} usage(s) applied, {} skipped, {} file(s) changed",
        report.usages_applied, report.usages_skipped, report.files_changed
    );
    for created in &report.files_created {
        println!("created {}", created.display());
    }
    for (file, message) in &report.errors {
        log::error!("{file}: {message}");
    }
    if report.errors.is_empty() {
        Ok(())
    } else {
        anyhow::bail!("{} file(s) failed", report.errors.len())
    }
}

fn rtl_options(scope: &ScanScope, replace: bool) -> RtlOptions {
    RtlOptions {
        update_manifest: !scope.no_manifest,
        update_layouts: !scope.no_layouts,
        generate_v17_resources: scope.v17,
        replace_left_right: replace,
    }
}

fn describe(kind: &UsageKind) -> String {
    match kind {
        UsageKind::ManifestSupportsRtl => "supportsRtl missing or false".to_string(),
        UsageKind::ManifestTargetSdk => "targetSdkVersion below 17".to_string(),
        UsageKind::LayoutAttribute { attribute, .. } => format!("attribute {attribute}"),
    }
}
