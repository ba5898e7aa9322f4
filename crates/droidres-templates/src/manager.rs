//! Template root discovery, merged listing, and the metadata cache.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::SystemTime;

use crate::metadata::TemplateMetadata;
use crate::{FD_EXTRAS, FD_TEMPLATES, FD_TOOLS};

/// Directories known to contain template subdirectories.
#[derive(Debug, Clone, Default)]
pub struct TemplateRoots {
    /// The primary root (`<sdk>/tools/templates`), when present.
    pub primary: Option<PathBuf>,
    /// Supplementary roots, consulted after the primary.
    pub extras: Vec<PathBuf>,
}

impl TemplateRoots {
    /// Build roots from explicit directories.
    #[must_use]
    pub fn new(primary: Option<PathBuf>, extras: Vec<PathBuf>) -> Self {
        Self { primary, extras }
    }

    /// Discover roots under an SDK installation.
    ///
    /// The primary root is `<sdk>/tools/templates`. Supplementary roots
    /// are `<sdk>/extras/<vendor>/<package>/templates`, plus the legacy
    /// `<sdk>/extras/templates` location. Missing directories are skipped.
    #[must_use]
    pub fn from_sdk<P: AsRef<Path>>(sdk_root: P) -> Self {
        let sdk_root = sdk_root.as_ref();

        let primary = Some(sdk_root.join(FD_TOOLS).join(FD_TEMPLATES)).filter(|p| p.is_dir());

        let mut extras = Vec::new();
        let extras_root = sdk_root.join(FD_EXTRAS);
        if extras_root.is_dir() {
            for vendor in subdirectories(&extras_root) {
                for package in subdirectories(&vendor) {
                    let folder = package.join(FD_TEMPLATES);
                    if folder.is_dir() {
                        extras.push(folder);
                    }
                }
            }

            // Legacy location
            let legacy = extras_root.join(FD_TEMPLATES);
            if legacy.is_dir() {
                extras.push(legacy);
            }
        }

        Self { primary, extras }
    }
}

/// Locates templates and caches their parsed metadata.
///
/// The cache maps template directory paths to parsed metadata and is
/// guarded by a mutex so concurrent callers are safe. Negative results
/// are cached too: a corrupt descriptor is parsed (and logged) once.
#[derive(Debug)]
pub struct TemplateManager {
    roots: TemplateRoots,
    cache: Mutex<HashMap<PathBuf, Option<Arc<TemplateMetadata>>>>,
}

impl TemplateManager {
    /// Create a manager over the given roots.
    #[must_use]
    pub fn new(roots: TemplateRoots) -> Self {
        Self {
            roots,
            cache: Mutex::new(HashMap::new()),
        }
    }

    /// The roots this manager scans.
    #[must_use]
    pub fn roots(&self) -> &TemplateRoots {
        &self.roots
    }

    /// List template directories of a category, merged across all roots.
    ///
    /// Subdirectories of `<primary>/<category>` come first; candidates
    /// from supplementary roots replace a same-named entry only when they
    /// win the revision comparison. The result is sorted by directory
    /// name (not full path). Missing roots yield an empty list.
    #[must_use]
    pub fn list_templates(&self, category: &str) -> Vec<PathBuf> {
        let mut templates: Vec<PathBuf> = Vec::new();
        let mut by_name: HashMap<String, usize> = HashMap::new();

        if let Some(primary) = &self.roots.primary {
            for dir in subdirectories(&primary.join(category)) {
                if let Some(name) = dir_name(&dir) {
                    by_name.insert(name, templates.len());
                    templates.push(dir);
                }
            }
        }

        for extra in &self.roots.extras {
            for dir in subdirectories(&extra.join(category)) {
                let Some(name) = dir_name(&dir) else { continue };
                if let Some(&index) = by_name.get(&name) {
                    if self.replaces(&templates[index], &dir) {
                        log::debug!(
                            "Template {name:?}: {dir:?} shadows {:?}",
                            templates[index]
                        );
                        templates[index] = dir;
                    }
                } else {
                    by_name.insert(name, templates.len());
                    templates.push(dir);
                }
            }
        }

        templates.sort_by_key(|dir| dir_name(dir).unwrap_or_default());
        templates
    }

    /// Cached metadata for a template directory.
    ///
    /// Parses the descriptor on first access; repeated calls return the
    /// same cached instance until [`invalidate`](Self::invalidate) is
    /// called. Returns `None` (not an error) when the directory lacks a
    /// parsable descriptor.
    #[must_use]
    pub fn metadata(&self, template_dir: &Path) -> Option<Arc<TemplateMetadata>> {
        let mut cache = self.cache.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(entry) = cache.get(template_dir) {
            return entry.clone();
        }

        let entry = TemplateMetadata::from_template_dir(template_dir).map(Arc::new);
        cache.insert(template_dir.to_path_buf(), entry.clone());
        entry
    }

    /// Drop all cached metadata.
    pub fn invalidate(&self) {
        self.cache
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }

    /// Whether `candidate` should replace the already-kept directory for
    /// the same template name: higher revision wins, a side without
    /// metadata loses, and a revision tie goes to the more recently
    /// modified directory.
    fn replaces(&self, kept: &Path, candidate: &Path) -> bool {
        match (self.metadata(kept), self.metadata(candidate)) {
            (None, _) => true,
            (Some(_), None) => false,
            (Some(kept_meta), Some(candidate_meta)) => {
                match candidate_meta.revision.cmp(&kept_meta.revision) {
                    std::cmp::Ordering::Greater => true,
                    std::cmp::Ordering::Less => false,
                    std::cmp::Ordering::Equal => modified_time(candidate) > modified_time(kept),
                }
            }
        }
    }
}

fn modified_time(path: &Path) -> Option<SystemTime> {
    fs::metadata(path).and_then(|m| m.modified()).ok()
}

fn dir_name(path: &Path) -> Option<String> {
    path.file_name().map(|n| n.to_string_lossy().into_owned())
}

/// Subdirectories of `path`, skipping plain files (`.DS_Store` etc).
/// A missing or unreadable directory yields an empty list.
fn subdirectories(path: &Path) -> Vec<PathBuf> {
    let Ok(entries) = fs::read_dir(path) else {
        return Vec::new();
    };
    entries
        .filter_map(Result::ok)
        .map(|e| e.path())
        .filter(|p| p.is_dir())
        .collect()
}
