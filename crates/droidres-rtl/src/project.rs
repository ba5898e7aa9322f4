//! Lightweight project model: modules with a manifest and resource roots.

use std::fs;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::table::ANDROID_MANIFEST;

const SKIP_DIRS: &[&str] = &[".git", "build", "target", "gen", "out"];

/// One buildable module: a manifest plus its resource directories.
#[derive(Debug, Clone)]
pub struct Module {
    /// Module name (its directory name).
    pub name: String,
    /// Path to the module's `AndroidManifest.xml`.
    pub manifest: PathBuf,
    /// Resource roots (usually one `res/` directory).
    pub res_dirs: Vec<PathBuf>,
    /// Library modules are skipped by the rewriter.
    pub is_library: bool,
}

/// A set of modules to scan.
#[derive(Debug, Clone, Default)]
pub struct Project {
    /// All modules, library or not.
    pub modules: Vec<Module>,
}

impl Project {
    /// Build a project from explicit modules.
    #[must_use]
    pub fn new(modules: Vec<Module>) -> Self {
        Self { modules }
    }

    /// Discover modules under a root directory.
    ///
    /// Every `AndroidManifest.xml` found (build output and VCS
    /// directories excluded) defines a module, with a sibling `res/`
    /// directory as its resource root when present. A module is marked as
    /// a library when its `project.properties` declares
    /// `android.library=true`.
    #[must_use]
    pub fn discover<P: AsRef<Path>>(root: P) -> Self {
        let root = root.as_ref();
        let mut modules = Vec::new();

        let walker = WalkDir::new(root).into_iter().filter_entry(|entry| {
            let name = entry.file_name().to_string_lossy();
            !(entry.file_type().is_dir() && SKIP_DIRS.contains(&name.as_ref()))
        });

        for entry in walker.filter_map(Result::ok) {
            if !entry.file_type().is_file() || entry.file_name() != ANDROID_MANIFEST {
                continue;
            }
            let Some(module_dir) = entry.path().parent() else {
                continue;
            };

            let name = module_dir
                .file_name()
                .map_or_else(|| "project".to_string(), |n| n.to_string_lossy().into_owned());

            let res = module_dir.join("res");
            let res_dirs = if res.is_dir() { vec![res] } else { Vec::new() };

            modules.push(Module {
                name,
                manifest: entry.path().to_path_buf(),
                res_dirs,
                is_library: is_library_module(module_dir),
            });
        }

        log::debug!("Discovered {} module(s) under {root:?}", modules.len());
        Self { modules }
    }

    /// Modules the rewriter operates on.
    pub fn application_modules(&self) -> impl Iterator<Item = &Module> {
        self.modules.iter().filter(|m| !m.is_library)
    }
}

fn is_library_module(module_dir: &Path) -> bool {
    let Ok(properties) = fs::read_to_string(module_dir.join("project.properties")) else {
        return false;
    };
    properties
        .lines()
        .any(|line| line.trim() == "android.library=true")
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write_manifest(dir: &Path) {
        fs::create_dir_all(dir).unwrap();
        fs::write(dir.join(ANDROID_MANIFEST), "<manifest/>").unwrap();
    }

    #[test]
    fn test_discover_finds_modules_and_res_dirs() {
        let root = TempDir::new().unwrap();
        let app = root.path().join("app");
        write_manifest(&app);
        fs::create_dir_all(app.join("res/layout")).unwrap();

        let other = root.path().join("other");
        write_manifest(&other);

        let project = Project::discover(root.path());
        assert_eq!(project.modules.len(), 2);

        let app_module = project.modules.iter().find(|m| m.name == "app").unwrap();
        assert_eq!(app_module.res_dirs, vec![app.join("res")]);
        assert!(!app_module.is_library);

        let other_module = project.modules.iter().find(|m| m.name == "other").unwrap();
        assert!(other_module.res_dirs.is_empty());
    }

    #[test]
    fn test_discover_skips_build_output() {
        let root = TempDir::new().unwrap();
        write_manifest(&root.path().join("app"));
        write_manifest(&root.path().join("app/build/intermediates"));

        let project = Project::discover(root.path());
        assert_eq!(project.modules.len(), 1);
    }

    #[test]
    fn test_library_modules_are_flagged_and_filtered() {
        let root = TempDir::new().unwrap();
        let lib = root.path().join("lib");
        write_manifest(&lib);
        fs::write(
            lib.join("project.properties"),
            "target=android-19\nandroid.library=true\n",
        )
        .unwrap();
        write_manifest(&root.path().join("app"));

        let project = Project::discover(root.path());
        assert_eq!(project.modules.len(), 2);

        let names: Vec<&str> = project
            .application_modules()
            .map(|m| m.name.as_str())
            .collect();
        assert_eq!(names, vec!["app"]);
    }
}
