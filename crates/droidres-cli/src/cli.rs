use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "droidres")]
#[command(about = "Android resource tooling: template discovery and RTL layout mirroring.")]
pub(crate) struct Cli {
    #[command(subcommand)]
    pub(crate) command: Command,
}

#[derive(Subcommand)]
pub(crate) enum Command {
    /// Template operations against an SDK installation.
    #[command(subcommand)]
    Templates(TemplatesCommand),

    /// RTL attribute scanning and rewriting.
    #[command(subcommand)]
    Rtl(RtlCommand),
}

#[derive(Subcommand)]
pub(crate) enum TemplatesCommand {
    /// List the templates of a category, duplicates merged.
    List {
        /// SDK installation root.
        #[arg(long)]
        sdk_root: PathBuf,

        /// Template category directory (e.g. activities, other)
        #[arg(long, default_value = "activities")]
        category: String,

        /// Emit machine-readable JSON instead of text.
        #[arg(long)]
        json: bool,
    },
}

#[derive(Subcommand)]
pub(crate) enum RtlCommand {
    /// Scan a project tree and report usages without changing anything.
    Scan {
        /// Project root to scan for modules.
        root: PathBuf,

        #[command(flatten)]
        scope: ScanScope,

        /// Emit machine-readable JSON instead of text.
        #[arg(long)]
        json: bool,
    },
    /// Rewrite the usages found under a project tree.
    Apply {
        /// Project root to scan for modules.
        root: PathBuf,

        #[command(flatten)]
        scope: ScanScope,

        /// Replace left/right attributes instead of adding start/end alongside.
        #[arg(long)]
        replace: bool,

        /// Print per-file diffs instead of writing anything.
        #[arg(long)]
        dry_run: bool,
    },
}

/// Flags shared by `rtl scan` and `rtl apply`.
#[derive(clap::Args)]
pub(crate) struct ScanScope {
    /// Leave manifests alone (supportsRtl, targetSdkVersion).
    #[arg(long)]
    pub(crate) no_manifest: bool,

    /// Leave layout resources alone.
    #[arg(long)]
    pub(crate) no_layouts: bool,

    /// Mirror into -v17 qualifier copies instead of the base layouts.
    #[arg(long)]
    pub(crate) v17: bool,
}
