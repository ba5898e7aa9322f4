//! droidres CLI: template listing plus RTL scanning and rewriting.
//!
//! Logging: set `RUST_LOG=droidres=debug` (or `info`, `warn`) to see
//! library logs on stderr. Command output goes to stdout.

mod cli;
mod commands;

use clap::Parser;

use crate::cli::{Cli, Command, RtlCommand, TemplatesCommand};

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("droidres=info"))
        .format_timestamp(None)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Command::Templates(TemplatesCommand::List {
            sdk_root,
            category,
            json,
        }) => commands::templates_list(&sdk_root, &category, json),
        Command::Rtl(RtlCommand::Scan { root, scope, json }) => {
            commands::rtl_scan(&root, &scope, json)
        }
        Command::Rtl(RtlCommand::Apply {
            root,
            scope,
            replace,
            dry_run,
        }) => commands::rtl_apply(&root, &scope, replace, dry_run),
    }
}
