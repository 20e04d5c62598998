use std::path::{Path, PathBuf};

use crate::cli::commands::{has_flag, positional, usage_error};
use crate::cli::core::{CliMode, CommandResult, ShellContext};
use crate::cli::io;
use crate::cli::output::section as output_section;
use crate::cli::registry::CommandEntry;
use crate::core::services::ImportMode;
use crate::currency::format_display_datetime;

const IMPORT_USAGE: &str = "import <file.json> [--replace|--merge]";

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new(
            "import",
            "Restore entries from a JSON backup file",
            IMPORT_USAGE,
            cmd_import,
        ),
        CommandEntry::new(
            "export-json",
            "Export a JSON backup file",
            "export-json [directory]",
            cmd_export_json,
        ),
        CommandEntry::new(
            "export-csv",
            "Export entries as CSV",
            "export-csv [directory]",
            cmd_export_csv,
        ),
        CommandEntry::new("backup", "Snapshot entries now", "backup", cmd_backup),
        CommandEntry::new("status", "Show storage and backup status", "status", cmd_status),
    ]
}

fn cmd_import(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let [file] = positional(args)[..] else {
        return Err(usage_error(IMPORT_USAGE));
    };
    let candidate = context.manager.import_file(Path::new(file))?;
    io::print_info(format!("Found {} entries in backup.", candidate.len()));
    if candidate.skipped > 0 {
        io::print_warning(format!(
            "{} of {} records were not valid entries and were skipped.",
            candidate.skipped, candidate.total
        ));
    }

    let mode = if has_flag(args, "--replace") {
        ImportMode::Replace
    } else if has_flag(args, "--merge") || context.mode == CliMode::Script {
        ImportMode::Merge
    } else {
        let choice = io::select_option(
            &context.theme,
            "How should the backup be applied?",
            &["Replace all current data", "Merge with existing data"],
        )?;
        if choice == 0 {
            ImportMode::Replace
        } else {
            ImportMode::Merge
        }
    };
    context.manager.import_resolved(candidate, mode);
    Ok(())
}

fn export_target(context: &ShellContext, args: &[&str]) -> PathBuf {
    positional(args)
        .first()
        .map(PathBuf::from)
        .unwrap_or_else(|| context.export_dir())
}

fn cmd_export_json(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let dir = export_target(context, args);
    let path = context.manager.export_json(&dir)?;
    io::print_info(format!("Saved to {}", path.display()));
    Ok(())
}

fn cmd_export_csv(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let dir = export_target(context, args);
    let path = context.manager.export_csv(&dir)?;
    io::print_info(format!("Saved to {}", path.display()));
    Ok(())
}

fn cmd_backup(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let snapshot = context.manager.backup_now();
    if context.manager.last_backup().is_some() {
        io::print_success(format!(
            "Backup created ({} entries)",
            snapshot.total_entries
        ));
    } else {
        io::print_warning("Backup could not be written to every storage tier.");
    }
    Ok(())
}

fn cmd_status(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let manager = &context.manager;
    output_section("Status");
    match manager.last_backup() {
        Some(at) => io::print_success(format!("Last backup: {}", format_display_datetime(at))),
        None => io::print_warning("Last backup: never"),
    }
    io::print_info(format!(
        "  Next backup  : {}",
        format_display_datetime(manager.next_backup_due())
    ));
    io::print_info(format!("  Entries      : {}", manager.ledger().len()));
    if let Some(load) = manager.last_load() {
        let source = load.source.as_deref().unwrap_or("none (started fresh)");
        io::print_info(format!("  Loaded from  : {source}"));
        if load.skipped > 0 {
            io::print_info(format!("  Skipped      : {} invalid records", load.skipped));
        }
    }
    io::print_info(format!(
        "  Data dir     : {}",
        context.config_manager.store_dir().display()
    ));
    io::print_info(format!("  Export dir   : {}", context.export_dir().display()));
    Ok(())
}
