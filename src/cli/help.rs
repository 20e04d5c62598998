use crate::cli::io;
use crate::cli::output::section as output_section;
use crate::cli::registry::{CommandEntry, CommandRegistry};

pub fn print_overview(registry: &CommandRegistry) {
    output_section("Available commands");
    for entry in registry.list() {
        io::print_info(format!("  {:<12} {}", entry.name, entry.description));
    }
    io::print_info("Use `help <command>` for flags and an example.");
    io::print_info(
        "Scripts: set PROFIT_LEDGER_CLI_SCRIPT and pipe commands on stdin; \
         `delete` and `clear` then need --yes.",
    );
}

pub fn print_command(entry: &CommandEntry) {
    output_section(format!("Help: {}", entry.name));
    io::print_info(format!("  Description: {}", entry.description));
    io::print_info(format!("  Usage: {}", entry.usage));
    for flag in usage_flags(entry.usage) {
        io::print_info(format!("  {:<11} {}", flag, flag_description(flag)));
    }
    if let Some(example) = example(entry.name) {
        io::print_info(format!("  Example: {example}"));
    }
}

/// `--flags` named inside the optional `[...]` groups of a usage line.
fn usage_flags(usage: &str) -> Vec<&str> {
    usage
        .split_whitespace()
        .filter_map(|token| token.strip_prefix('[')?.strip_suffix(']'))
        .flat_map(|group| group.split('|'))
        .filter(|flag| flag.starts_with("--"))
        .collect()
}

fn flag_description(flag: &str) -> &'static str {
    match flag {
        "--yes" => "skip the confirmation prompt (-y also works)",
        "--replace" => "discard current entries and keep only the backup",
        "--merge" => "add backup entries whose id is not already present",
        _ => "",
    }
}

fn example(command: &str) -> Option<&'static str> {
    let example = match command {
        "add" => "add today 12000 600 3000",
        "delete" => "delete 2 --yes",
        "clear" => "clear --yes",
        "import" => "import backups/ashok_kumar_and_sons_backup_2024-01-10.json --merge",
        "export-json" => "export-json backups",
        "export-csv" => "export-csv reports",
        "help" => "help import",
        _ => return None,
    };
    Some(example)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_come_from_optional_groups() {
        assert_eq!(
            usage_flags("import <file.json> [--replace|--merge]"),
            vec!["--replace", "--merge"]
        );
        assert_eq!(usage_flags("delete <number> [--yes]"), vec!["--yes"]);
        assert!(usage_flags("export-csv [directory]").is_empty());
        assert!(usage_flags("summary").is_empty());
    }

    #[test]
    fn every_flag_has_a_description() {
        for usage in ["import <file.json> [--replace|--merge]", "clear [--yes]"] {
            for flag in usage_flags(usage) {
                assert!(!flag_description(flag).is_empty(), "{flag}");
            }
        }
        assert_eq!(example("summary"), None);
    }
}
