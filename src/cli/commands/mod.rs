pub mod backup;
pub mod entry;
pub mod system;

use crate::cli::core::CommandError;
use crate::cli::registry::CommandRegistry;

pub(crate) fn register_all(registry: &mut CommandRegistry) {
    for entry in entry::definitions()
        .into_iter()
        .chain(backup::definitions())
        .chain(system::definitions())
    {
        registry.register(entry);
    }
}

/// Positional arguments with `--flags` removed.
pub(crate) fn positional<'a>(args: &[&'a str]) -> Vec<&'a str> {
    args.iter()
        .copied()
        .filter(|arg| !arg.starts_with("--") && *arg != "-y")
        .collect()
}

pub(crate) fn has_flag(args: &[&str], flag: &str) -> bool {
    args.iter().any(|arg| *arg == flag)
}

pub(crate) fn usage_error(usage: &str) -> CommandError {
    CommandError::InvalidArguments(format!("Usage: {usage}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn positional_drops_flags() {
        assert_eq!(positional(&["3", "--yes"]), vec!["3"]);
        assert_eq!(positional(&["-y", "file.json"]), vec!["file.json"]);
        assert!(has_flag(&["a", "--merge"], "--merge"));
    }

    #[test]
    fn every_command_is_registered_once() {
        let mut registry = CommandRegistry::new();
        register_all(&mut registry);
        let names: Vec<_> = registry.names().collect();
        for expected in [
            "add",
            "list",
            "summary",
            "delete",
            "clear",
            "sample",
            "import",
            "export-json",
            "export-csv",
            "backup",
            "status",
            "help",
            "version",
            "exit",
        ] {
            assert!(names.contains(&expected), "missing {expected}");
        }
        assert_eq!(names.len(), 14);
    }
}
