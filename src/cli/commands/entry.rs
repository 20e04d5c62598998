use chrono::Local;

use crate::cli::commands::{positional, usage_error};
use crate::cli::core::{CliMode, CommandError, CommandResult, ShellContext};
use crate::cli::io;
use crate::cli::output::{section as output_section, signed};
use crate::cli::registry::CommandEntry;
use crate::cli::ui::table::{Table, TableColumn, TableRenderer};
use crate::currency::{format_display_date, format_display_time};
use crate::domain::entry::ENTRY_DATE_FORMAT;
use crate::domain::EntryDraft;

const ADD_USAGE: &str = "add <date|today> <revenue> <commission> <expenses>";
const DELETE_USAGE: &str = "delete <number> [--yes]";

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new("add", "Record a day's figures", ADD_USAGE, cmd_add),
        CommandEntry::new("list", "Show all entries, newest first", "list", cmd_list),
        CommandEntry::new("summary", "Show totals and net profit", "summary", cmd_summary),
        CommandEntry::new("delete", "Delete one entry", DELETE_USAGE, cmd_delete),
        CommandEntry::new("clear", "Delete every entry", "clear [--yes]", cmd_clear),
        CommandEntry::new("sample", "Add three demonstration entries", "sample", cmd_sample),
    ]
}

fn cmd_add(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let fields: Vec<String> = if args.is_empty() && context.mode == CliMode::Interactive {
        prompt_entry_fields(context)?
    } else {
        args.iter().map(|arg| arg.to_string()).collect()
    };
    let [date, revenue, commission, expenses] = fields.as_slice() else {
        return Err(usage_error(ADD_USAGE));
    };

    let draft = EntryDraft::new(
        resolve_date(date),
        parse_amount(revenue),
        parse_amount(commission),
        parse_amount(expenses),
    );
    let entry = context.manager.add(&draft)?;
    io::print_info(format!(
        "{} | profit {}",
        format_display_date(&entry.date),
        signed(entry.profit, &context.money(entry.profit))
    ));
    Ok(())
}

fn prompt_entry_fields(context: &ShellContext) -> Result<Vec<String>, CommandError> {
    let today = Local::now().date_naive().format(ENTRY_DATE_FORMAT).to_string();
    let date = io::prompt_text(&context.theme, "Date (YYYY-MM-DD)", Some(&today))?;
    let symbol = context.config.currency_symbol.trim();
    let revenue = io::prompt_text(&context.theme, &format!("Revenue ({symbol})"), None)?;
    let commission = io::prompt_text(&context.theme, &format!("Commission ({symbol})"), None)?;
    let expenses = io::prompt_text(&context.theme, &format!("Expenses ({symbol})"), None)?;
    Ok(vec![date, revenue, commission, expenses])
}

fn resolve_date(raw: &str) -> String {
    if raw.eq_ignore_ascii_case("today") {
        Local::now().date_naive().format(ENTRY_DATE_FORMAT).to_string()
    } else {
        raw.trim().to_string()
    }
}

/// Unparseable amounts become NaN so the controller rejects the draft.
fn parse_amount(raw: &str) -> f64 {
    raw.trim().parse::<f64>().unwrap_or(f64::NAN)
}

fn cmd_list(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let ledger = context.manager.ledger();
    if ledger.is_empty() {
        io::print_info("No entries found. Add your first entry with `add`.");
        return Ok(());
    }
    let mut table = Table::new(
        Some(format!("{} entries", ledger.len())),
        vec![
            TableColumn::right("#"),
            TableColumn::left("Date"),
            TableColumn::left("Time"),
            TableColumn::right("Revenue"),
            TableColumn::right("Commission"),
            TableColumn::right("Expenses"),
            TableColumn::right("Profit"),
        ],
    );
    for (idx, entry) in ledger.iter().enumerate() {
        table.add_row(vec![
            (idx + 1).to_string(),
            format_display_date(&entry.date),
            format_display_time(&entry.timestamp),
            context.money(entry.revenue),
            context.money(entry.commission),
            context.money(entry.expenses),
            context.money(entry.profit),
        ]);
    }
    TableRenderer::render(&table);
    Ok(())
}

fn cmd_summary(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let totals = context.manager.aggregates();
    output_section(format!("{} summary", context.manager.company()));
    io::print_info(format!("  Total revenue    : {}", context.money(totals.total_revenue)));
    io::print_info(format!(
        "  Total commission : {}",
        context.money(totals.total_commission)
    ));
    io::print_info(format!("  Total expenses   : {}", context.money(totals.total_expenses)));
    io::print_info(format!(
        "  Net profit       : {}",
        signed(totals.net_profit, &context.money(totals.net_profit))
    ));
    Ok(())
}

fn cmd_delete(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let [number] = positional(args)[..] else {
        return Err(usage_error(DELETE_USAGE));
    };
    let index = number
        .parse::<usize>()
        .ok()
        .and_then(|value| value.checked_sub(1))
        .ok_or_else(|| {
            CommandError::InvalidArguments(format!("`{number}` is not an entry number"))
        })?;
    let confirmed = context.confirm("Are you sure you want to delete this entry?", args)?;
    if context.manager.delete_at(index, confirmed)?.is_none() {
        io::print_info("Deletion cancelled.");
    }
    Ok(())
}

fn cmd_clear(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let confirmed = context.confirm(
        "Are you sure you want to clear all entries? This action cannot be undone.",
        args,
    )?;
    if context.manager.clear(confirmed).is_none() {
        io::print_info("Clear cancelled.");
    }
    Ok(())
}

fn cmd_sample(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    context.manager.add_sample_entries();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn amounts_parse_strictly() {
        assert_eq!(parse_amount(" 12.5 "), 12.5);
        assert!(parse_amount("12abc").is_nan());
        assert!(parse_amount("").is_nan());
    }

    #[test]
    fn explicit_dates_pass_through() {
        assert_eq!(resolve_date(" 2024-01-10 "), "2024-01-10");
        assert_eq!(resolve_date("TODAY").len(), 10);
    }
}
