use chrono::NaiveDate;
use colored::{ColoredString, Colorize};
use uuid::Uuid;

use crate::core::services::{DebtStats, Distribution};
use crate::ledger::{DebtRecord, DebtStatus};

const SHORT_ID_LEN: usize = 8;

pub fn format_amount(symbol: &str, amount: f64) -> String {
    format!("{symbol} {amount:.2}")
}

/// Leading hex digits of the id, enough to address a debt from the CLI.
pub fn short_id(id: &Uuid) -> String {
    id.simple().to_string()[..SHORT_ID_LEN].to_string()
}

fn status_label(status: DebtStatus) -> ColoredString {
    match status {
        DebtStatus::Pending => status.as_str().yellow(),
        DebtStatus::Paid => status.as_str().green(),
        DebtStatus::Partial => status.as_str().cyan(),
    }
}

pub fn render_record(record: &DebtRecord, symbol: &str, today: NaiveDate) -> String {
    let mut line = format!(
        "{}  {:<16} {:>12}  {}",
        short_id(&record.id).dimmed(),
        record.person_name.bold(),
        format_amount(symbol, record.amount),
        status_label(record.status)
    );
    if let Some(category) = &record.category {
        line.push_str(&format!("  [{category}]"));
    }
    if !record.description.is_empty() {
        line.push_str(&format!("  {}", record.description));
    }
    if let Some(due) = record.due_date.filter(|_| !record.is_paid()) {
        if record.is_overdue(today) {
            line.push_str(&format!("  {}", format!("OVERDUE since {due}").red()));
        } else {
            line.push_str(&format!("  due {due}"));
        }
    }
    line
}

pub fn render_list(records: &[DebtRecord], symbol: &str, today: NaiveDate) -> String {
    if records.is_empty() {
        return "No debts recorded yet.".into();
    }
    let mut out = format!("{} items\n", records.len());
    for record in records {
        out.push_str(&render_record(record, symbol, today));
        out.push('\n');
    }
    out
}

pub fn render_stats(stats: &DebtStats, distribution: &Distribution, symbol: &str) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "Total owed: {}\n",
        format_amount(symbol, stats.total)
    ));
    out.push_str(&format!(
        "Collected:  {}\n",
        format_amount(symbol, stats.collected).green()
    ));
    out.push_str(&format!(
        "Pending:    {} ({} open)\n",
        format_amount(symbol, stats.pending).yellow(),
        stats.pending_count
    ));
    out.push_str("Distribution:\n");
    for slice in distribution {
        out.push_str(&format!(
            "  {:<10} {:>12}  {:>5.1}%\n",
            slice.label(),
            format_amount(symbol, slice.value),
            slice.share_of(stats.total)
        ));
    }
    out
}
