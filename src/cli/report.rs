use colored::Colorize;
use comfy_table::{Cell, CellAlignment, Table};

use crate::client::ApiClient;
use crate::error::{Result, TallyError};
use crate::filters::customer_transactions;
use crate::fmt::money;
use crate::models::Dataset;
use crate::settings::Settings;
use crate::state::DashboardState;

/// Build the filtered view the same way the dashboard does.
pub fn build_state(data: Dataset, name: Option<&str>, min_amount: Option<&str>) -> DashboardState {
    let mut state = DashboardState::new();
    state.load(data);
    if let Some(n) = name {
        state.set_name_input(n);
    }
    if let Some(a) = min_amount {
        state.set_amount_input(a);
    }
    state
}

pub fn format_customers(state: &DashboardState) -> String {
    let mut table = Table::new();
    table.set_header(vec!["Customer ID", "Customer Name", "Date", "Amount"]);
    for customer in &state.filtered {
        let txns = customer_transactions(&state.data, &customer.id);
        let dates: Vec<&str> = txns.iter().map(|t| t.date.as_str()).collect();
        let amounts: Vec<String> = txns.iter().map(|t| money(t.amount)).collect();
        table.add_row(vec![
            Cell::new(&customer.id),
            Cell::new(&customer.name),
            Cell::new(dates.join("\n")),
            Cell::new(amounts.join("\n")).set_alignment(CellAlignment::Right),
        ]);
    }
    table.to_string()
}

pub fn format_daily_totals(state: &DashboardState) -> String {
    let mut table = Table::new();
    table.set_header(vec!["Date", "Total"]);
    for day in state.daily_totals() {
        table.add_row(vec![
            Cell::new(&day.date),
            Cell::new(money(day.amount)).set_alignment(CellAlignment::Right),
        ]);
    }
    table.to_string()
}

pub fn format_report(state: &DashboardState) -> String {
    let summary = state.summary();
    let mut filters = Vec::new();
    if !state.name_input.is_empty() {
        filters.push(format!("name: {}", state.name_input));
    }
    if let Some(min) = state.min_amount {
        filters.push(format!("min amount: {}", money(min)));
    }
    let filters_desc = if filters.is_empty() {
        "all customers".to_string()
    } else {
        filters.join(", ")
    };

    let mut out = String::new();
    out.push_str(&format!("Customer Transactions ({filters_desc})\n"));
    out.push_str(&format_customers(state));
    out.push_str("\n\nTransactions by day\n");
    out.push_str(&format_daily_totals(state));
    out.push_str(&format!(
        "\n\n{} customers, {} transactions, total {}\n",
        summary.customers,
        summary.transactions,
        money(summary.total)
    ));
    out
}

/// Fetch once and print the filtered view. Fetch failures print the same
/// message the dashboard shows and fail the command.
pub fn run(settings: &Settings, name: Option<String>, min_amount: Option<String>, json: bool) -> Result<()> {
    let client = ApiClient::from_settings(settings)?;
    let data = match client.fetch_dataset() {
        Ok(data) => data,
        Err(e) => {
            let mut state = DashboardState::new();
            state.fail(e.to_string());
            if json {
                println!("{}", serde_json::to_string_pretty(&state)?);
            }
            return Err(TallyError::Fetch(e.to_string()));
        }
    };

    let state = build_state(data, name.as_deref(), min_amount.as_deref());
    if json {
        println!("{}", serde_json::to_string_pretty(&state)?);
    } else {
        let text = format_report(&state);
        let (title, rest) = text.split_once('\n').unwrap_or((text.as_str(), ""));
        println!("{}", title.bold());
        print!("{rest}");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filters::tests::fixture;

    #[test]
    fn test_build_state_applies_filters() {
        let state = build_state(fixture(), Some("AHMED"), Some("1500"));
        assert_eq!(state.filtered.len(), 1);
        assert_eq!(state.min_amount, Some(1500.0));
    }

    #[test]
    fn test_format_customers_lists_transactions() {
        let state = build_state(fixture(), Some("aya"), None);
        let out = format_customers(&state);
        assert!(out.contains("Aya Elsayed"));
        assert!(out.contains("$550.00"));
        assert!(out.contains("$1,300.00"));
        assert!(!out.contains("Ahmed Ali"));
    }

    #[test]
    fn test_format_daily_totals() {
        let state = build_state(fixture(), None, None);
        let out = format_daily_totals(&state);
        assert!(out.contains("2022-01-01"));
        assert!(out.contains("$5,300.00"));
        assert!(out.contains("$5,425.00"));
    }

    #[test]
    fn test_format_report_describes_filters() {
        let state = build_state(fixture(), None, None);
        assert!(format_report(&state).starts_with("Customer Transactions (all customers)"));

        let state = build_state(fixture(), Some("mina"), Some("1000"));
        let out = format_report(&state);
        assert!(out.contains("name: mina"));
        assert!(out.contains("min amount: $1,000.00"));
        assert!(out.contains("1 customers, 2 transactions, total $1,750.00"));
    }

    #[test]
    fn test_unparseable_amount_is_ignored() {
        let state = build_state(fixture(), None, Some("lots"));
        assert_eq!(state.filtered.len(), 5);
        assert!(!format_report(&state).contains("min amount"));
    }
}
