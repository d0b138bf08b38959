use std::collections::HashMap;

use crate::models::{Customer, DailyTotal, Dataset, RecordId, Transaction};

/// Lowercase a raw name query so matching is case-insensitive.
pub fn normalize_name_filter(input: &str) -> String {
    input.to_lowercase()
}

/// Parse the longest leading decimal number in `input`, ignoring surrounding
/// whitespace. Trailing garbage is dropped: "12abc" parses as 12.
/// Returns None when the text does not start with a number.
pub fn parse_amount(input: &str) -> Option<f64> {
    let s = input.trim();
    let bytes = s.as_bytes();
    let mut end = 0;

    if matches!(bytes.first(), Some(b'+') | Some(b'-')) {
        end += 1;
    }
    let int_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    let mut digits = end - int_start;

    if end < bytes.len() && bytes[end] == b'.' {
        let frac_start = end + 1;
        let mut frac_end = frac_start;
        while frac_end < bytes.len() && bytes[frac_end].is_ascii_digit() {
            frac_end += 1;
        }
        digits += frac_end - frac_start;
        if digits > 0 {
            end = frac_end;
        }
    }
    if digits == 0 {
        return None;
    }

    // Exponent only counts when at least one digit follows it.
    if end < bytes.len() && (bytes[end] == b'e' || bytes[end] == b'E') {
        let mut exp_end = end + 1;
        if matches!(bytes.get(exp_end), Some(b'+') | Some(b'-')) {
            exp_end += 1;
        }
        let exp_digits_start = exp_end;
        while exp_end < bytes.len() && bytes[exp_end].is_ascii_digit() {
            exp_end += 1;
        }
        if exp_end > exp_digits_start {
            end = exp_end;
        }
    }

    s[..end].parse::<f64>().ok()
}

/// Customers matching the name query and the minimum amount, in source order.
///
/// An empty `name` skips the name check. A threshold of `None` or zero skips
/// the amount check; otherwise a customer needs at least one transaction with
/// `amount >= min_amount`.
pub fn filter_customers(dataset: &Dataset, name: &str, min_amount: Option<f64>) -> Vec<Customer> {
    let query = normalize_name_filter(name);
    let threshold = min_amount.filter(|a| *a != 0.0);

    dataset
        .customers
        .iter()
        .filter(|c| query.is_empty() || c.name.to_lowercase().contains(&query))
        .filter(|c| match threshold {
            None => true,
            Some(min) => dataset
                .transactions
                .iter()
                .any(|t| t.customer_id == c.id && t.amount >= min),
        })
        .cloned()
        .collect()
}

pub fn customer_transactions<'a>(dataset: &'a Dataset, customer_id: &RecordId) -> Vec<&'a Transaction> {
    dataset
        .transactions
        .iter()
        .filter(|t| &t.customer_id == customer_id)
        .collect()
}

/// Per-day sums over transactions belonging to `filtered` customers.
/// Dates are grouped by exact string equality and kept in first-seen order.
pub fn daily_totals(dataset: &Dataset, filtered: &[Customer]) -> Vec<DailyTotal> {
    if filtered.is_empty() {
        return Vec::new();
    }

    let mut totals: Vec<DailyTotal> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();

    for t in &dataset.transactions {
        if !filtered.iter().any(|c| c.id == t.customer_id) {
            continue;
        }
        match index.get(t.date.as_str()) {
            Some(&i) => totals[i].amount += t.amount,
            None => {
                index.insert(t.date.as_str(), totals.len());
                totals.push(DailyTotal {
                    date: t.date.clone(),
                    amount: t.amount,
                });
            }
        }
    }
    totals
}
