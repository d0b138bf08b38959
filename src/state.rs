use serde::{Deserialize, Serialize};

use crate::filters::{self, parse_amount};
use crate::models::{Customer, DailyTotal, Dataset};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", content = "message", rename_all = "snake_case")]
pub enum LoadState {
    Loading,
    Ready,
    Failed(String),
}

/// Totals over the currently filtered view.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    pub customers: usize,
    pub transactions: usize,
    pub total: f64,
}

/// Everything the dashboard shows, independent of how it is drawn.
/// `filtered` is always derived from `data` and the two filter inputs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardState {
    pub data: Dataset,
    pub name_input: String,
    pub amount_input: String,
    pub min_amount: Option<f64>,
    pub filtered: Vec<Customer>,
    pub load: LoadState,
}

impl Default for DashboardState {
    fn default() -> Self {
        Self::new()
    }
}

impl DashboardState {
    pub fn new() -> Self {
        Self {
            data: Dataset::default(),
            name_input: String::new(),
            amount_input: String::new(),
            min_amount: None,
            filtered: Vec::new(),
            load: LoadState::Loading,
        }
    }

    pub fn load(&mut self, data: Dataset) {
        tracing::info!(
            customers = data.customers.len(),
            transactions = data.transactions.len(),
            "Dataset loaded"
        );
        self.filtered = data.customers.clone();
        self.data = data;
        self.load = LoadState::Ready;
        self.refilter();
    }

    pub fn fail(&mut self, message: impl Into<String>) {
        let message = message.into();
        tracing::error!(error = %message, "Error fetching data");
        self.load = LoadState::Failed(message);
    }

    pub fn error(&self) -> Option<&str> {
        match &self.load {
            LoadState::Failed(msg) => Some(msg),
            _ => None,
        }
    }

    pub fn set_name_input(&mut self, text: &str) {
        self.name_input = text.to_string();
        self.refilter();
    }

    pub fn push_name_char(&mut self, c: char) {
        self.name_input.push(c);
        self.refilter();
    }

    pub fn pop_name_char(&mut self) {
        self.name_input.pop();
        self.refilter();
    }

    pub fn set_amount_input(&mut self, text: &str) {
        self.amount_input = text.to_string();
        self.reparse_amount();
    }

    pub fn push_amount_char(&mut self, c: char) {
        self.amount_input.push(c);
        self.reparse_amount();
    }

    pub fn pop_amount_char(&mut self) {
        self.amount_input.pop();
        self.reparse_amount();
    }

    pub fn clear_filters(&mut self) {
        self.name_input.clear();
        self.amount_input.clear();
        self.min_amount = None;
        self.filtered = self.data.customers.clone();
    }

    pub fn daily_totals(&self) -> Vec<DailyTotal> {
        filters::daily_totals(&self.data, &self.filtered)
    }

    pub fn summary(&self) -> Summary {
        let mut transactions = 0;
        let mut total = 0.0;
        for t in &self.data.transactions {
            if self.filtered.iter().any(|c| c.id == t.customer_id) {
                transactions += 1;
                total += t.amount;
            }
        }
        Summary {
            customers: self.filtered.len(),
            transactions,
            total,
        }
    }

    fn reparse_amount(&mut self) {
        self.min_amount = parse_amount(&self.amount_input);
        self.refilter();
    }

    fn refilter(&mut self) {
        self.filtered = filters::filter_customers(&self.data, &self.name_input, self.min_amount);
        tracing::debug!(
            name = %self.name_input,
            min_amount = ?self.min_amount,
            matched = self.filtered.len(),
            "Filters applied"
        );
    }
}
