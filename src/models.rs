use std::fmt;

use serde::{Deserialize, Serialize};

/// Record identifier as served by the backend. json-server style APIs hand
/// out both numeric and string ids; `1` and `"1"` are different ids.
/// Numbers compare by value, so `1` and `1.0` are the same id.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RecordId {
    Int(i64),
    /// Fractional ids and integers outside the i64 range.
    Float(f64),
    Text(String),
}

impl PartialEq for RecordId {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (RecordId::Int(a), RecordId::Int(b)) => a == b,
            (RecordId::Float(a), RecordId::Float(b)) => a == b,
            (RecordId::Int(a), RecordId::Float(b)) | (RecordId::Float(b), RecordId::Int(a)) => {
                *a as f64 == *b
            }
            (RecordId::Text(a), RecordId::Text(b)) => a == b,
            _ => false,
        }
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordId::Int(n) => write!(f, "{n}"),
            RecordId::Float(n) => write!(f, "{n}"),
            RecordId::Text(s) => f.write_str(s),
        }
    }
}

impl From<i64> for RecordId {
    fn from(n: i64) -> Self {
        RecordId::Int(n)
    }
}

impl From<&str> for RecordId {
    fn from(s: &str) -> Self {
        RecordId::Text(s.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Customer {
    pub id: RecordId,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: RecordId,
    pub customer_id: RecordId,
    pub date: String,
    pub amount: f64,
}

/// Both collections as fetched from the backend.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    pub customers: Vec<Customer>,
    pub transactions: Vec<Transaction>,
}

/// Sum of transaction amounts for one date string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyTotal {
    pub date: String,
    pub amount: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_id_accepts_numbers_and_strings() {
        let json = r#"[{"id": 1, "name": "Ahmed Ali"}, {"id": "2", "name": "Aya Elsayed"}]"#;
        let customers: Vec<Customer> = serde_json::from_str(json).unwrap();
        assert_eq!(customers[0].id, RecordId::Int(1));
        assert_eq!(customers[1].id, RecordId::Text("2".to_string()));
        assert_ne!(RecordId::Int(2), RecordId::Text("2".to_string()));
    }

    #[test]
    fn test_transaction_ignores_unknown_fields() {
        let json = r#"{"id": 7, "customer_id": 1, "date": "2022-01-01", "amount": 1000, "note": "x"}"#;
        let t: Transaction = serde_json::from_str(json).unwrap();
        assert_eq!(t.customer_id, RecordId::Int(1));
        assert_eq!(t.date, "2022-01-01");
        assert_eq!(t.amount, 1000.0);
    }

    #[test]
    fn test_record_id_accepts_float_and_large_numbers() {
        let json = r#"[{"id": 1.0, "name": "Float Id"}, {"id": 18446744073709551615, "name": "Big Id"}]"#;
        let customers: Vec<Customer> = serde_json::from_str(json).unwrap();
        assert!(matches!(customers[0].id, RecordId::Float(_)));
        assert_eq!(customers[0].id, RecordId::Int(1));
        assert!(matches!(customers[1].id, RecordId::Float(_)));
        assert_eq!(customers[0].id.to_string(), "1");
    }

    #[test]
    fn test_numeric_ids_never_equal_text_ids() {
        assert_ne!(RecordId::Float(1.0), RecordId::Text("1".to_string()));
        assert_ne!(RecordId::Float(1.5), RecordId::Int(1));
    }

    #[test]
    fn test_record_id_display() {
        assert_eq!(RecordId::Int(42).to_string(), "42");
        assert_eq!(RecordId::from("a1").to_string(), "a1");
    }
}
