use serde::{Deserialize, Serialize};

use splitledger_core::ValueObject;

/// Supported currencies: (code, symbol, name).
const CATALOG: [(&str, &str, &str); 7] = [
    ("USD", "$", "US Dollar"),
    ("EUR", "€", "Euro"),
    ("GBP", "£", "British Pound"),
    ("INR", "₹", "Indian Rupee"),
    ("JPY", "¥", "Japanese Yen"),
    ("CAD", "C$", "Canadian Dollar"),
    ("AUD", "A$", "Australian Dollar"),
];

const DEFAULT_CODE: &str = "INR";

/// Display currency for a group. Amounts are never converted.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Currency {
    pub code: String,
    pub symbol: String,
    pub name: String,
}

impl Currency {
    fn from_entry((code, symbol, name): (&str, &str, &str)) -> Self {
        Self {
            code: code.to_string(),
            symbol: symbol.to_string(),
            name: name.to_string(),
        }
    }

    /// All supported currencies, in display order.
    pub fn catalog() -> Vec<Currency> {
        CATALOG.iter().copied().map(Self::from_entry).collect()
    }

    /// Look up a supported currency by ISO code (case-insensitive).
    pub fn by_code(code: &str) -> Option<Currency> {
        CATALOG
            .iter()
            .copied()
            .find(|(c, _, _)| c.eq_ignore_ascii_case(code.trim()))
            .map(Self::from_entry)
    }
}

impl Default for Currency {
    fn default() -> Self {
        CATALOG
            .iter()
            .copied()
            .find(|(c, _, _)| *c == DEFAULT_CODE)
            .map(Self::from_entry)
            .unwrap_or_else(|| Self::from_entry(CATALOG[0]))
    }
}

impl ValueObject for Currency {}
