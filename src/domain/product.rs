use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A product offered in a delivery catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: u64,
    pub name: String,
    pub unit_price: Decimal,
}

impl Product {
    pub fn new(id: u64, name: impl Into<String>, unit_price: Decimal) -> Self {
        Self {
            id,
            name: name.into(),
            unit_price,
        }
    }
}
