use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::Product;

/// A scheduled delivery date with its product catalog and ordering deadline.
///
/// The detail endpoint does not echo the id back, so it is only present when
/// the delivery was built locally.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Delivery {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    pub date: NaiveDate,
    pub order_deadline: NaiveDate,
    pub is_open: bool,
    pub products: Vec<Product>,
    #[serde(default)]
    pub message: String,
}

impl Delivery {
    pub fn new(id: u64, date: NaiveDate, order_deadline: NaiveDate, products: Vec<Product>) -> Self {
        Self {
            id: Some(id),
            date,
            order_deadline,
            is_open: true,
            products,
            message: String::new(),
        }
    }

    /// Deliveries accept orders up to and including their deadline.
    pub fn is_open_on(&self, today: NaiveDate) -> bool {
        today <= self.order_deadline
    }

    pub fn product(&self, product_id: u64) -> Option<&Product> {
        self.products.iter().find(|p| p.id == product_id)
    }
}

/// Entry of the open deliveries listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeliverySummary {
    pub id: u64,
    pub date: NaiveDate,
}
