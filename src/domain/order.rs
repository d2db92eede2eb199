use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::Product;

/// An order as returned by the order detail endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    pub delivery_id: u64,
    pub items: Vec<OrderItem>,
    pub amount: Decimal,
    #[serde(default)]
    pub message: String,
}

impl Order {
    pub fn item(&self, product_id: u64) -> Option<&OrderItem> {
        self.items.iter().find(|item| item.product.id == product_id)
    }
}

/// One product line of a saved order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderItem {
    pub product: Product,
    pub quantity: u32,
    pub amount: Decimal,
}

// =============================================================================
// Request payloads
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderItemPayload {
    pub product_id: u64,
    pub quantity: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateOrderPayload {
    pub delivery_id: u64,
    pub items: Vec<OrderItemPayload>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdateOrderPayload {
    pub items: Vec<OrderItemPayload>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

// =============================================================================
// Responses
// =============================================================================

/// Amounts stay strings here: the controller compares them verbatim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateOrderResponse {
    pub url: String,
    pub amount: String,
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdateOrderResponse {
    pub amount: String,
    #[serde(default)]
    pub message: String,
}

/// A missing message means the deletion was not acknowledged.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DeleteOrderResponse {
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderSummary {
    pub id: u64,
    pub delivery_id: u64,
}
