use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::domain::money::{format_amount, line_amount, order_total, round_amount};
use crate::domain::{Delivery, Order, OrderItemPayload};
use crate::error::OrderViewError;

/// One editable product line of the order form.
#[derive(Debug, Clone, PartialEq)]
pub struct LineItem {
    pub product_id: u64,
    pub name: String,
    pub unit_price: Decimal,
    pub quantity: u32,
    pub amount: Decimal,
}

impl LineItem {
    pub fn amount_display(&self) -> String {
        format_amount(self.amount)
    }
}

/// The order form for the selected delivery.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderView {
    pub delivery_id: u64,
    pub date: NaiveDate,
    pub order_deadline: NaiveDate,
    pub is_open: bool,
    pub has_order: bool,
    pub items: Vec<LineItem>,
    pub total: Decimal,
    pub message: String,
}

impl OrderView {
    /// One line per delivery product, in catalog order, pre-filled from the
    /// saved order when there is one.
    pub fn render(delivery_id: u64, delivery: &Delivery, order: Option<&Order>) -> Self {
        let mut view = Self {
            delivery_id,
            date: delivery.date,
            order_deadline: delivery.order_deadline,
            is_open: delivery.is_open,
            has_order: false,
            items: delivery
                .products
                .iter()
                .map(|product| LineItem {
                    product_id: product.id,
                    name: product.name.clone(),
                    unit_price: product.unit_price,
                    quantity: 0,
                    amount: round_amount(Decimal::ZERO),
                })
                .collect(),
            total: round_amount(Decimal::ZERO),
            message: String::new(),
        };
        if let Some(order) = order {
            view.apply_order(order);
        }
        view
    }

    /// Replaces quantities, amounts and total with the server's values.
    pub fn apply_order(&mut self, order: &Order) {
        for item in &mut self.items {
            match order.item(item.product_id) {
                Some(saved) => {
                    item.quantity = saved.quantity;
                    item.amount = round_amount(saved.amount);
                }
                None => {
                    item.quantity = 0;
                    item.amount = round_amount(Decimal::ZERO);
                }
            }
        }
        self.total = round_amount(order.amount);
        self.message = order.message.clone();
        self.has_order = true;
    }

    pub fn set_quantity(&mut self, product_id: u64, quantity: u32) -> Result<(), OrderViewError> {
        let item = self
            .items
            .iter_mut()
            .find(|item| item.product_id == product_id)
            .ok_or(OrderViewError::UnknownProduct(product_id))?;
        item.quantity = quantity;
        self.recompute();
        Ok(())
    }

    pub fn recompute(&mut self) {
        for item in &mut self.items {
            item.amount = line_amount(item.unit_price, item.quantity);
        }
        self.total = order_total(self.items.iter().map(|item| item.amount));
    }

    /// Items to submit: those with a positive quantity.
    pub fn selected_items(&self) -> Vec<OrderItemPayload> {
        self.items
            .iter()
            .filter(|item| item.quantity > 0)
            .map(|item| OrderItemPayload {
                product_id: item.product_id,
                quantity: item.quantity,
            })
            .collect()
    }

    /// Back to an empty, creatable form.
    pub fn reset(&mut self) {
        for item in &mut self.items {
            item.quantity = 0;
            item.amount = round_amount(Decimal::ZERO);
        }
        self.total = round_amount(Decimal::ZERO);
        self.message.clear();
        self.has_order = false;
    }

    pub fn total_display(&self) -> String {
        format_amount(self.total)
    }

    pub fn title(&self) -> String {
        if self.has_order {
            format!("Order for {} delivery", self.date)
        } else {
            format!("New order for {} delivery", self.date)
        }
    }

    pub fn subtitle(&self) -> String {
        if self.has_order {
            format!("Can be updated until: {}", self.order_deadline)
        } else {
            format!("Last day to order: {}", self.order_deadline)
        }
    }

    pub fn save_label(&self) -> &'static str {
        if self.has_order {
            "Update Order"
        } else {
            "Save Order"
        }
    }

    pub fn delete_visible(&self) -> bool {
        self.has_order && self.is_open
    }

    /// Saved orders get the dark border.
    pub fn emphasized(&self) -> bool {
        self.has_order
    }
}

// =============================================================================
// Alerts
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertLevel {
    Success,
    Danger,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alert {
    pub level: AlertLevel,
    pub message: String,
}

impl Alert {
    fn success(message: impl Into<String>) -> Self {
        Self { level: AlertLevel::Success, message: message.into() }
    }

    fn danger(message: impl Into<String>) -> Self {
        Self { level: AlertLevel::Danger, message: message.into() }
    }

    pub fn saved() -> Self {
        Self::success("Order has been successfully saved")
    }

    pub fn removed() -> Self {
        Self::success("Order has been successfully removed")
    }

    pub fn save_failed() -> Self {
        Self::danger("An error occurred when trying to save order. Please reload page and try again")
    }

    pub fn no_items() -> Self {
        Self::danger("At least one item must have quantity greater than 0")
    }

    pub fn unreachable() -> Self {
        Self::danger("Unable to reach the server. Please try again")
    }

    /// The alert shown for a failed operation, if any.
    pub fn for_error(error: &OrderViewError) -> Option<Self> {
        match error {
            OrderViewError::NoItemsSelected => Some(Self::no_items()),
            OrderViewError::AmountMismatch { .. } | OrderViewError::InvalidResource(_) => Some(Self::save_failed()),
            OrderViewError::Server(message) => Some(Self::danger(message.clone())),
            OrderViewError::Transport(_) => Some(Self::unreachable()),
            _ => None,
        }
    }
}
