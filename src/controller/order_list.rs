use rust_decimal::Decimal;
use tracing::{debug, info, instrument};

use crate::backend::BackendClient;
use crate::domain::money::format_amount;
use crate::error::OrderViewError;
use crate::resource::{ResourceRef, Routes};

/// Whether saving a row's order creates it or updates it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowMode {
    Create,
    Update,
}

/// One delivery of the order list, with the user's order for it if any.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderListRow {
    pub delivery: ResourceRef,
    pub order: Option<ResourceRef>,
    pub amount: Option<Decimal>,
}

impl OrderListRow {
    pub fn new(delivery: ResourceRef) -> Self {
        Self {
            delivery,
            order: None,
            amount: None,
        }
    }

    pub fn with_order(mut self, order: ResourceRef, amount: Decimal) -> Self {
        self.order = Some(order);
        self.amount = Some(amount);
        self
    }

    pub fn mode(&self) -> RowMode {
        match self.order {
            Some(_) => RowMode::Update,
            None => RowMode::Create,
        }
    }

    pub fn amount_label(&self) -> String {
        match (&self.order, self.amount) {
            (Some(_), Some(amount)) => format!("{} €", format_amount(amount)),
            _ => "No order recorded".to_string(),
        }
    }
}

/// Builds the order list: open deliveries by date, each joined with the
/// user's order for it.
#[instrument(skip_all)]
pub async fn bootstrap_rows(client: &BackendClient, routes: &Routes) -> Result<Vec<OrderListRow>, OrderViewError> {
    let mut deliveries = client.list_deliveries(routes.deliveries().get()).await?;
    deliveries.sort_by_key(|d| d.date);
    let orders = client.list_orders(routes.orders().get()).await?;

    let mut rows = Vec::with_capacity(deliveries.len());
    for delivery in deliveries {
        let mut row = OrderListRow::new(routes.delivery(delivery.id));
        if let Some(summary) = orders.iter().find(|o| o.delivery_id == delivery.id) {
            let order_ref = routes.order(summary.id);
            let order = client.get_order(order_ref.get()).await?;
            debug!(delivery_id = delivery.id, order_id = summary.id, "Order found for delivery");
            row = row.with_order(order_ref, order.amount);
        }
        rows.push(row);
    }
    info!(rows = rows.len(), "Order list loaded");
    Ok(rows)
}
