use std::collections::BTreeMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use tokio::sync::mpsc;
use tracing::{debug, info, instrument, warn};

use super::{BackendClient, BackendError, BackendRequest};
use crate::domain::money::{format_amount, line_amount, order_total};
use crate::domain::{
    CreateOrderPayload, CreateOrderResponse, DeleteOrderResponse, Delivery, DeliverySummary, Order, OrderItem,
    OrderItemPayload, OrderSummary, UpdateOrderPayload, UpdateOrderResponse,
};
use crate::resource::{Method, ResourceDescriptor, Routes};

const INVALID_NEW_ORDER: &str =
    "Invalid order. All products must be available in the delivery and quantities must be greater than zero";
const INVALID_ORDER_UPDATE: &str =
    "All products must be available in the delivery and quantities must be greater than zero";

#[derive(Debug, Clone)]
struct StoredOrder {
    delivery_id: u64,
    items: Vec<OrderItemPayload>,
    message: String,
}

// =============================================================================
// IN-MEMORY BACKEND SERVICE
// =============================================================================

/// In-process stand-in for the basket server, for a single signed-in user.
///
/// Applies the server's ordering rules (deadlines, one order per delivery,
/// catalog membership) and computes amounts the way the server does.
#[derive(Debug)]
pub struct InMemoryBackend {
    receiver: mpsc::Receiver<BackendRequest>,
    today: NaiveDate,
    routes: Routes,
    deliveries: BTreeMap<u64, Delivery>,
    orders: BTreeMap<u64, StoredOrder>,
    next_order_id: u64,
}

impl InMemoryBackend {
    pub fn new(buffer_size: usize, today: NaiveDate, routes: Routes) -> (Self, BackendClient) {
        let (sender, receiver) = mpsc::channel(buffer_size);
        let backend = Self {
            receiver,
            today,
            routes,
            deliveries: BTreeMap::new(),
            orders: BTreeMap::new(),
            next_order_id: 1,
        };
        (backend, BackendClient::new(sender))
    }

    /// Registers a delivery. Deliveries without an id are ignored.
    pub fn add_delivery(&mut self, delivery: Delivery) {
        match delivery.id {
            Some(id) => {
                self.deliveries.insert(id, delivery);
            }
            None => warn!("Ignoring delivery without id"),
        }
    }

    /// Records an existing order, bypassing the deadline check.
    pub fn add_order(&mut self, delivery_id: u64, items: Vec<OrderItemPayload>) -> Result<u64, BackendError> {
        let delivery = self
            .deliveries
            .get(&delivery_id)
            .ok_or_else(|| BackendError::Server(format!("Delivery with id {} does not exist", delivery_id)))?;
        self.validate_items(delivery, &items, INVALID_NEW_ORDER)?;
        Ok(self.insert_order(delivery_id, items, String::new()))
    }

    #[instrument(name = "memory_backend", skip(self))]
    pub async fn run(mut self) {
        info!(today = %self.today, "InMemoryBackend starting");
        while let Some(msg) = self.receiver.recv().await {
            match msg {
                BackendRequest::GetDelivery { resource, respond_to } => {
                    let _ = respond_to.send(self.handle_get_delivery(&resource));
                }
                BackendRequest::GetOrder { resource, respond_to } => {
                    let _ = respond_to.send(self.handle_get_order(&resource));
                }
                BackendRequest::CreateOrder { resource, payload, respond_to } => {
                    let _ = respond_to.send(self.handle_create_order(&resource, payload));
                }
                BackendRequest::UpdateOrder { resource, payload, respond_to } => {
                    let _ = respond_to.send(self.handle_update_order(&resource, payload));
                }
                BackendRequest::DeleteOrder { resource, respond_to } => {
                    let _ = respond_to.send(self.handle_delete_order(&resource));
                }
                BackendRequest::ListDeliveries { resource, respond_to } => {
                    let _ = respond_to.send(self.handle_list_deliveries(&resource));
                }
                BackendRequest::ListOrders { resource, respond_to } => {
                    let _ = respond_to.send(self.handle_list_orders(&resource));
                }
            }
        }
        info!("InMemoryBackend stopped");
    }

    // -------------------------------------------------------------------------
    // Handlers
    // -------------------------------------------------------------------------

    #[instrument(skip_all, fields(resource = %resource))]
    fn handle_get_delivery(&self, resource: &ResourceDescriptor) -> Result<Delivery, BackendError> {
        expect_method(resource, Method::Get)?;
        let mut delivery = self.delivery(resource)?.clone();
        delivery.is_open = delivery.is_open_on(self.today);
        debug!(products = delivery.products.len(), "Delivery found");
        Ok(delivery)
    }

    #[instrument(skip_all, fields(resource = %resource))]
    fn handle_get_order(&self, resource: &ResourceDescriptor) -> Result<Order, BackendError> {
        expect_method(resource, Method::Get)?;
        let id = resource.id.ok_or(BackendError::Status(404))?;
        let stored = self.orders.get(&id).ok_or(BackendError::Status(404))?;
        self.render_order(id, stored)
    }

    #[instrument(skip_all, fields(resource = %resource, delivery_id = payload.delivery_id))]
    fn handle_create_order(
        &mut self,
        resource: &ResourceDescriptor,
        payload: CreateOrderPayload,
    ) -> Result<CreateOrderResponse, BackendError> {
        expect_method(resource, Method::Post)?;
        let delivery_id = payload.delivery_id;
        let delivery = self
            .deliveries
            .get(&delivery_id)
            .ok_or_else(|| BackendError::Server(format!("Delivery with id {} does not exist", delivery_id)))?;

        if !delivery.is_open_on(self.today) {
            return Err(BackendError::Server("Order deadline is passed for this delivery".to_string()));
        }
        if self.orders.values().any(|o| o.delivery_id == delivery_id) {
            return Err(BackendError::Server("User already has an order for this delivery".to_string()));
        }
        if payload.items.is_empty() {
            return Err(BackendError::Server("Order must contain at least one item".to_string()));
        }
        let amount = self.validate_items(delivery, &payload.items, INVALID_NEW_ORDER)?;

        let id = self.insert_order(delivery_id, payload.items, payload.message.unwrap_or_default());
        info!(order_id = id, amount = %amount, "Order created");
        Ok(CreateOrderResponse {
            url: self.routes.order(id).url,
            amount: format_amount(amount),
            message: "Order has been successfully created".to_string(),
        })
    }

    #[instrument(skip_all, fields(resource = %resource))]
    fn handle_update_order(
        &mut self,
        resource: &ResourceDescriptor,
        payload: UpdateOrderPayload,
    ) -> Result<UpdateOrderResponse, BackendError> {
        expect_method(resource, Method::Put)?;
        let id = resource.id.ok_or(BackendError::Status(404))?;
        let stored = self.orders.get(&id).ok_or(BackendError::Status(404))?;
        let delivery = self
            .deliveries
            .get(&stored.delivery_id)
            .ok_or(BackendError::Status(404))?;

        if !delivery.is_open_on(self.today) {
            return Err(BackendError::Server("Related delivery is closed. Order can't be updated".to_string()));
        }
        let amount = self.validate_items(delivery, &payload.items, INVALID_ORDER_UPDATE)?;

        if let Some(stored) = self.orders.get_mut(&id) {
            stored.items = payload.items;
            if let Some(message) = payload.message {
                stored.message = message;
            }
        }
        info!(order_id = id, amount = %amount, "Order updated");
        Ok(UpdateOrderResponse {
            amount: format_amount(amount),
            message: "Order has been successfully updated".to_string(),
        })
    }

    #[instrument(skip_all, fields(resource = %resource))]
    fn handle_delete_order(&mut self, resource: &ResourceDescriptor) -> Result<DeleteOrderResponse, BackendError> {
        expect_method(resource, Method::Delete)?;
        let id = resource.id.ok_or(BackendError::Status(404))?;
        self.orders.remove(&id).ok_or(BackendError::Status(404))?;
        info!(order_id = id, "Order deleted");
        Ok(DeleteOrderResponse {
            message: Some("Order has been successfully deleted".to_string()),
        })
    }

    fn handle_list_deliveries(&self, resource: &ResourceDescriptor) -> Result<Vec<DeliverySummary>, BackendError> {
        expect_method(resource, Method::Get)?;
        let mut open: Vec<DeliverySummary> = self
            .deliveries
            .iter()
            .filter(|(_, d)| d.is_open_on(self.today))
            .map(|(id, d)| DeliverySummary { id: *id, date: d.date })
            .collect();
        open.sort_by_key(|d| d.date);
        Ok(open)
    }

    fn handle_list_orders(&self, resource: &ResourceDescriptor) -> Result<Vec<OrderSummary>, BackendError> {
        expect_method(resource, Method::Get)?;
        Ok(self
            .orders
            .iter()
            .map(|(id, o)| OrderSummary { id: *id, delivery_id: o.delivery_id })
            .collect())
    }

    // -------------------------------------------------------------------------
    // Helpers
    // -------------------------------------------------------------------------

    fn delivery(&self, resource: &ResourceDescriptor) -> Result<&Delivery, BackendError> {
        resource
            .id
            .and_then(|id| self.deliveries.get(&id))
            .ok_or(BackendError::Status(404))
    }

    fn insert_order(&mut self, delivery_id: u64, items: Vec<OrderItemPayload>, message: String) -> u64 {
        let id = self.next_order_id;
        self.next_order_id += 1;
        self.orders.insert(id, StoredOrder { delivery_id, items, message });
        id
    }

    /// Checks every item against the catalog and returns the order amount.
    fn validate_items(
        &self,
        delivery: &Delivery,
        items: &[OrderItemPayload],
        invalid_message: &str,
    ) -> Result<Decimal, BackendError> {
        let mut amounts = Vec::with_capacity(items.len());
        for item in items {
            let known = self
                .deliveries
                .values()
                .any(|d| d.products.iter().any(|p| p.id == item.product_id));
            if !known {
                return Err(BackendError::Server(format!(
                    "Product with id {} does not exist",
                    item.product_id
                )));
            }
            match delivery.product(item.product_id) {
                Some(product) if item.quantity > 0 => amounts.push(line_amount(product.unit_price, item.quantity)),
                _ => return Err(BackendError::Server(invalid_message.to_string())),
            }
        }
        Ok(order_total(amounts))
    }

    fn render_order(&self, id: u64, stored: &StoredOrder) -> Result<Order, BackendError> {
        let delivery = self
            .deliveries
            .get(&stored.delivery_id)
            .ok_or(BackendError::Status(404))?;
        let items = stored
            .items
            .iter()
            .filter_map(|item| {
                delivery.product(item.product_id).map(|product| OrderItem {
                    product: product.clone(),
                    quantity: item.quantity,
                    amount: line_amount(product.unit_price, item.quantity),
                })
            })
            .collect::<Vec<_>>();
        let amount = order_total(items.iter().map(|i| i.amount));
        Ok(Order {
            id: Some(id),
            delivery_id: stored.delivery_id,
            items,
            amount,
            message: stored.message.clone(),
        })
    }
}

fn expect_method(resource: &ResourceDescriptor, method: Method) -> Result<(), BackendError> {
    if resource.method == method {
        Ok(())
    } else {
        Err(BackendError::Status(405))
    }
}
