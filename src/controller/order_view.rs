use std::sync::Arc;

use rust_decimal::Decimal;
use tokio::sync::Mutex;
use tracing::{debug, error, info, instrument, warn};

use super::order_list::OrderListRow;
use super::view::{Alert, OrderView};
use crate::backend::BackendClient;
use crate::domain::money::format_amount;
use crate::domain::{CreateOrderPayload, OrderItemPayload, UpdateOrderPayload};
use crate::error::OrderViewError;
use crate::resource::ResourceRef;

/// What a successful save did.
#[derive(Debug, Clone, PartialEq)]
pub enum SaveOutcome {
    Created(ResourceRef),
    Updated,
}

#[derive(Debug, Default)]
struct ViewState {
    rows: Vec<OrderListRow>,
    selected: Option<usize>,
    /// Bumped on every selection; responses carrying an older value are stale.
    generation: u64,
    view: Option<OrderView>,
    alert: Option<Alert>,
    /// Set while a save or delete is in flight.
    pending: bool,
}

impl ViewState {
    /// Shows the form of `row` as saved once the row has an order on the server.
    fn mark_saved(&mut self, row: usize) {
        let saved = self.rows.get(row).is_some_and(|entry| entry.order.is_some());
        if saved && self.selected == Some(row) {
            if let Some(view) = self.view.as_mut() {
                view.has_order = true;
            }
        }
    }
}

/// A save captured at submission time.
#[derive(Debug)]
struct Submission {
    generation: u64,
    row: usize,
    entry: OrderListRow,
    delivery_id: u64,
    items: Vec<OrderItemPayload>,
    message: Option<String>,
    total: Decimal,
    total_display: String,
}

/// Controller of the order page: an order list on one side, the order form of
/// the selected delivery on the other.
///
/// State lives behind an async mutex that is never held across a back-end
/// call, so the controller can be cloned into concurrent tasks the way UI
/// event handlers would fire.
#[derive(Debug, Clone)]
pub struct OrderViewController {
    client: BackendClient,
    create_order: ResourceRef,
    state: Arc<Mutex<ViewState>>,
}

impl OrderViewController {
    pub fn new(client: BackendClient, create_order: ResourceRef, rows: Vec<OrderListRow>) -> Self {
        Self {
            client,
            create_order,
            state: Arc::new(Mutex::new(ViewState {
                rows,
                ..ViewState::default()
            })),
        }
    }

    pub async fn rows(&self) -> Vec<OrderListRow> {
        self.state.lock().await.rows.clone()
    }

    pub async fn view(&self) -> Option<OrderView> {
        self.state.lock().await.view.clone()
    }

    pub async fn alert(&self) -> Option<Alert> {
        self.state.lock().await.alert.clone()
    }

    pub async fn selected(&self) -> Option<usize> {
        self.state.lock().await.selected
    }

    pub async fn is_pending(&self) -> bool {
        self.state.lock().await.pending
    }

    // =========================================================================
    // Selection
    // =========================================================================

    /// Selects a row and renders its order form from freshly fetched data.
    ///
    /// Returns [`OrderViewError::Superseded`] without rendering anything when
    /// another selection happened while the data was in flight.
    #[instrument(skip(self))]
    pub async fn select(&self, row: usize) -> Result<(), OrderViewError> {
        let (generation, entry) = {
            let mut guard = self.state.lock().await;
            let state = &mut *guard;
            let entry = state.rows.get(row).cloned().ok_or(OrderViewError::UnknownRow(row))?;
            state.generation += 1;
            state.selected = Some(row);
            state.view = None;
            state.alert = None;
            (state.generation, entry)
        };
        debug!(generation, "Fetching delivery and order");

        let fetched = self.fetch_view(&entry).await;

        let mut guard = self.state.lock().await;
        let state = &mut *guard;
        if state.generation != generation {
            debug!(generation, current = state.generation, "Discarding stale response");
            return Err(OrderViewError::Superseded);
        }
        match fetched {
            Ok(view) => {
                info!(delivery_id = view.delivery_id, has_order = view.has_order, "Order view rendered");
                state.view = Some(view);
                // A create may have finished while the delivery was loading
                state.mark_saved(row);
                Ok(())
            }
            Err(e) => {
                error!(error = %e, "Loading order view failed");
                state.alert = Alert::for_error(&e);
                Err(e)
            }
        }
    }

    async fn fetch_view(&self, entry: &OrderListRow) -> Result<OrderView, OrderViewError> {
        let delivery = self.client.get_delivery(entry.delivery.get()).await?;
        let order = match &entry.order {
            Some(order) => Some(self.client.get_order(order.get()).await?),
            None => None,
        };
        let delivery_id = entry
            .delivery
            .id
            .or(delivery.id)
            .ok_or_else(|| OrderViewError::InvalidResource(entry.delivery.url.clone()))?;
        Ok(OrderView::render(delivery_id, &delivery, order.as_ref()))
    }

    // =========================================================================
    // Editing
    // =========================================================================

    /// Changes one line's quantity and recomputes the amounts.
    pub async fn set_quantity(&self, product_id: u64, quantity: u32) -> Result<Decimal, OrderViewError> {
        let mut guard = self.state.lock().await;
        let state = &mut *guard;
        let view = state.view.as_mut().ok_or(OrderViewError::NoSelection)?;
        view.set_quantity(product_id, quantity)?;
        state.alert = None;
        Ok(view.total)
    }

    /// Recomputes line amounts and the total from the current quantities.
    pub async fn recompute(&self) -> Result<Decimal, OrderViewError> {
        let mut guard = self.state.lock().await;
        let view = guard.view.as_mut().ok_or(OrderViewError::NoSelection)?;
        view.recompute();
        Ok(view.total)
    }

    pub async fn set_message(&self, message: impl Into<String>) -> Result<(), OrderViewError> {
        let mut guard = self.state.lock().await;
        let view = guard.view.as_mut().ok_or(OrderViewError::NoSelection)?;
        view.message = message.into();
        Ok(())
    }

    // =========================================================================
    // Save
    // =========================================================================

    /// Creates or updates the selected delivery's order.
    ///
    /// Succeeds only when the server's total equals the displayed total.
    #[instrument(skip(self))]
    pub async fn save(&self) -> Result<SaveOutcome, OrderViewError> {
        let submission = {
            let mut guard = self.state.lock().await;
            let state = &mut *guard;
            let row = state.selected.ok_or(OrderViewError::NoSelection)?;
            let view = state.view.as_ref().ok_or(OrderViewError::NoSelection)?;
            if state.pending {
                return Err(OrderViewError::RequestPending);
            }

            let items = view.selected_items();
            if items.is_empty() {
                warn!("No item with a positive quantity");
                state.alert = Some(Alert::no_items());
                return Err(OrderViewError::NoItemsSelected);
            }

            let entry = state.rows.get(row).cloned().ok_or(OrderViewError::UnknownRow(row))?;
            let submission = Submission {
                generation: state.generation,
                row,
                entry,
                delivery_id: view.delivery_id,
                items,
                message: (!view.message.is_empty()).then(|| view.message.clone()),
                total: view.total,
                total_display: view.total_display(),
            };
            state.pending = true;
            submission
        };

        let result = self.submit(&submission).await;
        self.finish_save(submission, result).await
    }

    async fn submit(&self, submission: &Submission) -> Result<(String, Option<ResourceRef>), OrderViewError> {
        match &submission.entry.order {
            None => {
                info!(delivery_id = submission.delivery_id, "Creating order");
                let payload = CreateOrderPayload {
                    delivery_id: submission.delivery_id,
                    items: submission.items.clone(),
                    message: submission.message.clone(),
                };
                let response = self.client.create_order(self.create_order.post(), payload).await?;
                let created = ResourceRef::order_from_url(&response.url)?;
                Ok((response.amount, Some(created)))
            }
            Some(order) => {
                info!(order = %order.url, "Updating order");
                let payload = UpdateOrderPayload {
                    items: submission.items.clone(),
                    message: submission.message.clone(),
                };
                let response = self.client.update_order(order.put(), payload).await?;
                Ok((response.amount, None))
            }
        }
    }

    async fn finish_save(
        &self,
        submission: Submission,
        result: Result<(String, Option<ResourceRef>), OrderViewError>,
    ) -> Result<SaveOutcome, OrderViewError> {
        let mut guard = self.state.lock().await;
        let state = &mut *guard;
        state.pending = false;

        let (server_amount, created) = match result {
            Ok(reply) => reply,
            Err(e) => {
                error!(error = %e, "Saving order failed");
                state.alert = Alert::for_error(&e);
                return Err(e);
            }
        };

        // The server holds an order for this delivery now, whatever the amount says.
        let order_ref = created.clone().or_else(|| submission.entry.order.clone());
        if let Some(row) = state.rows.get_mut(submission.row) {
            row.order = order_ref.clone();
        }
        state.mark_saved(submission.row);

        if server_amount == submission.total_display {
            if let Some(row) = state.rows.get_mut(submission.row) {
                row.amount = Some(submission.total);
            }
            state.alert = Some(Alert::saved());
            info!(amount = %server_amount, "Order saved");
            return Ok(match created {
                Some(order) => SaveOutcome::Created(order),
                None => SaveOutcome::Updated,
            });
        }

        warn!(
            server = %server_amount,
            local = %submission.total_display,
            "Server amount differs from displayed amount"
        );
        state.alert = Some(Alert::save_failed());
        drop(guard);

        if let Some(order) = order_ref {
            self.reconcile(submission.generation, submission.row, &order).await;
        }
        Err(OrderViewError::AmountMismatch {
            server: server_amount,
            local: submission.total_display,
        })
    }

    /// Replaces local state with the server's copy of the order.
    #[instrument(skip(self, order), fields(order = %order.url))]
    async fn reconcile(&self, generation: u64, row: usize, order: &ResourceRef) {
        let fetched = self.client.get_order(order.get()).await;

        let mut guard = self.state.lock().await;
        let state = &mut *guard;
        match fetched {
            Ok(order) => {
                debug!(amount = %format_amount(order.amount), "Authoritative order fetched");
                if let Some(entry) = state.rows.get_mut(row) {
                    entry.amount = Some(order.amount);
                }
                if state.generation == generation {
                    if let Some(view) = state.view.as_mut() {
                        view.apply_order(&order);
                    }
                }
            }
            Err(e) => warn!(error = %e, "Refetching order failed"),
        }
    }

    // =========================================================================
    // Delete
    // =========================================================================

    /// Deletes the selected delivery's saved order.
    #[instrument(skip(self))]
    pub async fn delete(&self) -> Result<(), OrderViewError> {
        let (generation, row, order) = {
            let mut guard = self.state.lock().await;
            let state = &mut *guard;
            let row = state.selected.ok_or(OrderViewError::NoSelection)?;
            let view = state.view.as_ref().ok_or(OrderViewError::NoSelection)?;
            if state.pending {
                return Err(OrderViewError::RequestPending);
            }
            let order = state
                .rows
                .get(row)
                .ok_or(OrderViewError::UnknownRow(row))?
                .order
                .clone()
                .ok_or(OrderViewError::NoOrder)?;
            if !view.is_open {
                return Err(OrderViewError::DeliveryClosed);
            }
            state.pending = true;
            (state.generation, row, order)
        };

        info!(order = %order.url, "Deleting order");
        let result = match self.client.delete_order(order.delete()).await {
            Ok(ack) => ack
                .message
                .ok_or_else(|| OrderViewError::Transport("Order deletion was not acknowledged".to_string())),
            Err(e) => Err(e.into()),
        };

        let mut guard = self.state.lock().await;
        let state = &mut *guard;
        state.pending = false;
        match result {
            Ok(message) => {
                debug!(%message, "Deletion acknowledged");
                if let Some(entry) = state.rows.get_mut(row) {
                    entry.order = None;
                    entry.amount = None;
                }
                if state.generation == generation {
                    if let Some(view) = state.view.as_mut() {
                        view.reset();
                    }
                }
                state.alert = Some(Alert::removed());
                Ok(())
            }
            Err(e) => {
                error!(error = %e, "Deleting order failed");
                state.alert = Alert::for_error(&e);
                Err(e)
            }
        }
    }
}
