use basket_orders::app_system::{setup_tracing, BackendKind, BasketSystem, ClientConfig};
use basket_orders::controller::OrderViewController;
use tracing::{error, info, warn, Instrument};

#[tokio::main]
async fn main() -> Result<(), String> {
    // Setup tracing once for the entire application
    setup_tracing();

    let config = ClientConfig::from_env().map_err(|e| e.to_string())?;
    let today = chrono::Local::now().date_naive();
    let system = BasketSystem::start(&config, today);

    let controller = system.controller().await.map_err(|e| e.to_string())?;
    list_rows(&controller).await;

    if controller.rows().await.is_empty() {
        warn!("No open delivery");
    } else {
        let walkthrough = async {
            match &config.backend {
                BackendKind::InMemory => order_walkthrough(&controller).await,
                // Read-only against a real server
                BackendKind::Http { .. } => show_selection(&controller, 0).await,
            }
        };
        walkthrough.instrument(tracing::info_span!("walkthrough")).await;
    }

    drop(controller);
    system.shutdown().await?;

    info!("Application completed successfully");
    Ok(())
}

async fn list_rows(controller: &OrderViewController) {
    for (index, row) in controller.rows().await.iter().enumerate() {
        info!(row = index, delivery = %row.delivery.url, order = %row.amount_label(), "Order list entry");
    }
}

async fn show_selection(controller: &OrderViewController, row: usize) {
    if let Err(e) = controller.select(row).await {
        error!(error = %e, "Selecting delivery failed");
        return;
    }
    if let Some(view) = controller.view().await {
        info!(title = %view.title(), subtitle = %view.subtitle(), "Order view");
        for item in &view.items {
            info!(
                product = %item.name,
                unit_price = %item.unit_price,
                quantity = item.quantity,
                amount = %item.amount_display(),
                "Line item"
            );
        }
        info!(total = %view.total_display(), action = view.save_label(), "Order total");
    }
}

async fn order_walkthrough(controller: &OrderViewController) {
    show_selection(controller, 0).await;
    let Some(view) = controller.view().await else {
        return;
    };

    // Empty form first: rejected before any request
    if let Err(e) = controller.save().await {
        info!(error = %e, "Save rejected");
    }

    for (item, quantity) in view.items.iter().zip([2u32, 1, 0]) {
        if let Err(e) = controller.set_quantity(item.product_id, quantity).await {
            error!(error = %e, "Updating quantity failed");
        }
    }

    match controller.save().await {
        Ok(outcome) => info!(?outcome, "Order saved"),
        Err(e) => error!(error = %e, "Saving order failed"),
    }
    list_rows(controller).await;

    show_selection(controller, 0).await;
    match controller.delete().await {
        Ok(()) => info!("Order deleted"),
        Err(e) => error!(error = %e, "Deleting order failed"),
    }
    if let Some(alert) = controller.alert().await {
        info!(level = ?alert.level, message = %alert.message, "Alert");
    }
    list_rows(controller).await;
}
