use chrono::{Duration, NaiveDate};
use rust_decimal::Decimal;
use tracing::{error, info};

use super::config::{BackendKind, ClientConfig};
use crate::backend::{BackendClient, HttpBackend, InMemoryBackend};
use crate::controller::{bootstrap_rows, OrderViewController};
use crate::domain::{Delivery, Product};
use crate::error::OrderViewError;
use crate::resource::Routes;

/// Wires a back-end service to the clients that use it.
///
/// Responsible for starting the service, handing out controllers, and
/// waiting for the service on shutdown.
pub struct BasketSystem {
    pub client: BackendClient,
    pub routes: Routes,
    handle: tokio::task::JoinHandle<()>,
}

impl BasketSystem {
    /// Starts the back-end selected by `config`. The in-memory back-end is
    /// seeded with [`demo_catalog`].
    pub fn start(config: &ClientConfig, today: NaiveDate) -> Self {
        match &config.backend {
            BackendKind::Http { base_url, csrf_token } => {
                info!(%base_url, "Starting basket system over HTTP");
                let (backend, client) = HttpBackend::new(config.channel_buffer, base_url.clone(), csrf_token.clone());
                let handle = tokio::spawn(backend.run());
                Self {
                    client,
                    routes: config.routes.clone(),
                    handle,
                }
            }
            BackendKind::InMemory => {
                info!(%today, "Starting basket system with in-memory back-end");
                let (mut backend, client) = InMemoryBackend::new(config.channel_buffer, today, config.routes.clone());
                for delivery in demo_catalog(today) {
                    backend.add_delivery(delivery);
                }
                Self::with_memory(backend, client, config.routes.clone())
            }
        }
    }

    pub fn with_memory(backend: InMemoryBackend, client: BackendClient, routes: Routes) -> Self {
        let handle = tokio::spawn(backend.run());
        Self { client, routes, handle }
    }

    /// A controller over the current order list.
    pub async fn controller(&self) -> Result<OrderViewController, OrderViewError> {
        let rows = bootstrap_rows(&self.client, &self.routes).await?;
        Ok(OrderViewController::new(self.client.clone(), self.routes.orders(), rows))
    }

    /// Closes the request channel and waits for the service to stop.
    ///
    /// Controllers hold their own client handles; drop them first or this
    /// waits until they are gone.
    pub async fn shutdown(self) -> Result<(), String> {
        info!("Shutting down basket system...");
        drop(self.client);

        if let Err(e) = self.handle.await {
            error!("Backend task failed: {:?}", e);
            return Err(format!("Backend task failed: {:?}", e));
        }

        info!("Basket system shutdown complete.");
        Ok(())
    }
}

/// Sample deliveries relative to `today`: two open, one closed.
pub fn demo_catalog(today: NaiveDate) -> Vec<Delivery> {
    let bread = Product::new(1, "Country bread", Decimal::new(250, 2));
    let eggs = Product::new(2, "Eggs (x12)", Decimal::new(400, 2));
    let honey = Product::new(3, "Honey jar", Decimal::new(1115, 2));
    let apples = Product::new(4, "Apples (1kg)", Decimal::new(320, 2));

    let mut past = Delivery::new(
        1,
        today - Duration::days(3),
        today - Duration::days(7),
        vec![bread.clone(), eggs.clone()],
    );
    past.message = "Closed delivery".to_string();

    let next = Delivery::new(
        2,
        today + Duration::days(4),
        today,
        vec![bread.clone(), eggs.clone(), honey.clone()],
    );
    let later = Delivery::new(
        3,
        today + Duration::days(11),
        today + Duration::days(7),
        vec![bread, eggs, honey, apples],
    );
    vec![past, next, later]
}
