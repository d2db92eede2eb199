//! # Basket orders
//!
//! Client-side controller for the grocery-basket order page: a list of open
//! deliveries, each with the user's order if any, and an editable order form
//! for the selected delivery.
//!
//! ## Layout
//!
//! - **Domain types** - deliveries, products, orders, payloads and money arithmetic → [`domain`]
//! - **Resource descriptors** - typed server locations instead of markup attributes → [`resource`]
//! - **Back-end** - request enums with oneshot responders, the [`BackendClient`](backend::BackendClient)
//!   handle, and two services answering it: HTTP and in-memory → [`backend`]
//! - **Controller** - selection, live amount recalculation, create/update/delete with
//!   stale-response protection → [`controller::OrderViewController`]
//! - **System** - configuration, tracing setup, startup and shutdown → [`app_system`]
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! use basket_orders::app_system::{BasketSystem, ClientConfig};
//!
//! let config = ClientConfig::from_env()?;
//! let system = BasketSystem::start(&config, chrono::Local::now().date_naive());
//! let controller = system.controller().await?;
//!
//! controller.select(0).await?;
//! controller.set_quantity(1, 2).await?;
//! controller.save().await?;
//! # Ok(())
//! # }
//! ```

pub mod app_system;
pub mod backend;
pub mod controller;
pub mod domain;
pub mod error;
pub mod resource;

#[cfg(test)]
mod mock_framework;
