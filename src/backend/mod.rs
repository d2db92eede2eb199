//! Back-end protocol: typed requests, the client handle, and the services
//! that answer them.
//!
//! Every request travels over an `mpsc` channel together with a `oneshot`
//! responder. [`BackendClient`] is the only thing the controller sees; whether
//! the requests end up at the HTTP API ([`HttpBackend`]) or at the in-process
//! stand-in ([`InMemoryBackend`]) is decided when the system is wired.

pub mod error;
pub mod http;
pub mod memory;

pub use error::*;
pub use http::HttpBackend;
pub use memory::InMemoryBackend;

use tokio::sync::{mpsc, oneshot};
use tracing::{debug, instrument};

use crate::domain::{
    CreateOrderPayload, CreateOrderResponse, Delivery, DeliverySummary, DeleteOrderResponse, Order,
    OrderSummary, UpdateOrderPayload, UpdateOrderResponse,
};
use crate::resource::ResourceDescriptor;

// =============================================================================
// MESSAGES
// =============================================================================

pub type Response<T> = oneshot::Sender<Result<T, BackendError>>;

#[derive(Debug)]
pub enum BackendRequest {
    GetDelivery {
        resource: ResourceDescriptor,
        respond_to: Response<Delivery>,
    },
    GetOrder {
        resource: ResourceDescriptor,
        respond_to: Response<Order>,
    },
    CreateOrder {
        resource: ResourceDescriptor,
        payload: CreateOrderPayload,
        respond_to: Response<CreateOrderResponse>,
    },
    UpdateOrder {
        resource: ResourceDescriptor,
        payload: UpdateOrderPayload,
        respond_to: Response<UpdateOrderResponse>,
    },
    DeleteOrder {
        resource: ResourceDescriptor,
        respond_to: Response<DeleteOrderResponse>,
    },
    ListDeliveries {
        resource: ResourceDescriptor,
        respond_to: Response<Vec<DeliverySummary>>,
    },
    ListOrders {
        resource: ResourceDescriptor,
        respond_to: Response<Vec<OrderSummary>>,
    },
}

// =============================================================================
// CLIENT
// =============================================================================

/// Generate client methods with oneshot channel boilerplate and automatic tracing.
macro_rules! client_method {
    (
        $client:ty => fn $method:ident($($param:ident: $param_type:ty),*) -> $return_type:ty
        as $request:ident::$variant:ident
    ) => {
        impl $client {
            #[instrument(skip(self))]
            pub async fn $method(&self, $($param: $param_type),*) -> Result<$return_type, BackendError> {
                debug!("Sending request");
                let (respond_to, response) = oneshot::channel();
                self.sender.send($request::$variant {
                    $($param,)*
                    respond_to,
                }).await.map_err(|_| BackendError::ActorCommunicationError("Backend closed".to_string()))?;

                response.await.map_err(|_| BackendError::ActorCommunicationError("Backend dropped".to_string()))?
            }
        }
    };
}

/// Cloneable handle to a running back-end service.
#[derive(Debug, Clone)]
pub struct BackendClient {
    sender: mpsc::Sender<BackendRequest>,
}

impl BackendClient {
    pub fn new(sender: mpsc::Sender<BackendRequest>) -> Self {
        Self { sender }
    }
}

client_method!(BackendClient =>
    fn get_delivery(resource: ResourceDescriptor) -> Delivery
    as BackendRequest::GetDelivery);
client_method!(BackendClient => fn get_order(resource: ResourceDescriptor) -> Order as BackendRequest::GetOrder);
client_method!(BackendClient =>
    fn create_order(resource: ResourceDescriptor, payload: CreateOrderPayload) -> CreateOrderResponse
    as BackendRequest::CreateOrder);
client_method!(BackendClient =>
    fn update_order(resource: ResourceDescriptor, payload: UpdateOrderPayload) -> UpdateOrderResponse
    as BackendRequest::UpdateOrder);
client_method!(BackendClient =>
    fn delete_order(resource: ResourceDescriptor) -> DeleteOrderResponse
    as BackendRequest::DeleteOrder);
client_method!(BackendClient =>
    fn list_deliveries(resource: ResourceDescriptor) -> Vec<DeliverySummary>
    as BackendRequest::ListDeliveries);
client_method!(BackendClient =>
    fn list_orders(resource: ResourceDescriptor) -> Vec<OrderSummary>
    as BackendRequest::ListOrders);
