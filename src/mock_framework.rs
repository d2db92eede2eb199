//! # Mock Framework
//!
//! Utilities for testing the controller against a back-end answered by hand.
//!
//! Use [`create_mock_client`] to get a client and a receiver. Then use helpers
//! like [`expect_get_delivery`] or [`expect_create_order`] to take the next
//! request, assert on it, and reply through its responder. Replies can be sent
//! in any order, which is how stale responses are simulated.

use tokio::sync::mpsc;

use crate::backend::{BackendClient, BackendRequest, Response};
use crate::domain::{
    CreateOrderPayload, CreateOrderResponse, DeleteOrderResponse, Delivery, DeliverySummary, Order, OrderSummary,
    UpdateOrderPayload, UpdateOrderResponse,
};
use crate::resource::ResourceDescriptor;

/// Creates a mock client and a receiver for asserting requests.
pub fn create_mock_client(buffer_size: usize) -> (BackendClient, mpsc::Receiver<BackendRequest>) {
    let (sender, receiver) = mpsc::channel(buffer_size);
    (BackendClient::new(sender), receiver)
}

/// True when no request is waiting on the channel.
pub fn no_pending_request(receiver: &mut mpsc::Receiver<BackendRequest>) -> bool {
    receiver.try_recv().is_err()
}

pub async fn expect_get_delivery(
    receiver: &mut mpsc::Receiver<BackendRequest>,
) -> Option<(ResourceDescriptor, Response<Delivery>)> {
    match receiver.recv().await {
        Some(BackendRequest::GetDelivery { resource, respond_to }) => Some((resource, respond_to)),
        _ => None,
    }
}

pub async fn expect_get_order(
    receiver: &mut mpsc::Receiver<BackendRequest>,
) -> Option<(ResourceDescriptor, Response<Order>)> {
    match receiver.recv().await {
        Some(BackendRequest::GetOrder { resource, respond_to }) => Some((resource, respond_to)),
        _ => None,
    }
}

pub async fn expect_create_order(
    receiver: &mut mpsc::Receiver<BackendRequest>,
) -> Option<(ResourceDescriptor, CreateOrderPayload, Response<CreateOrderResponse>)> {
    match receiver.recv().await {
        Some(BackendRequest::CreateOrder { resource, payload, respond_to }) => Some((resource, payload, respond_to)),
        _ => None,
    }
}

pub async fn expect_update_order(
    receiver: &mut mpsc::Receiver<BackendRequest>,
) -> Option<(ResourceDescriptor, UpdateOrderPayload, Response<UpdateOrderResponse>)> {
    match receiver.recv().await {
        Some(BackendRequest::UpdateOrder { resource, payload, respond_to }) => Some((resource, payload, respond_to)),
        _ => None,
    }
}

pub async fn expect_delete_order(
    receiver: &mut mpsc::Receiver<BackendRequest>,
) -> Option<(ResourceDescriptor, Response<DeleteOrderResponse>)> {
    match receiver.recv().await {
        Some(BackendRequest::DeleteOrder { resource, respond_to }) => Some((resource, respond_to)),
        _ => None,
    }
}

pub async fn expect_list_deliveries(
    receiver: &mut mpsc::Receiver<BackendRequest>,
) -> Option<(ResourceDescriptor, Response<Vec<DeliverySummary>>)> {
    match receiver.recv().await {
        Some(BackendRequest::ListDeliveries { resource, respond_to }) => Some((resource, respond_to)),
        _ => None,
    }
}

pub async fn expect_list_orders(
    receiver: &mut mpsc::Receiver<BackendRequest>,
) -> Option<(ResourceDescriptor, Response<Vec<OrderSummary>>)> {
    match receiver.recv().await {
        Some(BackendRequest::ListOrders { resource, respond_to }) => Some((resource, respond_to)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resource::{Method, Routes};

    #[tokio::test]
    async fn test_mock_client() {
        let (client, mut receiver) = create_mock_client(10);
        assert!(no_pending_request(&mut receiver));

        let list_task = tokio::spawn(async move { client.list_orders(Routes::default().orders().get()).await });

        let (resource, responder) = expect_list_orders(&mut receiver).await.expect("Expected ListOrders request");
        assert_eq!(resource.method, Method::Get);
        responder.send(Ok(vec![OrderSummary { id: 1, delivery_id: 2 }])).unwrap();

        let result = list_task.await.unwrap();
        assert_eq!(result, Ok(vec![OrderSummary { id: 1, delivery_id: 2 }]));
    }
}
