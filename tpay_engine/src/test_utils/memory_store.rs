use std::{
    collections::HashMap,
    sync::{
        atomic::{AtomicBool, AtomicI64, AtomicUsize, Ordering},
        Arc,
    },
};

use chrono::Utc;
use tokio::sync::Mutex;

use crate::{
    db_types::{NewOrder, Order, OrderStatusType, Serial},
    traits::{OrderRepository, OrderRepositoryError},
};

/// An [`OrderRepository`] that keeps orders in memory. Clones share the same orders.
///
/// Status updates are counted, and the store can be switched to "unavailable" to simulate a database outage.
#[derive(Debug, Clone, Default)]
pub struct MemoryOrderStore {
    orders: Arc<Mutex<HashMap<Serial, Order>>>,
    next_id: Arc<AtomicI64>,
    status_updates: Arc<AtomicUsize>,
    unavailable: Arc<AtomicBool>,
}

impl MemoryOrderStore {
    /// The number of times `update_order_status` has been called, whether or not it changed anything.
    pub fn status_updates(&self) -> usize {
        self.status_updates.load(Ordering::SeqCst)
    }

    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    fn check_available(&self) -> Result<(), OrderRepositoryError> {
        if self.unavailable.load(Ordering::SeqCst) {
            Err(OrderRepositoryError::DatabaseError("The order store is unavailable".to_string()))
        } else {
            Ok(())
        }
    }
}

impl OrderRepository for MemoryOrderStore {
    async fn fetch_order_by_serial(&self, serial: &Serial) -> Result<Option<Order>, OrderRepositoryError> {
        self.check_available()?;
        Ok(self.orders.lock().await.get(serial).cloned())
    }

    async fn update_order_status(
        &self,
        serial: &Serial,
        expected: OrderStatusType,
        new_status: OrderStatusType,
        note: Option<&str>,
    ) -> Result<Option<Order>, OrderRepositoryError> {
        self.status_updates.fetch_add(1, Ordering::SeqCst);
        self.check_available()?;
        let mut orders = self.orders.lock().await;
        match orders.get_mut(serial) {
            Some(order) if order.status == expected => {
                order.status = new_status;
                if let Some(note) = note {
                    order.system_note = Some(note.to_string());
                }
                order.updated_at = Utc::now();
                Ok(Some(order.clone()))
            },
            _ => Ok(None),
        }
    }

    async fn insert_order(&self, order: NewOrder) -> Result<Order, OrderRepositoryError> {
        self.check_available()?;
        let mut orders = self.orders.lock().await;
        if orders.contains_key(&order.serial) {
            return Err(OrderRepositoryError::OrderAlreadyExists(order.serial));
        }
        let now = Utc::now();
        let id = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
        let new_order = Order {
            id,
            serial: order.serial.clone(),
            uuid: order.uuid,
            total_price: order.total_price,
            phone: order.phone,
            email: order.email,
            products: order.products,
            status: OrderStatusType::Pending,
            system_note: None,
            created_at: now,
            updated_at: now,
        };
        orders.insert(order.serial, new_order.clone());
        Ok(new_order)
    }
}
