use std::fmt::Debug;

use log::*;

use crate::{
    db_types::{Order, OrderStatusType, Serial},
    events::{EventProducers, PaymentConfirmedEvent},
    tpe_api::errors::OrderStateError,
    traits::OrderRepository,
};

/// `OrderStateApi` applies payment status transitions to orders and notifies subscribers of confirmed payments.
///
/// Every transition is a compare-and-set against `Pending`, so the order store is the single point of synchronisation
/// between concurrent callbacks for the same order.
pub struct OrderStateApi<B> {
    db: B,
    producers: EventProducers,
}

impl<B> Debug for OrderStateApi<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "OrderStateApi")
    }
}

impl<B> OrderStateApi<B> {
    pub fn new(db: B, producers: EventProducers) -> Self {
        Self { db, producers }
    }

    pub fn db(&self) -> &B {
        &self.db
    }
}

impl<B> OrderStateApi<B>
where B: OrderRepository
{
    pub async fn order_by_serial(&self, serial: &Serial) -> Result<Option<Order>, OrderStateError> {
        let order = self.db.fetch_order_by_serial(serial).await?;
        Ok(order)
    }

    /// Marks the order as paid and publishes a [`PaymentConfirmedEvent`].
    ///
    /// Returns `Ok(None)` without publishing if the order was no longer `Pending`. The status write always happens
    /// before the publish, so a store failure means no event. If the publish fails, the order stays `Paid` and the
    /// error is returned so that it can be logged and followed up.
    pub async fn confirm(&self, order: &Order) -> Result<Option<Order>, OrderStateError> {
        let serial = &order.serial;
        let updated =
            self.db.update_order_status(serial, OrderStatusType::Pending, OrderStatusType::Paid, None).await?;
        let Some(paid_order) = updated else {
            debug!("🔄️✅️ Order {serial} was not pending. Another callback must have settled it already.");
            return Ok(None);
        };
        info!("🔄️✅️ Order {serial} is paid");
        self.producers
            .publish_payment_confirmed(PaymentConfirmedEvent::new(paid_order.clone()))
            .await
            .map_err(|e| OrderStateError::publish_error(serial.clone(), e))?;
        Ok(Some(paid_order))
    }

    /// Marks the order as failed, storing `reason` as the system note. Nothing is published.
    ///
    /// Returns `Ok(None)` if the order was no longer `Pending`. In particular, a paid order is never failed.
    pub async fn fail(&self, order: &Order, reason: &str) -> Result<Option<Order>, OrderStateError> {
        let serial = &order.serial;
        let updated = self
            .db
            .update_order_status(serial, OrderStatusType::Pending, OrderStatusType::Failed, Some(reason))
            .await?;
        match &updated {
            Some(_) => info!("🔄️❌️ Order {serial} has failed. {reason}"),
            None => debug!("🔄️❌️ Order {serial} was not pending, so it was not marked as failed"),
        }
        Ok(updated)
    }
}
