use std::{future::Future, sync::Arc};

use futures_util::FutureExt;
use log::*;

use crate::events::{EventHandler, EventProducer, EventPublishError, Handler, PaymentConfirmedEvent};

#[derive(Default, Clone)]
pub struct EventProducers {
    pub payment_confirmed_producer: Vec<EventProducer<PaymentConfirmedEvent>>,
}

impl EventProducers {
    /// Delivers the event to every subscriber. All subscribers are tried; the first failure is returned.
    pub async fn publish_payment_confirmed(&self, event: PaymentConfirmedEvent) -> Result<(), EventPublishError> {
        let mut result = Ok(());
        for producer in &self.payment_confirmed_producer {
            trace!("📬️ Publishing {} for order {}", PaymentConfirmedEvent::TOPIC, event.order.serial);
            if let Err(e) = producer.publish_event(event.clone()).await {
                if result.is_ok() {
                    result = Err(e);
                }
            }
        }
        result
    }
}

pub struct EventHandlers {
    pub on_payment_confirmed: Option<EventHandler<PaymentConfirmedEvent>>,
}

impl EventHandlers {
    pub fn new(buffer_size: usize, hooks: EventHooks) -> Self {
        let on_payment_confirmed = hooks.on_payment_confirmed.map(|f| EventHandler::new(buffer_size, f));
        Self { on_payment_confirmed }
    }

    pub fn producers(&self) -> EventProducers {
        let mut result = EventProducers::default();
        if let Some(handler) = &self.on_payment_confirmed {
            result.payment_confirmed_producer.push(handler.subscribe());
        }
        result
    }

    pub async fn start_handlers(self) {
        if let Some(handler) = self.on_payment_confirmed {
            tokio::spawn(async move {
                handler.start_handler().await;
            });
        }
    }
}

#[derive(Default, Clone)]
pub struct EventHooks {
    pub on_payment_confirmed: Option<Handler<PaymentConfirmedEvent>>,
}

impl EventHooks {
    pub fn on_payment_confirmed<F, Fut>(&mut self, f: F) -> &mut Self
    where
        F: Fn(PaymentConfirmedEvent) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        self.on_payment_confirmed = Some(Arc::new(move |ev| f(ev).boxed()));
        self
    }
}
