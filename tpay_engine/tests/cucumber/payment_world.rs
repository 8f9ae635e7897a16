use std::{
    fmt::Debug,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    },
};

use cucumber::World;
use log::*;
use tinkoff_tools::{InitRequest, TerminalCredentials};
use tokio::time::sleep;
use tpay_common::Secret;
use tpay_engine::{
    events::{EventHandlers, EventHooks, EventProducers},
    test_utils::{
        prepare_env::{create_database, random_db_path, run_migrations},
        StubGateway,
    },
    CallbackResult,
    OrderStateApi,
    PaymentCallbackApi,
    PaymentRequestBuilder,
    PaymentSettings,
    SqliteDatabase,
};

#[derive(Default, Debug, World)]
pub struct PaymentWorld {
    pub system: Option<PaymentSystem>,
    pub last_callback: Option<CallbackResult>,
    pub last_request: Option<InitRequest>,
}

pub struct PaymentSystem {
    pub db_path: String,
    pub db: SqliteDatabase,
    pub gateway: StubGateway,
    pub requests: PaymentRequestBuilder,
    pub producers: EventProducers,
    pub published: Arc<AtomicUsize>,
}

impl Debug for PaymentSystem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "PaymentSystem({})", self.db_path)
    }
}

impl PaymentWorld {
    pub fn system(&self) -> &PaymentSystem {
        self.system.as_ref().expect("Payment system not initialised")
    }

    pub fn system_mut(&mut self) -> &mut PaymentSystem {
        self.system.as_mut().expect("Payment system not initialised")
    }
}

impl PaymentSystem {
    pub async fn new() -> Self {
        let url = prepare_test_env().await;
        let db = SqliteDatabase::new_with_url(&url, 1).await.expect("Error creating connection to database");
        debug!("Created database: {url}");
        sleep(std::time::Duration::from_millis(50)).await;
        let published = Arc::new(AtomicUsize::new(0));
        let p2 = published.clone();
        let mut hooks = EventHooks::default();
        hooks.on_payment_confirmed(move |ev| {
            let published = p2.clone();
            async move {
                debug!("🪝️ Payment for order {} confirmed", ev.order.serial);
                published.fetch_add(1, Ordering::SeqCst);
            }
        });
        let handlers = EventHandlers::new(10, hooks);
        let producers = handlers.producers();
        handlers.start_handlers().await;
        let requests = PaymentRequestBuilder::new(
            TerminalCredentials::new("TestTerminal", Secret::from("secret")),
            PaymentSettings::default(),
        );
        Self { db_path: url, db, gateway: StubGateway::unreachable(), requests, producers, published }
    }

    /// A callback API wired to the currently scripted gateway
    pub fn callback_api(&self) -> PaymentCallbackApi<SqliteDatabase, StubGateway> {
        let orders = OrderStateApi::new(self.db.clone(), self.producers.clone());
        PaymentCallbackApi::new(orders, self.gateway.clone(), self.requests.clone())
    }

    pub fn published(&self) -> usize {
        self.published.load(Ordering::SeqCst)
    }
}

pub async fn prepare_test_env() -> String {
    let path = random_db_path();
    create_database(&path).await;
    run_migrations(&path).await;
    path
}
