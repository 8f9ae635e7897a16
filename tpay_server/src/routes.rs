//! Request handler definitions
//!
//! Handlers stay thin: the payment logic lives in the engine's `PaymentCallbackApi` and `CheckoutApi`, and each handler
//! only reads the serial, calls the API and turns the resulting [`PaymentRedirect`] into a `302 Found`.
//!
//! Handlers never block the worker thread. Every one of them awaits the order store and the gateway.
//!
//! The payment routes are described by a list of [`RouteDescriptor`]s. [`PaymentRoutes`] registers every descriptor
//! with the concrete order store and gateway types, since actix-web cannot register generic handlers through its
//! attribute macros.
use std::marker::PhantomData;

use actix_web::{
    dev::{AppService, HttpServiceFactory},
    get,
    http::header,
    web,
    HttpRequest,
    HttpResponse,
    Resource,
    Responder,
    Route,
};
use log::*;
use tinkoff_tools::GatewayClient;
use tpay_engine::{
    traits::OrderRepository,
    CheckoutApi,
    PaymentCallbackApi,
    PaymentRedirect,
    ERROR_CALLBACK_PATH,
    SUCCESS_CALLBACK_PATH,
};

use crate::{data_objects::SerialQuery, errors::ServerError};

pub const CHECKOUT_PATH: &str = "/payment/checkout";

// ----------------------------------------------   Health  ----------------------------------------------------
#[get("/health")]
pub async fn health() -> impl Responder {
    trace!("💻️ Received health check request");
    HttpResponse::Ok().body("👍️\n")
}

//----------------------------------------------   Route descriptors  ----------------------------------------------
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpVerb {
    Get,
    Post,
}

impl HttpVerb {
    fn route(&self) -> Route {
        match self {
            HttpVerb::Get => web::get(),
            HttpVerb::Post => web::post(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaymentEndpoint {
    Checkout,
    Success,
    Error,
}

/// A payment route: its stable name, its path and the methods it answers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RouteDescriptor {
    pub name: &'static str,
    pub path: &'static str,
    pub methods: &'static [HttpVerb],
    pub endpoint: PaymentEndpoint,
}

const GET_AND_POST: &[HttpVerb] = &[HttpVerb::Get, HttpVerb::Post];

pub fn payment_routes() -> [RouteDescriptor; 3] {
    [
        RouteDescriptor {
            name: "tpay:checkout",
            path: CHECKOUT_PATH,
            methods: GET_AND_POST,
            endpoint: PaymentEndpoint::Checkout,
        },
        RouteDescriptor {
            name: "tpay:success",
            path: SUCCESS_CALLBACK_PATH,
            methods: GET_AND_POST,
            endpoint: PaymentEndpoint::Success,
        },
        RouteDescriptor {
            name: "tpay:error",
            path: ERROR_CALLBACK_PATH,
            methods: GET_AND_POST,
            endpoint: PaymentEndpoint::Error,
        },
    ]
}

/// Registers all of [`payment_routes`] for the order store `B` and the gateway `G`.
///
/// The handlers expect `web::Data<PaymentCallbackApi<B, G>>` and `web::Data<CheckoutApi<B, G>>` in the app data.
pub struct PaymentRoutes<B, G>(PhantomData<fn() -> (B, G)>);

impl<B, G> PaymentRoutes<B, G> {
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        Self(PhantomData)
    }
}

impl<B, G> HttpServiceFactory for PaymentRoutes<B, G>
where
    B: OrderRepository + 'static,
    G: GatewayClient + 'static,
{
    fn register(self, config: &mut AppService) {
        for descriptor in payment_routes() {
            let resource = descriptor.methods.iter().fold(
                Resource::new(descriptor.path).name(descriptor.name),
                |resource, verb| {
                    let route = match descriptor.endpoint {
                        PaymentEndpoint::Checkout => verb.route().to(payment_checkout::<B, G>),
                        PaymentEndpoint::Success => verb.route().to(payment_success::<B, G>),
                        PaymentEndpoint::Error => verb.route().to(payment_error::<B, G>),
                    };
                    resource.route(route)
                },
            );
            HttpServiceFactory::register(resource, config);
        }
    }
}

fn redirect_to(redirect: &PaymentRedirect) -> HttpResponse {
    HttpResponse::Found().insert_header((header::LOCATION, redirect.location())).finish()
}

//----------------------------------------------   Checkout  ----------------------------------------------------
/// Sends the buyer to the gateway's payment form for the order in the `serial` query parameter.
///
/// Orders that are unknown, already settled, or refused by the gateway are redirected to the home or order page
/// instead. Only failures to use the gateway or the order store produce an error response.
pub async fn payment_checkout<B, G>(
    req: HttpRequest,
    api: web::Data<CheckoutApi<B, G>>,
) -> Result<HttpResponse, ServerError>
where
    B: OrderRepository,
    G: GatewayClient,
{
    let query = SerialQuery::from_query_string(req.query_string());
    debug!("💻️ Checkout request for order '{}'", query.serial);
    let redirect = api.checkout(&query.serial).await.map_err(|e| {
        error!("💻️ Could not start a payment for order '{}'. {e}", query.serial);
        ServerError::from(e)
    })?;
    Ok(redirect_to(&redirect))
}

//----------------------------------------------   Callbacks  ----------------------------------------------------
/// The gateway's `SuccessURL`. The payment is verified with the gateway before the order is marked as paid.
pub async fn payment_success<B, G>(req: HttpRequest, api: web::Data<PaymentCallbackApi<B, G>>) -> HttpResponse
where
    B: OrderRepository,
    G: GatewayClient,
{
    let query = SerialQuery::from_query_string(req.query_string());
    debug!("💻️ Success callback for order '{}'", query.serial);
    let result = api.on_success(&query.serial).await;
    trace!("💻️ Success callback for order '{}' redirects to {}", query.serial, result.redirect.location());
    redirect_to(&result.redirect)
}

/// The gateway's `FailURL`.
pub async fn payment_error<B, G>(req: HttpRequest, api: web::Data<PaymentCallbackApi<B, G>>) -> HttpResponse
where
    B: OrderRepository,
    G: GatewayClient,
{
    let query = SerialQuery::from_query_string(req.query_string());
    debug!("💻️ Error callback for order '{}'", query.serial);
    let result = api.on_error(&query.serial).await;
    redirect_to(&result.redirect)
}
