//! Conversion of shop orders into signed gateway requests.
//!
//! Amounts are converted with [`MinorUnits::from_major`], which rounds half-up. Products with a zero price (gifts,
//! free samples) are left out of the fiscal receipt on purpose; the receipt total may therefore be less than the
//! order total when the shop gives something away.
use log::*;
use rust_decimal::{Decimal, RoundingStrategy};
use tinkoff_tools::{
    CheckOrderFields,
    CheckOrderRequest,
    CustomerData,
    InitFields,
    InitRequest,
    PaymentMethod,
    Receipt,
    ReceiptItem,
    TerminalCredentials,
    VatTag,
};
use tpay_common::{truncate_chars, MinorUnits};

use crate::{
    db_types::{Order, OrderProduct, Serial},
    tpe_api::{
        errors::PaymentRequestError,
        settings::{PaymentSettings, SERIAL_PLACEHOLDER},
    },
};

pub const DESCRIPTION_MAX_CHARS: usize = 250;
pub const ITEM_NAME_MAX_CHARS: usize = 64;
pub const SUCCESS_CALLBACK_PATH: &str = "/payment/callback/success";
pub const ERROR_CALLBACK_PATH: &str = "/payment/callback/error";

#[derive(Debug, Clone)]
pub struct PaymentRequestBuilder {
    credentials: TerminalCredentials,
    settings: PaymentSettings,
}

impl PaymentRequestBuilder {
    pub fn new(credentials: TerminalCredentials, settings: PaymentSettings) -> Self {
        Self { credentials, settings }
    }

    pub fn settings(&self) -> &PaymentSettings {
        &self.settings
    }

    /// Builds the signed `Init` request for `order`, including the receipt and customer data blocks.
    pub fn build(&self, order: &Order) -> Result<InitRequest, PaymentRequestError> {
        let serial = order.serial.as_str();
        let fields = InitFields {
            terminal_key: self.credentials.terminal_key.clone(),
            description: self.description(&order.serial),
            order_id: serial.to_string(),
            amount: to_minor_units(&order.serial, order.total_price)?,
            success_url: self.callback_url(SUCCESS_CALLBACK_PATH, &order.serial),
            fail_url: self.callback_url(ERROR_CALLBACK_PATH, &order.serial),
        };
        let items = order
            .products
            .iter()
            .filter(|p| !p.is_free())
            .map(|p| receipt_item(&order.serial, p))
            .collect::<Result<Vec<ReceiptItem>, PaymentRequestError>>()?;
        let skipped = order.products.len() - items.len();
        if skipped > 0 {
            debug!("🧾️ {skipped} free item(s) of order {} left off the receipt", order.serial);
        }
        let receipt = Receipt {
            phone: order.phone.clone(),
            email: order.email.clone(),
            taxation: self.settings.taxation,
            items,
        };
        let data = CustomerData { phone: order.phone.clone(), email: order.email.clone() };
        let request =
            InitRequest::new(fields, &self.credentials.password).with_receipt(receipt).with_customer_data(data);
        trace!("🧾️ Init request for order {} built. Amount: {}", order.serial, request.fields().amount);
        Ok(request)
    }

    /// Builds a freshly signed `CheckOrder` request for the given serial.
    pub fn check_order_request(&self, serial: &Serial) -> CheckOrderRequest {
        let fields = CheckOrderFields {
            terminal_key: self.credentials.terminal_key.clone(),
            order_id: serial.as_str().to_string(),
        };
        CheckOrderRequest::new(fields, &self.credentials.password)
    }

    /// The payment description, with the serial substituted, cut to the gateway's limit.
    pub fn description(&self, serial: &Serial) -> String {
        let description = self.settings.description_template.replace(SERIAL_PLACEHOLDER, serial.as_str());
        truncate_chars(&description, DESCRIPTION_MAX_CHARS)
    }

    /// `<public base url><path>?serial=<serial>`
    pub fn callback_url(&self, path: &str, serial: &Serial) -> String {
        let base = self.settings.public_base_url.trim_end_matches('/');
        format!("{base}{path}?serial={}", urlencoding::encode(serial.as_str()))
    }
}

fn to_minor_units(serial: &Serial, amount: Decimal) -> Result<MinorUnits, PaymentRequestError> {
    MinorUnits::from_major(amount)
        .map_err(|source| PaymentRequestError::InvalidAmount { serial: serial.clone(), source })
}

fn receipt_item(serial: &Serial, product: &OrderProduct) -> Result<ReceiptItem, PaymentRequestError> {
    Ok(ReceiptItem {
        name: truncate_chars(&product.title, ITEM_NAME_MAX_CHARS),
        price: to_minor_units(serial, product.price)?,
        quantity: product.count.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero),
        amount: to_minor_units(serial, product.total)?,
        payment_method: PaymentMethod::FullPayment,
        tax: VatTag::None,
    })
}
