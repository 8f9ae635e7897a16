//! Typed request and response bodies for the gateway methods used by this crate.
//!
//! Each request is split into a flat `*Fields` struct, which is exactly what the token is computed over, and the
//! full request, which adds the `Token` and any nested blocks. The split makes it impossible to sign a receipt by
//! accident.
use std::{fmt::Display, str::FromStr};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tpay_common::{MinorUnits, Secret};

use crate::signing::{sign, SignedFields};

//--------------------------------------      Taxation       ---------------------------------------------------------
/// The merchant's tax regime, as reported on the fiscal receipt.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Taxation {
    /// General regime
    #[default]
    Osn,
    /// Simplified regime (income)
    UsnIncome,
    /// Simplified regime (income minus expenses)
    UsnIncomeOutcome,
    /// Imputed income tax
    Envd,
    /// Unified agricultural tax
    Esn,
    /// Patent regime
    Patent,
}

impl Display for Taxation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Taxation::Osn => "osn",
            Taxation::UsnIncome => "usn_income",
            Taxation::UsnIncomeOutcome => "usn_income_outcome",
            Taxation::Envd => "envd",
            Taxation::Esn => "esn",
            Taxation::Patent => "patent",
        };
        f.write_str(s)
    }
}

impl FromStr for Taxation {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "osn" => Ok(Self::Osn),
            "usn_income" => Ok(Self::UsnIncome),
            "usn_income_outcome" => Ok(Self::UsnIncomeOutcome),
            "envd" => Ok(Self::Envd),
            "esn" => Ok(Self::Esn),
            "patent" => Ok(Self::Patent),
            s => Err(format!("Invalid taxation regime: {s}")),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    #[default]
    FullPayment,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VatTag {
    #[default]
    None,
}

//--------------------------------------       Receipt       ---------------------------------------------------------
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ReceiptItem {
    pub name: String,
    pub price: MinorUnits,
    #[serde(with = "rust_decimal::serde::float")]
    pub quantity: Decimal,
    pub amount: MinorUnits,
    pub payment_method: PaymentMethod,
    pub tax: VatTag,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Receipt {
    pub phone: String,
    pub email: String,
    pub taxation: Taxation,
    pub items: Vec<ReceiptItem>,
}

/// The `DATA` block: free-form customer contact details echoed back on the payment form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CustomerData {
    pub phone: String,
    pub email: String,
}

//--------------------------------------        Init         ---------------------------------------------------------
/// The signed scalar fields of an `Init` request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct InitFields {
    pub terminal_key: String,
    pub description: String,
    pub order_id: String,
    pub amount: MinorUnits,
    #[serde(rename = "SuccessURL")]
    pub success_url: String,
    #[serde(rename = "FailURL")]
    pub fail_url: String,
}

impl InitFields {
    pub fn signed_fields(&self) -> SignedFields {
        SignedFields::new()
            .with("TerminalKey", self.terminal_key.as_str())
            .with("Description", self.description.as_str())
            .with("OrderId", self.order_id.as_str())
            .with("Amount", self.amount)
            .with("SuccessURL", self.success_url.as_str())
            .with("FailURL", self.fail_url.as_str())
    }
}

/// A complete, signed `Init` request. Once built it cannot be modified, other than attaching the unsigned blocks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InitRequest {
    #[serde(flatten)]
    fields: InitFields,
    #[serde(rename = "Token")]
    token: String,
    #[serde(rename = "DATA", skip_serializing_if = "Option::is_none")]
    data: Option<CustomerData>,
    #[serde(rename = "Receipt", skip_serializing_if = "Option::is_none")]
    receipt: Option<Receipt>,
}

impl InitRequest {
    /// Signs `fields` with the terminal password.
    pub fn new(fields: InitFields, password: &Secret<String>) -> Self {
        let token = sign(&fields.signed_fields(), password);
        Self { fields, token, data: None, receipt: None }
    }

    pub fn with_customer_data(mut self, data: CustomerData) -> Self {
        self.data = Some(data);
        self
    }

    pub fn with_receipt(mut self, receipt: Receipt) -> Self {
        self.receipt = Some(receipt);
        self
    }

    pub fn fields(&self) -> &InitFields {
        &self.fields
    }

    pub fn token(&self) -> &str {
        &self.token
    }

    pub fn customer_data(&self) -> Option<&CustomerData> {
        self.data.as_ref()
    }

    pub fn receipt(&self) -> Option<&Receipt> {
        self.receipt.as_ref()
    }
}

/// The gateway's reply to `Init`.
///
/// `ErrorCode` is required. A body without it is not a gateway reply and fails to decode.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct InitResponse {
    #[serde(default)]
    pub success: bool,
    pub error_code: String,
    #[serde(rename = "PaymentURL", default)]
    pub payment_url: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub details: Option<String>,
}

impl InitResponse {
    pub fn is_success(&self) -> bool {
        is_success(self.success, &self.error_code)
    }
}

//--------------------------------------     CheckOrder      ---------------------------------------------------------
/// The signed scalar fields of a `CheckOrder` request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CheckOrderFields {
    pub terminal_key: String,
    pub order_id: String,
}

impl CheckOrderFields {
    pub fn signed_fields(&self) -> SignedFields {
        SignedFields::new().with("TerminalKey", self.terminal_key.as_str()).with("OrderId", self.order_id.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckOrderRequest {
    #[serde(flatten)]
    fields: CheckOrderFields,
    #[serde(rename = "Token")]
    token: String,
}

impl CheckOrderRequest {
    pub fn new(fields: CheckOrderFields, password: &Secret<String>) -> Self {
        let token = sign(&fields.signed_fields(), password);
        Self { fields, token }
    }

    pub fn fields(&self) -> &CheckOrderFields {
        &self.fields
    }

    pub fn token(&self) -> &str {
        &self.token
    }
}

/// Payment states reported by `CheckOrder`. Only [`PaymentState::Confirmed`] counts as proof of payment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentState {
    New,
    FormShowed,
    Authorizing,
    Authorized,
    Confirming,
    Confirmed,
    Reversing,
    PartialReversed,
    Reversed,
    Refunding,
    PartialRefunded,
    Refunded,
    Rejected,
    Canceled,
    DeadlineExpired,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct PaymentStatus {
    pub status: PaymentState,
    #[serde(default)]
    pub amount: Option<MinorUnits>,
    #[serde(default)]
    pub error_code: Option<String>,
}

/// The gateway's reply to `CheckOrder`. As with [`InitResponse`], `ErrorCode` must be present.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct CheckOrderResponse {
    #[serde(default)]
    pub success: bool,
    pub error_code: String,
    #[serde(default)]
    pub order_id: Option<String>,
    #[serde(default)]
    pub payments: Vec<PaymentStatus>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub details: Option<String>,
}

impl CheckOrderResponse {
    pub fn is_success(&self) -> bool {
        is_success(self.success, &self.error_code)
    }

    /// True when the call succeeded and at least one payment for the order is `CONFIRMED`.
    pub fn is_confirmed(&self) -> bool {
        self.is_success() && self.payments.iter().any(|p| p.status == PaymentState::Confirmed)
    }

    /// A short human-readable explanation of why the order is not confirmed.
    pub fn rejection_reason(&self) -> String {
        let detail = self.message.as_deref().or(self.details.as_deref()).unwrap_or("no details given");
        if self.is_success() {
            let states = self.payments.iter().map(|p| format!("{:?}", p.status)).collect::<Vec<_>>().join(", ");
            format!("no confirmed payment (payment states: [{states}])")
        } else {
            format!("ErrorCode {}: {detail}", self.error_code)
        }
    }
}

/// The gateway reports success either via `Success: true` or `ErrorCode: "0"`; both are accepted.
fn is_success(success: bool, error_code: &str) -> bool {
    success || error_code == "0"
}
