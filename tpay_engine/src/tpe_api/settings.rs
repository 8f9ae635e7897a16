use log::*;
use tinkoff_tools::Taxation;

/// The `{serial}` placeholder in [`PaymentSettings::description_template`] is replaced by the order serial.
pub const SERIAL_PLACEHOLDER: &str = "{serial}";
pub const DEFAULT_DESCRIPTION: &str = "Оплата заказа #{serial}";
const DEFAULT_PUBLIC_URL: &str = "http://localhost:8370";

/// Shop-level payment settings that end up in every payment request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentSettings {
    pub description_template: String,
    pub taxation: Taxation,
    /// Public URL of this server, as the buyer's browser sees it. The callback URLs are built from it.
    pub public_base_url: String,
}

impl Default for PaymentSettings {
    fn default() -> Self {
        Self {
            description_template: DEFAULT_DESCRIPTION.to_string(),
            taxation: Taxation::default(),
            public_base_url: DEFAULT_PUBLIC_URL.to_string(),
        }
    }
}

impl PaymentSettings {
    pub fn new_from_env_or_default() -> Self {
        let description_template = std::env::var("TPAY_DESCRIPTION")
            .ok()
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| {
                info!("🪛️ TPAY_DESCRIPTION not set, using the default: {DEFAULT_DESCRIPTION}");
                DEFAULT_DESCRIPTION.to_string()
            });
        if !description_template.contains(SERIAL_PLACEHOLDER) {
            warn!(
                "🪛️ TPAY_DESCRIPTION does not contain {SERIAL_PLACEHOLDER}. Payment descriptions will not say which \
                 order they are for."
            );
        }
        let taxation = std::env::var("TPAY_TAXATION")
            .map(|s| {
                s.parse::<Taxation>().unwrap_or_else(|e| {
                    warn!("🪛️ {e}. Using the default taxation regime ({}).", Taxation::default());
                    Taxation::default()
                })
            })
            .unwrap_or_else(|_| {
                info!("🪛️ TPAY_TAXATION not set, using {}", Taxation::default());
                Taxation::default()
            });
        let public_base_url = std::env::var("TPAY_PUBLIC_URL").unwrap_or_else(|_| {
            warn!(
                "🪛️ TPAY_PUBLIC_URL not set, using {DEFAULT_PUBLIC_URL}. The gateway will not be able to redirect \
                 buyers back to a remote shop."
            );
            DEFAULT_PUBLIC_URL.to_string()
        });
        Self { description_template, taxation, public_base_url }
    }
}
