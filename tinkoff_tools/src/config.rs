use std::{fmt::Display, str::FromStr, time::Duration};

use log::*;
use tpay_common::{parse_boolean_flag, Secret};

/// The gateway allows a single attempt to run this long before it is abandoned.
pub const DEFAULT_GATEWAY_TIMEOUT: Duration = Duration::from_secs(15);

const TEST_BASE_URL: &str = "https://rest-api-test.tinkoff.ru/v2/";
const PROD_BASE_URL: &str = "https://securepay.tinkoff.ru/v2/";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum GatewayMode {
    #[default]
    Test,
    Prod,
}

impl GatewayMode {
    pub fn base_url(&self) -> &'static str {
        match self {
            GatewayMode::Test => TEST_BASE_URL,
            GatewayMode::Prod => PROD_BASE_URL,
        }
    }
}

impl Display for GatewayMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GatewayMode::Test => write!(f, "test"),
            GatewayMode::Prod => write!(f, "prod"),
        }
    }
}

impl FromStr for GatewayMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "test" => Ok(Self::Test),
            "prod" => Ok(Self::Prod),
            s => Err(format!("Invalid gateway mode: {s}")),
        }
    }
}

/// The terminal login (`TerminalKey`) and password. The password only ever leaves the process as part of a token.
#[derive(Debug, Clone, Default)]
pub struct TerminalCredentials {
    pub terminal_key: String,
    pub password: Secret<String>,
}

impl TerminalCredentials {
    pub fn new<S: Into<String>>(terminal_key: S, password: Secret<String>) -> Self {
        Self { terminal_key: terminal_key.into(), password }
    }
}

#[derive(Debug, Clone)]
pub struct GatewayConfig {
    pub mode: GatewayMode,
    pub credentials: TerminalCredentials,
    /// Overrides the mode's base URL. Useful for pointing at a local stub of the gateway.
    pub base_url_override: Option<String>,
    pub timeout: Duration,
    /// Skips TLS certificate validation. Only ever set this in an isolated test environment.
    pub accept_invalid_certs: bool,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            mode: GatewayMode::default(),
            credentials: TerminalCredentials::default(),
            base_url_override: None,
            timeout: DEFAULT_GATEWAY_TIMEOUT,
            accept_invalid_certs: false,
        }
    }
}

impl GatewayConfig {
    pub fn new(mode: GatewayMode, credentials: TerminalCredentials) -> Self {
        Self { mode, credentials, ..Default::default() }
    }

    /// The base URL that method names are appended to. Always ends with a `/`.
    pub fn base_url(&self) -> String {
        match &self.base_url_override {
            Some(url) if url.ends_with('/') => url.clone(),
            Some(url) => format!("{url}/"),
            None => self.mode.base_url().to_string(),
        }
    }

    pub fn new_from_env_or_default() -> Self {
        let mode = std::env::var("TPAY_GATEWAY_MODE")
            .map(|s| {
                s.parse::<GatewayMode>().unwrap_or_else(|e| {
                    warn!("🪛️ {e}. Using test mode.");
                    GatewayMode::Test
                })
            })
            .unwrap_or_else(|_| {
                info!("🪛️ TPAY_GATEWAY_MODE not set, using test mode");
                GatewayMode::Test
            });
        let terminal_key = std::env::var("TPAY_TERMINAL_KEY").unwrap_or_else(|_| {
            warn!("🪛️ TPAY_TERMINAL_KEY not set, using (probably useless) default");
            "TinkoffBankTest".to_string()
        });
        let password = Secret::new(std::env::var("TPAY_TERMINAL_PASSWORD").unwrap_or_else(|_| {
            warn!("🪛️ TPAY_TERMINAL_PASSWORD not set, using (probably useless) default");
            "00000000000000".to_string()
        }));
        let base_url_override = std::env::var("TPAY_GATEWAY_URL").ok().filter(|s| !s.trim().is_empty());
        if let Some(url) = &base_url_override {
            warn!("🪛️ TPAY_GATEWAY_URL is set. All gateway calls will go to {url} instead of the {mode} endpoint.");
        }
        let timeout = std::env::var("TPAY_GATEWAY_TIMEOUT")
            .ok()
            .and_then(|s| {
                s.parse::<u64>()
                    .map_err(|e| warn!("🪛️ {s} is not a valid TPAY_GATEWAY_TIMEOUT. {e}. Using the default."))
                    .ok()
            })
            .map(Duration::from_secs)
            .unwrap_or(DEFAULT_GATEWAY_TIMEOUT);
        let accept_invalid_certs = parse_boolean_flag(std::env::var("TPAY_ACCEPT_INVALID_CERTS").ok(), false);
        if accept_invalid_certs {
            warn!(
                "🚨️ TPAY_ACCEPT_INVALID_CERTS is enabled. TLS certificates of the gateway will NOT be verified. Never \
                 use this setting in production."
            );
        }
        Self {
            mode,
            credentials: TerminalCredentials::new(terminal_key, password),
            base_url_override,
            timeout,
            accept_invalid_certs,
        }
    }
}
